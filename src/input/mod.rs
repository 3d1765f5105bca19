pub mod csv;
pub mod json;
pub mod mock;
pub mod source;

pub use self::csv::load_csv;
pub use json::load_json;
pub use mock::MockInventory;
pub use source::{FileInventory, InventorySource};

use std::path::Path;

use crate::core::{Inventory, InventoryError};

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InventoryFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of an inventory file by looking at its first bytes
pub fn detect_format(data: &[u8]) -> InventoryFormat {
    if is_json(data) {
        return InventoryFormat::Json;
    }

    if is_csv(data) {
        return InventoryFormat::Csv;
    }

    InventoryFormat::Unknown
}

fn is_json(data: &[u8]) -> bool {
    // Skip a UTF-8 BOM and leading whitespace
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    matches!(
        data.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'{') | Some(b'[')
    )
}

fn is_csv(data: &[u8]) -> bool {
    if data.len() < 10 {
        return false;
    }

    // Look for a line with at least two commas near the top
    let sample = &data[..data.len().min(500)];
    match std::str::from_utf8(sample) {
        Ok(text) => text.lines().take(5).any(|line| line.chars().filter(|&c| c == ',').count() >= 2),
        // The sample may end mid-character; fall back to a lossy view
        Err(_) => String::from_utf8_lossy(sample)
            .lines()
            .take(5)
            .any(|line| line.chars().filter(|&c| c == ',').count() >= 2),
    }
}

/// Load an inventory from a file, auto-detecting the format
pub fn load_inventory(path: impl AsRef<Path>) -> Result<Inventory, InventoryError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;

    let inventory = match detect_format(&data) {
        InventoryFormat::Json => json::parse_json(&data)?,
        InventoryFormat::Csv => csv::parse_csv(data.as_slice())?,
        InventoryFormat::Unknown => {
            return Err(InventoryError::UnknownFormat(path.display().to_string()))
        }
    };

    inventory.validate()?;
    Ok(inventory)
}
