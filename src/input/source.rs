use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{Inventory, InventoryError};

/// Trait for inventory providers
///
/// The sequencer treats whatever a source returns as read-only for the rest
/// of the session; sources are refreshed between sessions, not during one.
/// Implementations:
/// - file-backed JSON or CSV inventories
/// - the built-in demo inventory
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Human readable name of this source, used in logs
    fn name(&self) -> &str;

    /// Fetch and validate the inventory
    async fn fetch(&self) -> Result<Inventory, InventoryError>;
}

/// Inventory loaded from a JSON or CSV file on disk
pub struct FileInventory {
    path: PathBuf,
    name: String,
}

impl FileInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl InventorySource for FileInventory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Inventory, InventoryError> {
        let path = self.path.clone();
        debug!("Loading inventory from {}", self.name);

        // File parsing is blocking work
        let inventory = tokio::task::spawn_blocking(move || super::load_inventory(path))
            .await
            .map_err(|e| InventoryError::Io(std::io::Error::other(e)))??;

        info!(
            "Loaded {} vehicles and {} media items from {}",
            inventory.vehicles.len(),
            inventory.media.len(),
            self.name
        );
        Ok(inventory)
    }
}
