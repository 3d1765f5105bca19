use std::path::Path;

use serde::Deserialize;

use crate::core::{Inventory, InventoryError, Vehicle};

/// Either a full inventory document or a bare vehicle list (the shape the
/// vehicles API returns)
#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Full(Inventory),
    Vehicles(Vec<Vehicle>),
}

/// Parse an inventory from JSON bytes
pub fn parse_json(data: &[u8]) -> Result<Inventory, InventoryError> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    let inventory = match serde_json::from_slice::<Document>(data)? {
        Document::Full(inventory) => inventory,
        Document::Vehicles(vehicles) => Inventory::new(vehicles, Vec::new()),
    };
    Ok(inventory)
}

/// Load a JSON inventory from disk
pub fn load_json(path: impl AsRef<Path>) -> Result<Inventory, InventoryError> {
    let data = std::fs::read(path)?;
    let inventory = parse_json(&data)?;
    inventory.validate()?;
    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MediaKind, VehicleId};

    #[test]
    fn test_parse_full_document() {
        let json = br#"{
            "vehicles": [
                {"id": "clx1", "year": 2024, "make": "Bentley", "model": "Continental GT",
                 "price": 185500, "mileage": 450, "stockNumber": "BT2024001"}
            ],
            "media": [
                {"id": "media1", "vehicleId": "clx1", "type": "video", "duration": 180,
                 "url": "https://example.com/a.mp4", "thumbnail": "https://example.com/a.jpg",
                 "title": "Continental GT Showcase", "order": 1}
            ]
        }"#;

        let inv = parse_json(json).unwrap();
        assert_eq!(inv.vehicles[0].title(), "2024 Bentley Continental GT");
        let media = inv.media_for(&VehicleId::new("clx1"));
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].kind, MediaKind::Video);
        assert_eq!(media[0].duration(), Some(180));
    }

    #[test]
    fn test_parse_bare_vehicle_list() {
        let inv = parse_json(br#"[{"id": 1}, {"id": 2, "make": "Bentley"}]"#).unwrap();
        assert_eq!(inv.vehicles.len(), 2);
        assert!(inv.media.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_json(b"{\"vehicles\": 3}"), Err(InventoryError::Json(_))));
    }
}
