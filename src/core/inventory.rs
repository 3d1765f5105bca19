use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{MediaId, MediaItem, Vehicle, VehicleId};

/// Errors raised while loading or validating an inventory
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read inventory: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON inventory: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV manifest: {0}")]
    Csv(#[from] csv::Error),

    #[error("unrecognized inventory format: {0}")]
    UnknownFormat(String),

    #[error("missing column, expected one of {0:?}")]
    MissingColumn(&'static [&'static str]),

    #[error("row {row}: {message}")]
    Row { row: usize, message: String },

    #[error("duplicate vehicle id {0}")]
    DuplicateVehicle(VehicleId),

    #[error("duplicate media id {0}")]
    DuplicateMedia(MediaId),

    #[error("media {media} references unknown vehicle {vehicle}")]
    OrphanMedia { media: MediaId, vehicle: VehicleId },
}

/// Vehicles on display plus every media item attached to them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

impl Inventory {
    pub fn new(vehicles: Vec<Vehicle>, media: Vec<MediaItem>) -> Self {
        Self { vehicles, media }
    }

    /// Check that ids are unique and every media item has an owner
    pub fn validate(&self) -> Result<(), InventoryError> {
        let mut vehicle_ids = HashSet::with_capacity(self.vehicles.len());
        for vehicle in &self.vehicles {
            if !vehicle_ids.insert(&vehicle.id) {
                return Err(InventoryError::DuplicateVehicle(vehicle.id.clone()));
            }
        }

        let mut media_ids = HashSet::with_capacity(self.media.len());
        for item in &self.media {
            if !media_ids.insert(&item.id) {
                return Err(InventoryError::DuplicateMedia(item.id.clone()));
            }
            if !vehicle_ids.contains(&item.vehicle_id) {
                return Err(InventoryError::OrphanMedia {
                    media: item.id.clone(),
                    vehicle: item.vehicle_id.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| &v.id == id)
    }

    pub fn media_item(&self, id: &MediaId) -> Option<&MediaItem> {
        self.media.iter().find(|m| &m.id == id)
    }

    /// Media owned by a vehicle, ordered by `order`
    ///
    /// Items without an ordering key keep their source order and come after
    /// the keyed ones.
    pub fn media_for(&self, vehicle_id: &VehicleId) -> Vec<&MediaItem> {
        let mut items: Vec<&MediaItem> = self
            .media
            .iter()
            .filter(|m| &m.vehicle_id == vehicle_id)
            .collect();
        // sort_by_key is stable
        items.sort_by_key(|m| m.order.map_or((1, 0), |o| (0, o)));
        items
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MediaKind;

    fn sample() -> Inventory {
        let mut unordered = MediaItem::new("m-free", "a", MediaKind::Photo);
        unordered.order = None;
        let mut second = MediaItem::new("m2", "a", MediaKind::Drone);
        second.order = Some(2);
        let mut first = MediaItem::new("m1", "a", MediaKind::Video);
        first.order = Some(1);

        Inventory::new(
            vec![Vehicle::new("a"), Vehicle::new("b")],
            vec![unordered, second, first, MediaItem::new("m3", "b", MediaKind::Photo)],
        )
    }

    #[test]
    fn test_media_for_orders_by_key() {
        let inv = sample();
        let ids: Vec<&str> = inv
            .media_for(&VehicleId::new("a"))
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["m1", "m2", "m-free"]);
        assert!(inv.media_for(&VehicleId::new("zzz")).is_empty());
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_orphan_media() {
        let mut inv = sample();
        inv.media.push(MediaItem::new("lost", "ghost", MediaKind::Video));
        match inv.validate() {
            Err(InventoryError::OrphanMedia { media, vehicle }) => {
                assert_eq!(media.as_str(), "lost");
                assert_eq!(vehicle.as_str(), "ghost");
            }
            other => panic!("expected orphan error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_duplicate_vehicle() {
        let mut inv = sample();
        inv.vehicles.push(Vehicle::new("a"));
        assert!(matches!(inv.validate(), Err(InventoryError::DuplicateVehicle(_))));
    }
}
