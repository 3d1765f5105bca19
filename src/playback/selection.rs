use tracing::debug;

use crate::core::{Inventory, Vehicle, VehicleId};

/// Vehicles an operator picked for the showroom display
///
/// An empty selection means "show everything".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleSelection {
    ids: Vec<VehicleId>,
}

impl VehicleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = VehicleId>) -> Self {
        let mut selection = Self::new();
        for id in ids {
            if !selection.contains(&id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    /// Add the vehicle if absent, remove it if present. Returns whether the
    /// vehicle is selected afterwards.
    pub fn toggle(&mut self, id: &VehicleId) -> bool {
        if let Some(pos) = self.ids.iter().position(|v| v == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.clone());
            true
        }
    }

    pub fn select_all(&mut self, inventory: &Inventory) {
        self.ids = inventory.vehicles.iter().map(|v| v.id.clone()).collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &VehicleId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolve the display set, keeping inventory order
    ///
    /// Falls back to the whole inventory when nothing selected resolves.
    pub fn display_set(&self, inventory: &Inventory) -> Vec<Vehicle> {
        let selected: Vec<Vehicle> = inventory
            .vehicles
            .iter()
            .filter(|v| self.contains(&v.id))
            .cloned()
            .collect();

        if selected.is_empty() {
            if !self.is_empty() {
                debug!("None of {} selected vehicles are in the inventory, showing all", self.len());
            }
            inventory.vehicles.clone()
        } else {
            selected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> Inventory {
        Inventory::new(
            vec![Vehicle::new("a"), Vehicle::new("b"), Vehicle::new("c")],
            Vec::new(),
        )
    }

    fn ids(vehicles: &[Vehicle]) -> Vec<&str> {
        vehicles.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn test_empty_selection_shows_all() {
        let sel = VehicleSelection::new();
        assert_eq!(ids(&sel.display_set(&inventory())), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_selection_keeps_inventory_order() {
        let sel = VehicleSelection::from_ids([VehicleId::new("c"), VehicleId::new("a")]);
        assert_eq!(ids(&sel.display_set(&inventory())), vec!["a", "c"]);
    }

    #[test]
    fn test_toggle_select_all_clear() {
        let inv = inventory();
        let mut sel = VehicleSelection::new();
        assert!(sel.toggle(&VehicleId::new("b")));
        assert!(!sel.toggle(&VehicleId::new("b")));
        assert!(sel.is_empty());

        sel.select_all(&inv);
        assert_eq!(sel.len(), 3);
        sel.clear();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_unknown_ids_fall_back_to_all() {
        let sel = VehicleSelection::from_ids([VehicleId::new("zzz")]);
        assert_eq!(sel.display_set(&inventory()).len(), 3);
    }
}
