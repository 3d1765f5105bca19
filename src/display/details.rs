use std::fmt;

use crate::core::Vehicle;
use crate::display::format::{format_mileage, format_price};

/// Text rendering of the vehicle details panel
///
/// Built from the vehicle the sequencer reports through its change
/// notification; `None` renders the placeholder shown before any vehicle
/// is selected.
pub struct VehicleDetails<'a> {
    vehicle: Option<&'a Vehicle>,
}

impl<'a> VehicleDetails<'a> {
    pub fn new(vehicle: Option<&'a Vehicle>) -> Self {
        Self { vehicle }
    }

    pub fn lines(&self) -> Vec<String> {
        let Some(v) = self.vehicle else {
            return vec!["Select a vehicle to view details".to_string()];
        };

        let mut lines = vec![v.title()];

        let summary: Vec<String> = [v.price.map(format_price), v.color.clone()]
            .into_iter()
            .flatten()
            .collect();
        if !summary.is_empty() {
            lines.push(summary.join(" • "));
        }

        let stock: Vec<String> = [
            v.mileage.map(format_mileage),
            v.stock_number.as_ref().map(|s| format!("Stock: {}", s)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !stock.is_empty() {
            lines.push(stock.join(" • "));
        }

        for (label, value) in [
            ("Trim", &v.trim),
            ("Engine", &v.engine),
            ("Transmission", &v.transmission),
            ("Body", &v.body_style),
            ("VIN", &v.vin),
        ] {
            if let Some(value) = value {
                lines.push(format!("{}: {}", label, value));
            }
        }

        if !v.features.is_empty() {
            lines.push(format!("Key features: {}", v.features.join(", ")));
        }

        lines.push(if v.is_available() { "Available now" } else { "Sold" }.to_string());
        lines
    }
}

impl fmt::Display for VehicleDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VehicleStatus;
    use crate::input::MockInventory;

    #[test]
    fn test_placeholder_without_vehicle() {
        assert_eq!(
            VehicleDetails::new(None).to_string(),
            "Select a vehicle to view details"
        );
    }

    #[test]
    fn test_demo_vehicle_panel() {
        let inv = MockInventory::inventory();
        let lines = VehicleDetails::new(inv.vehicles.first()).lines();
        assert_eq!(lines[0], "2024 Bentley Continental GT");
        assert_eq!(lines[1], "$185,500 • Beluga Black");
        assert_eq!(lines[2], "450 miles • Stock: BT2024001");
        assert!(lines.iter().any(|l| l.starts_with("Key features: Premium Package")));
        assert_eq!(lines.last().map(String::as_str), Some("Available now"));
    }

    #[test]
    fn test_sparse_vehicle_skips_missing_fields() {
        let mut v = Vehicle::new("9");
        v.status = VehicleStatus::Sold;
        v.engine = Some("4.0L V8".to_string());
        let lines = VehicleDetails::new(Some(&v)).lines();
        assert_eq!(lines, vec!["Vehicle 9", "Engine: 4.0L V8", "Sold"]);
    }
}
