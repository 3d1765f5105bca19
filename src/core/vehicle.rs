use serde::{Deserialize, Serialize};

string_id!(
    /// Identifier of a vehicle in the dealership inventory
    VehicleId
);

/// Sales status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    #[default]
    Available,
    Sold,
}

/// A vehicle on the lot
///
/// The sequencer only reads vehicles to resolve the current one; nothing
/// downstream of the inventory loader mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Asking price in whole dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    #[serde(default)]
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Create a vehicle with only an id; attributes are filled in by the caller
    pub fn new(id: impl Into<VehicleId>) -> Self {
        Self {
            id: id.into(),
            stock_number: None,
            vin: None,
            year: None,
            make: None,
            model: None,
            price: None,
            mileage: None,
            color: None,
            trim: None,
            engine: None,
            transmission: None,
            body_style: None,
            description: None,
            features: Vec::new(),
            status: VehicleStatus::Available,
        }
    }

    /// "2024 Bentley Continental GT", skipping whatever is missing
    pub fn title(&self) -> String {
        let year = self.year.map(|y| y.to_string());
        let parts: Vec<&str> = [year.as_deref(), self.make.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            format!("Vehicle {}", self.id)
        } else {
            parts.join(" ")
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_full() {
        let mut v = Vehicle::new("clx1");
        v.year = Some(2024);
        v.make = Some("Bentley".to_string());
        v.model = Some("Continental GT".to_string());
        assert_eq!(v.title(), "2024 Bentley Continental GT");
    }

    #[test]
    fn test_title_falls_back_to_id() {
        let v = Vehicle::new("BT-7");
        assert_eq!(v.title(), "Vehicle BT-7");
    }

    #[test]
    fn test_numeric_and_string_ids_deserialize() {
        let numeric: Vehicle = serde_json::from_str(r#"{"id": 4, "make": "Bentley"}"#).unwrap();
        assert_eq!(numeric.id, VehicleId::new("4"));

        let text: Vehicle =
            serde_json::from_str(r#"{"id": "clx2b3", "stockNumber": "BT2024002", "status": "sold"}"#).unwrap();
        assert_eq!(text.id.as_str(), "clx2b3");
        assert_eq!(text.stock_number.as_deref(), Some("BT2024002"));
        assert!(!text.is_available());
    }

    #[test]
    fn test_id_serializes_as_string() {
        let v = Vehicle::new("7");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["id"], serde_json::json!("7"));
        assert_eq!(json["status"], serde_json::json!("available"));
    }
}
