/// Identifier as it appears in source data: the dealership API hands out
/// string ids, older mock feeds use plain integers.
#[derive(serde::Deserialize)]
#[serde(untagged)]
#[doc(hidden)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Declares a string-backed identifier that deserializes from either a
/// string or an integer and always serializes as a string.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(from = "crate::core::RawId", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<crate::core::RawId> for $name {
            fn from(raw: crate::core::RawId) -> Self {
                Self(raw.into())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

pub mod vehicle;
pub mod media;
pub mod inventory;

pub use vehicle::{Vehicle, VehicleId, VehicleStatus};
pub use media::{MediaId, MediaItem, MediaKind};
pub use inventory::{Inventory, InventoryError};
