pub mod details;
pub mod format;
pub mod shortcuts;
pub mod status;

pub use details::VehicleDetails;
pub use format::{format_mileage, format_price, format_time};
pub use shortcuts::{Invocation, ShortcutAction, ShortcutMap};
pub use status::StatusLine;
