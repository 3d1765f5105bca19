//! Showroom media player: vehicle inventory, playback sequencing and
//! customer share links for dealership displays.

pub mod core;
pub mod display;
pub mod input;
pub mod playback;
pub mod settings;
pub mod share;
