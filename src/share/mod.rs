pub mod link;
pub mod scope;

pub use link::{ShareData, ShareKind};
pub use scope::DisplayScope;
