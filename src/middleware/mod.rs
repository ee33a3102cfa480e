pub mod identity;

pub use identity::{AuthIdentity, Role};
