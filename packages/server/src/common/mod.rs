// Common types shared across the application

pub mod entity_ids;
pub mod id;
pub mod roles;

pub use entity_ids::*;
pub use id::Id;
pub use roles::{Channel, Role, RoleParseError};
