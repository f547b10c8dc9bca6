pub mod events;
pub mod models;

// Re-export commonly used types
pub use events::StatusChangeEvent;
pub use models::{AssetContext, AssetStatus};
