pub mod audit;
pub mod dispatcher;
pub mod errors;
pub mod ingress;
pub mod models;
pub mod resolver;
pub mod rules;

// Re-export commonly used types
pub use errors::DispatchError;
pub use ingress::{EventReport, NotificationIngress};
