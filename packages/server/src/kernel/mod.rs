//! Kernel module - infrastructure traits and dependencies.

pub mod alert_feed;
pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use alert_feed::AlertFeed;
pub use deps::{PgAlertStore, PgAuditLog, PgEmailQueue, PgUserDirectory, ServerDeps};
pub use test_dependencies::{
    InMemoryAlertStore, InMemoryAuditLog, InMemoryEmailQueue, MockUserDirectory, TestDependencies,
};
pub use traits::*;
