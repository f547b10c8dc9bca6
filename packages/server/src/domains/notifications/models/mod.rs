pub mod alert;
pub mod delivery;
pub mod directive;

pub use alert::Alert;
pub use delivery::{dedup_key, DeliveryOutcome, DeliveryRecord};
pub use directive::{NotificationDirective, NotificationRule, Priority, Severity};
