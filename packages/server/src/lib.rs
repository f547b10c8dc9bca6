// GridSense - Asset Notification Core
//
// This crate is the notification engine for the GridSense energy-asset
// platform: it receives committed asset status transitions, evaluates
// notification rules, resolves role-based recipients, delivers in-app
// alerts and email requests idempotently, and keeps an audit trail.
//
// The asset domain layer (CRUD, auth, MQTT transport, reporting) lives
// outside this crate and talks to it through `StatusChangeEvent` and
// `NotificationIngress`.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
