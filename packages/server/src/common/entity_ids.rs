//! Typed ID definitions for the domain entities.
//!
//! Each alias is incompatible with the others at compile time, so an
//! `AssetId` can never end up in a `UserId` column by accident.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for energy assets (pumps, inverters, meters, ...).
pub struct Asset;

/// Marker type for sites (physical locations grouping assets).
pub struct Site;

/// Marker type for directory users (alert and email recipients).
pub struct User;

/// Marker type for persisted in-app alerts.
pub struct Alert;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for energy assets.
pub type AssetId = Id<Asset>;

/// Typed ID for sites.
pub type SiteId = Id<Site>;

/// Typed ID for directory users.
pub type UserId = Id<User>;

/// Typed ID for persisted alerts.
pub type AlertId = Id<Alert>;
