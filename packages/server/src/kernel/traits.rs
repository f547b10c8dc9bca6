// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The pipeline
// (rules, resolver, dispatcher) is domain code that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BaseUserDirectory)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::{Role, UserId};
use crate::domains::notifications::audit::AuditEntry;
use crate::domains::notifications::models::Alert;

// =============================================================================
// User Directory Trait (Infrastructure - external user/role store)
// =============================================================================

/// A user as the directory reports it: identity plus its single primary role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
}

#[async_trait]
pub trait BaseUserDirectory: Send + Sync {
    /// All currently active users holding the given role.
    ///
    /// An error means the directory is unreachable; callers fail the whole
    /// directive rather than delivering to a partial or stale set.
    async fn active_users(&self, role: Role) -> Result<Vec<DirectoryUser>>;
}

// =============================================================================
// Alert Store Trait (Infrastructure - delivery-record store for in-app alerts)
// =============================================================================

#[async_trait]
pub trait BaseAlertStore: Send + Sync {
    /// Insert-if-absent keyed on the alert's dedup key.
    ///
    /// Returns `true` if the alert became visible, `false` if the key
    /// already existed (duplicate suppressed). Must be safe under
    /// concurrent writers without locks.
    async fn insert_if_absent(&self, alert: &Alert) -> Result<bool>;

    /// All alerts for a user, newest first.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Alert>>;
}

// =============================================================================
// Email Queue Trait (Infrastructure - out-of-band messaging layer)
// =============================================================================

/// An enqueued out-of-band delivery request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Dedup key of the originating (event, rule, recipient) tuple; lets
    /// the mailer minimize duplicates under at-least-once delivery.
    pub correlation_id: String,
}

#[async_trait]
pub trait BaseEmailQueue: Send + Sync {
    /// Enqueue a delivery request. At-least-once semantics downstream.
    async fn enqueue(&self, request: EmailRequest) -> Result<()>;
}

// =============================================================================
// Audit Log Trait (Infrastructure - append-only transition archive)
// =============================================================================

#[async_trait]
pub trait BaseAuditLog: Send + Sync {
    /// Append one entry. Callers treat failures as best-effort: they are
    /// logged to telemetry and never block or roll back delivery.
    async fn append(&self, entry: &AuditEntry) -> Result<()>;
}
