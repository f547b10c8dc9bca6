//! Server dependencies for the notification pipeline (traits for testability)
//!
//! This module provides the central dependency container used by the
//! pipeline, plus the Postgres adapters behind each infrastructure trait.
//! All external services use trait abstractions to enable testing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{Role, UserId};
use crate::config::Config;
use crate::domains::notifications::audit::AuditEntry;
use crate::domains::notifications::models::Alert;
use crate::kernel::alert_feed::AlertFeed;
use crate::kernel::traits::{
    BaseAlertStore, BaseAuditLog, BaseEmailQueue, BaseUserDirectory, DirectoryUser, EmailRequest,
};

// =============================================================================
// Postgres adapters
// =============================================================================

/// User directory backed by the platform's `users` table.
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    display_name: String,
    email: String,
    role: String,
}

#[async_trait]
impl BaseUserDirectory for PgUserDirectory {
    async fn active_users(&self, role: Role) -> Result<Vec<DirectoryUser>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, display_name, email, role
             FROM users
             WHERE role = $1 AND active
             ORDER BY created_at",
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .context("user directory query failed")?;

        rows.into_iter()
            .map(|row| {
                let role = Role::from_str(&row.role)
                    .with_context(|| format!("user {} has an unknown role", row.id))?;
                Ok(DirectoryUser {
                    id: row.id,
                    display_name: row.display_name,
                    email: row.email,
                    role,
                })
            })
            .collect()
    }
}

/// Alert store backed by the `alerts` table.
pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAlertStore for PgAlertStore {
    async fn insert_if_absent(&self, alert: &Alert) -> Result<bool> {
        alert.record(&self.pool).await
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Alert>> {
        Alert::find_by_user(user_id, &self.pool).await
    }
}

/// Email queue backed by the `email_outbox` table.
///
/// The outbox is drained by the messaging layer (out of scope here).
/// ON CONFLICT on the correlation id keeps redeliveries from enqueueing
/// the same email twice.
pub struct PgEmailQueue {
    pool: PgPool,
}

impl PgEmailQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseEmailQueue for PgEmailQueue {
    async fn enqueue(&self, request: EmailRequest) -> Result<()> {
        sqlx::query(
            "INSERT INTO email_outbox (correlation_id, recipient, subject, body)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (correlation_id) DO NOTHING",
        )
        .bind(&request.correlation_id)
        .bind(&request.to)
        .bind(&request.subject)
        .bind(&request.body)
        .execute(&self.pool)
        .await
        .context("email outbox insert failed")?;

        Ok(())
    }
}

/// Audit log backed by the append-only `audit_log` table.
pub struct PgAuditLog {
    pool: PgPool,
}

impl PgAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAuditLog for PgAuditLog {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        let records =
            serde_json::to_value(&entry.records).context("audit records serialization failed")?;

        sqlx::query(
            "INSERT INTO audit_log
               (event_id, asset_id, asset_name, site_id, site_name,
                previous_status, new_status, reason, actor_id, occurred_at,
                delivered, failed, suppressed, records)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(entry.event_id)
        .bind(entry.asset_id)
        .bind(&entry.asset_name)
        .bind(entry.site_id)
        .bind(&entry.site_name)
        .bind(entry.previous_status.as_str())
        .bind(entry.new_status.as_str())
        .bind(&entry.reason)
        .bind(entry.actor_id)
        .bind(entry.occurred_at)
        .bind(entry.delivered as i64)
        .bind(entry.failed as i64)
        .bind(entry.suppressed as i64)
        .bind(records)
        .execute(&self.pool)
        .await
        .context("audit log insert failed")?;

        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies accessible to the notification pipeline.
#[derive(Clone)]
pub struct ServerDeps {
    pub directory: Arc<dyn BaseUserDirectory>,
    pub alert_store: Arc<dyn BaseAlertStore>,
    pub email_queue: Arc<dyn BaseEmailQueue>,
    pub audit_log: Arc<dyn BaseAuditLog>,
    /// Live push of delivered alerts to connected UI streams.
    pub alert_feed: AlertFeed,
    /// Timeout for a single directory lookup.
    pub directory_timeout: Duration,
    /// Base URL for asset deep links in alerts and emails.
    pub asset_view_base_url: String,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        directory: Arc<dyn BaseUserDirectory>,
        alert_store: Arc<dyn BaseAlertStore>,
        email_queue: Arc<dyn BaseEmailQueue>,
        audit_log: Arc<dyn BaseAuditLog>,
        alert_feed: AlertFeed,
        directory_timeout: Duration,
        asset_view_base_url: String,
    ) -> Self {
        Self {
            directory,
            alert_store,
            email_queue,
            audit_log,
            alert_feed,
            directory_timeout,
            asset_view_base_url,
        }
    }

    /// Wire up the Postgres-backed production dependencies.
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        Self::new(
            Arc::new(PgUserDirectory::new(pool.clone())),
            Arc::new(PgAlertStore::new(pool.clone())),
            Arc::new(PgEmailQueue::new(pool.clone())),
            Arc::new(PgAuditLog::new(pool)),
            AlertFeed::with_capacity(config.alert_feed_capacity),
            config.directory_timeout,
            config.asset_view_base_url.clone(),
        )
    }
}
