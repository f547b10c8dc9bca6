//! Persisted in-app alerts.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{AlertId, UserId};

/// Alert record - an in-app notification visible to one user.
///
/// Write-once. The `dedup_key` column carries a unique constraint; inserts
/// go through `record`, which is idempotent on that key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Alert {
    pub id: AlertId,
    pub user_id: UserId,
    pub event_id: Uuid,
    pub dedup_key: String,
    pub title: String,
    pub body: String,
    /// Severity tag as its stable string form ("warning", "danger", ...).
    pub severity: String,
    /// Resolvable deep link to the asset view.
    pub action_url: String,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Persist this alert (insert-if-absent on the dedup key).
    ///
    /// Uses ON CONFLICT DO NOTHING so that two workers racing on the same
    /// directive cannot create a second visible alert. Returns `true` if
    /// the row was inserted, `false` if the key already existed.
    pub async fn record(&self, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO alerts (id, user_id, event_id, dedup_key, title, body, severity, action_url, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (dedup_key) DO NOTHING",
        )
        .bind(self.id)
        .bind(self.user_id)
        .bind(self.event_id)
        .bind(&self.dedup_key)
        .bind(&self.title)
        .bind(&self.body)
        .bind(&self.severity)
        .bind(&self.action_url)
        .bind(self.created_at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Find all alerts for a user, newest first.
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        let alerts = sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(alerts)
    }
}
