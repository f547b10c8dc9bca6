//! Per-recipient delivery records and the dedup key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Channel, Role, UserId};
use crate::domains::assets::StatusChangeEvent;
use crate::domains::notifications::models::NotificationRule;

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The alert was persisted (in-app) or the email request was enqueued.
    Delivered,

    /// The channel write failed. Not retried inline; an external
    /// retry mechanism owns recovery.
    Failed { reason: String },

    /// The dedup key already existed; no second visible alert was created.
    SuppressedDuplicate,
}

/// Write-once record of one (recipient, directive) dispatch attempt.
///
/// Every attempt produces exactly one record, whatever the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub event_id: Uuid,
    pub rule: NotificationRule,
    pub user_id: UserId,
    pub role: Role,
    pub channel: Channel,
    #[serde(flatten)]
    pub outcome: DeliveryOutcome,
    pub recorded_at: DateTime<Utc>,
}

impl DeliveryRecord {
    pub fn is_delivered(&self) -> bool {
        self.outcome == DeliveryOutcome::Delivered
    }

    pub fn is_suppressed(&self) -> bool {
        self.outcome == DeliveryOutcome::SuppressedDuplicate
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Failed { .. })
    }
}

/// Stable deduplication key for one (event, rule, recipient) tuple.
///
/// Built from the asset id, the event timestamp, the rule key, and the
/// recipient, so redelivering the same directive instance maps to the same
/// key even across racing workers. The event's random id is deliberately
/// not part of the key.
pub fn dedup_key(event: &StatusChangeEvent, rule: NotificationRule, user_id: UserId) -> String {
    format!(
        "{}:{}:{}:{}",
        event.asset_id,
        event.occurred_at.timestamp_millis(),
        rule.key(),
        user_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::AssetId;
    use crate::domains::assets::models::{AssetContext, AssetStatus};

    fn sample_event() -> StatusChangeEvent {
        let ctx = AssetContext {
            asset_id: AssetId::new(),
            asset_name: "Pump-7".to_string(),
            site_id: crate::common::SiteId::new(),
            site_name: "North Yard".to_string(),
        };
        StatusChangeEvent::new(&ctx, AssetStatus::Operational, AssetStatus::Offline, None, None)
    }

    #[test]
    fn test_dedup_key_is_stable() {
        let event = sample_event();
        let user = UserId::new();
        let a = dedup_key(&event, NotificationRule::AssetUnavailable, user);
        let b = dedup_key(&event, NotificationRule::AssetUnavailable, user);
        assert_eq!(a, b);
    }

    #[test]
    fn test_dedup_key_varies_by_rule_and_user() {
        let event = sample_event();
        let user = UserId::new();
        let base = dedup_key(&event, NotificationRule::AssetUnavailable, user);
        assert_ne!(
            base,
            dedup_key(&event, NotificationRule::MaintenanceRequired, user)
        );
        assert_ne!(
            base,
            dedup_key(&event, NotificationRule::AssetUnavailable, UserId::new())
        );
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let record = DeliveryRecord {
            event_id: Uuid::new_v4(),
            rule: NotificationRule::ServiceRestored,
            user_id: UserId::new(),
            role: Role::Customer,
            channel: Channel::Email,
            outcome: DeliveryOutcome::Failed {
                reason: "smtp timeout".to_string(),
            },
            recorded_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"outcome\":\"failed\""));
        assert!(json.contains("smtp timeout"));
        assert!(json.contains("service_restored"));
    }
}
