//! Status-change facts emitted by the asset domain layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{AssetId, SiteId, UserId};
use crate::domains::assets::models::{AssetContext, AssetStatus};

/// An immutable fact: an asset's status field was committed as changed.
///
/// Produced once per transition by the asset domain layer, consumed by the
/// notification pipeline, then discarded (the audit log archives a copy).
/// Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub event_id: Uuid,
    pub asset_id: AssetId,
    pub asset_name: String,
    pub site_id: SiteId,
    pub site_name: String,
    pub previous_status: AssetStatus,
    pub new_status: AssetStatus,
    /// Optional free-text reason supplied by the actor.
    pub reason: Option<String>,
    /// Who or what caused the transition; `None` for automated sources.
    pub actor_id: Option<UserId>,
    pub occurred_at: DateTime<Utc>,
}

impl StatusChangeEvent {
    /// Build a new fact for a transition observed now.
    pub fn new(
        asset: &AssetContext,
        previous_status: AssetStatus,
        new_status: AssetStatus,
        reason: Option<String>,
        actor_id: Option<UserId>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            asset_id: asset.asset_id,
            asset_name: asset.asset_name.clone(),
            site_id: asset.site_id,
            site_name: asset.site_name.clone(),
            previous_status,
            new_status,
            reason,
            actor_id,
            occurred_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> AssetContext {
        AssetContext {
            asset_id: AssetId::new(),
            asset_name: "Pump-7".to_string(),
            site_id: SiteId::new(),
            site_name: "North Yard".to_string(),
        }
    }

    #[test]
    fn event_serializes() {
        let event = StatusChangeEvent::new(
            &sample_context(),
            AssetStatus::Operational,
            AssetStatus::Offline,
            Some("comms lost".to_string()),
            None,
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Pump-7"));
        assert!(json.contains("\"operational\""));
        assert!(json.contains("\"offline\""));
        assert!(json.contains("comms lost"));
    }

    #[test]
    fn event_roundtrip_serializes() {
        let event = StatusChangeEvent::new(
            &sample_context(),
            AssetStatus::Maintenance,
            AssetStatus::Operational,
            None,
            Some(UserId::new()),
        );
        let json = serde_json::to_string(&event).unwrap();
        let parsed: StatusChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.event_id, event.event_id);
        assert_eq!(parsed.new_status, AssetStatus::Operational);
        assert_eq!(parsed.actor_id, event.actor_id);
    }

    #[test]
    fn events_get_unique_ids() {
        let ctx = sample_context();
        let a = StatusChangeEvent::new(&ctx, AssetStatus::Operational, AssetStatus::Offline, None, None);
        let b = StatusChangeEvent::new(&ctx, AssetStatus::Operational, AssetStatus::Offline, None, None);
        assert_ne!(a.event_id, b.event_id);
    }
}
