//! Audit trail for processed status transitions.
//!
//! Append-only and best-effort: a failed audit write is reported to
//! telemetry and never blocks or rolls back delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::common::{AssetId, SiteId, UserId};
use crate::domains::assets::models::AssetStatus;
use crate::domains::assets::StatusChangeEvent;
use crate::domains::notifications::ingress::EventReport;
use crate::domains::notifications::models::DeliveryRecord;
use crate::kernel::deps::ServerDeps;

/// One append-only archive row per processed event: the full transition
/// fact plus per-recipient dispatch outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub event_id: Uuid,
    pub asset_id: AssetId,
    pub asset_name: String,
    pub site_id: SiteId,
    pub site_name: String,
    pub previous_status: AssetStatus,
    pub new_status: AssetStatus,
    pub reason: Option<String>,
    pub actor_id: Option<UserId>,
    pub occurred_at: DateTime<Utc>,
    pub delivered: usize,
    pub failed: usize,
    pub suppressed: usize,
    pub records: Vec<DeliveryRecord>,
}

/// Build the audit entry for one processed event.
pub fn build_entry(event: &StatusChangeEvent, report: &EventReport) -> AuditEntry {
    AuditEntry {
        event_id: event.event_id,
        asset_id: event.asset_id,
        asset_name: event.asset_name.clone(),
        site_id: event.site_id,
        site_name: event.site_name.clone(),
        previous_status: event.previous_status,
        new_status: event.new_status,
        reason: event.reason.clone(),
        actor_id: event.actor_id,
        occurred_at: event.occurred_at,
        delivered: report.delivered(),
        failed: report.failed(),
        suppressed: report.suppressed(),
        records: report.records.clone(),
    }
}

/// Record the transition and its dispatch outcomes.
///
/// Also emits the structured telemetry entry for the transition. Audit
/// store failures are logged and swallowed.
pub async fn record(deps: &ServerDeps, event: &StatusChangeEvent, report: &EventReport) {
    info!(
        event_id = %event.event_id,
        asset_id = %event.asset_id,
        asset_name = %event.asset_name,
        site_id = %event.site_id,
        site_name = %event.site_name,
        previous_status = %event.previous_status,
        new_status = %event.new_status,
        reason = event.reason.as_deref().unwrap_or(""),
        directives_fired = report.directives_fired,
        delivered = report.delivered(),
        failed = report.failed(),
        suppressed = report.suppressed(),
        failed_directives = report.failed_directives.len(),
        "status transition processed"
    );

    let entry = build_entry(event, report);
    if let Err(e) = deps.audit_log.append(&entry).await {
        // Best-effort only. Telemetry sees it; delivery already happened.
        warn!(event_id = %event.event_id, error = %e, "audit log write failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Role;
    use crate::domains::assets::models::AssetContext;
    use crate::domains::notifications::models::{DeliveryOutcome, NotificationRule};
    use crate::kernel::test_dependencies::TestDependencies;

    fn sample_event() -> StatusChangeEvent {
        let ctx = AssetContext {
            asset_id: AssetId::new(),
            asset_name: "Pump-7".to_string(),
            site_id: SiteId::new(),
            site_name: "North Yard".to_string(),
        };
        StatusChangeEvent::new(
            &ctx,
            AssetStatus::Maintenance,
            AssetStatus::Operational,
            None,
            None,
        )
    }

    fn report_with_one_delivery(event: &StatusChangeEvent) -> EventReport {
        let mut report = EventReport::new(event.event_id, 1);
        report.records.push(DeliveryRecord {
            event_id: event.event_id,
            rule: NotificationRule::ServiceRestored,
            user_id: UserId::new(),
            role: Role::Admin,
            channel: crate::common::Channel::InApp,
            outcome: DeliveryOutcome::Delivered,
            recorded_at: Utc::now(),
        });
        report
    }

    #[tokio::test]
    async fn appends_one_entry_with_transition_fields() {
        let test = TestDependencies::new();
        let event = sample_event();
        let report = report_with_one_delivery(&event);

        record(&test.deps, &event, &report).await;

        let entries = test.audit_log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event_id, event.event_id);
        assert_eq!(entries[0].previous_status, AssetStatus::Maintenance);
        assert_eq!(entries[0].new_status, AssetStatus::Operational);
        assert_eq!(entries[0].delivered, 1);
        assert_eq!(entries[0].records.len(), 1);
    }

    #[tokio::test]
    async fn audit_failure_is_swallowed() {
        let test = TestDependencies::new();
        test.audit_log.fail_writes();
        let event = sample_event();
        let report = report_with_one_delivery(&event);

        // Must not panic or propagate.
        record(&test.deps, &event, &report).await;
        assert!(test.audit_log.entries().is_empty());
    }

    #[test]
    fn entry_serializes_with_records() {
        let event = sample_event();
        let report = report_with_one_delivery(&event);
        let entry = build_entry(&event, &report);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"previous_status\":\"maintenance\""));
        assert!(json.contains("\"new_status\":\"operational\""));
        assert!(json.contains("service_restored"));
    }
}
