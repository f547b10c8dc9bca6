//! Rule engine - maps a status transition to notification directives.
//!
//! Pure and deterministic: no I/O, no clock, no randomness. Rules are
//! evaluated independently; more than one may fire for a single transition
//! and all that match are returned, in the order defined here.

use crate::common::Role;
use crate::domains::assets::models::AssetStatus;
use crate::domains::assets::StatusChangeEvent;
use crate::domains::notifications::models::{
    NotificationDirective, NotificationRule, Priority, Severity,
};

/// Evaluate all notification rules for one transition.
///
/// Unmatched transitions (e.g. operational -> operational) return an empty
/// list; that is a no-op, not an error.
pub fn evaluate(event: &StatusChangeEvent) -> Vec<NotificationDirective> {
    let mut directives = Vec::new();
    let prev = event.previous_status;
    let new = event.new_status;
    let action_path = format!("/assets/{}", event.asset_id);

    // Operational asset dropped out of service.
    if prev == AssetStatus::Operational
        && matches!(new, AssetStatus::Offline | AssetStatus::Maintenance)
    {
        directives.push(NotificationDirective {
            rule: NotificationRule::AssetUnavailable,
            roles: vec![Role::Admin, Role::SiteManager],
            priority: Priority::Critical,
            severity: Severity::Warning,
            title: format!("Asset {}: {}", new, event.asset_name),
            body: unavailable_body(event),
            action_path: action_path.clone(),
        });
    }

    // Maintenance work needed, whatever the previous status. Fires
    // alongside the rule above for operational -> maintenance.
    if new == AssetStatus::Maintenance {
        directives.push(NotificationDirective {
            rule: NotificationRule::MaintenanceRequired,
            roles: vec![Role::MaintenanceStaff],
            priority: Priority::High,
            severity: Severity::Info,
            title: format!("Maintenance required: {}", event.asset_name),
            body: format!(
                "{} at {} entered maintenance and is waiting for service.",
                event.asset_name, event.site_name
            ),
            action_path: action_path.clone(),
        });
    }

    // Asset recovered.
    if new == AssetStatus::Operational
        && matches!(prev, AssetStatus::Offline | AssetStatus::Maintenance)
    {
        directives.push(NotificationDirective {
            rule: NotificationRule::ServiceRestored,
            roles: vec![Role::Admin, Role::SiteManager, Role::Customer],
            priority: Priority::Medium,
            severity: Severity::Success,
            title: format!("Back in service: {}", event.asset_name),
            body: format!(
                "{} at {} returned to operational status.",
                event.asset_name, event.site_name
            ),
            action_path: action_path.clone(),
        });
    }

    // Emergency always notifies all staff roles, regardless of previous
    // status (including emergency -> emergency).
    if new == AssetStatus::Emergency {
        directives.push(NotificationDirective {
            rule: NotificationRule::EmergencyDeclared,
            roles: vec![Role::Admin, Role::SiteManager, Role::MaintenanceStaff],
            priority: Priority::Critical,
            severity: Severity::Danger,
            title: format!("EMERGENCY: {}", event.asset_name),
            body: format!(
                "{} at {} reported an emergency condition. Immediate attention required.",
                event.asset_name, event.site_name
            ),
            action_path,
        });
    }

    directives
}

fn unavailable_body(event: &StatusChangeEvent) -> String {
    let base = format!(
        "{} at {} changed from operational to {}.",
        event.asset_name, event.site_name, event.new_status
    );
    match &event.reason {
        Some(reason) => format!("{} Reason: {}", base, reason),
        None => base,
    }
}
