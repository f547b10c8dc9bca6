//! Notification directives - the rule engine's output.

use serde::{Deserialize, Serialize};

use crate::common::Role;

/// Urgency of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
}

/// Visual severity tag carried into the alert UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Info,
    Success,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Danger => "danger",
        }
    }
}

/// The closed set of notification rules.
///
/// The rule identity is part of the delivery dedup key, so a recipient
/// matched by two rules for one event receives two separate notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationRule {
    /// Asset dropped out of service from operational.
    AssetUnavailable,

    /// Asset entered maintenance; field staff need to act.
    MaintenanceRequired,

    /// Asset came back to operational.
    ServiceRestored,

    /// Asset entered the emergency status.
    EmergencyDeclared,
}

impl NotificationRule {
    /// Stable key used in dedup keys, delivery records, and the audit log.
    pub fn key(&self) -> &'static str {
        match self {
            NotificationRule::AssetUnavailable => "asset_unavailable",
            NotificationRule::MaintenanceRequired => "maintenance_required",
            NotificationRule::ServiceRestored => "service_restored",
            NotificationRule::EmergencyDeclared => "emergency_declared",
        }
    }
}

/// A decision to notify a set of roles with specific content.
///
/// Produced fresh per event by the rule engine and consumed by the
/// dispatcher; never persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDirective {
    pub rule: NotificationRule,
    /// Target roles, in rule order.
    pub roles: Vec<Role>,
    pub priority: Priority,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    /// Deep-link path back to the asset, e.g. `/assets/<id>`. The
    /// dispatcher prefixes the configured base URL.
    pub action_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_keys_are_distinct() {
        use std::collections::HashSet;
        let keys: HashSet<_> = [
            NotificationRule::AssetUnavailable,
            NotificationRule::MaintenanceRequired,
            NotificationRule::ServiceRestored,
            NotificationRule::EmergencyDeclared,
        ]
        .iter()
        .map(|r| r.key())
        .collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_directive_serializes() {
        let directive = NotificationDirective {
            rule: NotificationRule::EmergencyDeclared,
            roles: vec![Role::Admin, Role::SiteManager],
            priority: Priority::Critical,
            severity: Severity::Danger,
            title: "Emergency: Pump-7".to_string(),
            body: "Pump-7 at North Yard entered emergency status.".to_string(),
            action_path: "/assets/0".to_string(),
        };
        let json = serde_json::to_string(&directive).unwrap();
        assert!(json.contains("emergency_declared"));
        assert!(json.contains("site_manager"));
        assert!(json.contains("critical"));
    }
}
