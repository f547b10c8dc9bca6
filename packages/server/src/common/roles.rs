//! Role model for notification routing.
//!
//! Roles are a closed enum, not free-form strings: every rule names its
//! target roles from this set, and the delivery channel of each role is a
//! static capability table rather than a runtime lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Roles in the GridSense platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrators.
    Admin,

    /// Operators responsible for a site.
    SiteManager,

    /// Field technicians performing maintenance work.
    MaintenanceStaff,

    /// Customers whose assets are monitored.
    Customer,
}

/// How notifications reach a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Persisted alert, visible in the app on next read.
    InApp,

    /// Out-of-band email delivery via the messaging layer.
    Email,
}

impl Role {
    /// All roles, in a stable order.
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::SiteManager,
        Role::MaintenanceStaff,
        Role::Customer,
    ];

    /// Stable string form, matching the directory's `role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SiteManager => "site_manager",
            Role::MaintenanceStaff => "maintenance_staff",
            Role::Customer => "customer",
        }
    }

    /// The delivery channel for this role.
    ///
    /// Staff roles get synchronous in-app alerts; customers get email.
    pub fn channel(&self) -> Channel {
        match self {
            Role::Admin | Role::SiteManager | Role::MaintenanceStaff => Channel::InApp,
            Role::Customer => Channel::Email,
        }
    }

    /// Whether this role receives in-app alerts.
    pub fn is_interactive(&self) -> bool {
        self.channel() == Channel::InApp
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a directory role string is not a known role.
#[derive(Error, Debug)]
#[error("unknown role: {0}")]
pub struct RoleParseError(String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "site_manager" => Ok(Role::SiteManager),
            "maintenance_staff" => Ok(Role::MaintenanceStaff),
            "customer" => Ok(Role::Customer),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_fails_to_parse() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_staff_roles_are_interactive() {
        assert!(Role::Admin.is_interactive());
        assert!(Role::SiteManager.is_interactive());
        assert!(Role::MaintenanceStaff.is_interactive());
        assert!(!Role::Customer.is_interactive());
    }

    #[test]
    fn test_customer_channel_is_email() {
        assert_eq!(Role::Customer.channel(), Channel::Email);
        assert_eq!(Role::Admin.channel(), Channel::InApp);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::SiteManager).unwrap();
        assert_eq!(json, "\"site_manager\"");
    }
}
