//! Asset domain model types consumed by the notification pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::common::{AssetId, SiteId};

/// Operational status of an energy asset.
///
/// Transitions are unordered: any status may follow any other. The rule
/// engine interprets specific pairs; there is no forbidden-edge state
/// machine here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Producing / functioning normally.
    Operational,

    /// Taken out of service for maintenance work.
    Maintenance,

    /// Not reachable or not producing.
    Offline,

    /// Emergency condition requiring immediate staff attention.
    Emergency,
}

impl AssetStatus {
    /// All statuses, in a stable order.
    pub const ALL: [AssetStatus; 4] = [
        AssetStatus::Operational,
        AssetStatus::Maintenance,
        AssetStatus::Offline,
        AssetStatus::Emergency,
    ];

    /// Stable string form, matching the wire and database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Operational => "operational",
            AssetStatus::Maintenance => "maintenance",
            AssetStatus::Offline => "offline",
            AssetStatus::Emergency => "emergency",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for status strings outside the closed set.
#[derive(Error, Debug)]
#[error("unknown asset status: {0}")]
pub struct StatusParseError(String);

impl FromStr for AssetStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operational" => Ok(AssetStatus::Operational),
            "maintenance" => Ok(AssetStatus::Maintenance),
            "offline" => Ok(AssetStatus::Offline),
            "emergency" => Ok(AssetStatus::Emergency),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// The asset fields the pipeline needs to build notifications:
/// identity plus the display names interpolated into message text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetContext {
    pub asset_id: AssetId,
    pub asset_name: String,
    pub site_id: SiteId,
    pub site_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_str_roundtrip() {
        for status in AssetStatus::ALL {
            assert_eq!(status.as_str().parse::<AssetStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_fails_to_parse() {
        assert!("degraded".parse::<AssetStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_snake_case() {
        let json = serde_json::to_string(&AssetStatus::Emergency).unwrap();
        assert_eq!(json, "\"emergency\"");
    }
}
