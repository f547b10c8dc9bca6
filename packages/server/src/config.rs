use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Timeout for user directory lookups. A directive whose lookup exceeds
    /// this fails; it is not retried inline.
    pub directory_timeout: Duration,
    /// Base URL for asset deep links embedded in alerts,
    /// e.g. "https://app.gridsense.example".
    pub asset_view_base_url: String,
    /// Per-user capacity of the live alert feed channels.
    pub alert_feed_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let directory_timeout_ms: u64 = env::var("DIRECTORY_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .context("DIRECTORY_TIMEOUT_MS must be a valid number")?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            directory_timeout: Duration::from_millis(directory_timeout_ms),
            asset_view_base_url: env::var("ASSET_VIEW_BASE_URL")
                .unwrap_or_else(|_| "https://app.gridsense.example".to_string()),
            alert_feed_capacity: env::var("ALERT_FEED_CAPACITY")
                .unwrap_or_else(|_| "256".to_string())
                .parse()
                .context("ALERT_FEED_CAPACITY must be a valid number")?,
        })
    }
}
