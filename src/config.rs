use std::env;
use std::time::Duration;

use anyhow::Context;
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Absent means requests are kept in memory only
    pub database_url: Option<String>,
    pub api_prefix: String,
    pub log_level: String,

    // Rate limiting, 0 disables it
    pub rate_submit_per_min: u32,

    // HR chart feed
    pub metrics_period: Duration,
    pub metrics_points: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let parsed = |key: &str, default: &str| -> anyhow::Result<u64> {
            let raw = lookup(key).unwrap_or_else(|| default.to_string());
            raw.trim()
                .parse()
                .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}"))
        };

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            api_prefix: lookup("API_PREFIX").unwrap_or_default(),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "debug".to_string()),
            rate_submit_per_min: u32::try_from(parsed("RATE_SUBMIT_PER_MIN", "60")?)
                .context("RATE_SUBMIT_PER_MIN is too large")?,
            metrics_period: Duration::from_millis(parsed("METRICS_PERIOD_MS", "1000")?),
            metrics_points: usize::try_from(parsed("METRICS_POINTS", "10")?)
                .context("METRICS_POINTS is too large")?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: None,
            api_prefix: String::new(),
            log_level: "debug".to_string(),
            rate_submit_per_min: 0,
            metrics_period: Duration::from_millis(5),
            metrics_points: 10,
        }
    }
}
