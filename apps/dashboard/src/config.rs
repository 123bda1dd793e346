use std::time::Duration;

use anyhow::{Context, Result};

/// Dashboard configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the recruitment REST API, e.g. `https://hiring.example.com/api`.
    pub api_base_url: String,
    /// Bearer token issued by the auth service. Passed through untouched.
    pub api_token: String,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout: Duration,
    pub announce_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: require_env("API_BASE_URL")?,
            api_token: require_env("API_TOKEN")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            request_timeout: Duration::from_secs(
                optional_env("REQUEST_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            announce_delay: Duration::from_millis(
                optional_env("ANNOUNCE_DELAY_MS", "100")
                    .parse::<u64>()
                    .context("ANNOUNCE_DELAY_MS must be a whole number of milliseconds")?,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
