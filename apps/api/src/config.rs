use anyhow::{anyhow, Context, Result};

use crate::configurator::session::AccessoryEnforcement;

/// Application configuration loaded from environment variables.
/// Every knob has a default, so the service boots with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Quiet window for live dimension input, in milliseconds.
    pub input_debounce_ms: u64,
    pub session_idle_timeout_minutes: i64,
    pub session_sweep_interval_seconds: u64,
    pub accessory_enforcement: AccessoryEnforcement,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            input_debounce_ms: env_or("INPUT_DEBOUNCE_MS", "250")
                .parse::<u64>()
                .context("INPUT_DEBOUNCE_MS must be a duration in milliseconds")?,
            session_idle_timeout_minutes: env_or("SESSION_IDLE_TIMEOUT_MINUTES", "30")
                .parse::<i64>()
                .context("SESSION_IDLE_TIMEOUT_MINUTES must be a duration in minutes")?,
            session_sweep_interval_seconds: env_or("SESSION_SWEEP_INTERVAL_SECONDS", "60")
                .parse::<u64>()
                .context("SESSION_SWEEP_INTERVAL_SECONDS must be a duration in seconds")?,
            accessory_enforcement: env_or("ACCESSORY_ENFORCEMENT", "advisory")
                .parse::<AccessoryEnforcement>()
                .map_err(|e| {
                    anyhow!("ACCESSORY_ENFORCEMENT must be 'advisory' or 'required': {e}")
                })?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
