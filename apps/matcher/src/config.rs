use anyhow::{Context, Result};

const DEFAULT_SCORING_SERVICE_URL: &str = "http://127.0.0.1:8000/compute_cvScore/";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Application configuration loaded from environment variables.
/// Every variable has a default, so a bare `cargo run` talks to a local scorer.
#[derive(Debug, Clone)]
pub struct Config {
    pub scoring_service_url: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    /// Sessions untouched for this long are dropped by the sweeper.
    pub session_idle_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            scoring_service_url: std::env::var("SCORING_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_SCORING_SERVICE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            session_idle_secs: match std::env::var("SESSION_IDLE_SECS") {
                Ok(raw) => raw
                    .parse::<u64>()
                    .context("SESSION_IDLE_SECS must be a number of seconds")?,
                Err(_) => DEFAULT_SESSION_IDLE_SECS,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring_service_url: DEFAULT_SCORING_SERVICE_URL.to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
            rust_log: "info".to_string(),
        }
    }
}
