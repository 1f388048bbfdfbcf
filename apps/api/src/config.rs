use anyhow::{Context, Result};
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
///
/// External API keys are optional: missing keys degrade the feature they
/// power (and /health reports the degradation) instead of aborting startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub reed_api_key: Option<String>,
    pub github_token: Option<String>,
    /// Directory holding a built frontend bundle; served when present.
    pub frontend_dist: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/jobdeck.db?mode=rwc".to_string()),
            reed_api_key: optional_env("REED_API_KEY"),
            github_token: optional_env("GITHUB_TOKEN"),
            frontend_dist: std::env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "frontend/dist".to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
