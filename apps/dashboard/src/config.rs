use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_STORAGE_PATH: &str = ".dashboard/storage.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;
const DEFAULT_APP_LOCATION: &str = "http://localhost:5173/dashboard";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values are errors.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub storage_path: PathBuf,
    pub default_job_query: String,
    pub http_timeout: Duration,
    /// Location the dashboard was opened at, including any sign-in redirect
    /// parameters.
    pub app_location: Url,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            api_base_url: parse_url("API_BASE_URL", &var("API_BASE_URL", DEFAULT_API_BASE_URL))?,
            storage_path: PathBuf::from(var("STORAGE_PATH", DEFAULT_STORAGE_PATH)),
            default_job_query: var("DEFAULT_JOB_QUERY", crate::search::DEFAULT_QUERY),
            http_timeout: Duration::from_secs(
                var("HTTP_TIMEOUT_SECS", &DEFAULT_HTTP_TIMEOUT_SECS.to_string())
                    .parse::<u64>()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            app_location: parse_url("APP_LOCATION", &var("APP_LOCATION", DEFAULT_APP_LOCATION))?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    Url::parse(value).with_context(|| format!("Environment variable '{key}' is not a valid URL: {value}"))
}
