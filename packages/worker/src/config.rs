use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://discovery.db?mode=rwc";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
/// Six-field cron expression (seconds first): top of every minute.
pub const DEFAULT_SCHEDULE: &str = "0 * * * * *";

/// Worker configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub discord_webhook_url: Option<String>,
    pub schedule: String,
    pub prompt_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            openai_api_key: var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: var("OPENAI_BASE_URL"),
            discord_webhook_url: var("DISCORD_WEBHOOK_URL"),
            schedule: var("DISCOVERY_SCHEDULE").unwrap_or_else(|| DEFAULT_SCHEDULE.to_string()),
            prompt_path: var("PROMPT_PATH").map(PathBuf::from),
        })
    }
}
