//! Discovery Worker
//!
//! Runs the discovery pipeline on a cron schedule against a SQLite database
//! until interrupted.

mod config;
mod scheduled_tasks;

use std::sync::Arc;

use anyhow::{Context, Result};
use discovery::ai::OpenAI;
use discovery::{
    DiscordNotifier, HttpFetcher, LogNotifier, Notifier, PipelineDeps, PromptTemplate,
    SqliteStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,discovery=debug,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting discovery worker");

    let config = Config::from_env().context("Failed to load configuration")?;

    let store = SqliteStore::new(&config.database_url)
        .await
        .context("Failed to open database")?;
    tracing::info!("Database ready");

    let fetcher = HttpFetcher::new().context("Failed to build HTTP client")?;

    let mut ai = OpenAI::new(&config.openai_api_key).with_model(&config.openai_model);
    if let Some(base_url) = &config.openai_base_url {
        ai = ai.with_base_url(base_url);
    }

    let notifier: Arc<dyn Notifier> = match &config.discord_webhook_url {
        Some(url) => {
            Arc::new(DiscordNotifier::new(url).context("Failed to build Discord client")?)
        }
        None => {
            tracing::warn!("DISCORD_WEBHOOK_URL not set, notifications go to the log only");
            Arc::new(LogNotifier)
        }
    };

    let prompt = match &config.prompt_path {
        Some(path) => PromptTemplate::from_file(path).context("Failed to load prompt template")?,
        None => PromptTemplate::bundled(),
    };

    let deps = PipelineDeps::new(Arc::new(store), Arc::new(fetcher), Arc::new(ai), notifier)
        .with_prompt(prompt);

    let mut scheduler = scheduled_tasks::start_scheduler(deps, &config.schedule)
        .await
        .context("Failed to start scheduler")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Shutting down discovery worker");
    scheduler.shutdown().await?;
    Ok(())
}
