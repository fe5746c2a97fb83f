//! Typed errors for the discovery pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Every variant here can
//! surface while a task is being processed; the controller stringifies it into
//! the task's `error` column.

use thiserror::Error;

/// Errors that can occur while processing a discovery task.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Page retrieval returned a non-success status
    #[error("Failed to fetch page {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    /// Transport-level HTTP failure (connection refused, timeout, bad body)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Platform identifier has no extractor
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Model output contained no `{ ... }` payload
    #[error("No json content in model response")]
    NoStructuredContent,

    /// Payload between the braces was not a valid analysis record
    #[error("Malformed json content in model response: {0}")]
    MalformedStructuredContent(#[source] serde_json::Error),

    /// Store write or read failed
    #[error("Persistence error: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Completion collaborator failed
    #[error("Completion error: {0}")]
    Completion(String),

    /// Notification channel failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// Serializing the prompt payload failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// Wrap any store-level error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Box::new(err))
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for DiscoveryError {
    fn from(err: sqlx::Error) -> Self {
        Self::persistence(err)
    }
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Box::new(err))
    }
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
