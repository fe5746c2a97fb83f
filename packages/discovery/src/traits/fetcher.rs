//! Document fetcher trait.
//!
//! A fetcher returns whatever the server answered; deciding that a non-success
//! status is fatal belongs to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Raw response to a page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedDocument {
    /// URL that was requested
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Response body as text
    pub body: String,
}

impl FetchedDocument {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Convenience constructor for a 200 response.
    pub fn ok(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(url, 200, body)
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches raw documents by URL.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch a URL.
    ///
    /// Errors only on transport failure; a non-2xx answer is returned as a
    /// `FetchedDocument` with that status.
    async fn fetch(&self, url: &str) -> Result<FetchedDocument>;
}
