//! HTTP document fetcher.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;
use crate::traits::fetcher::{DocumentFetcher, FetchedDocument};

const DEFAULT_USER_AGENT: &str = "IndieDiscoveryBot/1.0";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches pages with a plain GET.
///
/// Non-2xx responses are returned as documents, not errors; callers decide
/// what a failing status means. Only transport failures error here.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher with a 30 second timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(client))
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .inspect_err(|e| warn!(url = %url, error = %e, "HTTP request failed"))?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(url = %url, status = status, bytes = body.len(), "HTTP fetch finished");
        Ok(FetchedDocument::new(url, status, body))
    }
}
