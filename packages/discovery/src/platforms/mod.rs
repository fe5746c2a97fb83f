//! Platform-specific thread extraction.
//!
//! Each supported source platform is a `Platform` variant with its own
//! extractor. Unknown identifiers are rejected when parsed, before any I/O.

pub mod comment_tree;
pub mod hackernews;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{DiscoveryError, Result};
use crate::traits::fetcher::DocumentFetcher;
use crate::types::thread::ExtractedThread;

pub use comment_tree::{pair_question_answers, CommentNode};

/// Supported source platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Hacker News item pages (`news.ycombinator.com/item?id=...`)
    HackerNews,
}

impl Platform {
    /// Identifier stored in the task's `platform` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::HackerNews => "hackernews",
        }
    }

    /// Fetch `url` and extract the thread using this platform's layout.
    pub async fn extract_thread(
        &self,
        fetcher: &dyn DocumentFetcher,
        url: &str,
    ) -> Result<ExtractedThread> {
        let html = fetch_page(fetcher, url).await?;
        let thread = match self {
            Platform::HackerNews => hackernews::parse_thread(&html),
        };

        debug!(
            platform = %self,
            url = %url,
            pairs = thread.question_answers.len(),
            "Extracted thread"
        );

        Ok(thread)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hackernews" => Ok(Platform::HackerNews),
            other => Err(DiscoveryError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// Extract a thread for a raw platform identifier.
///
/// Fails with `UnsupportedPlatform` before fetching anything when the
/// identifier is unknown.
pub async fn extract_thread(
    platform: &str,
    fetcher: &dyn DocumentFetcher,
    url: &str,
) -> Result<ExtractedThread> {
    let platform: Platform = platform.parse()?;
    platform.extract_thread(fetcher, url).await
}

/// Fetch a page body, treating any non-2xx status as a hard failure.
async fn fetch_page(fetcher: &dyn DocumentFetcher, url: &str) -> Result<String> {
    let document = fetcher.fetch(url).await?;
    if !document.is_success() {
        return Err(DiscoveryError::Fetch {
            url: url.to_string(),
            status: document.status,
        });
    }
    Ok(document.body)
}
