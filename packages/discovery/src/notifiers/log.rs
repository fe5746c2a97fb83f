//! Notifier that only logs.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::traits::notifier::Notifier;

/// Writes every message at `info` level. Used when no webhook is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        info!(target: "discovery::notify", "{}", message);
        Ok(())
    }
}
