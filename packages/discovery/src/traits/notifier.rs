//! Notification channel trait.

use async_trait::async_trait;
use tracing::warn;

use crate::error::Result;

/// Channel used to report pipeline progress to operators.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a message.
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Send a message, logging and discarding any failure.
///
/// Notifications never block or fail the pipeline.
pub async fn notify_best_effort(notifier: &dyn Notifier, message: &str) {
    if let Err(e) = notifier.notify(message).await {
        warn!(error = %e, message = %message, "Notification failed");
    }
}
