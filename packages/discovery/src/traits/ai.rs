//! Completion trait for LLM calls.
//!
//! The pipeline needs a single capability: send one prompt, get raw text
//! back. No conversation state is retained across calls.

use async_trait::async_trait;

use crate::error::Result;

/// Single-turn text completion.
///
/// Implementations wrap a specific LLM provider (OpenAI, etc.) and return the
/// model's raw response text. Parsing is the caller's job.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Complete a prompt and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
