//! Analysis prompt template.

use std::path::Path;

use crate::error::{DiscoveryError, Result};

/// Placeholder replaced with the serialized thread.
pub const INPUT_JSON_PLACEHOLDER: &str = "{{ InputJson }}";

/// Prompt bundled with the crate.
pub const BUNDLED_PROMPT: &str = include_str!("../../resources/prompt.txt");

/// Static prompt text with one substitution point for the thread payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::bundled()
    }
}

impl PromptTemplate {
    /// Create a template from raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The prompt shipped in `resources/prompt.txt`.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_PROMPT)
    }

    /// Load a template from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DiscoveryError::Config(format!("Failed to read prompt {}: {}", path.display(), e))
        })?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute the payload verbatim at the first placeholder.
    pub fn render(&self, input_json: &str) -> String {
        self.text.replacen(INPUT_JSON_PLACEHOLDER, input_json, 1)
    }
}
