//! Parsing of the model's analysis response.
//!
//! The model answers in prose with a JSON object embedded somewhere inside.
//! We take everything from the first `{` to the last `}` and parse that.
//! Preambles ("here is the result:") and trailing chatter are tolerated, but
//! any stray brace in the prose outside the payload widens the slice and the
//! parse fails. The payload must be the only brace-delimited content in the
//! response.

use serde::Deserialize;

use crate::error::{DiscoveryError, Result};
use crate::types::analysis::{AnalysisOutput, BusinessFound};

/// Discriminant read before the rest of the payload.
#[derive(Deserialize)]
struct Envelope {
    business_found: bool,
}

/// Slice out the first-`{`-to-last-`}` span of `text`.
///
/// Returns `None` when either delimiter is missing or the last `}` comes
/// before the first `{`.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse the model's free-text response into an analysis verdict.
///
/// Fails with `NoStructuredContent` when there is no brace-delimited span, and
/// with `MalformedStructuredContent` when the span is not valid JSON, lacks the
/// `business_found` flag, or (when the flag is true) lacks a required field.
pub fn parse_analysis_output(text: &str) -> Result<AnalysisOutput> {
    let block = extract_json_block(text).ok_or(DiscoveryError::NoStructuredContent)?;

    let value: serde_json::Value =
        serde_json::from_str(block).map_err(DiscoveryError::MalformedStructuredContent)?;

    let envelope: Envelope = serde_json::from_value(value.clone())
        .map_err(DiscoveryError::MalformedStructuredContent)?;

    if !envelope.business_found {
        return Ok(AnalysisOutput::NotFound);
    }

    let found: BusinessFound =
        serde_json::from_value(value).map_err(DiscoveryError::MalformedStructuredContent)?;

    Ok(AnalysisOutput::Found(found))
}
