//! Response Normalizer/Validator
//!
//! Turns raw provider text into an `ArtworkRecord`:
//! 1. Strip code-fence wrapping
//! 2. Parse JSON (`MalformedResponse` on failure)
//! 3. Check required fields and their types (`MalformedResponse`)
//! 4. Reject empty or sentinel titles (`NoConfidentMatch`)
//!
//! Pure and deterministic: the same raw text always normalizes the same way.

use artlens_common::ArtworkRecord;
use serde::Deserialize;
use tracing::warn;

use crate::error::PipelineError;

/// Title the providers use for "could not identify"
pub const UNKNOWN_ARTWORK_TITLE: &str = "Unknown Artwork";

/// Number of trivia entries the prompts ask for
pub const EXPECTED_TRIVIA_COUNT: usize = 3;

const FENCE: &str = "```";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtwork {
    title: String,
    artist: String,
    history: String,
    trivia: Vec<String>,
    #[serde(default, alias = "thumbnail_url")]
    thumbnail_url: Option<String>,
}

/// Remove a Markdown code fence around the payload, if any
///
/// Handles ```` ```json\n{..}\n``` ````, ```` ```{..}``` ````, prose before
/// the fence and a stray closing fence after a bare object. The body runs to
/// the last closing fence, so fences inside string values survive.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        return trimmed.trim_end_matches(FENCE).trim_end();
    }

    let Some(open) = trimmed.find(FENCE) else {
        return trimmed;
    };

    let after_open = &trimmed[open + FENCE.len()..];
    let body = match after_open.rfind(FENCE) {
        Some(close) => &after_open[..close],
        None => after_open,
    };

    // Language tag ("json", "JSON") sits directly after the opening fence
    body.trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim()
}

/// Stateless normalizer
#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: &str) -> Result<ArtworkRecord, PipelineError> {
        let payload = strip_code_fences(raw);

        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|e| PipelineError::MalformedResponse(format!("not valid JSON: {}", e)))?;

        if !value.is_object() {
            return Err(PipelineError::MalformedResponse(
                "expected a JSON object".to_string(),
            ));
        }

        let parsed: RawArtwork = serde_json::from_value(value)
            .map_err(|e| PipelineError::MalformedResponse(e.to_string()))?;

        let title = parsed.title.trim().to_string();
        if title.is_empty() {
            return Err(PipelineError::NoConfidentMatch("empty title".to_string()));
        }
        if title.eq_ignore_ascii_case(UNKNOWN_ARTWORK_TITLE) {
            return Err(PipelineError::NoConfidentMatch(format!(
                "provider returned \"{}\"",
                UNKNOWN_ARTWORK_TITLE
            )));
        }

        let trivia: Vec<String> = parsed
            .trivia
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if trivia.len() != EXPECTED_TRIVIA_COUNT {
            warn!(
                title = %title,
                trivia_count = trivia.len(),
                "Provider returned unexpected trivia count"
            );
        }

        Ok(ArtworkRecord {
            title,
            artist: parsed.artist.trim().to_string(),
            history: parsed.history.trim().to_string(),
            trivia,
            thumbnail_url: parsed
                .thumbnail_url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
        })
    }
}
