//! Core Types and Trait Definitions for artlens-id
//!
//! Defines the seams of the identification pipeline:
//! - **LabelDetector:** image → best-guess label (one outbound call)
//! - **CompletionProvider:** prompt (+ optional inline image) → raw completion text
//! - **EnrichmentStrategy:** route + submission → raw completion text
//!
//! Stages hand each other tagged values (`LabelConfidence`, `Route`) instead
//! of probing for field presence.

use artlens_common::{GeoLocation, Locale};
use thiserror::Error;
use uuid::Uuid;

use crate::error::PipelineError;

// ============================================================================
// Submission Context
// ============================================================================

/// One image submitted for identification
///
/// Created per request and consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct ImageSubmission {
    /// Raw image bytes as uploaded
    pub image: Vec<u8>,
    /// Output language
    pub locale: Locale,
    /// Device location at capture time, if the client shared it
    pub location: Option<GeoLocation>,
}

impl ImageSubmission {
    pub fn new(image: Vec<u8>, locale: Locale, location: Option<GeoLocation>) -> Self {
        Self {
            image,
            locale,
            location,
        }
    }
}

/// Immutable per-request context threaded through every stage
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    /// Correlation id for log lines belonging to this submission
    pub request_id: Uuid,
    pub image: Vec<u8>,
    pub locale: Locale,
    pub location: Option<GeoLocation>,
}

impl SubmissionContext {
    pub fn new(submission: ImageSubmission) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            image: submission.image,
            locale: submission.locale,
            location: submission.location,
        }
    }
}

// ============================================================================
// Tagged Stage Results
// ============================================================================

/// Output of the confidence classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelConfidence {
    /// Label is specific enough to enrich from its name alone
    Confident(String),
    /// No label, or the label is too generic to trust
    NotConfident,
}

/// Enrichment path chosen by the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Text-only completion from the detected label
    Text { label: String },
    /// Image + location aware completion
    Vision,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Text { .. } => "text",
            Route::Vision => "vision",
        }
    }
}

// ============================================================================
// Provider Seams
// ============================================================================

/// Errors raised by outbound provider clients
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid API key")]
    InvalidApiKey,
}

/// Image sent inline with a completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Base64 (standard alphabet) encoded bytes
    pub base64_data: String,
}

impl InlineImage {
    /// Render as a `data:` URL
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// A single-turn completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Label detection service (image → ranked label guesses)
///
/// Implementations return the top best-guess label, or `None` when the
/// service proposes nothing.
#[async_trait::async_trait]
pub trait LabelDetector: Send + Sync {
    /// Detector name for logging
    fn name(&self) -> &'static str;

    async fn detect(&self, image: &[u8]) -> Result<Option<String>, ProviderError>;
}

/// Text or multimodal completion service
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Issue one completion call and return the raw message text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// One enrichment path
///
/// Strategies issue exactly one outbound call and return the provider's raw
/// text; normalization happens afterwards in the orchestrator. Failures are
/// terminal, no strategy retries.
///
/// # Example
/// ```rust,ignore
/// use artlens_id::types::{EnrichmentStrategy, Route, SubmissionContext};
///
/// let raw = strategy.enrich(&Route::Vision, &ctx).await?;
/// let record = ResponseNormalizer::new().normalize(&raw)?;
/// ```
#[async_trait::async_trait]
pub trait EnrichmentStrategy: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &'static str;

    async fn enrich(
        &self,
        route: &Route,
        ctx: &SubmissionContext,
    ) -> Result<String, PipelineError>;
}
