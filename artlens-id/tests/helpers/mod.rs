//! Test Helper Utilities
//!
//! Scripted providers and pipeline builders shared by the integration tests.

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::{capture_logs, LogCapture};

use artlens_id::services::{
    ConfidenceClassifier, EnrichmentRouter, TextEnrichment, VisionEnrichment,
    DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL,
};
use artlens_id::types::{CompletionProvider, CompletionRequest, LabelDetector, ProviderError};
use artlens_id::IdentificationPipeline;
use std::sync::{Arc, Mutex};

/// JPEG start-of-image marker followed by filler
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

pub const STARRY_NIGHT_JSON: &str = r#"{"title":"The Starry Night","artist":"Vincent van Gogh","history":"Painted in June 1889 at the asylum in Saint-Rémy-de-Provence.","trivia":["It depicts the view from his window.","It is held by MoMA.","Van Gogh considered it a failure."]}"#;

pub const UNKNOWN_ARTWORK_JSON: &str = r#"{"title":"Unknown Artwork","artist":"Unknown","history":"A colorful mural on a brick wall.","trivia":["Bright colors","Geometric shapes","Large scale"]}"#;

/// Ordered record of outbound calls across all fakes of one test
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Label detector returning a fixed outcome
pub struct ScriptedDetector {
    outcome: Result<Option<String>, String>,
    log: CallLog,
}

impl ScriptedDetector {
    pub fn label(label: &str, log: CallLog) -> Self {
        Self {
            outcome: Ok(Some(label.to_string())),
            log,
        }
    }

    pub fn no_label(log: CallLog) -> Self {
        Self {
            outcome: Ok(None),
            log,
        }
    }

    pub fn failing(message: &str, log: CallLog) -> Self {
        Self {
            outcome: Err(message.to_string()),
            log,
        }
    }
}

#[async_trait::async_trait]
impl LabelDetector for ScriptedDetector {
    fn name(&self) -> &'static str {
        "scripted-detector"
    }

    async fn detect(&self, _image: &[u8]) -> Result<Option<String>, ProviderError> {
        self.log.push("detect");
        // Yield so a concurrent enrichment call would get a chance to interleave
        tokio::task::yield_now().await;
        self.outcome
            .clone()
            .map_err(ProviderError::NetworkError)
    }
}

/// Completion provider returning a fixed outcome and recording requests
pub struct ScriptedProvider {
    outcome: Result<String, String>,
    log: CallLog,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn replying(raw: &str, log: CallLog) -> Self {
        Self {
            outcome: Ok(raw.to_string()),
            log,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str, log: CallLog) -> Self {
        Self {
            outcome: Err(message.to_string()),
            log,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted-provider"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let kind = if request.image.is_some() { "vision" } else { "text" };
        self.log.push(format!("complete:{}", kind));
        self.requests.lock().unwrap().push(request.clone());
        self.outcome
            .clone()
            .map_err(|m| ProviderError::ApiError(503, m))
    }
}

/// Pipeline wired with production strategies over scripted providers
pub fn scripted_pipeline(
    detector: ScriptedDetector,
    provider: Arc<ScriptedProvider>,
) -> IdentificationPipeline {
    let router = EnrichmentRouter::new(
        Arc::new(TextEnrichment::new(provider.clone(), DEFAULT_TEXT_MODEL)),
        Arc::new(VisionEnrichment::new(provider, DEFAULT_VISION_MODEL)),
    );
    IdentificationPipeline::new(Arc::new(detector), ConfidenceClassifier::new(), router)
}
