//! Label detection adapter
//!
//! Wraps the Google Cloud Vision web-detection call. Only the first
//! best-guess label is used.
//!
//! Detection is advisory: `best_guess_label` turns every detector failure
//! into "no label", which sends the submission down the vision path.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::types::{LabelDetector, ProviderError};

const VISION_BASE_URL: &str = "https://vision.googleapis.com/v1/images:annotate";
const USER_AGENT: &str = concat!("ArtLens/", env!("CARGO_PKG_VERSION"));

// Wire types for images:annotate

#[derive(Debug, Serialize)]
struct AnnotateRequest<'a> {
    requests: Vec<AnnotateImageRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: Vec<Feature<'a>>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    max_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    pub web_detection: Option<WebDetection>,
    pub error: Option<VisionStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebDetection {
    #[serde(default)]
    pub best_guess_labels: Vec<BestGuessLabel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestGuessLabel {
    pub label: String,
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisionStatus {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Google Cloud Vision web-detection client
pub struct GoogleVisionClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleVisionClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: VISION_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (proxies, local stubs)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Pull the top best-guess label out of an annotate response
    pub fn best_guess(response: &AnnotateResponse) -> Result<Option<String>, ProviderError> {
        let Some(first) = response.responses.first() else {
            return Ok(None);
        };

        if let Some(status) = &first.error {
            return Err(ProviderError::ApiError(
                u16::try_from(status.code).unwrap_or(500),
                status.message.clone(),
            ));
        }

        Ok(first
            .web_detection
            .as_ref()
            .and_then(|w| w.best_guess_labels.first())
            .map(|l| l.label.trim().to_string())
            .filter(|l| !l.is_empty()))
    }
}

#[async_trait::async_trait]
impl LabelDetector for GoogleVisionClient {
    fn name(&self) -> &'static str {
        "google-vision"
    }

    async fn detect(&self, image: &[u8]) -> Result<Option<String>, ProviderError> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image),
                },
                features: vec![Feature {
                    kind: "WEB_DETECTION",
                    max_results: 1,
                }],
            }],
        };

        debug!(image_bytes = image.len(), "Querying Vision web detection");

        let response = self
            .http_client
            .post(&self.base_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(ProviderError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(status.as_u16(), error_text));
        }

        let annotate: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::best_guess(&annotate)
    }
}

/// Run detection, folding any failure into "no label"
pub async fn best_guess_label(
    detector: &dyn LabelDetector,
    image: &[u8],
    request_id: Uuid,
) -> Option<String> {
    match detector.detect(image).await {
        Ok(Some(label)) => {
            info!(%request_id, detector = detector.name(), label = %label, "Best guess label detected");
            Some(label)
        }
        Ok(None) => {
            info!(%request_id, detector = detector.name(), "No best guess label");
            None
        }
        Err(e) => {
            warn!(
                %request_id,
                detector = detector.name(),
                error = %e,
                "Label detection failed, continuing without a label"
            );
            None
        }
    }
}
