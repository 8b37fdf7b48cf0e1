//! Service modules for the identification pipeline
//!
//! Components in dependency order:
//! - `label_detector`: web-detection adapter (best-guess label)
//! - `confidence_classifier`: denylist gate on the label
//! - `enrichment_router`: text vs. vision path
//! - `text_enrichment` / `vision_enrichment`: completion strategies
//! - `openai_client`: completion provider used by both strategies
//! - `response_normalizer`: provider text → `ArtworkRecord`

pub mod confidence_classifier;
pub mod enrichment_router;
pub mod label_detector;
pub mod openai_client;
pub mod response_normalizer;
pub mod text_enrichment;
pub mod vision_enrichment;

pub use confidence_classifier::{ConfidenceClassifier, DEFAULT_DENYLIST};
pub use enrichment_router::EnrichmentRouter;
pub use label_detector::{best_guess_label, GoogleVisionClient};
pub use openai_client::OpenAiClient;
pub use response_normalizer::{ResponseNormalizer, UNKNOWN_ARTWORK_TITLE};
pub use text_enrichment::{TextEnrichment, DEFAULT_TEXT_MODEL};
pub use vision_enrichment::{VisionEnrichment, DEFAULT_VISION_MODEL};
