//! Pipeline Orchestrator
//!
//! Sequences label detection, classification, routing, enrichment and
//! normalization under one error boundary.
//!
//! # Error Handling
//! - Label detection failures are non-fatal (treated as "no label")
//! - Every other failure ends the run; nothing is retried
//! - Exactly one `PipelineResult` per submission, never partial data
//!
//! # Example
//! ```rust,ignore
//! let pipeline = IdentificationPipeline::from_config(&config)?;
//! let result = pipeline
//!     .identify(ImageSubmission::new(bytes, Locale::Es, None))
//!     .await;
//! ```

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{PipelineResult, PipelineStage};
use crate::config::ServiceConfig;
use crate::error::{PipelineError, NO_IMAGE_MESSAGE};
use crate::services::{
    best_guess_label, ConfidenceClassifier, EnrichmentRouter, GoogleVisionClient, OpenAiClient,
    ResponseNormalizer, TextEnrichment, VisionEnrichment,
};
use crate::types::{ImageSubmission, LabelDetector, ProviderError, Route, SubmissionContext};

/// Records stage transitions for one run
struct StageTracker {
    request_id: Uuid,
    stages: Vec<PipelineStage>,
}

impl StageTracker {
    fn new(request_id: Uuid) -> Self {
        Self {
            request_id,
            stages: vec![PipelineStage::Received],
        }
    }

    fn enter(&mut self, stage: PipelineStage) {
        debug!(request_id = %self.request_id, stage = stage.as_str(), "Pipeline stage");
        self.stages.push(stage);
    }
}

/// Artwork identification pipeline
///
/// Immutable once built; one instance serves every submission concurrently.
pub struct IdentificationPipeline {
    detector: Arc<dyn LabelDetector>,
    classifier: ConfidenceClassifier,
    router: EnrichmentRouter,
    normalizer: ResponseNormalizer,
}

impl IdentificationPipeline {
    pub fn new(
        detector: Arc<dyn LabelDetector>,
        classifier: ConfidenceClassifier,
        router: EnrichmentRouter,
    ) -> Self {
        Self {
            detector,
            classifier,
            router,
            normalizer: ResponseNormalizer::new(),
        }
    }

    /// Wire the production providers from resolved configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ProviderError> {
        let detector = GoogleVisionClient::new(
            config.vision_api_key.clone(),
            config.detector_timeout,
        )?;
        let completions = Arc::new(OpenAiClient::new(
            config.openai_api_key.clone(),
            config.completion_timeout,
        )?);

        let router = EnrichmentRouter::new(
            Arc::new(TextEnrichment::new(completions.clone(), &config.text_model)),
            Arc::new(VisionEnrichment::new(completions, &config.vision_model)),
        );

        Ok(Self::new(
            Arc::new(detector),
            ConfidenceClassifier::with_denylist(&config.denylist),
            router,
        ))
    }

    /// Identify the artwork in one submission
    pub async fn identify(&self, submission: ImageSubmission) -> PipelineResult {
        let ctx = SubmissionContext::new(submission);
        let started = Instant::now();
        let mut tracker = StageTracker::new(ctx.request_id);
        let mut route_taken = None;

        info!(
            request_id = %ctx.request_id,
            image_bytes = ctx.image.len(),
            locale = ctx.locale.code(),
            has_location = ctx.location.is_some(),
            "Submission received"
        );

        let outcome = self.run(&ctx, &mut tracker, &mut route_taken).await;
        let success = outcome.is_ok();
        tracker.enter(PipelineStage::Done { success });

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(record) => info!(
                request_id = %ctx.request_id,
                route = route_taken.unwrap_or("none"),
                title = %record.title,
                elapsed_ms,
                "Identification succeeded"
            ),
            Err(e) => warn!(
                request_id = %ctx.request_id,
                route = route_taken.unwrap_or("none"),
                kind = e.kind(),
                error = %e,
                elapsed_ms,
                "Identification failed"
            ),
        }

        let (data, error) = match outcome {
            Ok(record) => (Some(record), None),
            Err(e) => (None, Some(e)),
        };

        PipelineResult {
            success,
            data,
            error,
            route: route_taken,
            stages: tracker.stages,
        }
    }

    async fn run(
        &self,
        ctx: &SubmissionContext,
        tracker: &mut StageTracker,
        route_taken: &mut Option<&'static str>,
    ) -> Result<artlens_common::ArtworkRecord, PipelineError> {
        if ctx.image.is_empty() {
            return Err(PipelineError::InvalidInput(NO_IMAGE_MESSAGE.to_string()));
        }

        tracker.enter(PipelineStage::Labeling);
        let label = best_guess_label(self.detector.as_ref(), &ctx.image, ctx.request_id).await;

        tracker.enter(PipelineStage::Routing);
        let confidence = self.classifier.classify(label.as_deref());
        let route = EnrichmentRouter::route(&confidence);
        *route_taken = Some(route.as_str());

        match &route {
            Route::Text { label } => {
                info!(request_id = %ctx.request_id, label = %label, "Routing to text enrichment")
            }
            Route::Vision => info!(
                request_id = %ctx.request_id,
                label = label.as_deref().unwrap_or(""),
                "Routing to vision enrichment"
            ),
        }

        tracker.enter(PipelineStage::Enriching);
        let strategy = self.router.strategy_for(&route);
        let raw = strategy.enrich(&route, ctx).await?;

        tracker.enter(PipelineStage::Validating);
        self.normalizer.normalize(&raw)
    }
}
