//! Enrichment Router
//!
//! Strict two-way choice between the text and vision strategies based on the
//! classifier result. Further fallback tiers plug in as additional
//! `EnrichmentStrategy` implementations without changing `route`.

use std::sync::Arc;

use crate::types::{EnrichmentStrategy, LabelConfidence, Route};

/// Chooses and holds the enrichment strategies
#[derive(Clone)]
pub struct EnrichmentRouter {
    text: Arc<dyn EnrichmentStrategy>,
    vision: Arc<dyn EnrichmentStrategy>,
}

impl EnrichmentRouter {
    pub fn new(text: Arc<dyn EnrichmentStrategy>, vision: Arc<dyn EnrichmentStrategy>) -> Self {
        Self { text, vision }
    }

    /// Confident → text path with the label; anything else → vision path
    pub fn route(confidence: &LabelConfidence) -> Route {
        match confidence {
            LabelConfidence::Confident(label) => Route::Text {
                label: label.clone(),
            },
            LabelConfidence::NotConfident => Route::Vision,
        }
    }

    /// Strategy that serves `route`
    pub fn strategy_for(&self, route: &Route) -> &dyn EnrichmentStrategy {
        match route {
            Route::Text { .. } => self.text.as_ref(),
            Route::Vision => self.vision.as_ref(),
        }
    }
}
