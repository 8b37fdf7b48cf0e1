//! Text Enrichment Strategy
//!
//! Fast, cheap path: completes a record from the detected label alone.

use artlens_common::Locale;
use std::sync::Arc;
use tracing::info;

use crate::error::PipelineError;
use crate::types::{
    CompletionProvider, CompletionRequest, EnrichmentStrategy, Route, SubmissionContext,
};

pub const DEFAULT_TEXT_MODEL: &str = "gpt-3.5-turbo";
const TEXT_TEMPERATURE: f32 = 0.3;

/// Instruction for the label path
pub fn build_prompt(artwork_name: &str, locale: Locale) -> String {
    format!(
        "An image was identified as \"{name}\". Please provide information about this artwork. \
         1. Identify the official title and the artist. \
         2. Provide a concise history of the artwork (around 100 words). \
         3. Provide exactly 3 interesting and distinct trivia facts about it. \
         4. If you know a publicly accessible URL of an image of this artwork, include it; otherwise leave it out. \
         Format the entire response as a single, minified JSON object with no line breaks. \
         The JSON object must have these exact keys: \"title\", \"artist\", \"history\", \
         \"trivia\" (which should be an array of strings), and optionally \"thumbnailUrl\". \
         Provide the entire response in {language}.",
        name = artwork_name,
        language = locale.language_name(),
    )
}

/// Label-only completion
pub struct TextEnrichment {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl TextEnrichment {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn request_for(&self, artwork_name: &str, locale: Locale) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            prompt: build_prompt(artwork_name, locale),
            image: None,
            temperature: Some(TEXT_TEMPERATURE),
            max_tokens: None,
        }
    }
}

#[async_trait::async_trait]
impl EnrichmentStrategy for TextEnrichment {
    fn name(&self) -> &'static str {
        "text"
    }

    async fn enrich(&self, route: &Route, ctx: &SubmissionContext) -> Result<String, PipelineError> {
        let Route::Text { label } = route else {
            return Err(PipelineError::Internal(format!(
                "text enrichment cannot serve the {} route",
                route.as_str()
            )));
        };

        info!(
            request_id = %ctx.request_id,
            label = %label,
            locale = ctx.locale.code(),
            "Enriching from label"
        );

        let request = self.request_for(label, ctx.locale);
        Ok(self.provider.complete(&request).await?)
    }
}
