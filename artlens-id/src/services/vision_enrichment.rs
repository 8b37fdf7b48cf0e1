//! Vision Enrichment Strategy
//!
//! Fallback path for missing or generic labels. Sends the raw image inline,
//! plus the device location when the client shared one, to a multimodal
//! provider.
//!
//! The provider is told to answer with the title `"Unknown Artwork"` when it
//! cannot identify the piece. That is a data-level outcome handled by the
//! normalizer, not a transport failure.

use artlens_common::{GeoLocation, Locale};
use base64::Engine;
use std::sync::Arc;
use tracing::info;

use crate::error::PipelineError;
use crate::services::response_normalizer::UNKNOWN_ARTWORK_TITLE;
use crate::types::{
    CompletionProvider, CompletionRequest, EnrichmentStrategy, InlineImage, Route,
    SubmissionContext,
};

pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
const VISION_MAX_TOKENS: u32 = 500;
const FALLBACK_MIME: &str = "image/jpeg";

/// Instruction for the image path
pub fn build_prompt(location: Option<&GeoLocation>, locale: Locale) -> String {
    let mut prompt = String::from(
        "This is an image of a piece of art. Please identify it. \
         It might be a famous painting or a piece of local/public art.",
    );

    if let Some(loc) = location {
        prompt.push_str(&format!(
            " The user is currently at approximately latitude {} and longitude {}. \
             Use this geographic context to improve the identification of local art or landmarks.",
            loc.latitude, loc.longitude
        ));
    }

    prompt.push_str(&format!(
        " 1. Identify the official title and the artist (if known). \
         If you cannot identify the artwork, use the title \"{sentinel}\" exactly as written, \
         in English and untranslated, whatever the response language. \
         2. Provide a concise history or context for the artwork (around 100 words). \
         3. Provide exactly 3 interesting and distinct trivia facts about it. \
         If no trivia is known, provide interesting visual details. \
         4. If you know a publicly accessible URL of an image of this artwork, include it; otherwise leave it out. \
         Format the entire response as a single, minified JSON object with no line breaks. \
         The JSON object must have these exact keys: \"title\", \"artist\", \"history\", \
         \"trivia\" (which should be an array of strings), and optionally \"thumbnailUrl\". \
         Provide the entire response in {language}.",
        sentinel = UNKNOWN_ARTWORK_TITLE,
        language = locale.language_name(),
    ));

    prompt
}

/// Encode image bytes for inline transmission
///
/// The MIME type is sniffed from magic bytes; unknown formats are sent as JPEG,
/// which is what the mobile client uploads.
pub fn encode_image(image: &[u8]) -> InlineImage {
    let mime_type = infer::get(image)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_MIME);

    InlineImage {
        mime_type: mime_type.to_string(),
        base64_data: base64::engine::general_purpose::STANDARD.encode(image),
    }
}

/// Image + location aware completion
pub struct VisionEnrichment {
    provider: Arc<dyn CompletionProvider>,
    model: String,
}

impl VisionEnrichment {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn request_for(
        &self,
        image: &[u8],
        location: Option<&GeoLocation>,
        locale: Locale,
    ) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            prompt: build_prompt(location, locale),
            image: Some(encode_image(image)),
            temperature: None,
            max_tokens: Some(VISION_MAX_TOKENS),
        }
    }
}

#[async_trait::async_trait]
impl EnrichmentStrategy for VisionEnrichment {
    fn name(&self) -> &'static str {
        "vision"
    }

    async fn enrich(&self, route: &Route, ctx: &SubmissionContext) -> Result<String, PipelineError> {
        if *route != Route::Vision {
            return Err(PipelineError::Internal(format!(
                "vision enrichment cannot serve the {} route",
                route.as_str()
            )));
        }

        match &ctx.location {
            Some(loc) => info!(
                request_id = %ctx.request_id,
                latitude = loc.latitude,
                longitude = loc.longitude,
                locale = ctx.locale.code(),
                "Enriching from image with location"
            ),
            None => info!(
                request_id = %ctx.request_id,
                locale = ctx.locale.code(),
                "Enriching from image"
            ),
        }

        let request = self.request_for(&ctx.image, ctx.location.as_ref(), ctx.locale);
        Ok(self.provider.complete(&request).await?)
    }
}
