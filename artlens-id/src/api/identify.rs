//! Identification endpoint
//!
//! `POST /api/identify` (multipart/form-data)
//!
//! **Fields:**
//! - `image`: photo bytes (required)
//! - `language`: `en` | `es` | `fr` (default `en`)
//! - `latitude`, `longitude`: decimal strings (optional, both or neither)
//!
//! **Responses:**
//! - 200 `{"success": true, "data": {...}}`
//! - 400 `{"success": false, "error": "No image file uploaded."}`
//! - 413 upload exceeds the configured body limit
//! - 404 artwork could not be identified
//! - 500 any other processing failure

use artlens_common::{GeoLocation, IdentifyResponse, Locale};
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use tracing::warn;

use crate::error::{IMAGE_TOO_LARGE_MESSAGE, NO_IMAGE_MESSAGE};
use crate::types::ImageSubmission;
use crate::{ApiError, ApiResult, AppState};

/// Raw form fields as received
#[derive(Debug, Default)]
pub struct IdentifyForm {
    pub image: Option<Vec<u8>>,
    pub language: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl IdentifyForm {
    /// Convert to a pipeline submission
    ///
    /// A missing image becomes an empty one; the pipeline rejects it as
    /// invalid input before any outbound call.
    pub fn into_submission(self) -> ImageSubmission {
        let locale = Locale::from_code(self.language.as_deref());
        let location = GeoLocation::from_form(self.latitude.as_deref(), self.longitude.as_deref());
        ImageSubmission::new(self.image.unwrap_or_default(), locale, location)
    }
}

fn unreadable(err: MultipartError) -> ApiError {
    let status = err.status();
    warn!(error = %err, status = status.as_u16(), "Could not read multipart body");

    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(IMAGE_TOO_LARGE_MESSAGE.to_string())
    } else {
        ApiError::BadRequest(NO_IMAGE_MESSAGE.to_string())
    }
}

async fn read_form(multipart: &mut Multipart) -> ApiResult<IdentifyForm> {
    let mut form = IdentifyForm::default();

    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => form.image = Some(field.bytes().await.map_err(unreadable)?.to_vec()),
            Some("language") => form.language = Some(field.text().await.map_err(unreadable)?),
            Some("latitude") => form.latitude = Some(field.text().await.map_err(unreadable)?),
            Some("longitude") => form.longitude = Some(field.text().await.map_err(unreadable)?),
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/identify
pub async fn identify_artwork(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<IdentifyResponse>> {
    let mut multipart = multipart.map_err(|e| {
        warn!(error = %e, "Identify request is not multipart");
        ApiError::BadRequest(NO_IMAGE_MESSAGE.to_string())
    })?;

    let submission = read_form(&mut multipart).await?.into_submission();

    match state.pipeline.identify(submission).await.into_result() {
        Ok(record) => Ok(Json(IdentifyResponse::success(record))),
        Err(e) => {
            state.record_error(&e).await;
            Err(e.into())
        }
    }
}

/// Build identification routes
pub fn identify_routes() -> Router<AppState> {
    Router::new().route("/api/identify", post(identify_artwork))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults() {
        let submission = IdentifyForm::default().into_submission();
        assert!(submission.image.is_empty());
        assert_eq!(submission.locale, Locale::En);
        assert!(submission.location.is_none());
    }

    #[test]
    fn test_form_with_context() {
        let form = IdentifyForm {
            image: Some(vec![0xFF, 0xD8, 0xFF]),
            language: Some("es".to_string()),
            latitude: Some("51.06".to_string()),
            longitude: Some("-114.09".to_string()),
        };
        let submission = form.into_submission();
        assert_eq!(submission.locale, Locale::Es);
        assert_eq!(
            submission.location,
            Some(GeoLocation {
                latitude: 51.06,
                longitude: -114.09
            })
        );
    }

    #[test]
    fn test_unsupported_language_defaults_to_english() {
        let form = IdentifyForm {
            language: Some("de".to_string()),
            ..Default::default()
        };
        assert_eq!(form.into_submission().locale, Locale::En);
    }
}
