//! Error types for artlens-id
//!
//! Two layers:
//! - `PipelineError`: failure taxonomy of the identification pipeline
//! - `ApiError`: HTTP-facing error, rendered as `{success: false, error}`

use artlens_common::IdentifyResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::types::ProviderError;

/// Message returned when the submission carries no image
pub const NO_IMAGE_MESSAGE: &str = "No image file uploaded.";

/// Message returned when the upload exceeds the request body limit
pub const IMAGE_TOO_LARGE_MESSAGE: &str = "The uploaded image is too large.";

/// Message returned when the artwork could not be identified
pub const NOT_IDENTIFIED_MESSAGE: &str =
    "The artwork could not be identified. Please try another photo.";

/// Message returned for every other processing failure
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process the request.";

/// Pipeline failure taxonomy
///
/// Every variant is terminal. Nothing in the pipeline retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Submission is unusable (no or empty image)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An outbound call could not complete
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Provider text is unparsable or violates the record schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Provider answered but the artwork is unidentifiable
    #[error("No confident match: {0}")]
    NoConfidentMatch(String),

    /// Pipeline wiring fault (e.g. a strategy handed the wrong route)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Short kind name for logs and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "InvalidInput",
            PipelineError::TransportFailure(_) => "TransportFailure",
            PipelineError::MalformedResponse(_) => "MalformedResponse",
            PipelineError::NoConfidentMatch(_) => "NoConfidentMatch",
            PipelineError::Internal(_) => "Internal",
        }
    }
}

impl From<ProviderError> for PipelineError {
    fn from(err: ProviderError) -> Self {
        PipelineError::TransportFailure(err.to_string())
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload over the body limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Artwork not identified (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error (500)
    ///
    /// The detail is logged; clients only see a generic message.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(msg) => ApiError::BadRequest(msg),
            PipelineError::NoConfidentMatch(_) => {
                ApiError::NotFound(NOT_IDENTIFIED_MESSAGE.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::PayloadTooLarge(msg) => msg.clone(),
            ApiError::Internal(_) => PROCESSING_FAILED_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }

        let body = Json(IdentifyResponse::failure(self.user_message()));
        (self.status_code(), body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
