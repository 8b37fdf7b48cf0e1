//! Shared API request/response types
//!
//! Used by the identification service (`artlens-id`) and by any client that
//! consumes `POST /api/identify`.

use serde::{Deserialize, Serialize};

// ========================================
// Request Context Types
// ========================================

/// Output language for enrichment
///
/// Restricted to the languages the mobile client ships translations for.
/// Unknown or missing codes fall back to English.
///
/// # Examples
///
/// ```
/// use artlens_common::api::types::Locale;
///
/// assert_eq!(Locale::from_code(Some("es")), Locale::Es);
/// assert_eq!(Locale::from_code(Some("de")), Locale::En);
/// assert_eq!(Locale::from_code(None).language_name(), "English");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
}

impl Locale {
    /// Parse a client-supplied language code, defaulting to English
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("es") => Locale::Es,
            Some("fr") => Locale::Fr,
            _ => Locale::En,
        }
    }

    /// Two-letter code as sent by clients
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Fr => "fr",
        }
    }

    /// English name of the language, used when instructing providers
    pub fn language_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Es => "Spanish",
            Locale::Fr => "French",
        }
    }
}

/// Device location at capture time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoLocation {
    /// Build a location from the raw form fields
    ///
    /// Both coordinates must be present, parse as finite decimals and lie
    /// within WGS84 bounds. Anything else yields `None`: a bad coordinate
    /// only loses the hint, it never fails the request.
    pub fn from_form(latitude: Option<&str>, longitude: Option<&str>) -> Option<Self> {
        let latitude: f64 = latitude?.trim().parse().ok()?;
        let longitude: f64 = longitude?.trim().parse().ok()?;

        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }

        Some(Self {
            latitude,
            longitude,
        })
    }
}

// ========================================
// Response Types
// ========================================

/// Canonical description of an identified artwork
///
/// Field names are camelCase on the wire (`thumbnailUrl`) to match what the
/// mobile client stores in its favorites list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkRecord {
    pub title: String,
    pub artist: String,
    /// Short history (around 100 words)
    pub history: String,
    /// Trivia facts, three by contract
    pub trivia: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Uniform envelope returned by `POST /api/identify`
///
/// # Examples
///
/// ```
/// use artlens_common::api::types::IdentifyResponse;
///
/// let body = serde_json::to_value(IdentifyResponse::failure("No image file uploaded.")).unwrap();
/// assert_eq!(body, serde_json::json!({"success": false, "error": "No image file uploaded."}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ArtworkRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IdentifyResponse {
    pub fn success(record: ArtworkRecord) -> Self {
        Self {
            success: true,
            data: Some(record),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
