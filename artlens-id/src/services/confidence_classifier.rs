//! Confidence Classifier
//!
//! Heuristic gate on the detected label. Generic labels ("painting",
//! "street art", "person") produce worse completions than the geolocation
//! aware vision path, so they are treated as not confident.

use crate::types::LabelConfidence;

/// Terms that mark a label as too generic to enrich from its name alone
pub const DEFAULT_DENYLIST: &[&str] = &[
    "art",
    "mural",
    "painting",
    "graffiti",
    "sculpture",
    "illustration",
    "drawing",
    "artwork",
    "person",
];

/// Denylist-based label classifier
///
/// A label is confident iff it is present, non-blank, and contains none of
/// the denylisted terms as a case-insensitive substring.
#[derive(Debug, Clone)]
pub struct ConfidenceClassifier {
    /// Lowercased denylist terms
    denylist: Vec<String>,
}

impl ConfidenceClassifier {
    /// Create classifier with the default denylist
    pub fn new() -> Self {
        Self::with_denylist(DEFAULT_DENYLIST.iter().copied())
    }

    /// Create classifier with a custom denylist
    ///
    /// Terms are trimmed and lowercased; blank terms are dropped (an empty
    /// term would match every label).
    pub fn with_denylist<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let denylist = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self { denylist }
    }

    pub fn denylist(&self) -> &[String] {
        &self.denylist
    }

    /// First denylisted term contained in `label`, if any
    pub fn denylist_hit(&self, label: &str) -> Option<&str> {
        let lowered = label.to_lowercase();
        self.denylist
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Classify a label guess
    pub fn classify(&self, label: Option<&str>) -> LabelConfidence {
        let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
            return LabelConfidence::NotConfident;
        };

        match self.denylist_hit(label) {
            Some(term) => {
                tracing::debug!(label, term, "Label matched denylist");
                LabelConfidence::NotConfident
            }
            None => LabelConfidence::Confident(label.to_string()),
        }
    }
}

impl Default for ConfidenceClassifier {
    fn default() -> Self {
        Self::new()
    }
}
