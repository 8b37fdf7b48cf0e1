//! Identification workflow
//!
//! One pipeline run per submission, strictly linear except for the branch at
//! routing:
//!
//! ```text
//! Received → Labeling → Routing → Enriching → Validating → Done(success|failure)
//! ```
//!
//! At most two outbound calls happen per run (label detection, then
//! enrichment) and they never overlap: routing depends on the detection
//! result. Empty submissions go straight from `Received` to `Done`.

pub mod pipeline;

pub use pipeline::IdentificationPipeline;

use artlens_common::ArtworkRecord;

use crate::error::PipelineError;

/// Pipeline state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Labeling,
    Routing,
    Enriching,
    Validating,
    Done { success: bool },
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Labeling => "labeling",
            PipelineStage::Routing => "routing",
            PipelineStage::Enriching => "enriching",
            PipelineStage::Validating => "validating",
            PipelineStage::Done { success: true } => "done:success",
            PipelineStage::Done { success: false } => "done:failure",
        }
    }
}

/// Uniform outcome of one submission
///
/// Exactly one of `data` / `error` is set, matching `success`. Never carries
/// partial data.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub success: bool,
    pub data: Option<ArtworkRecord>,
    pub error: Option<PipelineError>,
    /// Enrichment path taken, if routing was reached
    pub route: Option<&'static str>,
    /// Stages visited, in order, ending with `Done`
    pub stages: Vec<PipelineStage>,
}

impl PipelineResult {
    pub fn into_result(self) -> Result<ArtworkRecord, PipelineError> {
        match (self.data, self.error) {
            (Some(record), None) => Ok(record),
            (_, Some(err)) => Err(err),
            (None, None) => Err(PipelineError::Internal(
                "pipeline finished without an outcome".to_string(),
            )),
        }
    }
}
