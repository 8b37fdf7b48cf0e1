//! Identification Pipeline Scenario Tests
//! Test File: pipeline_scenarios.rs
//!
//! Drives the full pipeline (detector → classifier → router → strategy →
//! normalizer) with scripted providers.

mod helpers;

use artlens_common::{GeoLocation, Locale};
use artlens_id::types::ImageSubmission;
use artlens_id::{PipelineError, PipelineStage};
use helpers::*;
use std::sync::Arc;
use tracing::Level;

fn submission(locale: Locale, location: Option<GeoLocation>) -> ImageSubmission {
    ImageSubmission::new(JPEG_BYTES.to_vec(), locale, location)
}

/// Scenario A: specific label goes down the text path in the requested language
#[tokio::test]
async fn scenario_a_confident_label_uses_text_strategy() {
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::replying(STARRY_NIGHT_JSON, log.clone()));
    let pipeline = scripted_pipeline(
        ScriptedDetector::label("The Starry Night", log.clone()),
        provider.clone(),
    );

    let result = pipeline.identify(submission(Locale::Es, None)).await;

    assert!(result.success);
    assert_eq!(result.route, Some("text"));

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].image.is_none(), "text path must not send the image");
    assert!(requests[0].prompt.contains("\"The Starry Night\""));
    assert!(requests[0].prompt.contains("Spanish"));

    let record = result.data.unwrap();
    assert_eq!(record.title, "The Starry Night");
    assert_eq!(record.trivia.len(), 3);
}

/// Scenario B: generic label goes down the vision path with location context
#[tokio::test]
async fn scenario_b_generic_label_uses_vision_strategy_with_location() {
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::replying(STARRY_NIGHT_JSON, log.clone()));
    let pipeline = scripted_pipeline(ScriptedDetector::label("painting", log.clone()), provider.clone());

    let location = GeoLocation {
        latitude: 51.06,
        longitude: -114.09,
    };
    let result = pipeline
        .identify(submission(Locale::En, Some(location)))
        .await;

    assert!(result.success);
    assert_eq!(result.route, Some("vision"));

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let image = requests[0].image.as_ref().expect("vision path sends the image");
    assert_eq!(image.mime_type, "image/jpeg");
    assert!(requests[0].prompt.contains("latitude 51.06"));
    assert!(requests[0].prompt.contains("longitude -114.09"));
    assert_eq!(requests[0].model, "gpt-4o");
}

/// Scenario C: empty submission is rejected before any outbound call
#[tokio::test]
async fn scenario_c_empty_image_is_invalid_input() {
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::replying(STARRY_NIGHT_JSON, log.clone()));
    let pipeline = scripted_pipeline(ScriptedDetector::label("Guernica", log.clone()), provider);

    let result = pipeline
        .identify(ImageSubmission::new(Vec::new(), Locale::En, None))
        .await;

    assert!(!result.success);
    assert!(result.data.is_none());
    assert_eq!(
        result.error,
        Some(PipelineError::InvalidInput("No image file uploaded.".to_string()))
    );
    assert!(log.entries().is_empty(), "no outbound calls expected");
}

/// Scenario D: sentinel title from the vision provider is a "not found" outcome
#[tokio::test]
async fn scenario_d_sentinel_title_is_no_confident_match() {
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::replying(UNKNOWN_ARTWORK_JSON, log.clone()));
    let pipeline = scripted_pipeline(ScriptedDetector::label("mural", log.clone()), provider);

    let result = pipeline.identify(submission(Locale::En, None)).await;

    assert!(!result.success);
    assert!(result.data.is_none());
    assert!(matches!(result.error, Some(PipelineError::NoConfidentMatch(_))));
}

#[tokio::test]
async fn no_label_uses_vision_strategy() {
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::replying(STARRY_NIGHT_JSON, log.clone()));
    let pipeline = scripted_pipeline(ScriptedDetector::no_label(log.clone()), provider);

    let result = pipeline.identify(submission(Locale::Fr, None)).await;

    assert_eq!(result.route, Some("vision"));
    assert_eq!(log.entries(), vec!["detect", "complete:vision"]);
}

#[tokio::test]
async fn detector_failure_is_treated_as_no_label() {
    let (logs, _guard) = capture_logs();
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::replying(STARRY_NIGHT_JSON, log.clone()));
    let pipeline = scripted_pipeline(
        ScriptedDetector::failing("connection reset", log.clone()),
        provider,
    );

    let result = pipeline.identify(submission(Locale::En, None)).await;

    assert!(result.success);
    assert_eq!(result.route, Some("vision"));
    logs.assert_contains_at(Level::WARN, "Label detection failed");
}

#[tokio::test]
async fn enrichment_transport_failure_is_terminal() {
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::failing("overloaded", log.clone()));
    let pipeline = scripted_pipeline(ScriptedDetector::label("Guernica", log.clone()), provider.clone());

    let result = pipeline.identify(submission(Locale::En, None)).await;

    assert!(!result.success);
    assert!(matches!(result.error, Some(PipelineError::TransportFailure(_))));
    assert_eq!(provider.requests().len(), 1, "no retry expected");
    assert_eq!(
        result.stages.last(),
        Some(&PipelineStage::Done { success: false })
    );
}

#[tokio::test]
async fn malformed_completion_is_malformed_response() {
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::replying(
        "Sorry, I can't help with that.",
        log.clone(),
    ));
    let pipeline = scripted_pipeline(ScriptedDetector::label("Guernica", log.clone()), provider);

    let result = pipeline.identify(submission(Locale::En, None)).await;

    assert!(matches!(result.error, Some(PipelineError::MalformedResponse(_))));
}

#[tokio::test]
async fn fenced_completion_matches_unfenced() {
    let fenced = format!("```json\n{}\n```", STARRY_NIGHT_JSON);

    let log = CallLog::default();
    let plain_provider = Arc::new(ScriptedProvider::replying(STARRY_NIGHT_JSON, log.clone()));
    let fenced_provider = Arc::new(ScriptedProvider::replying(&fenced, log.clone()));

    let plain = scripted_pipeline(ScriptedDetector::no_label(log.clone()), plain_provider)
        .identify(submission(Locale::En, None))
        .await;
    let wrapped = scripted_pipeline(ScriptedDetector::no_label(log.clone()), fenced_provider)
        .identify(submission(Locale::En, None))
        .await;

    assert_eq!(plain.data, wrapped.data);
    assert!(plain.data.is_some());
}

/// Detection resolves before enrichment starts; at most two calls per submission
#[tokio::test]
async fn outbound_calls_are_sequential_and_bounded() {
    for label in ["The Starry Night", "graffiti"] {
        let log = CallLog::default();
        let provider = Arc::new(ScriptedProvider::replying(STARRY_NIGHT_JSON, log.clone()));
        let pipeline = scripted_pipeline(ScriptedDetector::label(label, log.clone()), provider);

        pipeline.identify(submission(Locale::En, None)).await;

        let entries = log.entries();
        assert_eq!(entries.len(), 2, "label {:?}: {:?}", label, entries);
        assert_eq!(entries[0], "detect");
        assert!(entries[1].starts_with("complete:"));
    }
}

/// Concurrent submissions share one pipeline without interfering
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_are_independent() {
    let log = CallLog::default();
    let provider = Arc::new(ScriptedProvider::replying(STARRY_NIGHT_JSON, log.clone()));
    let pipeline = Arc::new(scripted_pipeline(
        ScriptedDetector::label("The Starry Night", log.clone()),
        provider.clone(),
    ));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let pipeline = pipeline.clone();
            let locale = if i % 2 == 0 { Locale::Es } else { Locale::Fr };
            tokio::spawn(async move { pipeline.identify(submission(locale, None)).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().success);
    }

    let requests = provider.requests();
    assert_eq!(requests.len(), 8);
    let spanish = requests.iter().filter(|r| r.prompt.contains("Spanish")).count();
    let french = requests.iter().filter(|r| r.prompt.contains("French")).count();
    assert_eq!((spanish, french), (4, 4));
}
