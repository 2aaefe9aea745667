//! Integration tests for wire decoding feeding the pipeline.

use tapestry::{Envelope, EnvelopeError, MessageHandler, TapestryError, batch_from_wire};

#[test]
fn test_envelope_decode_failure_is_transport_level() {
    // A truncated document fails as a whole; nothing reaches the dataset.
    let result = Envelope::from_json(r#"{"metrics": {"m1": {"time": 1"#);
    assert!(matches!(result, Err(EnvelopeError::Decode { .. })));
}

#[test]
fn test_envelope_error_converts_to_crate_error() {
    let err: TapestryError = Envelope::from_json("[]").unwrap_err().into();
    assert!(matches!(err, TapestryError::Envelope(_)));
    // Display chains through to the underlying decode problem.
    assert!(err.to_string().contains("envelope"));
}

#[test]
fn test_malformed_entries_do_not_abort_the_batch() {
    let envelope = Envelope::from_json(
        r#"{"metrics": {
            "m1": {"time": 100, "value": 5.0},
            "m2": {"tags": ["orphan"]},
            "m3": {"time": 100, "value": 7.0}
        }}"#,
    )
    .unwrap();

    let (batch, skipped) = batch_from_wire(&envelope.metrics.unwrap());
    assert_eq!(batch.len(), 2);
    assert_eq!(skipped, 1);
}

#[test]
fn test_missing_label_data_defaults_to_empty_through_pipeline() {
    let mut handler = MessageHandler::new(());

    handler.on_envelope(
        &Envelope::from_json(r#"{"metrics": {"bare": {"time": 1, "value": 1}}}"#).unwrap(),
    );

    let series = handler.metrics().get("bare").unwrap();
    assert!(series.tags.is_empty());
    assert!(series.attributes.is_empty());
    assert!(series.identifying_tags.is_empty());
    assert!(series.identifying_keys.is_empty());
    // A labelless series still narrows the common sets for everyone else.
    assert!(handler.metrics().common_tags.is_empty());
}

#[test]
fn test_repeated_envelopes_extend_history_only() {
    let mut handler = MessageHandler::new(());

    handler.on_envelope(
        &Envelope::from_json(
            r#"{"metrics": {"m1": {"time": 100, "value": 5.0, "tags": ["a"],
                                    "attributes": {"k": "v"}}}}"#,
        )
        .unwrap(),
    );
    handler.on_envelope(
        &Envelope::from_json(
            r#"{"metrics": {"m1": {"time": 101, "value": 7.0, "tags": ["b"],
                                    "attributes": {"k": "other"}}}}"#,
        )
        .unwrap(),
    );

    let series = handler.metrics().get("m1").unwrap();
    assert_eq!(series.values.len(), 2);
    assert_eq!(series.values[0].time_ms, 101);
    // Labels stay as first seen.
    assert!(series.tags.contains("a"));
    assert!(!series.tags.contains("b"));
    assert_eq!(series.attributes["k"], "v");
}

#[test]
fn test_dataset_serializes_for_rendering() {
    let mut handler = MessageHandler::new(());
    handler.on_envelope(
        &Envelope::from_json(
            r#"{"metrics": {"m1": {"time": 100, "value": 5.0,
                                    "tags": ["region:us"],
                                    "attributes": {"env": "prod"}}}}"#,
        )
        .unwrap(),
    );

    let rendered = serde_json::to_value(handler.metrics()).unwrap();
    assert_eq!(rendered["commonTags"][0], "region:us");
    assert_eq!(rendered["commonAttributes"]["env"], "prod");
    assert_eq!(rendered["datapoints"]["m1"]["values"][0]["time"], 100);
    assert_eq!(rendered["datapoints"]["m1"]["values"][0]["value"], 5.0);
}
