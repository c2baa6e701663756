//! Tests for decoder module

use super::*;
use crate::error::Error;
use crate::pagination::{ResourceDescriptor, StopCondition};
use serde_json::json;

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_top_level_array() {
    let decoder = JsonDecoder::new();
    let page = decoder
        .decode_page(&json!([{"id": 1}, {"id": 2}, {"id": 3}]))
        .unwrap();

    assert_eq!(page.len(), 3);
    assert_eq!(page.records[0]["id"], 1);
    assert_eq!(page.records[2]["id"], 3);
    assert!(page.total_pages.is_none());
}

#[test]
fn test_json_decoder_empty_array() {
    let page = JsonDecoder::new().decode_page(&json!([])).unwrap();
    assert!(page.is_empty());
}

#[test]
fn test_json_decoder_object_without_path_is_error() {
    let err = JsonDecoder::new()
        .decode_page(&json!({"id": 1}))
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_json_decoder_with_path() {
    let decoder = JsonDecoder::with_path("offers");
    let page = decoder
        .decode_page(&json!({"offers": [{"id": 1}, {"id": 2}]}))
        .unwrap();
    assert_eq!(page.len(), 2);
}

#[test]
fn test_json_decoder_with_dollar_prefix_and_nested_path() {
    let decoder = JsonDecoder::with_path("$.data.items");
    let page = decoder
        .decode_page(&json!({"data": {"items": [{"id": "a"}]}}))
        .unwrap();
    assert_eq!(page.records, vec![json!({"id": "a"})]);
}

#[test]
fn test_json_decoder_missing_path_is_error() {
    let err = JsonDecoder::with_path("candidates")
        .decode_page(&json!({"error": "nope"}))
        .unwrap_err();
    match err {
        Error::RecordExtraction { path, .. } => assert_eq!(path, "candidates"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_json_decoder_non_array_path_is_error() {
    let err = JsonDecoder::with_path("results")
        .decode_page(&json!({"results": {"id": 1}}))
        .unwrap_err();
    assert!(err.to_string().contains("expected an array, found an object"));
}

#[test]
fn test_json_decoder_total_pages() {
    let decoder = JsonDecoder::with_path("results").with_total_pages_path("totalPages");
    let page = decoder
        .decode_page(&json!({"results": [{"id": 1}], "totalPages": 4}))
        .unwrap();
    assert_eq!(page.total_pages, Some(4));
}

#[test]
fn test_json_decoder_total_pages_as_string() {
    let decoder = JsonDecoder::with_path("results").with_total_pages_path("totalPages");
    let page = decoder
        .decode_page(&json!({"results": [], "totalPages": "2"}))
        .unwrap();
    assert_eq!(page.total_pages, Some(2));
}

#[test]
fn test_json_decoder_total_pages_missing_is_error() {
    let decoder = JsonDecoder::with_path("results").with_total_pages_path("totalPages");
    let err = decoder
        .decode_page(&json!({"results": [{"id": 1}]}))
        .unwrap_err();
    assert!(matches!(err, Error::RecordExtraction { .. }));
}

#[test]
fn test_json_decoder_total_pages_negative_is_error() {
    let decoder = JsonDecoder::with_path("results").with_total_pages_path("totalPages");
    let err = decoder
        .decode_page(&json!({"results": [{"id": 1}], "totalPages": -1}))
        .unwrap_err();
    assert!(err.to_string().contains("not an unsigned integer"));
}

#[test]
fn test_json_decoder_total_count_is_optional() {
    let decoder = JsonDecoder::with_path("items").with_total_count_path("totalCount");

    let page = decoder
        .decode_page(&json!({"items": [{"id": 1}], "totalCount": 40}))
        .unwrap();
    assert_eq!(page.total_count, Some(40));

    let page = decoder.decode_page(&json!({"items": []})).unwrap();
    assert_eq!(page.total_count, None);
}

#[test]
fn test_decoder_for_descriptor() {
    let descriptor = ResourceDescriptor::new("https://api.gupy.io/api/v1", "job-templates")
        .records_path("results")
        .stop_condition(StopCondition::total_pages("totalPages"));

    let decoder = JsonDecoder::for_descriptor(&descriptor);
    let page = decoder
        .decode_page(&json!({"results": [{"id": 1}], "totalPages": 1}))
        .unwrap();
    assert_eq!(page.total_pages, Some(1));
}

// ============================================================================
// Path Lookup Tests
// ============================================================================

#[test]
fn test_lookup_path() {
    let value = json!({
        "pipeline_template": {"stages": [{"id": 1, "name": "Applied"}, {"id": 2, "name": "Hired"}]},
        "id": 7
    });

    assert_eq!(lookup_path(&value, "id"), Some(&json!(7)));
    assert_eq!(lookup_path(&value, "$.id"), Some(&json!(7)));
    assert_eq!(
        lookup_path(&value, "pipeline_template.stages[1].name"),
        Some(&json!("Hired"))
    );
    assert_eq!(lookup_path(&value, "pipeline_template.stages[5]"), None);
    assert_eq!(lookup_path(&value, "missing.path"), None);
    assert_eq!(lookup_path(&value, "$"), Some(&value));
}
