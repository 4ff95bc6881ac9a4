// crates/mysql-publisher-core/tests/batch_decode.rs
// ============================================================================
// Module: Batch Decoding Tests
// Description: Mapping of `snap.json` payloads onto metric records.
// Purpose: Ensure wire values land on the intended metric value kinds.
// ============================================================================

//! Batch decoding tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use mysql_publisher_core::BatchError;
use mysql_publisher_core::MetricValue;
use mysql_publisher_core::runtime::MAX_BATCH_BYTES;
use mysql_publisher_core::runtime::decode_batch;
use serde_json::Value;
use serde_json::json;
use time::macros::datetime;

fn decode_value(data: &Value) -> MetricValue {
    let payload = json!([{
        "namespace": ["intel", "mock", "foo"],
        "timestamp": "2026-03-01T12:30:05Z",
        "data": data,
    }]);
    let mut records = decode_batch("snap.json", payload.to_string().as_bytes()).unwrap();
    assert_eq!(records.len(), 1);
    records.remove(0).value
}

#[test]
fn decodes_records_with_tags() {
    let payload = json!([
        {
            "namespace": ["intel", "cpu", "load"],
            "timestamp": "2026-03-01T12:30:05Z",
            "tags": {"plugin_running_on": "host-a"},
            "data": 3
        },
        {
            "namespace": ["intel", "cpu", "idle"],
            "timestamp": "2026-03-01T12:30:06+02:00"
        }
    ]);
    let records = decode_batch("snap.json", payload.to_string().as_bytes()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].namespace, vec!["intel", "cpu", "load"]);
    assert_eq!(records[0].timestamp, datetime!(2026-03-01 12:30:05 UTC));
    assert_eq!(records[0].source(), "host-a");
    assert_eq!(records[0].value, MetricValue::Int(3));
    assert_eq!(records[1].source(), "");
    assert_eq!(records[1].value, MetricValue::Null);
}

#[test]
fn numbers_map_to_narrowest_kind() {
    assert_eq!(decode_value(&json!(-7)), MetricValue::Int(-7));
    assert_eq!(decode_value(&json!(u64::MAX)), MetricValue::UInt(u64::MAX));
    assert_eq!(decode_value(&json!(1.5)), MetricValue::Float(1.5));
}

#[test]
fn homogeneous_arrays_map_to_array_kinds() {
    assert_eq!(
        decode_value(&json!(["a", "b"])),
        MetricValue::StringArray(vec!["a".to_string(), "b".to_string()])
    );
    assert_eq!(decode_value(&json!([1, 2])), MetricValue::IntArray(vec![1, 2]));
    assert_eq!(decode_value(&json!([1, u64::MAX])), MetricValue::UIntArray(vec![1, u64::MAX]));
    assert_eq!(decode_value(&json!([1, 2.5])), MetricValue::FloatArray(vec![1.0, 2.5]));
    assert_eq!(decode_value(&json!([])), MetricValue::StringArray(Vec::new()));
}

#[test]
fn other_values_decode_as_unsupported() {
    assert_eq!(decode_value(&json!(true)), MetricValue::unsupported("bool"));
    assert_eq!(decode_value(&json!({"k": 1})), MetricValue::unsupported("object"));
    assert_eq!(decode_value(&json!([true, false])), MetricValue::unsupported("[]bool"));
    assert_eq!(decode_value(&json!([1, "a"])), MetricValue::unsupported("mixed array"));
}

#[test]
fn unknown_content_type_is_rejected() {
    let err = decode_batch("snap.gob", b"[]").unwrap_err();
    assert_eq!(err, BatchError::UnsupportedContentType("snap.gob".to_string()));
    assert_eq!(err.to_string(), "unknown content type 'snap.gob'");
}

#[test]
fn malformed_payloads_are_rejected() {
    assert!(matches!(decode_batch("snap.json", b"{not json"), Err(BatchError::Malformed(_))));
    let missing_timestamp = json!([{"namespace": ["a"]}]).to_string();
    assert!(matches!(
        decode_batch("snap.json", missing_timestamp.as_bytes()),
        Err(BatchError::Malformed(_))
    ));
}

#[test]
fn oversized_payloads_are_rejected() {
    let payload = vec![b' '; MAX_BATCH_BYTES + 1];
    let err = decode_batch("snap.json", &payload).unwrap_err();
    assert_eq!(
        err,
        BatchError::TooLarge {
            max_bytes: MAX_BATCH_BYTES,
            actual_bytes: MAX_BATCH_BYTES + 1,
        }
    );
}

#[test]
fn empty_batch_decodes_to_no_records() {
    assert!(decode_batch("snap.json", b"[]").unwrap().is_empty());
}
