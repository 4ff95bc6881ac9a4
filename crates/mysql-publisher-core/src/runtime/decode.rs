// crates/mysql-publisher-core/src/runtime/decode.rs
// ============================================================================
// Module: Batch Decoder
// Description: Decodes `snap.json` payloads into metric records.
// Purpose: Map untyped wire values onto the closed metric value set.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Batches arrive as a JSON array of records. Each record's `data` field is
//! mapped onto [`MetricValue`] at this boundary so the formatter only ever sees
//! the closed set. Values outside that set decode successfully as
//! [`MetricValue::Unsupported`]; rejecting them is the formatter's job.
//! Security posture: payloads are untrusted and size-limited.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

use crate::core::MetricRecord;
use crate::core::MetricValue;
use crate::core::SNAP_JSON_CONTENT_TYPE;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted batch payload size in bytes.
pub const MAX_BATCH_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Batch decoding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// Payload encoding is not recognized.
    #[error("unknown content type '{0}'")]
    UnsupportedContentType(String),
    /// Payload exceeds [`MAX_BATCH_BYTES`].
    #[error("batch payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
    /// Payload does not parse as a batch.
    #[error("batch decode failed: {0}")]
    Malformed(String),
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes a batch payload in the given encoding.
///
/// # Errors
///
/// Returns [`BatchError`] for unknown encodings, oversized payloads, or
/// payloads that do not parse.
pub fn decode_batch(content_type: &str, payload: &[u8]) -> Result<Vec<MetricRecord>, BatchError> {
    if content_type != SNAP_JSON_CONTENT_TYPE {
        return Err(BatchError::UnsupportedContentType(content_type.to_string()));
    }
    if payload.len() > MAX_BATCH_BYTES {
        return Err(BatchError::TooLarge {
            max_bytes: MAX_BATCH_BYTES,
            actual_bytes: payload.len(),
        });
    }
    serde_json::from_slice(payload).map_err(|err| BatchError::Malformed(err.to_string()))
}

impl From<Value> for MetricValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(text) => Self::String(text),
            Value::Number(number) => number_value(&number),
            Value::Array(items) => array_value(items),
            Value::Bool(_) => Self::unsupported("bool"),
            Value::Object(_) => Self::unsupported("object"),
        }
    }
}

/// Maps a JSON number onto the narrowest supported scalar.
fn number_value(number: &Number) -> MetricValue {
    if let Some(value) = number.as_i64() {
        MetricValue::Int(value)
    } else if let Some(value) = number.as_u64() {
        MetricValue::UInt(value)
    } else {
        number.as_f64().map_or_else(|| MetricValue::unsupported("number"), MetricValue::Float)
    }
}

/// Maps a JSON array onto a homogeneous supported array.
fn array_value(items: Vec<Value>) -> MetricValue {
    if items.iter().all(Value::is_string) {
        let strings = items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect();
        return MetricValue::StringArray(strings);
    }
    if items.iter().all(Value::is_number) {
        if let Some(values) = items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>() {
            return MetricValue::IntArray(values);
        }
        if let Some(values) = items.iter().map(Value::as_u64).collect::<Option<Vec<_>>>() {
            return MetricValue::UIntArray(values);
        }
        if let Some(values) = items.iter().map(Value::as_f64).collect::<Option<Vec<_>>>() {
            return MetricValue::FloatArray(values);
        }
    }
    MetricValue::unsupported(array_kind(&items))
}

/// Names an unsupported array by its element kinds.
fn array_kind(items: &[Value]) -> String {
    let mut kinds = items.iter().map(json_kind);
    let first = kinds.next().unwrap_or("nil");
    if kinds.all(|kind| kind == first) { format!("[]{first}") } else { "mixed array".to_string() }
}

/// Returns the JSON kind name of a value.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
