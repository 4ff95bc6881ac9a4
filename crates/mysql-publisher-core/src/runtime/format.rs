// crates/mysql-publisher-core/src/runtime/format.rs
// ============================================================================
// Module: Value Formatter
// Description: Canonical text rendering for metric values, keys, and times.
// Purpose: Turn every supported value kind into a single column string.
// Dependencies: crate::core, thiserror, time
// ============================================================================

//! ## Overview
//! Formatting is a pure function of its input. Scalars render in their
//! shortest decimal form, arrays render element-wise joined by `", "`, and the
//! null value renders as `nil`. [`MetricValue::Unsupported`] is the only
//! failing arm and produces no partial output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::MetricValue;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between array elements and namespace segments.
pub const SEPARATOR: &str = ", ";
/// Rendering of an absent value.
pub const NIL: &str = "nil";
/// Kinds accepted by [`format_value`], as reported in errors.
pub const SUPPORTED_KINDS: &[&str] = &[
    "string", "[]string", "int", "[]int", "uint", "[]uint", "float", "[]float", "nil",
];

/// Magnitude at or above which floats switch to exponent notation.
const EXPONENT_UPPER: f64 = 1e21;
/// Magnitude below which non-zero floats switch to exponent notation.
const EXPONENT_LOWER: f64 = 1e-7;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Formatting errors.
///
/// # Invariants
/// - `UnsupportedType` messages start with `Unsupported type`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Value kind is outside the supported set.
    #[error(
        "Unsupported type {type_name} (currently supported data types: {})",
        .supported.join(SEPARATOR)
    )]
    UnsupportedType {
        /// Offending kind name.
        type_name: String,
        /// Kinds the formatter accepts.
        supported: &'static [&'static str],
    },
    /// Timestamp has no RFC 3339 rendering.
    #[error("timestamp cannot be formatted: {0}")]
    Timestamp(String),
}

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Formats a metric value into its column text.
///
/// # Errors
///
/// Returns [`FormatError::UnsupportedType`] for [`MetricValue::Unsupported`].
pub fn format_value(value: &MetricValue) -> Result<String, FormatError> {
    let formatted = match value {
        MetricValue::Null => NIL.to_string(),
        MetricValue::String(value) => value.clone(),
        MetricValue::Int(value) => value.to_string(),
        MetricValue::UInt(value) => value.to_string(),
        MetricValue::Float(value) => format_float(*value),
        MetricValue::StringArray(values) => values.join(SEPARATOR),
        MetricValue::IntArray(values) => join_with(values, ToString::to_string),
        MetricValue::UIntArray(values) => join_with(values, ToString::to_string),
        MetricValue::FloatArray(values) => join_with(values, |value| format_float(*value)),
        MetricValue::Unsupported {
            type_name,
        } => {
            return Err(FormatError::UnsupportedType {
                type_name: type_name.clone(),
                supported: SUPPORTED_KINDS,
            });
        }
    };
    Ok(formatted)
}

/// Formats a float in its shortest round-trippable form.
///
/// Positional notation is used unless the magnitude is at least `1e21` or
/// below `1e-7`, where the shortest exponent form is used instead.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude > 0.0 && !(EXPONENT_LOWER .. EXPONENT_UPPER).contains(&magnitude) {
        format!("{value:e}")
    } else {
        value.to_string()
    }
}

/// Joins namespace segments into a row key.
#[must_use]
pub fn format_namespace(segments: &[String]) -> String {
    segments.join(SEPARATOR)
}

/// Formats an observation time as RFC 3339.
///
/// # Errors
///
/// Returns [`FormatError::Timestamp`] when the time has no RFC 3339 rendering.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, FormatError> {
    timestamp.format(&Rfc3339).map_err(|err| FormatError::Timestamp(err.to_string()))
}

/// Formats each element and joins them with [`SEPARATOR`].
fn join_with<T>(values: &[T], format: impl Fn(&T) -> String) -> String {
    values.iter().map(format).collect::<Vec<_>>().join(SEPARATOR)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
