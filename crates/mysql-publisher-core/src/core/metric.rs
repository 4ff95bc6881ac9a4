// crates/mysql-publisher-core/src/core/metric.rs
// ============================================================================
// Module: Metric Model
// Description: Metric records and the closed value variant they carry.
// Purpose: Give the publish pipeline a typed view of decoded observations.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! A [`MetricRecord`] is one observation handed over by the batch decoder. Its
//! value is a [`MetricValue`], a closed set of the scalar and array kinds the
//! publisher knows how to persist. Kinds outside that set are carried as
//! [`MetricValue::Unsupported`] so the formatter rejects them explicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tag key naming the host the collecting plugin ran on.
pub const RUNNING_ON_TAG: &str = "plugin_running_on";

// ============================================================================
// SECTION: Metric Values
// ============================================================================

/// Typed metric payload.
///
/// # Invariants
/// - Arrays are homogeneous; mixed arrays decode to [`MetricValue::Unsupported`].
/// - `Unsupported` never formats successfully.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum MetricValue {
    /// Absent value.
    #[default]
    Null,
    /// UTF-8 string.
    String(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Double precision float.
    Float(f64),
    /// Array of strings.
    StringArray(Vec<String>),
    /// Array of signed integers.
    IntArray(Vec<i64>),
    /// Array of unsigned integers.
    UIntArray(Vec<u64>),
    /// Array of floats.
    FloatArray(Vec<f64>),
    /// Decoded value outside the supported kinds.
    Unsupported {
        /// Name of the decoded kind.
        type_name: String,
    },
}

impl MetricValue {
    /// Builds an unsupported value for the named kind.
    #[must_use]
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
        }
    }

    /// Returns the kind name used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Null => "nil",
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::StringArray(_) => "[]string",
            Self::IntArray(_) => "[]int",
            Self::UIntArray(_) => "[]uint",
            Self::FloatArray(_) => "[]float",
            Self::Unsupported {
                type_name,
            } => type_name,
        }
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for MetricValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringArray(value)
    }
}

impl From<Vec<i64>> for MetricValue {
    fn from(value: Vec<i64>) -> Self {
        Self::IntArray(value)
    }
}

impl From<Vec<u64>> for MetricValue {
    fn from(value: Vec<u64>) -> Self {
        Self::UIntArray(value)
    }
}

impl From<Vec<f64>> for MetricValue {
    fn from(value: Vec<f64>) -> Self {
        Self::FloatArray(value)
    }
}

// ============================================================================
// SECTION: Metric Records
// ============================================================================

/// One decoded observation.
///
/// # Invariants
/// - `namespace` order is significant and preserved into the row key.
/// - Records are read-only once decoded; the publisher never mutates them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricRecord {
    /// Ordered namespace segments.
    pub namespace: Vec<String>,
    /// Observation time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Observed value.
    #[serde(default, rename = "data")]
    pub value: MetricValue,
}

impl MetricRecord {
    /// Creates a record without tags.
    #[must_use]
    pub fn new<S: Into<String>>(
        namespace: impl IntoIterator<Item = S>,
        timestamp: OffsetDateTime,
        value: impl Into<MetricValue>,
    ) -> Self {
        Self {
            namespace: namespace.into_iter().map(Into::into).collect(),
            timestamp,
            tags: BTreeMap::new(),
            value: value.into(),
        }
    }

    /// Returns the record with an additional tag.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Returns the originating host, or an empty string when untagged.
    #[must_use]
    pub fn source(&self) -> &str {
        self.tags.get(RUNNING_ON_TAG).map_or("", String::as_str)
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Persisted row derived from a [`MetricRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRow {
    /// RFC 3339 observation time.
    pub timestamp: String,
    /// Originating host.
    pub source: String,
    /// Joined namespace.
    pub key: String,
    /// Formatted value.
    pub value: String,
}
