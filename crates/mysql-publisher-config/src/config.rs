// crates/mysql-publisher-config/src/config.rs
// ============================================================================
// Module: Config Values
// Description: Host-supplied configuration values and config errors.
// Purpose: Model the untyped key-value map the host hands to the plugin.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The host delivers configuration as a flat map of scalar values. Values are
//! typed loosely here and narrowed by the config policy and resolver.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Values
// ============================================================================

/// One scalar configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// String value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl ConfigValue {
    /// Returns the kind name used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
        }
    }

    /// Returns the string payload, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            Self::Int(_) | Self::Float(_) | Self::Bool(_) => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Configuration keyed by rule name.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Messages name the offending key but never echo secret values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A config rule could not be constructed or registered.
    #[error("invalid config rule: {0}")]
    Rule(String),
    /// A required key was not supplied.
    #[error("missing required config key '{key}'")]
    MissingRequired {
        /// Missing key.
        key: String,
    },
    /// A key was supplied with the wrong value kind.
    #[error("config key '{key}' must be a {expected}, got {actual}")]
    TypeMismatch {
        /// Offending key.
        key: String,
        /// Expected kind.
        expected: &'static str,
        /// Supplied kind.
        actual: &'static str,
    },
    /// A value failed semantic validation.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
}
