// crates/mysql-publisher-config/src/resolve.rs
// ============================================================================
// Module: Publish Config Resolution
// Description: Narrows a processed config map into a typed publish config.
// Purpose: Enforce port and identifier rules before any SQL is built.
// Dependencies: crate::{config, policy}, mysql-publisher-core
// ============================================================================

//! ## Overview
//! Resolution runs after [`crate::ConfigPolicy::process`], so every ruled key
//! is present. Database and table names are quoted into DDL and limited to the
//! identifier alphabet, so reserved words and numeric names are accepted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mysql_publisher_core::PublishConfig;

use crate::config::ConfigError;
use crate::config::ConfigMap;
use crate::config::ConfigValue;
use crate::policy::DATABASE_KEY;
use crate::policy::HOSTNAME_KEY;
use crate::policy::PASSWORD_KEY;
use crate::policy::PORT_KEY;
use crate::policy::TABLE_NAME_KEY;
use crate::policy::USERNAME_KEY;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum identifier length accepted by the server.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves a processed config map into a [`PublishConfig`].
///
/// # Errors
///
/// Returns [`ConfigError`] when a key is missing or mistyped, the port is not
/// a valid TCP port, or a database/table name is not a plain identifier.
pub fn resolve_publish_config(config: &ConfigMap) -> Result<PublishConfig, ConfigError> {
    let hostname = string_value(config, HOSTNAME_KEY)?;
    if hostname.trim().is_empty() {
        return Err(ConfigError::Invalid("hostname must be non-empty".to_string()));
    }
    let database = string_value(config, DATABASE_KEY)?;
    validate_identifier(DATABASE_KEY, database)?;
    let table_name = string_value(config, TABLE_NAME_KEY)?;
    validate_identifier(TABLE_NAME_KEY, table_name)?;
    Ok(PublishConfig {
        username: string_value(config, USERNAME_KEY)?.to_string(),
        password: string_value(config, PASSWORD_KEY)?.to_string(),
        hostname: hostname.to_string(),
        port: parse_port(string_value(config, PORT_KEY)?)?,
        database: database.to_string(),
        table_name: table_name.to_string(),
    })
}

/// Parses a TCP port in `1..=65535`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the text is not such a port.
pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
    match value.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::Invalid(format!(
            "port must be an integer between 1 and 65535, got '{value}'"
        ))),
    }
}

/// Validates an unquoted identifier: `[A-Za-z0-9_$]`, 1 to 64 characters.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] naming `key` when the value is rejected.
pub fn validate_identifier(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "{key} must be 1 to {MAX_IDENTIFIER_LENGTH} characters"
        )));
    }
    if !value.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$') {
        return Err(ConfigError::Invalid(format!(
            "{key} '{value}' may only contain letters, digits, '_' and '$'"
        )));
    }
    Ok(())
}

/// Reads a required string value.
fn string_value<'a>(config: &'a ConfigMap, key: &str) -> Result<&'a str, ConfigError> {
    match config.get(key) {
        Some(ConfigValue::Str(value)) => Ok(value),
        Some(other) => Err(ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: "string",
            actual: other.kind(),
        }),
        None => Err(ConfigError::MissingRequired {
            key: key.to_string(),
        }),
    }
}
