// crates/mysql-publisher-config/src/loader.rs
// ============================================================================
// Module: Config Loading
// Description: TOML config files and environment overrides.
// Purpose: Build a config map outside a plugin host.
// Dependencies: crate::{config, policy}, toml, tracing
// ============================================================================

//! ## Overview
//! A config file is a flat TOML document of scalar keys, e.g.
//! `hostname = "db.internal"`. Ruled keys can be overridden from the
//! environment as `MYSQL_PUBLISHER_<KEY>`. Lookups are injected so callers
//! and tests control the environment source.
//! Security posture: config files are untrusted and size-limited.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::config::ConfigError;
use crate::config::ConfigMap;
use crate::config::ConfigValue;
use crate::policy::ConfigPolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "MYSQL_PUBLISHER_CONFIG";
/// Prefix of per-key environment overrides.
pub const ENV_OVERRIDE_PREFIX: &str = "MYSQL_PUBLISHER_";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;

// ============================================================================
// SECTION: Files
// ============================================================================

/// Resolves the config path from an explicit path or [`CONFIG_ENV_VAR`].
#[must_use]
pub fn resolve_config_path(
    explicit: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| lookup(CONFIG_ENV_VAR).map(PathBuf::from))
}

/// Loads a TOML config file into a config map.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, exceeds
/// [`MAX_CONFIG_FILE_SIZE`], is not UTF-8, or does not parse.
pub fn load_config_file(path: &Path) -> Result<ConfigMap, ConfigError> {
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    let config = parse_config_toml(content)?;
    debug!(path = %path.display(), keys = config.len(), "config file loaded");
    Ok(config)
}

/// Parses a flat TOML document into a config map.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for invalid TOML and
/// [`ConfigError::Invalid`] for non-scalar values.
pub fn parse_config_toml(content: &str) -> Result<ConfigMap, ConfigError> {
    let table: toml::Table =
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(value) => ConfigValue::Str(value),
                toml::Value::Integer(value) => ConfigValue::Int(value),
                toml::Value::Float(value) => ConfigValue::Float(value),
                toml::Value::Boolean(value) => ConfigValue::Bool(value),
                toml::Value::Datetime(_) | toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(ConfigError::Invalid(format!(
                        "config key '{key}' must be a string, integer, float, or bool"
                    )));
                }
            };
            Ok((key, value))
        })
        .collect()
}

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Returns the environment variable overriding a rule key.
#[must_use]
pub fn env_override_name(key: &str) -> String {
    format!("{ENV_OVERRIDE_PREFIX}{}", key.to_ascii_uppercase())
}

/// Overlays `MYSQL_PUBLISHER_<KEY>` values for every ruled key.
///
/// Returns the keys that were overridden.
pub fn apply_env_overrides(
    config: &mut ConfigMap,
    policy: &ConfigPolicy,
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<String> {
    let mut overridden = Vec::new();
    for rule in policy.rules() {
        if let Some(value) = lookup(&env_override_name(rule.key())) {
            config.insert(rule.key().to_string(), ConfigValue::Str(value));
            overridden.push(rule.key().to_string());
        }
    }
    if !overridden.is_empty() {
        debug!(keys = %overridden.join(","), "config overridden from environment");
    }
    overridden
}
