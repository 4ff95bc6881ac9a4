// crates/mysql-publisher-config/src/policy.rs
// ============================================================================
// Module: Config Policy
// Description: Declarative string rules with defaults and required flags.
// Purpose: Validate and complete the host-supplied configuration map.
// Dependencies: crate::config, mysql-publisher-core, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ConfigPolicy`] is an ordered set of [`StringRule`]s. Processing a map
//! fills in defaults for absent keys, rejects absent required keys, and
//! rejects non-string values for ruled keys. Keys without a rule pass through
//! untouched. Rule construction is fallible and never panics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mysql_publisher_core::DEFAULT_DATABASE;
use mysql_publisher_core::DEFAULT_HOSTNAME;
use mysql_publisher_core::DEFAULT_PASSWORD;
use mysql_publisher_core::DEFAULT_PORT;
use mysql_publisher_core::DEFAULT_TABLE_NAME;
use mysql_publisher_core::DEFAULT_USERNAME;
use serde::Serialize;

use crate::config::ConfigError;
use crate::config::ConfigMap;
use crate::config::ConfigValue;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Login user key.
pub const USERNAME_KEY: &str = "username";
/// Login password key.
pub const PASSWORD_KEY: &str = "password";
/// Server host key.
pub const HOSTNAME_KEY: &str = "hostname";
/// Server port key.
pub const PORT_KEY: &str = "port";
/// Destination database key.
pub const DATABASE_KEY: &str = "database";
/// Destination table key.
pub const TABLE_NAME_KEY: &str = "tablename";

/// Maximum rule key length.
const MAX_RULE_KEY_LENGTH: usize = 128;

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Rule for one string-valued key.
///
/// # Invariants
/// - `key` is non-empty, trimmed, and at most 128 bytes.
/// - A required rule has no default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringRule {
    /// Config key.
    key: String,
    /// Whether the key must be supplied.
    required: bool,
    /// Value used when the key is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<String>,
    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl StringRule {
    /// Creates a string rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rule`] when the key is malformed or a required
    /// rule also declares a default.
    pub fn new(key: &str, required: bool, default: Option<&str>) -> Result<Self, ConfigError> {
        if key.is_empty() || key.trim() != key {
            return Err(ConfigError::Rule(format!("rule key '{key}' must be non-empty and trimmed")));
        }
        if key.len() > MAX_RULE_KEY_LENGTH {
            return Err(ConfigError::Rule(format!(
                "rule key exceeds {MAX_RULE_KEY_LENGTH} bytes"
            )));
        }
        if required && default.is_some() {
            return Err(ConfigError::Rule(format!(
                "rule '{key}' cannot be required and have a default"
            )));
        }
        Ok(Self {
            key: key.to_string(),
            required,
            default: default.map(str::to_string),
            description: None,
        })
    }

    /// Returns the rule with help text attached.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the config key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns whether the key must be supplied.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Returns the default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns the help text.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Ordered set of config rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigPolicy {
    /// Rules in registration order.
    rules: Vec<StringRule>,
}

impl ConfigPolicy {
    /// Creates an empty policy.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: Vec::new(),
        }
    }

    /// Registers a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Rule`] when a rule for the key already exists.
    pub fn add(&mut self, rule: StringRule) -> Result<(), ConfigError> {
        if self.get(rule.key()).is_some() {
            return Err(ConfigError::Rule(format!("duplicate rule for key '{}'", rule.key())));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Returns the rules in registration order.
    #[must_use]
    pub fn rules(&self) -> &[StringRule] {
        &self.rules
    }

    /// Returns the rule for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StringRule> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    /// Validates a config map and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] for absent required keys and
    /// [`ConfigError::TypeMismatch`] for non-string values under a rule.
    pub fn process(&self, config: &ConfigMap) -> Result<ConfigMap, ConfigError> {
        let mut processed = config.clone();
        for rule in &self.rules {
            match config.get(rule.key()) {
                Some(ConfigValue::Str(_)) => {}
                Some(other) => {
                    return Err(ConfigError::TypeMismatch {
                        key: rule.key.clone(),
                        expected: "string",
                        actual: other.kind(),
                    });
                }
                None => match &rule.default {
                    Some(default) => {
                        processed.insert(rule.key.clone(), ConfigValue::Str(default.clone()));
                    }
                    None if rule.required => {
                        return Err(ConfigError::MissingRequired {
                            key: rule.key.clone(),
                        });
                    }
                    None => {}
                },
            }
        }
        Ok(processed)
    }

    /// Renders the policy as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}

/// Builds the publisher's config policy.
///
/// # Errors
///
/// Returns [`ConfigError::Rule`] if a built-in rule is malformed.
pub fn publisher_config_policy() -> Result<ConfigPolicy, ConfigError> {
    let port = DEFAULT_PORT.to_string();
    let rules = [
        (USERNAME_KEY, DEFAULT_USERNAME, "MySQL login user"),
        (PASSWORD_KEY, DEFAULT_PASSWORD, "MySQL login password"),
        (HOSTNAME_KEY, DEFAULT_HOSTNAME, "MySQL server host"),
        (PORT_KEY, port.as_str(), "MySQL server TCP port"),
        (DATABASE_KEY, DEFAULT_DATABASE, "Destination database, created when absent"),
        (TABLE_NAME_KEY, DEFAULT_TABLE_NAME, "Destination table, created when absent"),
    ];
    let mut policy = ConfigPolicy::new();
    for (key, default, description) in rules {
        policy.add(StringRule::new(key, false, Some(default))?.with_description(description))?;
    }
    Ok(policy)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
