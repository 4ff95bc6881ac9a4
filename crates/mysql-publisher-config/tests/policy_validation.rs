//! Config policy tests for mysql-publisher-config.
// crates/mysql-publisher-config/tests/policy_validation.rs
// =============================================================================
// Module: Config Policy Tests
// Description: Rule construction, defaults, and required-key enforcement.
// Purpose: Ensure host config maps are completed and validated fail-closed.
// =============================================================================

use mysql_publisher_config::ConfigError;
use mysql_publisher_config::ConfigMap;
use mysql_publisher_config::ConfigPolicy;
use mysql_publisher_config::ConfigValue;
use mysql_publisher_config::StringRule;
use mysql_publisher_config::publisher_config_policy;

type TestResult = Result<(), String>;

fn expect_err<T>(result: Result<T, ConfigError>, expected: &ConfigError) -> TestResult {
    match result {
        Err(error) if &error == expected => Ok(()),
        Err(error) => Err(format!("unexpected error: {error}")),
        Ok(_) => Err("expected config error".to_string()),
    }
}

#[test]
fn publisher_policy_fills_all_defaults() -> TestResult {
    let policy = publisher_config_policy().map_err(|err| err.to_string())?;
    let processed = policy.process(&ConfigMap::new()).map_err(|err| err.to_string())?;
    let expected = [
        ("username", "root"),
        ("password", "root"),
        ("hostname", "localhost"),
        ("port", "3306"),
        ("database", "SNAP_TEST"),
        ("tablename", "info"),
    ];
    for (key, value) in expected {
        if processed.get(key) != Some(&ConfigValue::from(value)) {
            return Err(format!("default for {key} was not applied"));
        }
    }
    if processed.len() != expected.len() {
        return Err("unexpected extra keys".to_string());
    }
    Ok(())
}

#[test]
fn supplied_values_win_over_defaults() -> TestResult {
    let policy = publisher_config_policy().map_err(|err| err.to_string())?;
    let mut config = ConfigMap::new();
    config.insert("hostname".to_string(), ConfigValue::from("db.internal"));
    let processed = policy.process(&config).map_err(|err| err.to_string())?;
    if processed.get("hostname") != Some(&ConfigValue::from("db.internal")) {
        return Err("supplied hostname was replaced".to_string());
    }
    Ok(())
}

#[test]
fn unknown_keys_pass_through() -> TestResult {
    let policy = publisher_config_policy().map_err(|err| err.to_string())?;
    let mut config = ConfigMap::new();
    config.insert("batch_hint".to_string(), ConfigValue::Int(5));
    let processed = policy.process(&config).map_err(|err| err.to_string())?;
    if processed.get("batch_hint") != Some(&ConfigValue::Int(5)) {
        return Err("unknown key was dropped".to_string());
    }
    Ok(())
}

#[test]
fn non_string_values_are_rejected() -> TestResult {
    let policy = publisher_config_policy().map_err(|err| err.to_string())?;
    let mut config = ConfigMap::new();
    config.insert("port".to_string(), ConfigValue::Int(3306));
    expect_err(
        policy.process(&config),
        &ConfigError::TypeMismatch {
            key: "port".to_string(),
            expected: "string",
            actual: "integer",
        },
    )
}

#[test]
fn missing_required_key_is_rejected() -> TestResult {
    let mut policy = ConfigPolicy::new();
    let rule = StringRule::new("token", true, None).map_err(|err| err.to_string())?;
    policy.add(rule).map_err(|err| err.to_string())?;
    expect_err(
        policy.process(&ConfigMap::new()),
        &ConfigError::MissingRequired {
            key: "token".to_string(),
        },
    )
}

#[test]
fn optional_rule_without_default_stays_absent() -> TestResult {
    let mut policy = ConfigPolicy::new();
    let rule = StringRule::new("note", false, None).map_err(|err| err.to_string())?;
    policy.add(rule).map_err(|err| err.to_string())?;
    let processed = policy.process(&ConfigMap::new()).map_err(|err| err.to_string())?;
    if processed.contains_key("note") {
        return Err("optional key without default was filled".to_string());
    }
    Ok(())
}

#[test]
fn malformed_rules_are_rejected() -> TestResult {
    for key in ["", " port", "port "] {
        if StringRule::new(key, false, None).is_ok() {
            return Err(format!("rule key '{key}' was accepted"));
        }
    }
    if StringRule::new(&"k".repeat(129), false, None).is_ok() {
        return Err("overlong rule key was accepted".to_string());
    }
    match StringRule::new("port", true, Some("3306")) {
        Err(ConfigError::Rule(_)) => Ok(()),
        other => Err(format!("required rule with default was not rejected: {}", other.is_ok())),
    }
}

#[test]
fn duplicate_rules_are_rejected() -> TestResult {
    let mut policy = publisher_config_policy().map_err(|err| err.to_string())?;
    let rule = StringRule::new("port", false, Some("1")).map_err(|err| err.to_string())?;
    match policy.add(rule) {
        Err(ConfigError::Rule(message)) if message.contains("port") => Ok(()),
        Err(error) => Err(format!("unexpected error: {error}")),
        Ok(()) => Err("duplicate rule accepted".to_string()),
    }
}

#[test]
fn policy_serializes_rules_in_order() -> TestResult {
    let policy = publisher_config_policy().map_err(|err| err.to_string())?;
    let json = policy.to_json().map_err(|err| err.to_string())?;
    let value: serde_json::Value = serde_json::from_str(&json).map_err(|err| err.to_string())?;
    let keys: Vec<&str> = value
        .as_array()
        .ok_or("policy json is not an array")?
        .iter()
        .filter_map(|rule| rule.get("key").and_then(serde_json::Value::as_str))
        .collect();
    if keys != ["username", "password", "hostname", "port", "database", "tablename"] {
        return Err(format!("unexpected key order: {}", keys.join(",")));
    }
    if value[3]["default"] != "3306" || value[3]["required"] != false {
        return Err("port rule serialized incorrectly".to_string());
    }
    Ok(())
}
