//! Publish config resolution tests for mysql-publisher-config.
// crates/mysql-publisher-config/tests/resolve_validation.rs
// =============================================================================
// Module: Resolution Tests
// Description: Port parsing and identifier validation.
// Purpose: Ensure only safe identifiers and valid ports reach the publisher.
// =============================================================================

use mysql_publisher_config::ConfigError;
use mysql_publisher_config::ConfigMap;
use mysql_publisher_config::ConfigValue;
use mysql_publisher_config::publisher_config_policy;
use mysql_publisher_config::resolve_publish_config;
use mysql_publisher_core::PublishConfig;

type TestResult = Result<(), String>;

fn resolve(overrides: &[(&str, &str)]) -> Result<PublishConfig, ConfigError> {
    let mut config = ConfigMap::new();
    for (key, value) in overrides {
        config.insert((*key).to_string(), ConfigValue::from(*value));
    }
    let processed = publisher_config_policy()?.process(&config)?;
    resolve_publish_config(&processed)
}

fn assert_invalid(result: Result<PublishConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn defaults_resolve_to_default_publish_config() -> TestResult {
    let config = resolve(&[]).map_err(|err| err.to_string())?;
    if config != PublishConfig::default() {
        return Err("defaults did not resolve to the default config".to_string());
    }
    Ok(())
}

#[test]
fn supplied_values_resolve() -> TestResult {
    let config = resolve(&[
        ("username", "metrics"),
        ("password", "s3cret"),
        ("hostname", "db.internal"),
        ("port", "13306"),
        ("database", "telemetry_2026"),
        ("tablename", "cpu$load"),
    ])
    .map_err(|err| err.to_string())?;
    if config.port != 13306 || config.database != "telemetry_2026" || config.table_name != "cpu$load"
    {
        return Err("supplied values were not resolved".to_string());
    }
    Ok(())
}

#[test]
fn invalid_ports_are_rejected() -> TestResult {
    for port in ["0", "65536", "-1", "mysql", ""] {
        assert_invalid(resolve(&[("port", port)]), "port must be an integer")?;
    }
    Ok(())
}

#[test]
fn unsafe_identifiers_are_rejected() -> TestResult {
    assert_invalid(resolve(&[("database", "snap; DROP DATABASE x")]), "database")?;
    assert_invalid(resolve(&[("tablename", "info`")]), "tablename")?;
    assert_invalid(resolve(&[("tablename", "")]), "1 to 64 characters")?;
    let long = "t".repeat(65);
    assert_invalid(resolve(&[("database", long.as_str())]), "1 to 64 characters")?;
    Ok(())
}

#[test]
fn reserved_and_numeric_identifiers_resolve() -> TestResult {
    for name in ["order", "select", "123", "1e5"] {
        let config =
            resolve(&[("database", name), ("tablename", name)]).map_err(|err| err.to_string())?;
        if config.database != name || config.table_name != name {
            return Err(format!("{name} was not resolved verbatim"));
        }
    }
    Ok(())
}

#[test]
fn empty_hostname_is_rejected() -> TestResult {
    assert_invalid(resolve(&[("hostname", "  ")]), "hostname must be non-empty")
}

#[test]
fn unprocessed_map_reports_missing_key() -> TestResult {
    match resolve_publish_config(&ConfigMap::new()) {
        Err(ConfigError::MissingRequired {
            ..
        }) => Ok(()),
        Err(error) => Err(format!("unexpected error: {error}")),
        Ok(_) => Err("empty map resolved".to_string()),
    }
}
