// system-tests/tests/mysql_publish.rs
// ============================================================================
// Module: MySQL Publish System Tests
// Description: End-to-end publishing against a live MySQL server.
// Purpose: Validate bootstrap, persistence, and failure reporting for real.
// Dependencies: mysql-publisher, system-tests, testcontainers
// ============================================================================

//! End-to-end publishing tests against a live MySQL server.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

mod support;

use mysql_publisher::ConfigMap;
use mysql_publisher::ConfigValue;
use mysql_publisher::MysqlDatastoreOptions;
use mysql_publisher::MysqlPublisherPlugin;
use mysql_publisher::PluginError;
use mysql_publisher::PublishError;
use mysql_publisher::PublisherStatus;
use mysql_publisher_core::BootstrapStage;
use serde_json::json;
use support::MysqlFixture;
use support::unique_database;

fn batch(values: &[serde_json::Value]) -> Vec<u8> {
    let records: Vec<serde_json::Value> = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            json!({
                "namespace": ["intel", "system", format!("m{index}")],
                "timestamp": "2026-03-01T12:30:05Z",
                "tags": {"plugin_running_on": "node-1"},
                "data": value,
            })
        })
        .collect();
    serde_json::to_vec(&records).unwrap()
}

fn plugin() -> MysqlPublisherPlugin {
    MysqlPublisherPlugin::mysql(MysqlDatastoreOptions::default()).unwrap()
}

#[test]
fn publish_creates_database_table_and_rows() {
    let fixture = MysqlFixture::start().unwrap();
    let database = unique_database("snap_create");
    let config = fixture.config(&database, "info");
    let mut plugin = plugin();

    let payload = batch(&[json!("ok"), json!(7), json!([1.5, 2.0]), json!(null)]);
    let report = plugin.publish("snap.json", &payload, &config).unwrap();
    assert_eq!(report.rows_inserted, 4);
    assert_eq!(plugin.status(), PublisherStatus::Ready);

    let rows = fixture.rows(&database, "info").unwrap();
    let values: Vec<&str> = rows.iter().map(|row| row.3.as_str()).collect();
    assert_eq!(values, ["ok", "7", "1.5, 2", "nil"]);
    assert_eq!(rows[0].0, "2026-03-01T12:30:05Z");
    assert_eq!(rows[0].1, "node-1");
    assert_eq!(rows[0].2, "intel, system, m0");

    plugin.close();
    fixture.drop_database(&database).unwrap();
}

#[test]
fn repeated_publishes_reuse_existing_schema() {
    let fixture = MysqlFixture::start().unwrap();
    let database = unique_database("snap_reuse");
    let config = fixture.config(&database, "metrics");
    let mut plugin = plugin();

    plugin.publish("snap.json", &batch(&[json!(1), json!(2)]), &config).unwrap();
    plugin.publish("snap.json", &batch(&[json!(3)]), &config).unwrap();
    plugin.close();

    // A fresh plugin must accept the existing database and table.
    let mut second = self::plugin();
    second.publish("snap.json", &batch(&[json!(4)]), &config).unwrap();
    second.close();

    let rows = fixture.rows(&database, "metrics").unwrap();
    let values: Vec<&str> = rows.iter().map(|row| row.3.as_str()).collect();
    assert_eq!(values, ["1", "2", "3", "4"]);
    fixture.drop_database(&database).unwrap();
}

#[test]
fn reserved_word_table_name_is_accepted() {
    let fixture = MysqlFixture::start().unwrap();
    let database = unique_database("snap_reserved");
    let config = fixture.config(&database, "order");
    let mut plugin = plugin();

    plugin.publish("snap.json", &batch(&[json!(1)]), &config).unwrap();
    plugin.close();

    assert_eq!(fixture.rows(&database, "order").unwrap().len(), 1);
    fixture.drop_database(&database).unwrap();
}

#[test]
fn unsupported_value_keeps_earlier_rows() {
    let fixture = MysqlFixture::start().unwrap();
    let database = unique_database("snap_partial");
    let config = fixture.config(&database, "info");
    let mut plugin = plugin();

    let payload = batch(&[json!("a"), json!("b"), json!(true), json!("d")]);
    let err = plugin.publish("snap.json", &payload, &config).unwrap_err();
    match &err {
        PluginError::Publish(PublishError::Format {
            index, ..
        }) => assert_eq!(*index, 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Unsupported type bool"));

    let rows = fixture.rows(&database, "info").unwrap();
    assert_eq!(rows.len(), 2);
    plugin.close();
    fixture.drop_database(&database).unwrap();
}

#[test]
fn wrong_password_fails_at_open() {
    let fixture = MysqlFixture::start().unwrap();
    let mut config = fixture.config("snap_denied", "info");
    config.insert("password".to_string(), ConfigValue::from("definitely-wrong"));
    let mut plugin = plugin();

    let err = plugin.publish("snap.json", &batch(&[json!(1)]), &config).unwrap_err();
    assert!(matches!(
        err,
        PluginError::Publish(PublishError::Bootstrap {
            stage: BootstrapStage::Open,
            ..
        })
    ));
    assert_eq!(plugin.status(), PublisherStatus::Failed(BootstrapStage::Open));
}

#[test]
fn unreachable_server_fails_at_open() {
    let config: ConfigMap = [("host", "127.0.0.1"), ("port", "1")]
        .into_iter()
        .map(|(key, value)| (key.to_string(), ConfigValue::from(value)))
        .collect();
    let options = MysqlDatastoreOptions {
        connect_timeout_ms: 1_000,
        ..MysqlDatastoreOptions::default()
    };
    let mut plugin = MysqlPublisherPlugin::mysql(options).unwrap();

    let err = plugin.publish("snap.json", &batch(&[json!(1)]), &config).unwrap_err();
    assert!(matches!(
        err,
        PluginError::Publish(PublishError::Bootstrap {
            stage: BootstrapStage::Open,
            ..
        })
    ));
    assert!(!err.to_string().contains("password"));
}
