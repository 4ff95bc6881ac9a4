// system-tests/tests/support/mod.rs
// ============================================================================
// Module: MySQL Fixture
// Description: Live MySQL server provisioning for system tests.
// Purpose: Provide a reachable server via env configuration or a container.
// Dependencies: mysql, system-tests, testcontainers
// ============================================================================

//! ## Overview
//! [`MysqlFixture`] targets the server named by `MYSQL_PUBLISHER_SYSTEM_HOST`
//! when set, and otherwise starts a disposable `mysql` container that lives as
//! long as the fixture.

use std::thread;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use mysql::Conn;
use mysql::Opts;
use mysql::OptsBuilder;
use mysql::prelude::Queryable;
use mysql_publisher::ConfigMap;
use mysql_publisher::ConfigValue;
use system_tests::config::ExternalMysql;
use system_tests::config::SystemTestConfig;
use testcontainers::Container;
use testcontainers::GenericImage;
use testcontainers::ImageExt;
use testcontainers::core::IntoContainerPort;
use testcontainers::core::WaitFor;
use testcontainers::runners::SyncRunner;

/// Container root password.
const CONTAINER_PASSWORD: &str = "root";
/// Attempts made while waiting for the server to accept logins.
const READY_ATTEMPTS: u32 = 90;
/// Delay between readiness attempts.
const READY_DELAY: Duration = Duration::from_secs(1);

/// Row as stored in the destination table.
pub type StoredRow = (String, String, String, String);

/// Reachable MySQL server for one test.
pub struct MysqlFixture {
    /// Login details for the server.
    server: ExternalMysql,
    /// Container kept alive for the fixture lifetime.
    _container: Option<Container<GenericImage>>,
}

impl MysqlFixture {
    /// Connects to the configured server or starts a container.
    pub fn start() -> Result<Self, String> {
        let config = SystemTestConfig::load()?;
        let fixture = match config.external {
            Some(server) => Self {
                server,
                _container: None,
            },
            None => Self::start_container(&config.image_tag)?,
        };
        fixture.wait_until_ready()?;
        Ok(fixture)
    }

    /// Starts a `mysql` container and maps its port.
    fn start_container(image_tag: &str) -> Result<Self, String> {
        ensure_docker_available()?;
        let container = GenericImage::new("mysql", image_tag)
            .with_exposed_port(3306.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_ROOT_PASSWORD", CONTAINER_PASSWORD)
            .start()
            .map_err(|err| format!("failed to start mysql container: {err}"))?;
        let port = container
            .get_host_port_ipv4(3306.tcp())
            .map_err(|err| format!("failed to resolve mysql port: {err}"))?;
        Ok(Self {
            server: ExternalMysql {
                host: "127.0.0.1".to_string(),
                port,
                user: "root".to_string(),
                password: CONTAINER_PASSWORD.to_string(),
            },
            _container: Some(container),
        })
    }

    /// Retries logins until the server accepts one.
    fn wait_until_ready(&self) -> Result<(), String> {
        let mut last_error = String::new();
        for _ in 0 .. READY_ATTEMPTS {
            match Conn::new(self.opts()) {
                Ok(_) => return Ok(()),
                Err(err) => last_error = err.to_string(),
            }
            thread::sleep(READY_DELAY);
        }
        Err(format!("mysql server never became ready: {last_error}"))
    }

    /// Client options for direct verification queries.
    fn opts(&self) -> Opts {
        OptsBuilder::new()
            .ip_or_hostname(Some(self.server.host.as_str()))
            .tcp_port(self.server.port)
            .user(Some(self.server.user.as_str()))
            .pass(Some(self.server.password.as_str()))
            .prefer_socket(false)
            .into()
    }

    /// Publisher config map pointing at this server and `database`.
    pub fn config(&self, database: &str, table: &str) -> ConfigMap {
        [
            ("host", self.server.host.clone()),
            ("port", self.server.port.to_string()),
            ("username", self.server.user.clone()),
            ("password", self.server.password.clone()),
            ("database", database.to_string()),
            ("tablename", table.to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), ConfigValue::from(value)))
        .collect()
    }

    /// Reads back every row of a table in insert order.
    pub fn rows(&self, database: &str, table: &str) -> Result<Vec<StoredRow>, String> {
        let mut conn = Conn::new(self.opts()).map_err(|err| err.to_string())?;
        conn.query(format!(
            "SELECT timestamp, source_column, key_column, value_column FROM `{database}`.`{table}`"
        ))
        .map_err(|err| err.to_string())
    }

    /// Drops a database created by a test.
    pub fn drop_database(&self, database: &str) -> Result<(), String> {
        let mut conn = Conn::new(self.opts()).map_err(|err| err.to_string())?;
        conn.query_drop(format!("DROP DATABASE IF EXISTS `{database}`")).map_err(|err| err.to_string())
    }
}

/// Returns a database name unlikely to collide with other runs.
pub fn unique_database(prefix: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_nanos());
    format!("{prefix}_{nanos}")
}

/// Fails fast when no docker daemon is reachable.
fn ensure_docker_available() -> Result<(), String> {
    let output = std::process::Command::new("docker")
        .arg("info")
        .output()
        .map_err(|err| format!("docker info failed: {err}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("docker info failed: {stderr}"));
    }
    Ok(())
}
