// crates/mysql-publisher-store-mysql/src/store.rs
// ============================================================================
// Module: MySQL Datastore
// Description: Datastore adapter over a blocking MySQL client connection.
// Purpose: Run bootstrap DDL and prepared row inserts against a MySQL server.
// Dependencies: mysql, mysql-publisher-core, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`MysqlDatastore`] opens one TCP connection per [`Datastore::open`] call
//! with no database selected; the publisher selects or creates the database
//! itself. Socket upgrades are disabled so the connection always targets the
//! configured host and port. Timeouts bound every network wait.
//! Security posture: server responses are untrusted; credentials never appear
//! in errors or logs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use mysql::Conn;
use mysql::DriverError;
use mysql::Opts;
use mysql::OptsBuilder;
use mysql::Statement;
use mysql::prelude::Queryable;
use mysql_publisher_core::ConnectionTarget;
use mysql_publisher_core::Datastore;
use mysql_publisher_core::DatastoreConnection;
use mysql_publisher_core::DatastoreError;
use mysql_publisher_core::MetricRow;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default TCP connect timeout (ms).
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// Default socket read timeout (ms).
const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;
/// Default socket write timeout (ms).
const DEFAULT_WRITE_TIMEOUT_MS: u64 = 30_000;
/// Statement used as the liveness probe.
const PING_SQL: &str = "SELECT 1";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Client-side options for MySQL connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MysqlDatastoreOptions {
    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Socket read timeout in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Socket write timeout in milliseconds.
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

impl Default for MysqlDatastoreOptions {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
        }
    }
}

impl MysqlDatastoreOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`MysqlStoreError::Invalid`] when a timeout is zero.
    pub fn validate(&self) -> Result<(), MysqlStoreError> {
        let timeouts = [
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("read_timeout_ms", self.read_timeout_ms),
            ("write_timeout_ms", self.write_timeout_ms),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(MysqlStoreError::Invalid(format!("{name} must be greater than zero")));
            }
        }
        Ok(())
    }
}

/// Returns the default connect timeout.
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Returns the default read timeout.
const fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

/// Returns the default write timeout.
const fn default_write_timeout_ms() -> u64 {
    DEFAULT_WRITE_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// MySQL store setup errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MysqlStoreError {
    /// Options failed validation.
    #[error("mysql store invalid options: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Datastore
// ============================================================================

/// Datastore backed by a MySQL server.
#[derive(Debug, Clone, Default)]
pub struct MysqlDatastore {
    /// Client-side connection options.
    options: MysqlDatastoreOptions,
}

impl MysqlDatastore {
    /// Creates a datastore with validated options.
    ///
    /// # Errors
    ///
    /// Returns [`MysqlStoreError`] when the options are invalid.
    pub fn new(options: MysqlDatastoreOptions) -> Result<Self, MysqlStoreError> {
        options.validate()?;
        Ok(Self {
            options,
        })
    }

    /// Returns the client-side options.
    #[must_use]
    pub const fn options(&self) -> &MysqlDatastoreOptions {
        &self.options
    }

    /// Builds client options for a target.
    #[must_use]
    pub fn client_opts(&self, target: &ConnectionTarget) -> Opts {
        OptsBuilder::new()
            .ip_or_hostname(Some(target.hostname.as_str()))
            .tcp_port(target.port)
            .user(Some(target.username.as_str()))
            .pass(Some(target.password.as_str()))
            .prefer_socket(false)
            .tcp_connect_timeout(Some(Duration::from_millis(self.options.connect_timeout_ms)))
            .read_timeout(Some(Duration::from_millis(self.options.read_timeout_ms)))
            .write_timeout(Some(Duration::from_millis(self.options.write_timeout_ms)))
            .into()
    }
}

impl Datastore for MysqlDatastore {
    type Connection = MysqlConnection;

    fn open(&self, target: &ConnectionTarget) -> Result<Self::Connection, DatastoreError> {
        debug!(server = %target, "opening mysql connection");
        let conn = Conn::new(self.client_opts(target)).map_err(|err| {
            DatastoreError::Connection(format!("cannot open connection to {target}: {err}"))
        })?;
        Ok(MysqlConnection {
            conn,
        })
    }
}

// ============================================================================
// SECTION: Connection
// ============================================================================

/// Open MySQL connection.
pub struct MysqlConnection {
    /// Client connection.
    conn: Conn,
}

impl DatastoreConnection for MysqlConnection {
    type Statement = Statement;

    fn ping(&mut self) -> Result<(), DatastoreError> {
        self.conn.query_drop(PING_SQL).map_err(|err| map_error(&err))
    }

    fn execute(&mut self, statement: &str) -> Result<(), DatastoreError> {
        self.conn.query_drop(statement).map_err(|err| map_error(&err))
    }

    fn prepare(&mut self, statement: &str) -> Result<Self::Statement, DatastoreError> {
        self.conn.prep(statement).map_err(|err| map_error(&err))
    }

    fn exec(&mut self, statement: &Self::Statement, row: &MetricRow) -> Result<(), DatastoreError> {
        let params =
            (row.timestamp.clone(), row.source.clone(), row.key.clone(), row.value.clone());
        self.conn.exec_drop(statement, params).map_err(|err| map_error(&err))
    }

    fn close(self) {
        debug!(connection_id = self.conn.connection_id(), "closing mysql connection");
        drop(self.conn);
    }
}

/// Maps a client error onto the datastore taxonomy.
fn map_error(error: &mysql::Error) -> DatastoreError {
    match error {
        mysql::Error::MySqlError(_) => DatastoreError::Statement(error.to_string()),
        mysql::Error::DriverError(DriverError::ConnectionClosed) => {
            DatastoreError::Closed(error.to_string())
        }
        _ => DatastoreError::Connection(error.to_string()),
    }
}
