// crates/mysql-publisher-core/src/runtime/publisher.rs
// ============================================================================
// Module: Publisher
// Description: Connection bootstrap and per-batch row insertion.
// Purpose: Persist decoded metric batches into a relational table.
// Dependencies: crate::core, crate::interfaces, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`Publisher`] owns at most one datastore connection and the prepared
//! insert statement derived from it. The connection is bootstrapped lazily
//! (open, ping, select or create database, create table, prepare insert) and
//! reused across calls while the resolved configuration is unchanged and the
//! connection still answers a ping.
//!
//! Invariants:
//! - A failed bootstrap closes the partial connection and leaves the
//!   publisher reusable; the next call bootstraps from scratch.
//! - Rows are inserted one statement at a time in batch order. A failure stops
//!   the batch; rows already inserted stay committed.
//! - A failed insert invalidates the connection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::mem;

use thiserror::Error;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::core::MetricRecord;
use crate::core::MetricRow;
use crate::core::PublishConfig;
use crate::interfaces::Datastore;
use crate::interfaces::DatastoreConnection;
use crate::interfaces::DatastoreError;
use crate::runtime::decode::BatchError;
use crate::runtime::decode::decode_batch;
use crate::runtime::format::FormatError;
use crate::runtime::format::format_namespace;
use crate::runtime::format::format_timestamp;
use crate::runtime::format::format_value;
use crate::runtime::schema::create_database_sql;
use crate::runtime::schema::create_table_sql;
use crate::runtime::schema::insert_sql;
use crate::runtime::schema::use_database_sql;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Bootstrap steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStage {
    /// Opening the connection.
    Open,
    /// Verifying liveness.
    Ping,
    /// Selecting the destination database.
    SelectDatabase,
    /// Creating the missing destination database.
    CreateDatabase,
    /// Creating the destination table.
    CreateTable,
    /// Preparing the insert statement.
    PrepareInsert,
}

impl BootstrapStage {
    /// Returns a stable label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Ping => "ping",
            Self::SelectDatabase => "select_database",
            Self::CreateDatabase => "create_database",
            Self::CreateTable => "create_table",
            Self::PrepareInsert => "prepare_insert",
        }
    }
}

impl fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publish pipeline errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `index` fields are zero-based positions in the decoded batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// Payload encoding is not recognized; nothing was processed.
    #[error("unknown content type '{content_type}'")]
    UnsupportedContentType {
        /// Rejected content type.
        content_type: String,
    },
    /// Payload could not be decoded; nothing was inserted.
    #[error("batch decode failed: {0}")]
    Decode(String),
    /// Connection or schema bootstrap failed.
    #[error("bootstrap failed at {stage}: {message}")]
    Bootstrap {
        /// Failing step.
        stage: BootstrapStage,
        /// Datastore message.
        message: String,
    },
    /// A record value could not be formatted.
    #[error("record {index}: {source}")]
    Format {
        /// Position of the failing record.
        index: usize,
        /// Formatter error.
        source: FormatError,
    },
    /// A row could not be persisted.
    #[error("insert failed at record {index}: {message}")]
    Insert {
        /// Position of the failing record.
        index: usize,
        /// Datastore message.
        message: String,
    },
}

impl From<BatchError> for PublishError {
    fn from(error: BatchError) -> Self {
        match error {
            BatchError::UnsupportedContentType(content_type) => Self::UnsupportedContentType {
                content_type,
            },
            BatchError::TooLarge {
                ..
            }
            | BatchError::Malformed(_) => Self::Decode(error.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Status
// ============================================================================

/// Observable connection state of a [`Publisher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherStatus {
    /// No connection is open.
    Unbootstrapped,
    /// Connection and insert statement are usable.
    Ready,
    /// The last bootstrap failed at the given step.
    Failed(BootstrapStage),
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    /// Number of rows inserted.
    pub rows_inserted: usize,
}

/// Connection and statement derived from one configuration.
struct ReadyConnection<C: DatastoreConnection> {
    /// Open connection with the destination database selected.
    connection: C,
    /// Prepared insert against the destination table.
    insert: C::Statement,
    /// Configuration the connection was built for.
    config: PublishConfig,
}

/// Internal connection state.
enum ConnectionState<C: DatastoreConnection> {
    /// No connection.
    Unbootstrapped,
    /// Usable connection.
    Ready(ReadyConnection<C>),
    /// Last bootstrap failed.
    Failed(BootstrapStage),
}

/// Bootstrap step failure.
struct BootstrapFailure {
    /// Failing step.
    stage: BootstrapStage,
    /// Datastore error.
    error: DatastoreError,
}

impl BootstrapFailure {
    /// Returns a closure tagging a datastore error with a stage.
    fn at(stage: BootstrapStage) -> impl FnOnce(DatastoreError) -> Self {
        move |error| Self {
            stage,
            error,
        }
    }
}

// ============================================================================
// SECTION: Publisher
// ============================================================================

/// Publishes metric batches into a relational table.
pub struct Publisher<D: Datastore> {
    /// Backend used to open connections.
    datastore: D,
    /// Current connection state.
    state: ConnectionState<D::Connection>,
}

impl<D: Datastore> Publisher<D> {
    /// Creates an unbootstrapped publisher.
    #[must_use]
    pub const fn new(datastore: D) -> Self {
        Self {
            datastore,
            state: ConnectionState::Unbootstrapped,
        }
    }

    /// Returns the backend.
    #[must_use]
    pub const fn datastore(&self) -> &D {
        &self.datastore
    }

    /// Returns the current connection state.
    #[must_use]
    pub const fn status(&self) -> PublisherStatus {
        match &self.state {
            ConnectionState::Unbootstrapped => PublisherStatus::Unbootstrapped,
            ConnectionState::Ready(_) => PublisherStatus::Ready,
            ConnectionState::Failed(stage) => PublisherStatus::Failed(*stage),
        }
    }

    /// Bootstraps the connection for `config` unless already ready for it.
    ///
    /// Idempotent: when ready for an equal configuration the only datastore
    /// call is a liveness ping, and a connection that fails it is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Bootstrap`] when any bootstrap step fails.
    pub fn ensure_ready(&mut self, config: &PublishConfig) -> Result<(), PublishError> {
        let ready = self.take_ready(config)?;
        self.state = ConnectionState::Ready(ready);
        Ok(())
    }

    /// Decodes and publishes one batch payload.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] for unknown encodings, undecodable payloads,
    /// bootstrap failures, and the first record that fails to format or insert.
    pub fn publish(
        &mut self,
        content_type: &str,
        payload: &[u8],
        config: &PublishConfig,
    ) -> Result<PublishReport, PublishError> {
        info!(content_type, payload_bytes = payload.len(), "publishing started");
        let records = decode_batch(content_type, payload).map_err(|err| {
            error!(error = %err, "cannot decode batch");
            PublishError::from(err)
        })?;
        self.publish_records(&records, config)
    }

    /// Publishes already decoded records.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] for bootstrap failures and the first record that
    /// fails to format or insert.
    pub fn publish_records(
        &mut self,
        records: &[MetricRecord],
        config: &PublishConfig,
    ) -> Result<PublishReport, PublishError> {
        let mut ready = self.take_ready(config)?;
        match insert_rows(&mut ready, records) {
            Ok(rows_inserted) => {
                self.state = ConnectionState::Ready(ready);
                info!(rows_inserted, table = %config.table_name, "publishing finished");
                Ok(PublishReport {
                    rows_inserted,
                })
            }
            Err(err @ PublishError::Insert {
                ..
            }) => {
                error!(error = %err, "cannot publish metric, dropping connection");
                ready.connection.close();
                Err(err)
            }
            Err(err) => {
                error!(error = %err, "cannot format record");
                self.state = ConnectionState::Ready(ready);
                Err(err)
            }
        }
    }

    /// Closes any open connection.
    pub fn close(&mut self) {
        if let ConnectionState::Ready(ready) =
            mem::replace(&mut self.state, ConnectionState::Unbootstrapped)
        {
            ready.connection.close();
        }
    }

    /// Takes a ready connection for `config`, bootstrapping when needed.
    ///
    /// Leaves the state unbootstrapped on success; the caller puts the
    /// connection back once it is done with it.
    fn take_ready(
        &mut self,
        config: &PublishConfig,
    ) -> Result<ReadyConnection<D::Connection>, PublishError> {
        match mem::replace(&mut self.state, ConnectionState::Unbootstrapped) {
            ConnectionState::Ready(mut ready) if ready.config == *config => {
                match ready.connection.ping() {
                    Ok(()) => return Ok(ready),
                    Err(err) => {
                        warn!(error = %err, "ready connection failed ping, re-bootstrapping");
                        ready.connection.close();
                    }
                }
            }
            ConnectionState::Ready(stale) => {
                warn!("publish configuration changed, re-bootstrapping connection");
                stale.connection.close();
            }
            ConnectionState::Unbootstrapped | ConnectionState::Failed(_) => {}
        }
        match bootstrap(&self.datastore, config) {
            Ok(ready) => {
                info!(
                    server = %config.target(),
                    database = %config.database,
                    table = %config.table_name,
                    "datastore bootstrap complete"
                );
                Ok(ready)
            }
            Err(failure) => {
                error!(
                    stage = %failure.stage,
                    error = %failure.error,
                    server = %config.target(),
                    "datastore bootstrap failed"
                );
                self.state = ConnectionState::Failed(failure.stage);
                Err(PublishError::Bootstrap {
                    stage: failure.stage,
                    message: failure.error.to_string(),
                })
            }
        }
    }
}

impl<D: Datastore> Drop for Publisher<D> {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Builds the persisted row for a record.
///
/// # Errors
///
/// Returns [`FormatError`] when the value or timestamp cannot be rendered.
pub fn build_row(record: &MetricRecord) -> Result<MetricRow, FormatError> {
    Ok(MetricRow {
        timestamp: format_timestamp(record.timestamp)?,
        source: record.source().to_string(),
        key: format_namespace(&record.namespace),
        value: format_value(&record.value)?,
    })
}

/// Inserts every record in order, stopping at the first failure.
fn insert_rows<C: DatastoreConnection>(
    ready: &mut ReadyConnection<C>,
    records: &[MetricRecord],
) -> Result<usize, PublishError> {
    for (index, record) in records.iter().enumerate() {
        let row = build_row(record).map_err(|source| PublishError::Format {
            index,
            source,
        })?;
        ready.connection.exec(&ready.insert, &row).map_err(|err| PublishError::Insert {
            index,
            message: err.to_string(),
        })?;
        debug!(index, key = %row.key, kind = record.value.kind(), "row inserted");
    }
    Ok(records.len())
}

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

/// Opens a connection and prepares the destination schema.
fn bootstrap<D: Datastore>(
    datastore: &D,
    config: &PublishConfig,
) -> Result<ReadyConnection<D::Connection>, BootstrapFailure> {
    let mut connection =
        datastore.open(&config.target()).map_err(BootstrapFailure::at(BootstrapStage::Open))?;
    match prepare_schema(&mut connection, config) {
        Ok(insert) => Ok(ReadyConnection {
            connection,
            insert,
            config: config.clone(),
        }),
        Err(failure) => {
            connection.close();
            Err(failure)
        }
    }
}

/// Runs the post-open bootstrap steps and returns the prepared insert.
fn prepare_schema<C: DatastoreConnection>(
    connection: &mut C,
    config: &PublishConfig,
) -> Result<C::Statement, BootstrapFailure> {
    connection.ping().map_err(BootstrapFailure::at(BootstrapStage::Ping))?;
    select_or_create_database(connection, &config.database)?;
    let create_table = create_table_sql(&config.table_name);
    debug!(statement = %create_table, "ensuring table");
    connection.execute(&create_table).map_err(BootstrapFailure::at(BootstrapStage::CreateTable))?;
    connection
        .prepare(&insert_sql(&config.table_name))
        .map_err(BootstrapFailure::at(BootstrapStage::PrepareInsert))
}

/// Selects the database, creating it first when selection fails.
fn select_or_create_database<C: DatastoreConnection>(
    connection: &mut C,
    database: &str,
) -> Result<(), BootstrapFailure> {
    let use_database = use_database_sql(database);
    let Err(first) = connection.execute(&use_database) else {
        return Ok(());
    };
    warn!(database, error = %first, "database not selectable, creating it");
    connection
        .execute(&create_database_sql(database))
        .map_err(BootstrapFailure::at(BootstrapStage::CreateDatabase))?;
    connection.execute(&use_database).map_err(BootstrapFailure::at(BootstrapStage::SelectDatabase))
}
