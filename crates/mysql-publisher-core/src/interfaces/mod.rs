// crates/mysql-publisher-core/src/interfaces/mod.rs
// ============================================================================
// Module: Datastore Interfaces
// Description: Backend-agnostic relational datastore contract.
// Purpose: Let the publisher drive any SQL backend through a narrow surface.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The publisher needs five things from a relational backend: open a
//! connection, check liveness, run a statement, prepare a parameterized
//! statement, and execute it with one row. Connections are owned exclusively
//! by their caller and closed explicitly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ConnectionTarget;
use crate::core::MetricRow;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Datastore errors.
///
/// # Invariants
/// - Messages never embed credentials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatastoreError {
    /// Connection could not be opened or is no longer usable.
    #[error("datastore connection error: {0}")]
    Connection(String),
    /// Statement was rejected by the backend.
    #[error("datastore statement error: {0}")]
    Statement(String),
    /// Connection was closed by the server mid-use.
    #[error("datastore connection closed: {0}")]
    Closed(String),
}

// ============================================================================
// SECTION: Datastore
// ============================================================================

/// Opens connections to a relational backend.
pub trait Datastore {
    /// Connection type produced by [`Datastore::open`].
    type Connection: DatastoreConnection;

    /// Opens a connection to the target without selecting a database.
    ///
    /// # Errors
    ///
    /// Returns [`DatastoreError`] when the backend is unreachable or rejects the login.
    fn open(&self, target: &ConnectionTarget) -> Result<Self::Connection, DatastoreError>;
}

/// An open, exclusively owned datastore connection.
pub trait DatastoreConnection {
    /// Prepared statement handle.
    type Statement;

    /// Verifies the connection is alive.
    ///
    /// # Errors
    ///
    /// Returns [`DatastoreError`] when the round trip fails.
    fn ping(&mut self) -> Result<(), DatastoreError>;

    /// Executes a statement that returns no rows.
    ///
    /// # Errors
    ///
    /// Returns [`DatastoreError`] when the backend rejects the statement.
    fn execute(&mut self, statement: &str) -> Result<(), DatastoreError>;

    /// Prepares a parameterized statement.
    ///
    /// # Errors
    ///
    /// Returns [`DatastoreError`] when the statement cannot be prepared.
    fn prepare(&mut self, statement: &str) -> Result<Self::Statement, DatastoreError>;

    /// Executes a prepared four-placeholder insert with one row.
    ///
    /// # Errors
    ///
    /// Returns [`DatastoreError`] when the row is not persisted.
    fn exec(&mut self, statement: &Self::Statement, row: &MetricRow)
    -> Result<(), DatastoreError>;

    /// Closes the connection, releasing backend resources.
    fn close(self)
    where
        Self: Sized;
}
