// crates/mysql-publisher-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Datastore
// Description: Process-local datastore for tests.
// Purpose: Exercise the publisher in tests without a database server.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryDatastore`] understands exactly the statement shapes the
//! publisher emits and records every statement it receives. Failures can be
//! injected at each bootstrap step and at a chosen insert, and open
//! connections can be dropped server-side. Clones share state, so a test keeps
//! one handle while the publisher owns another.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::core::ConnectionTarget;
use crate::core::MetricRow;
use crate::interfaces::Datastore;
use crate::interfaces::DatastoreConnection;
use crate::interfaces::DatastoreError;

// ============================================================================
// SECTION: State
// ============================================================================

/// Tables keyed by name, each holding its rows in insert order.
type Tables = BTreeMap<String, Vec<MetricRow>>;

/// Steps at which a failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Opening a connection.
    Open,
    /// Liveness check.
    Ping,
    /// Every `USE` statement.
    SelectDatabase,
    /// `CREATE DATABASE`.
    CreateDatabase,
    /// `CREATE TABLE`.
    CreateTable,
    /// Preparing the insert.
    Prepare,
    /// The insert with this zero-based sequence number across the store.
    Insert(usize),
}

/// Shared store state.
#[derive(Debug, Default)]
struct StoreState {
    /// Databases keyed by name.
    databases: BTreeMap<String, Tables>,
    /// Every statement received, in order.
    statements: Vec<String>,
    /// Connections opened over the store lifetime.
    opened: usize,
    /// Connections not yet closed.
    active: usize,
    /// Insert executions attempted.
    inserts: usize,
    /// Injected failures.
    failures: Vec<InjectedFailure>,
    /// Bumped to invalidate every connection opened before it.
    generation: u64,
}

impl StoreState {
    /// Returns true when `failure` is injected.
    fn fails_at(&self, failure: InjectedFailure) -> bool {
        self.failures.contains(&failure)
    }

    /// Fails when the connection was opened before the last server-side drop.
    fn check_alive(&self, generation: u64) -> Result<(), DatastoreError> {
        if generation == self.generation {
            Ok(())
        } else {
            Err(DatastoreError::Closed("server closed the connection".to_string()))
        }
    }
}

// ============================================================================
// SECTION: Datastore
// ============================================================================

/// Shared-state in-memory datastore.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatastore {
    /// State shared by all clones and connections.
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryDatastore {
    /// Creates an empty datastore.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-creates a database.
    #[must_use]
    pub fn with_database(self, database: &str) -> Self {
        self.lock().databases.entry(database.to_string()).or_default();
        self
    }

    /// Injects a failure that persists until cleared.
    pub fn inject(&self, failure: InjectedFailure) {
        self.lock().failures.push(failure);
    }

    /// Drops every open connection server-side, as an idle timeout would.
    ///
    /// Existing handles fail on their next call; new connections are unaffected.
    pub fn drop_connections(&self) {
        self.lock().generation += 1;
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Returns true when the database exists.
    #[must_use]
    pub fn has_database(&self, database: &str) -> bool {
        self.lock().databases.contains_key(database)
    }

    /// Returns true when the table exists in the database.
    #[must_use]
    pub fn has_table(&self, database: &str, table: &str) -> bool {
        self.lock().databases.get(database).is_some_and(|tables| tables.contains_key(table))
    }

    /// Returns the rows stored in a table, empty when absent.
    #[must_use]
    pub fn rows(&self, database: &str, table: &str) -> Vec<MetricRow> {
        self.lock()
            .databases
            .get(database)
            .and_then(|tables| tables.get(table))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns every statement received so far.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.lock().statements.clone()
    }

    /// Returns how many connections were opened.
    #[must_use]
    pub fn opened_connections(&self) -> usize {
        self.lock().opened
    }

    /// Returns how many connections are still open.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.lock().active
    }

    /// Locks the shared state, recovering from poisoning.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Datastore for InMemoryDatastore {
    type Connection = InMemoryConnection;

    fn open(&self, target: &ConnectionTarget) -> Result<Self::Connection, DatastoreError> {
        let mut state = self.lock();
        if state.fails_at(InjectedFailure::Open) {
            return Err(DatastoreError::Connection(format!("cannot reach {target}")));
        }
        state.opened += 1;
        state.active += 1;
        let generation = state.generation;
        drop(state);
        Ok(InMemoryConnection {
            state: Arc::clone(&self.state),
            database: None,
            generation,
        })
    }
}

// ============================================================================
// SECTION: Connection
// ============================================================================

/// Prepared insert against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStatement {
    /// Database selected at prepare time.
    database: String,
    /// Destination table.
    table: String,
}

/// Connection handle into an [`InMemoryDatastore`].
#[derive(Debug)]
pub struct InMemoryConnection {
    /// Shared store state.
    state: Arc<Mutex<StoreState>>,
    /// Currently selected database.
    database: Option<String>,
    /// Store generation at open time.
    generation: u64,
}

impl InMemoryConnection {
    /// Locks the shared state, recovering from poisoning.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the selected database or a statement error.
    fn selected(&self) -> Result<String, DatastoreError> {
        self.database
            .clone()
            .ok_or_else(|| DatastoreError::Statement("no database selected".to_string()))
    }
}

impl DatastoreConnection for InMemoryConnection {
    type Statement = InMemoryStatement;

    fn ping(&mut self) -> Result<(), DatastoreError> {
        let state = self.lock();
        state.check_alive(self.generation)?;
        if state.fails_at(InjectedFailure::Ping) {
            return Err(DatastoreError::Connection("server has gone away".to_string()));
        }
        Ok(())
    }

    fn execute(&mut self, statement: &str) -> Result<(), DatastoreError> {
        let selected = self.database.clone();
        let mut state = self.lock();
        state.statements.push(statement.to_string());
        state.check_alive(self.generation)?;
        if let Some(database) = statement.strip_prefix("USE ").map(unquote) {
            if state.fails_at(InjectedFailure::SelectDatabase) {
                return Err(DatastoreError::Statement("access denied".to_string()));
            }
            if !state.databases.contains_key(&database) {
                return Err(DatastoreError::Statement(format!("unknown database '{database}'")));
            }
            drop(state);
            self.database = Some(database);
            return Ok(());
        }
        if let Some(database) = statement.strip_prefix("CREATE DATABASE ").map(unquote) {
            if state.fails_at(InjectedFailure::CreateDatabase) {
                return Err(DatastoreError::Statement("access denied".to_string()));
            }
            if state.databases.contains_key(&database) {
                return Err(DatastoreError::Statement(format!(
                    "database '{database}' already exists"
                )));
            }
            state.databases.insert(database, Tables::new());
            return Ok(());
        }
        if let Some(rest) = statement.strip_prefix("CREATE TABLE IF NOT EXISTS ") {
            if state.fails_at(InjectedFailure::CreateTable) {
                return Err(DatastoreError::Statement("access denied".to_string()));
            }
            let database = selected
                .ok_or_else(|| DatastoreError::Statement("no database selected".to_string()))?;
            let table = unquote(rest.split_whitespace().next().unwrap_or_default());
            state.databases.entry(database).or_default().entry(table).or_default();
            return Ok(());
        }
        Err(DatastoreError::Statement(format!("unsupported statement: {statement}")))
    }

    fn prepare(&mut self, statement: &str) -> Result<Self::Statement, DatastoreError> {
        let database = self.selected()?;
        let mut state = self.lock();
        state.statements.push(statement.to_string());
        state.check_alive(self.generation)?;
        if state.fails_at(InjectedFailure::Prepare) {
            return Err(DatastoreError::Statement("prepare rejected".to_string()));
        }
        let table = statement
            .strip_prefix("INSERT INTO ")
            .and_then(|rest| rest.split_whitespace().next())
            .map(unquote)
            .ok_or_else(|| DatastoreError::Statement(format!("cannot prepare: {statement}")))?;
        let exists = state.databases.get(&database).is_some_and(|tables| tables.contains_key(&table));
        if !exists {
            return Err(DatastoreError::Statement(format!("table '{database}.{table}' doesn't exist")));
        }
        Ok(InMemoryStatement {
            database,
            table,
        })
    }

    fn exec(&mut self, statement: &Self::Statement, row: &MetricRow) -> Result<(), DatastoreError> {
        let mut state = self.lock();
        state.check_alive(self.generation)?;
        let sequence = state.inserts;
        state.inserts += 1;
        if state.fails_at(InjectedFailure::Insert(sequence)) {
            return Err(DatastoreError::Closed("lost connection during insert".to_string()));
        }
        let rows = state
            .databases
            .get_mut(&statement.database)
            .and_then(|tables| tables.get_mut(&statement.table))
            .ok_or_else(|| {
                DatastoreError::Statement(format!("table '{}' doesn't exist", statement.table))
            })?;
        rows.push(row.clone());
        Ok(())
    }

    fn close(self) {}
}

/// Strips backtick quoting from an identifier.
fn unquote(identifier: &str) -> String {
    identifier
        .strip_prefix('`')
        .and_then(|inner| inner.strip_suffix('`'))
        .map_or_else(|| identifier.to_string(), |inner| inner.replace("``", "`"))
}

impl Drop for InMemoryConnection {
    fn drop(&mut self) {
        let mut state = self.lock();
        state.active = state.active.saturating_sub(1);
    }
}
