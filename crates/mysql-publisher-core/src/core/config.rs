// crates/mysql-publisher-core/src/core/config.rs
// ============================================================================
// Module: Publish Configuration Model
// Description: Resolved publish configuration and datastore connection target.
// Purpose: Carry fully resolved settings into the publish pipeline.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`PublishConfig`] is the resolved form of the host-supplied configuration
//! map. Resolution (defaults, type checks, identifier validation) lives in the
//! config crate; the pipeline only reads the fields. Credentials are redacted
//! from every `Debug` and display form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default login user.
pub const DEFAULT_USERNAME: &str = "root";
/// Default login password.
pub const DEFAULT_PASSWORD: &str = "root";
/// Default server host.
pub const DEFAULT_HOSTNAME: &str = "localhost";
/// Default server TCP port.
pub const DEFAULT_PORT: u16 = 3306;
/// Default destination database.
pub const DEFAULT_DATABASE: &str = "SNAP_TEST";
/// Default destination table.
pub const DEFAULT_TABLE_NAME: &str = "info";

/// Placeholder rendered in place of credentials.
const REDACTED: &str = "***";

// ============================================================================
// SECTION: Publish Config
// ============================================================================

/// Resolved configuration for one publish invocation.
///
/// # Invariants
/// - Every field is populated; defaults were applied during resolution.
/// - `database` and `table_name` use the identifier alphabet and are always
///   backtick-quoted when embedded in DDL.
#[derive(Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Server host.
    pub hostname: String,
    /// Server TCP port.
    pub port: u16,
    /// Destination database.
    pub database: String,
    /// Destination table.
    pub table_name: String,
}

impl PublishConfig {
    /// Returns the connection target (no database selected).
    #[must_use]
    pub fn target(&self) -> ConnectionTarget {
        ConnectionTarget {
            username: self.username.clone(),
            password: self.password.clone(),
            hostname: self.hostname.clone(),
            port: self.port,
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishConfig")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("table_name", &self.table_name)
            .finish()
    }
}

// ============================================================================
// SECTION: Connection Target
// ============================================================================

/// Server address and credentials used to open a datastore connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Server host.
    pub hostname: String,
    /// Server TCP port.
    pub port: u16,
}

impl fmt::Display for ConnectionTarget {
    /// Renders `user:***@tcp(host:port)/` without the password.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{REDACTED}@tcp({}:{})/", self.username, self.hostname, self.port)
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .finish()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
