// crates/mysql-publisher-store-mysql/src/lib.rs
// ============================================================================
// Module: MySQL Datastore
// Description: MySQL backend for the metric publish pipeline.
// Purpose: Persist metric rows in a MySQL server.
// Dependencies: mysql-publisher-core, mysql
// ============================================================================

//! ## Overview
//! This crate provides a blocking MySQL [`mysql_publisher_core::Datastore`]
//! implementation. Each publisher owns at most one connection; there is no
//! pooling. Security posture: server inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MysqlConnection;
pub use store::MysqlDatastore;
pub use store::MysqlDatastoreOptions;
pub use store::MysqlStoreError;
