// crates/mysql-publisher-core/src/runtime/schema.rs
// ============================================================================
// Module: Destination Schema
// Description: Statement text for bootstrap DDL and the row insert.
// Purpose: Keep the fixed four-column table shape in one place.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Database and table names are embedded as backtick-quoted identifiers, so
//! reserved words and numeric-looking names stay valid DDL. Config resolution
//! still limits names to the plain identifier alphabet.

/// Column definition of the destination table.
pub const TABLE_COLUMNS: &str = "(timestamp VARCHAR(200), source_column VARCHAR(200), key_column \
                                 VARCHAR(200), value_column VARCHAR(200))";

/// Quotes an identifier with backticks, doubling any embedded backtick.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Selects the destination database.
#[must_use]
pub fn use_database_sql(database: &str) -> String {
    format!("USE {}", quote_identifier(database))
}

/// Creates the destination database.
#[must_use]
pub fn create_database_sql(database: &str) -> String {
    format!("CREATE DATABASE {}", quote_identifier(database))
}

/// Creates the destination table when absent.
#[must_use]
pub fn create_table_sql(table_name: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {} {TABLE_COLUMNS}", quote_identifier(table_name))
}

/// Inserts one row with four positional placeholders.
#[must_use]
pub fn insert_sql(table_name: &str) -> String {
    format!("INSERT INTO {} VALUES( ?, ?, ?, ? )", quote_identifier(table_name))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
