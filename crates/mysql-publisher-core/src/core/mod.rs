// crates/mysql-publisher-core/src/core/mod.rs
// ============================================================================
// Module: Core Model
// Description: Data types shared by the publish pipeline and its adapters.
// Purpose: Keep records, config, and metadata free of backend details.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Core types are plain data: metric records and values, the resolved publish
//! configuration, and the plugin descriptor.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod meta;
pub mod metric;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use meta::*;
pub use metric::*;
