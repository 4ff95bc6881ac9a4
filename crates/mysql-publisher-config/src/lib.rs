// crates/mysql-publisher-config/src/lib.rs
// ============================================================================
// Module: MySQL Publisher Config Library
// Description: Config policy, resolution, and loading.
// Purpose: Single source of truth for publisher configuration semantics.
// Dependencies: mysql-publisher-core, serde, toml
// ============================================================================

//! ## Overview
//! `mysql-publisher-config` turns the host's untyped config map into a
//! [`mysql_publisher_core::PublishConfig`]. It owns the rule set (keys,
//! defaults, help text), strict validation, and the TOML/env loading used by
//! the command-line host.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod loader;
pub mod policy;
pub mod resolve;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use loader::apply_env_overrides;
pub use loader::load_config_file;
pub use loader::parse_config_toml;
pub use loader::resolve_config_path;
pub use policy::*;
pub use resolve::resolve_publish_config;
