// crates/mysql-publisher/src/lib.rs
// ============================================================================
// Module: MySQL Publisher Plugin Library
// Description: Public API surface of the MySQL metric publisher plugin.
// Purpose: Expose the plugin facade and the types hosts interact with.
// Dependencies: mysql-publisher-{core, config, store-mysql}
// ============================================================================

//! ## Overview
//! A host registers the plugin using [`PublisherPlugin::meta`], validates
//! configuration against [`PublisherPlugin::config_policy`], and then calls
//! [`PublisherPlugin::publish`] once per batch. The plugin keeps one
//! connection open between calls while the configuration is unchanged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod plugin;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use mysql_publisher_config::ConfigError;
pub use mysql_publisher_config::ConfigMap;
pub use mysql_publisher_config::ConfigPolicy;
pub use mysql_publisher_config::ConfigValue;
pub use mysql_publisher_core::PluginMeta;
pub use mysql_publisher_core::PublishError;
pub use mysql_publisher_core::PublishReport;
pub use mysql_publisher_core::PublisherStatus;
pub use mysql_publisher_store_mysql::MysqlDatastoreOptions;
pub use plugin::MysqlPublisherPlugin;
pub use plugin::PluginError;
pub use plugin::PublisherPlugin;
