// crates/mysql-publisher/src/plugin.rs
// ============================================================================
// Module: Publisher Plugin
// Description: Host-facing plugin wrapping config resolution and publishing.
// Purpose: Implement the host invocation contract over any datastore.
// Dependencies: mysql-publisher-{core, config, store-mysql}, thiserror, tracing
// ============================================================================

//! ## Overview
//! The host calls [`PublisherPlugin::publish`] with a content type, an encoded
//! batch, and its raw config map. The plugin decodes the batch, resolves the
//! config through its policy, and hands both to the core [`Publisher`]. The
//! policy is built once at construction; a malformed built-in rule is a
//! construction error, never a panic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mysql_publisher_config::ConfigError;
use mysql_publisher_config::ConfigMap;
use mysql_publisher_config::ConfigPolicy;
use mysql_publisher_config::publisher_config_policy;
use mysql_publisher_config::resolve_publish_config;
use mysql_publisher_core::Datastore;
use mysql_publisher_core::PluginMeta;
use mysql_publisher_core::PublishConfig;
use mysql_publisher_core::PublishError;
use mysql_publisher_core::PublishReport;
use mysql_publisher_core::Publisher;
use mysql_publisher_core::PublisherStatus;
use mysql_publisher_core::plugin_meta;
use mysql_publisher_core::runtime::decode_batch;
use mysql_publisher_store_mysql::MysqlDatastore;
use mysql_publisher_store_mysql::MysqlDatastoreOptions;
use mysql_publisher_store_mysql::MysqlStoreError;
use thiserror::Error;
use tracing::error;
use tracing::info;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Plugin errors surfaced to the host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Publishing failed.
    #[error(transparent)]
    Publish(#[from] PublishError),
    /// Datastore setup failed.
    #[error(transparent)]
    Store(#[from] MysqlStoreError),
}

// ============================================================================
// SECTION: Plugin
// ============================================================================

/// Publisher plugin over a datastore backend.
pub struct PublisherPlugin<D: Datastore> {
    /// Config rules applied to every host config map.
    policy: ConfigPolicy,
    /// Connection-owning publisher.
    publisher: Publisher<D>,
}

/// Plugin backed by a MySQL server.
pub type MysqlPublisherPlugin = PublisherPlugin<MysqlDatastore>;

impl<D: Datastore> PublisherPlugin<D> {
    /// Creates a plugin over the given backend.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] when the built-in policy is malformed.
    pub fn new(datastore: D) -> Result<Self, PluginError> {
        Ok(Self {
            policy: publisher_config_policy()?,
            publisher: Publisher::new(datastore),
        })
    }

    /// Returns the plugin descriptor.
    #[must_use]
    pub fn meta() -> PluginMeta {
        plugin_meta()
    }

    /// Returns the config policy.
    #[must_use]
    pub const fn config_policy(&self) -> &ConfigPolicy {
        &self.policy
    }

    /// Returns the publisher connection state.
    #[must_use]
    pub const fn status(&self) -> PublisherStatus {
        self.publisher.status()
    }

    /// Returns the datastore backend.
    #[must_use]
    pub const fn datastore(&self) -> &D {
        self.publisher.datastore()
    }

    /// Applies the policy and resolves a host config map.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] when the map is rejected.
    pub fn resolve_config(&self, config: &ConfigMap) -> Result<PublishConfig, PluginError> {
        let processed = self.policy.process(config)?;
        Ok(resolve_publish_config(&processed)?)
    }

    /// Publishes one encoded batch using the host config map.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] for unknown content types, undecodable
    /// payloads, rejected config, and any publish failure.
    pub fn publish(
        &mut self,
        content_type: &str,
        payload: &[u8],
        config: &ConfigMap,
    ) -> Result<PublishReport, PluginError> {
        info!(content_type, payload_bytes = payload.len(), "publishing started");
        let records = decode_batch(content_type, payload).map_err(|err| {
            error!(error = %err, "cannot decode batch");
            PublishError::from(err)
        })?;
        let config = self.resolve_config(config).inspect_err(|err| {
            error!(error = %err, "config rejected");
        })?;
        Ok(self.publisher.publish_records(&records, &config)?)
    }

    /// Closes any open datastore connection.
    pub fn close(&mut self) {
        self.publisher.close();
    }
}

impl MysqlPublisherPlugin {
    /// Creates a MySQL-backed plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] when the options or the built-in policy are invalid.
    pub fn mysql(options: MysqlDatastoreOptions) -> Result<Self, PluginError> {
        Self::new(MysqlDatastore::new(options)?)
    }
}
