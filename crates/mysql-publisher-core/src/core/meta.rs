// crates/mysql-publisher-core/src/core/meta.rs
// ============================================================================
// Module: Plugin Metadata
// Description: Static descriptor returned to the host on request.
// Purpose: Satisfy the host's name/version/type negotiation contract.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The host asks every plugin for a descriptor before routing batches to it.
//! The descriptor is static and independent of the publish pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Plugin name advertised to the host.
pub const PLUGIN_NAME: &str = "mysql";
/// Plugin version advertised to the host.
pub const PLUGIN_VERSION: u32 = 8;
/// The one batch encoding the publisher accepts.
pub const SNAP_JSON_CONTENT_TYPE: &str = "snap.json";

// ============================================================================
// SECTION: Descriptor
// ============================================================================

/// Plugin kinds known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginType {
    /// Produces metrics.
    Collector,
    /// Transforms metrics.
    Processor,
    /// Persists metrics.
    Publisher,
}

/// Descriptor exchanged during plugin registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMeta {
    /// Plugin name.
    pub name: String,
    /// Plugin version.
    pub version: u32,
    /// Plugin kind.
    #[serde(rename = "type")]
    pub plugin_type: PluginType,
    /// Content types accepted on input.
    pub accepted_content_types: Vec<String>,
    /// Content types produced on output.
    pub returned_content_types: Vec<String>,
}

/// Returns the publisher's descriptor.
#[must_use]
pub fn plugin_meta() -> PluginMeta {
    PluginMeta {
        name: PLUGIN_NAME.to_string(),
        version: PLUGIN_VERSION,
        plugin_type: PluginType::Publisher,
        accepted_content_types: vec![SNAP_JSON_CONTENT_TYPE.to_string()],
        returned_content_types: vec![SNAP_JSON_CONTENT_TYPE.to_string()],
    }
}
