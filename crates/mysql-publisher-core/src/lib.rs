// crates/mysql-publisher-core/src/lib.rs
// ============================================================================
// Module: MySQL Publisher Core Library
// Description: Public API surface for the metric publisher core.
// Purpose: Expose the metric model, datastore interfaces, and publish runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The core decodes metric batches, renders each record as a four-column row,
//! and inserts the rows through a [`Datastore`]. It knows nothing about a
//! specific database driver; backends plug in through [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::Datastore;
pub use interfaces::DatastoreConnection;
pub use interfaces::DatastoreError;
pub use runtime::BatchError;
pub use runtime::BootstrapStage;
pub use runtime::FormatError;
pub use runtime::InMemoryDatastore;
pub use runtime::InjectedFailure;
pub use runtime::PublishError;
pub use runtime::PublishReport;
pub use runtime::Publisher;
pub use runtime::PublisherStatus;
pub use runtime::format_value;
