// crates/mysql-publisher-core/src/runtime/mod.rs
// ============================================================================
// Module: Publish Runtime
// Description: Batch decoding, value formatting, and the publisher itself.
// Purpose: Turn an encoded metric batch into persisted rows.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime is synchronous and single-owner: one [`Publisher`] drives one
//! connection, and each call runs to completion before returning.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod decode;
pub mod format;
pub mod publisher;
pub mod schema;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decode::BatchError;
pub use decode::MAX_BATCH_BYTES;
pub use decode::decode_batch;
pub use format::FormatError;
pub use format::format_float;
pub use format::format_namespace;
pub use format::format_timestamp;
pub use format::format_value;
pub use publisher::BootstrapStage;
pub use publisher::PublishError;
pub use publisher::PublishReport;
pub use publisher::Publisher;
pub use publisher::PublisherStatus;
pub use publisher::build_row;
pub use store::InMemoryConnection;
pub use store::InMemoryDatastore;
pub use store::InMemoryStatement;
pub use store::InjectedFailure;
