// system-tests/src/lib.rs
// ============================================================================
// Module: MySQL Publisher System Tests Library
// Description: Shared configuration for live MySQL system tests.
// Purpose: Provide common utilities for the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the system-test binaries in
//! `system-tests/tests`. Tests run against an existing server named in the
//! environment, or start a disposable MySQL container.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
