// crates/content-gate-config/src/lib.rs
// ============================================================================
// Module: Content Gate Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for content-gate.toml semantics.
// Dependencies: content-gate-core, content-gate-http, content-gate-store-sqlite, toml
// ============================================================================

//! ## Overview
//! `content-gate-config` defines the configuration model for hosts that run
//! the gate engine from a file, such as the `content-gate` CLI. Validation is
//! strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
