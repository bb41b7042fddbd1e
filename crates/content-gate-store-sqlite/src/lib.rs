// crates/content-gate-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Key-Value Store
// Description: Durable KeyValueStore backend using SQLite.
// Purpose: Keep sticky gate flags and cached destinations across restarts.
// Dependencies: content-gate-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`KeyValueStore`] for the gate engine.
//! Every write is committed before the call returns, so a decision persisted
//! by one process is visible to the next launch.
//!
//! [`KeyValueStore`]: content_gate_core::KeyValueStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteKeyValueStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
