// crates/content-gate-core/src/core/mod.rs
// ============================================================================
// Module: Content Gate Core Types
// Description: Decision values, error taxonomy, persisted state, and hashing.
// Purpose: Provide stable, serializable types shared by every Content Gate crate.
// Dependencies: serde, sha2, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what the gate decides ([`GateDecision`]), why
//! ([`GateReason`], [`GateError`]), and what it remembers between launches
//! ([`GateState`] addressed through [`GateKeys`]).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod decision;
pub mod device;
pub mod error;
pub mod hashing;
pub mod resolution;
pub mod state;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use decision::GateDecision;
pub use decision::GateReason;
pub use device::DeviceClass;
pub use error::GateError;
pub use hashing::stable_url_hash;
pub use resolution::Resolution;
pub use resolution::SUCCESS_STATUS_RANGE;
pub use resolution::classify_status;
pub use resolution::is_success_status;
pub use state::DEVICE_ID_KEY;
pub use state::GateKeys;
pub use state::GateState;
