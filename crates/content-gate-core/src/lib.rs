// crates/content-gate-core/src/lib.rs
// ============================================================================
// Module: Content Gate Core Library
// Description: Public API surface for the Content Gate core.
// Purpose: Expose gate types, collaborator interfaces, and the gating engine.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Content Gate core decides, once per install, whether a client reveals an
//! externally hosted destination or falls back to native content, and keeps
//! that decision sticky across launches. The core performs no network or disk
//! I/O itself; hosts inject a key-value store, a connectivity probe, and a URL
//! resolver through the interfaces in [`interfaces`].
//! Invariants:
//! - [`GateEngine::evaluate`] always returns a [`GateDecision`]; failures are
//!   folded into [`GateReason`] values.
//! - Unknown reachability, unreachable servers, and malformed URLs fail closed
//!   to native content until a key has reached the external state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::Clock;
pub use interfaces::ConnectivityProbe;
pub use interfaces::DeviceClassifier;
pub use interfaces::DeviceIdentity;
pub use interfaces::KeyValueStore;
pub use interfaces::StoreError;
pub use interfaces::UrlResolver;
pub use runtime::CONNECTIVITY_TIMEOUT;
pub use runtime::ContentAvailabilityChecker;
pub use runtime::DEFAULT_REQUEST_TIMEOUT;
pub use runtime::FixedClock;
pub use runtime::GateBuildError;
pub use runtime::GateEngine;
pub use runtime::GateEngineBuilder;
pub use runtime::GateRequest;
pub use runtime::InMemoryKeyValueStore;
pub use runtime::LegionValidator;
pub use runtime::PATH_ID_PARAM;
pub use runtime::PUSH_ID_PARAM;
pub use runtime::StoredDeviceIdentity;
pub use runtime::SystemClock;
pub use runtime::extract_path_id;
pub use runtime::normalize_url;
pub use runtime::with_query_param;
