// crates/content-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Content Gate Runtime
// Description: Gating engine plus reference collaborator implementations.
// Purpose: Evaluate gate requests and provide in-process defaults.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime hosts [`GateEngine`] and the collaborators that need no
//! external system: the stored device identity, an in-memory store, clocks,
//! and the query-string helpers used to augment request URLs.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod clock;
pub mod engine;
pub mod identity;
pub mod query;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use clock::FixedClock;
pub use clock::SystemClock;
pub use engine::CONNECTIVITY_TIMEOUT;
pub use engine::ContentAvailabilityChecker;
pub use engine::DEFAULT_REQUEST_TIMEOUT;
pub use engine::GateBuildError;
pub use engine::GateEngine;
pub use engine::GateEngineBuilder;
pub use engine::GateRequest;
pub use engine::LegionValidator;
pub use identity::StoredDeviceIdentity;
pub use query::PATH_ID_PARAM;
pub use query::PUSH_ID_PARAM;
pub use query::extract_path_id;
pub use query::normalize_url;
pub use query::with_query_param;
pub use store::InMemoryKeyValueStore;
