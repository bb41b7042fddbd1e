// crates/content-gate-core/src/core/state.rs
// ============================================================================
// Module: Content Gate Persisted State
// Description: Store key derivation and the persisted per-key gate state.
// Purpose: Keep every engine-owned store key in one place.
// Dependencies: serde, crate::core::hashing, crate::interfaces
// ============================================================================

//! ## Overview
//! Gate state lives in a host key-value store under keys namespaced by the
//! cache key, except for the routing token, which is keyed by a stable hash
//! of the original URL so it survives cache-key changes and URL invalidation.
//! Invariants:
//! - At most one of `has_shown_external` and `has_shown_native` is true.
//! - Sticky flags are never cleared by the engine.
//! - Absent entries read as `false` / `None`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::stable_url_hash;
use crate::interfaces::KeyValueStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Namespace prefix for every engine-owned key.
const KEY_PREFIX: &str = "content_gate";
/// Store key holding the persisted device identity.
pub const DEVICE_ID_KEY: &str = "content_gate.device_id";

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Store keys for one cache key / original URL pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateKeys {
    /// Sticky external flag key.
    pub external_shown: String,
    /// Sticky native flag key.
    pub native_shown: String,
    /// Last known-good destination key.
    pub cached_url: String,
    /// Routing token key, derived from the original URL hash.
    pub path_id: String,
}

impl GateKeys {
    /// Derives the keys for `cache_key`, hashing `original_url` for the
    /// routing token.
    #[must_use]
    pub fn derive(cache_key: &str, original_url: &str) -> Self {
        Self {
            external_shown: format!("{KEY_PREFIX}.external_shown.{cache_key}"),
            native_shown: format!("{KEY_PREFIX}.native_shown.{cache_key}"),
            cached_url: format!("{KEY_PREFIX}.cached_url.{cache_key}"),
            path_id: format!("{KEY_PREFIX}.path_id.{}", stable_url_hash(original_url)),
        }
    }
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Persisted gate state for one cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    /// Key has settled on external content.
    pub has_shown_external: bool,
    /// Key has settled on native content.
    pub has_shown_native: bool,
    /// Last known-good resolved destination.
    pub cached_url: Option<String>,
    /// Routing token carried by the most recent destination that had one.
    pub cached_path_id: Option<String>,
}

impl GateState {
    /// Reads the state addressed by `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when any read fails.
    pub fn load(store: &dyn KeyValueStore, keys: &GateKeys) -> Result<Self, StoreError> {
        Ok(Self {
            has_shown_external: store.get_bool(&keys.external_shown)?,
            has_shown_native: store.get_bool(&keys.native_shown)?,
            cached_url: store.get_string(&keys.cached_url)?,
            cached_path_id: store.get_string(&keys.path_id)?,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::GateKeys;

    #[test]
    fn keys_are_namespaced_by_cache_key() {
        let keys = GateKeys::derive("promo", "https://example.com/landing");
        assert_eq!(keys.external_shown, "content_gate.external_shown.promo");
        assert_eq!(keys.native_shown, "content_gate.native_shown.promo");
        assert_eq!(keys.cached_url, "content_gate.cached_url.promo");
        assert_eq!(keys.path_id, "content_gate.path_id.bdcb11ade5a67519");
    }

    #[test]
    fn path_id_key_ignores_cache_key() {
        let first = GateKeys::derive("a", "https://example.com/landing");
        let second = GateKeys::derive("b", "https://example.com/landing");
        assert_eq!(first.path_id, second.path_id);
        assert_ne!(first.cached_url, second.cached_url);
    }
}
