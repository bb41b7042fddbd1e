// crates/content-gate-core/src/runtime/identity.rs
// ============================================================================
// Module: Content Gate Device Identity
// Description: Lazily minted, store-backed per-install device token.
// Purpose: Provide the stable `push_id` value sent with server checks.
// Dependencies: rand, tracing, crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`StoredDeviceIdentity`] mints a random alphanumeric token of 10 to 20
//! characters on first use, persists it, and returns the stored value on
//! every later call. The token is not a secret; a non-cryptographic RNG is
//! acceptable.
//! Invariants:
//! - At most one store write per install (the first call).
//! - Minting is serialized within a process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::warn;

use crate::core::DEVICE_ID_KEY;
use crate::interfaces::DeviceIdentity;
use crate::interfaces::KeyValueStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum generated identity length.
pub const DEVICE_ID_MIN_LEN: usize = 10;
/// Maximum generated identity length.
pub const DEVICE_ID_MAX_LEN: usize = 20;

// ============================================================================
// SECTION: Stored Identity
// ============================================================================

/// Device identity persisted in a [`KeyValueStore`].
pub struct StoredDeviceIdentity {
    /// Backing store.
    store: Arc<dyn KeyValueStore>,
    /// Store key holding the token.
    key: String,
    /// Serializes read-or-mint so one process never mints twice.
    mint_guard: Mutex<()>,
}

impl StoredDeviceIdentity {
    /// Creates an identity stored under [`DEVICE_ID_KEY`].
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEVICE_ID_KEY)
    }

    /// Creates an identity stored under a custom key.
    #[must_use]
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            mint_guard: Mutex::new(()),
        }
    }
}

impl DeviceIdentity for StoredDeviceIdentity {
    fn device_id(&self) -> String {
        let _guard = self.mint_guard.lock().unwrap_or_else(PoisonError::into_inner);
        match self.store.get_string(&self.key) {
            Ok(Some(existing)) if !existing.is_empty() => return existing,
            Ok(_) => {}
            Err(err) => warn!(key = %self.key, error = %err, "device identity read failed"),
        }
        let minted = generate_device_id(&mut rand::thread_rng());
        if let Err(err) = self.store.set_string(&self.key, &minted) {
            warn!(key = %self.key, error = %err, "device identity write failed");
        }
        minted
    }
}

/// Generates a token of uniformly chosen length in
/// [`DEVICE_ID_MIN_LEN`]..=[`DEVICE_ID_MAX_LEN`] over `[A-Za-z0-9]`.
pub fn generate_device_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(DEVICE_ID_MIN_LEN ..= DEVICE_ID_MAX_LEN);
    (0 .. len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}
