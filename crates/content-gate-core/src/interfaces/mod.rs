// crates/content-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Content Gate Interfaces
// Description: Collaborator contracts injected into the gating engine.
// Purpose: Keep storage, identity, network, device, and time behind traits.
// Dependencies: thiserror, time, crate::core
// ============================================================================

//! ## Overview
//! The engine owns no process-wide state. Hosts hand it a store, an identity
//! provider, a connectivity probe, a resolver, a device classifier, and a
//! clock. Implementations must bound every blocking call by the timeout they
//! are given and report failure instead of hanging.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;
use time::OffsetDateTime;

use crate::core::DeviceClass;
use crate::core::GateError;
use crate::core::Resolution;

// ============================================================================
// SECTION: Key-Value Store
// ============================================================================

/// Key-value store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store I/O error.
    #[error("key-value store io error: {0}")]
    Io(String),
    /// Store data is corrupted.
    #[error("key-value store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("key-value store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data or request is invalid.
    #[error("key-value store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("key-value store error: {0}")]
    Store(String),
}

/// Durable per-device key-value storage.
///
/// Writes must survive process restarts. No transactional guarantee spans
/// multiple keys.
pub trait KeyValueStore: Send + Sync {
    /// Reads a string value; `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a string value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Reads a boolean value; `false` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn get_bool(&self, key: &str) -> Result<bool, StoreError>;

    /// Writes a boolean value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Device Identity
// ============================================================================

/// Provider of the opaque per-install device token.
pub trait DeviceIdentity: Send + Sync {
    /// Returns the device token, creating it on first use.
    fn device_id(&self) -> String;
}

// ============================================================================
// SECTION: Network
// ============================================================================

/// Live reachability check.
pub trait ConnectivityProbe: Send + Sync {
    /// Returns true when the network was observed as reachable within
    /// `timeout`. Unknown reachability is reported as `false`.
    fn has_connectivity(&self, timeout: Duration) -> bool;
}

/// Resolves a candidate URL by GET with redirect-following.
pub trait UrlResolver: Send + Sync {
    /// Resolves `url` within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] for malformed URLs, transport failures, timeouts,
    /// and statuses outside the success band.
    fn resolve(&self, url: &str, timeout: Duration) -> Result<Resolution, GateError>;
}

// ============================================================================
// SECTION: Device / Time
// ============================================================================

/// Reports the host form factor.
pub trait DeviceClassifier: Send + Sync {
    /// Returns the current device class.
    fn device_class(&self) -> DeviceClass;
}

impl DeviceClassifier for DeviceClass {
    fn device_class(&self) -> DeviceClass {
        *self
    }
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;
}
