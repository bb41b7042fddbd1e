// crates/content-gate-core/src/runtime/store.rs
// ============================================================================
// Module: Content Gate In-Memory Store
// Description: Simple in-memory key-value store for tests and short-lived hosts.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of
//! [`KeyValueStore`] for tests and hosts without durable storage. Values do
//! not survive the process.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::interfaces::KeyValueStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Stored value tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StoredValue {
    /// String entry.
    Text(String),
    /// Boolean entry.
    Flag(bool),
}

/// In-memory key-value store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    /// Entries protected by a mutex.
    entries: Arc<Mutex<BTreeMap<String, StoredValue>>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the mutex is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    /// Returns true when the store holds no entries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the mutex is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    /// Locks the entry map.
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredValue>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Store("key-value store mutex poisoned".to_string()))
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(match self.lock()?.get(key) {
            Some(StoredValue::Text(value)) => Some(value.clone()),
            Some(StoredValue::Flag(_)) | None => None,
        })
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), StoredValue::Text(value.to_string()));
        Ok(())
    }

    fn get_bool(&self, key: &str) -> Result<bool, StoreError> {
        Ok(matches!(self.lock()?.get(key), Some(StoredValue::Flag(true))))
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), StoredValue::Flag(value));
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
