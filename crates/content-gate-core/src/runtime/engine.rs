// crates/content-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Content Gate Engine
// Description: Sticky external/native gating with cached-destination revalidation.
// Purpose: Decide once per cache key, then keep the decision and its URL fresh.
// Dependencies: time, tracing, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`GateEngine::evaluate`] runs a small state machine per cache key:
//!
//! ```text
//! UNDECIDED --(all checks pass)--> EXTERNAL_SHOWN
//! UNDECIDED --(any check fails)--> NATIVE_SHOWN      (terminal)
//! EXTERNAL_SHOWN --(revalidate every call)--> EXTERNAL_SHOWN
//! ```
//!
//! First-time checks run in order and short-circuit: connectivity, target
//! date, device class, server check. Once external, every call revalidates
//! the cached destination, falls back to a routing-token recovery request,
//! and finally degrades to an external decision with an empty URL. An
//! external key never reverts to native content.
//!
//! Invariants:
//! - `evaluate` never fails; store errors are logged and treated as absent
//!   reads or lost writes.
//! - Concurrent evaluations of one cache key are not serialized here; the
//!   last write wins.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::DeviceClass;
use crate::core::GateDecision;
use crate::core::GateError;
use crate::core::GateKeys;
use crate::core::GateReason;
use crate::core::GateState;
use crate::core::Resolution;
use crate::interfaces::Clock;
use crate::interfaces::ConnectivityProbe;
use crate::interfaces::DeviceClassifier;
use crate::interfaces::DeviceIdentity;
use crate::interfaces::KeyValueStore;
use crate::interfaces::StoreError;
use crate::interfaces::UrlResolver;
use crate::runtime::clock::SystemClock;
use crate::runtime::identity::StoredDeviceIdentity;
use crate::runtime::query::PATH_ID_PARAM;
use crate::runtime::query::PUSH_ID_PARAM;
use crate::runtime::query::extract_path_id;
use crate::runtime::query::normalize_url;
use crate::runtime::query::with_query_param;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed timeout for the connectivity checkpoint.
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(2);
/// Default timeout for server checks and revalidation requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

// ============================================================================
// SECTION: Request
// ============================================================================

/// Inputs for one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRequest {
    /// Candidate destination URL.
    pub url: String,
    /// External content is withheld before this instant.
    pub target_date: OffsetDateTime,
    /// Whether the device-class checkpoint runs.
    pub check_device: bool,
    /// Timeout applied to each resolve request.
    pub timeout: Duration,
    /// Cache key scoping persisted state; defaults to `url`.
    pub cache_key: Option<String>,
}

impl GateRequest {
    /// Creates a request with the device check enabled, the default timeout,
    /// and the URL as cache key.
    #[must_use]
    pub fn new(url: impl Into<String>, target_date: OffsetDateTime) -> Self {
        Self {
            url: url.into(),
            target_date,
            check_device: true,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_key: None,
        }
    }

    /// Enables or disables the device-class checkpoint.
    #[must_use]
    pub fn with_device_check(mut self, enabled: bool) -> Self {
        self.check_device = enabled;
        self
    }

    /// Sets the resolve timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets an explicit cache key.
    #[must_use]
    pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.cache_key = Some(cache_key.into());
        self
    }

    /// Returns the effective cache key.
    #[must_use]
    pub fn cache_key(&self) -> &str {
        self.cache_key.as_deref().unwrap_or(&self.url)
    }

    /// Returns the store keys for this request.
    #[must_use]
    pub fn keys(&self) -> GateKeys {
        GateKeys::derive(self.cache_key(), &self.url)
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Errors raised while assembling a [`GateEngine`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateBuildError {
    /// A required collaborator was not provided.
    #[error("gate engine missing collaborator: {0}")]
    Missing(&'static str),
}

/// Builder for a gate engine.
///
/// # Invariants
/// - `build` succeeds only when a store, probe, and resolver are configured.
/// - Without an explicit identity, a [`StoredDeviceIdentity`] over the same
///   store is used.
#[derive(Default)]
pub struct GateEngineBuilder {
    /// Persistent key-value store.
    store: Option<Arc<dyn KeyValueStore>>,
    /// Device identity provider.
    identity: Option<Arc<dyn DeviceIdentity>>,
    /// Connectivity probe.
    probe: Option<Arc<dyn ConnectivityProbe>>,
    /// URL resolver.
    resolver: Option<Arc<dyn UrlResolver>>,
    /// Device classifier.
    device: Option<Arc<dyn DeviceClassifier>>,
    /// Time source.
    clock: Option<Arc<dyn Clock>>,
}

impl GateEngineBuilder {
    /// Sets the persistent store.
    #[must_use]
    pub fn store(self, store: impl KeyValueStore + 'static) -> Self {
        self.store_shared(Arc::new(store))
    }

    /// Sets a store shared with other owners.
    #[must_use]
    pub fn store_shared(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the device identity provider.
    #[must_use]
    pub fn identity(mut self, identity: impl DeviceIdentity + 'static) -> Self {
        self.identity = Some(Arc::new(identity));
        self
    }

    /// Sets the connectivity probe.
    #[must_use]
    pub fn probe(mut self, probe: impl ConnectivityProbe + 'static) -> Self {
        self.probe = Some(Arc::new(probe));
        self
    }

    /// Sets the URL resolver.
    #[must_use]
    pub fn resolver(mut self, resolver: impl UrlResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Sets the device classifier.
    #[must_use]
    pub fn device_classifier(mut self, device: impl DeviceClassifier + 'static) -> Self {
        self.device = Some(Arc::new(device));
        self
    }

    /// Sets the clock.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns [`GateBuildError::Missing`] when the store, probe, or resolver
    /// is absent.
    pub fn build(self) -> Result<GateEngine, GateBuildError> {
        let store = self.store.ok_or(GateBuildError::Missing("store"))?;
        let probe = self.probe.ok_or(GateBuildError::Missing("probe"))?;
        let resolver = self.resolver.ok_or(GateBuildError::Missing("resolver"))?;
        let identity = self
            .identity
            .unwrap_or_else(|| Arc::new(StoredDeviceIdentity::new(Arc::clone(&store))));
        Ok(GateEngine {
            store,
            identity,
            probe,
            resolver,
            device: self.device.unwrap_or_else(|| Arc::new(DeviceClass::Unknown)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Content-availability gating engine.
pub struct GateEngine {
    /// Persistent key-value store.
    store: Arc<dyn KeyValueStore>,
    /// Device identity provider.
    identity: Arc<dyn DeviceIdentity>,
    /// Connectivity probe.
    probe: Arc<dyn ConnectivityProbe>,
    /// URL resolver.
    resolver: Arc<dyn UrlResolver>,
    /// Device classifier.
    device: Arc<dyn DeviceClassifier>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

/// Engine under the name used by the splash-screen package.
pub type ContentAvailabilityChecker = GateEngine;
/// Engine under the name used by the themed package.
pub type LegionValidator = GateEngine;

impl GateEngine {
    /// Returns a builder for configuring collaborators.
    #[must_use]
    pub fn builder() -> GateEngineBuilder {
        GateEngineBuilder::default()
    }

    /// Evaluates `request` and returns the gate decision.
    #[must_use]
    pub fn evaluate(&self, request: &GateRequest) -> GateDecision {
        let keys = request.keys();
        let cache_key = request.cache_key();

        if self.read_flag(&keys.external_shown) {
            debug!(cache_key, "cache key is external; revalidating cached destination");
            return self.revalidate(request, &keys);
        }
        if self.read_flag(&keys.native_shown) {
            debug!(cache_key, "cache key is native; skipping checks");
            return GateDecision::native(GateReason::CachedNative);
        }

        match self.run_first_time_checks(request) {
            Ok(resolution) => {
                self.write_flag(&keys.external_shown, true);
                self.remember_destination(&keys, &resolution.final_url);
                info!(
                    cache_key,
                    final_url = %resolution.final_url,
                    status = resolution.status,
                    "gate settled on external content"
                );
                GateDecision::external(resolution.final_url, GateReason::AllChecksPassed)
            }
            Err(error) => {
                self.write_flag(&keys.native_shown, true);
                info!(cache_key, reason = %error, "gate settled on native content");
                GateDecision::native(GateReason::Rejected(error))
            }
        }
    }

    /// Reads the persisted state for `request` without evaluating it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be read.
    pub fn state(&self, request: &GateRequest) -> Result<GateState, StoreError> {
        GateState::load(self.store.as_ref(), &request.keys())
    }

    /// Runs the first-time checkpoints in order, stopping at the first failure.
    fn run_first_time_checks(&self, request: &GateRequest) -> Result<Resolution, GateError> {
        if !self.probe.has_connectivity(CONNECTIVITY_TIMEOUT) {
            return Err(GateError::NoConnectivity);
        }
        debug!("connectivity check passed");
        if self.clock.now() < request.target_date {
            return Err(GateError::DateNotReached);
        }
        debug!("target date check passed");
        if request.check_device {
            let class = self.device.device_class();
            if !class.is_supported() {
                return Err(GateError::UnsupportedDevice);
            }
            debug!(device_class = %class, "device check passed");
        }
        self.resolve_with_identity(&request.url, request.timeout)
    }

    /// Resolves `url` augmented with the device identity parameter.
    fn resolve_with_identity(&self, url: &str, timeout: Duration) -> Result<Resolution, GateError> {
        let augmented = with_query_param(url, PUSH_ID_PARAM, &self.identity.device_id())?;
        self.resolver.resolve(&augmented, timeout)
    }

    /// Revalidates an external key, recovering or degrading on failure.
    fn revalidate(&self, request: &GateRequest, keys: &GateKeys) -> GateDecision {
        let cached =
            self.read_string(&keys.cached_url).unwrap_or_else(|| request.url.clone());
        self.remember_path_id(keys, &cached);

        match self.resolve_with_identity(&cached, request.timeout) {
            Ok(resolution) => {
                self.remember_destination(keys, &resolution.final_url);
                debug!(final_url = %resolution.final_url, "cached destination revalidated");
                return GateDecision::external(
                    resolution.final_url,
                    GateReason::CachedExternalValid,
                );
            }
            Err(error) => {
                warn!(
                    cached_url = %cached,
                    error = %error,
                    "cached destination failed revalidation"
                );
            }
        }

        match self.recover(request, keys) {
            Ok((resolution, reason)) => {
                self.remember_destination(keys, &resolution.final_url);
                info!(
                    final_url = %resolution.final_url,
                    reason = reason.code(),
                    "destination recovered"
                );
                GateDecision::external(resolution.final_url, reason)
            }
            Err(error) => {
                warn!(
                    url = %request.url,
                    error = %error,
                    "recovery failed; external destination empty"
                );
                GateDecision::external(String::new(), GateReason::ExternalUnresolvable(error))
            }
        }
    }

    /// Resolves the original URL carrying the stored routing token, if any.
    fn recover(
        &self,
        request: &GateRequest,
        keys: &GateKeys,
    ) -> Result<(Resolution, GateReason), GateError> {
        let stored = self.read_string(&keys.path_id).filter(|value| !value.is_empty());
        let (url, reason) = match stored {
            Some(path_id) => (
                with_query_param(&request.url, PATH_ID_PARAM, &path_id)?,
                GateReason::RecoveredWithPathId,
            ),
            None => (normalize_url(&request.url)?, GateReason::RecoveredWithOriginal),
        };
        let resolution = self.resolver.resolve(&url, request.timeout)?;
        Ok((resolution, reason))
    }

    /// Persists a resolved destination and the routing token it carries.
    fn remember_destination(&self, keys: &GateKeys, final_url: &str) {
        self.write_string(&keys.cached_url, final_url);
        self.remember_path_id(keys, final_url);
    }

    /// Persists the routing token carried by `url`; absence leaves the prior value.
    fn remember_path_id(&self, keys: &GateKeys, url: &str) {
        if let Some(path_id) = extract_path_id(url) {
            self.write_string(&keys.path_id, &path_id);
        }
    }

    /// Reads a flag, treating store failures as unset.
    fn read_flag(&self, key: &str) -> bool {
        self.store.get_bool(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "gate flag read failed");
            false
        })
    }

    /// Reads a string, treating store failures as absent.
    fn read_string(&self, key: &str) -> Option<String> {
        self.store.get_string(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "gate value read failed");
            None
        })
    }

    /// Writes a flag, logging failures.
    fn write_flag(&self, key: &str, value: bool) {
        if let Err(err) = self.store.set_bool(key, value) {
            warn!(key, error = %err, "gate flag write failed");
        }
    }

    /// Writes a string, logging failures.
    fn write_string(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set_string(key, value) {
            warn!(key, error = %err, "gate value write failed");
        }
    }
}
