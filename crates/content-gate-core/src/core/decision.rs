// crates/content-gate-core/src/core/decision.rs
// ============================================================================
// Module: Content Gate Decisions
// Description: Decision value returned by the gating engine.
// Purpose: Carry the external/native verdict, destination URL, and diagnostic.
// Dependencies: serde, crate::core::error
// ============================================================================

//! ## Overview
//! A [`GateDecision`] is built once per evaluation and never mutated. Its
//! [`GateReason`] records which path produced it so hosts can log or branch on
//! the diagnostic without parsing strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeStruct;

use crate::core::error::GateError;

// ============================================================================
// SECTION: Reasons
// ============================================================================

/// Diagnostic explaining how a decision was reached.
///
/// # Invariants
/// - `Rejected` only appears on native decisions.
/// - `ExternalUnresolvable` only appears on external decisions with an empty URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateReason {
    /// Every first-time check passed and the destination resolved.
    AllChecksPassed,
    /// The cache key already settled on native content.
    CachedNative,
    /// The cached destination revalidated successfully.
    CachedExternalValid,
    /// Revalidation failed and the original URL carrying the stored routing
    /// token resolved.
    RecoveredWithPathId,
    /// Revalidation failed, no routing token was stored, and the original URL
    /// resolved as issued.
    RecoveredWithOriginal,
    /// A first-time check failed; the key is now settled on native content.
    Rejected(GateError),
    /// The key is external but neither revalidation nor recovery resolved.
    ExternalUnresolvable(GateError),
}

impl GateReason {
    /// Returns a stable snake_case code for the reason.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AllChecksPassed => "all_checks_passed",
            Self::CachedNative => "cached_native",
            Self::CachedExternalValid => "cached_external_valid",
            Self::RecoveredWithPathId => "recovered_with_path_id",
            Self::RecoveredWithOriginal => "recovered_with_original",
            Self::Rejected(GateError::NoConnectivity) => "no_connectivity",
            Self::Rejected(GateError::DateNotReached) => "date_not_reached",
            Self::Rejected(GateError::UnsupportedDevice) => "unsupported_device",
            Self::Rejected(_) => "server_check_failed",
            Self::ExternalUnresolvable(_) => "external_unresolvable",
        }
    }

    /// Returns the underlying failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&GateError> {
        match self {
            Self::Rejected(error) | Self::ExternalUnresolvable(error) => Some(error),
            Self::AllChecksPassed
            | Self::CachedNative
            | Self::CachedExternalValid
            | Self::RecoveredWithPathId
            | Self::RecoveredWithOriginal => None,
        }
    }
}

impl fmt::Display for GateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllChecksPassed => f.write_str("all checks passed"),
            Self::CachedNative => f.write_str("cached native content"),
            Self::CachedExternalValid => f.write_str("valid cached external content"),
            Self::RecoveredWithPathId => f.write_str("new URL with path_id"),
            Self::RecoveredWithOriginal => f.write_str("new URL from original request"),
            Self::Rejected(error) if error.is_resolution_failure() => {
                write!(f, "server check failed: {error}")
            }
            Self::Rejected(error) => write!(f, "{error}"),
            Self::ExternalUnresolvable(error) => {
                write!(f, "failed to get new URL, show empty destination: {error}")
            }
        }
    }
}

impl Serialize for GateReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Outcome of a single gate evaluation.
///
/// # Invariants
/// - When `should_show_external` is false, `final_url` is empty.
/// - An external decision with an empty `final_url` is the degraded state:
///   the host renders a blank destination instead of native content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    /// Whether the host should reveal external content.
    pub should_show_external: bool,
    /// Destination to load when external; empty otherwise.
    pub final_url: String,
    /// Diagnostic for the path that produced this decision.
    pub reason: GateReason,
}

impl GateDecision {
    /// Builds an external decision pointing at `final_url`.
    #[must_use]
    pub fn external(final_url: impl Into<String>, reason: GateReason) -> Self {
        Self {
            should_show_external: true,
            final_url: final_url.into(),
            reason,
        }
    }

    /// Builds a native fallback decision.
    #[must_use]
    pub const fn native(reason: GateReason) -> Self {
        Self {
            should_show_external: false,
            final_url: String::new(),
            reason,
        }
    }

    /// Returns true for the external-with-empty-destination state.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.should_show_external && self.final_url.is_empty()
    }
}

impl Serialize for GateDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GateDecision", 4)?;
        state.serialize_field("should_show_external", &self.should_show_external)?;
        state.serialize_field("final_url", &self.final_url)?;
        state.serialize_field("reason", &self.reason)?;
        state.serialize_field("reason_code", self.reason.code())?;
        state.end()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
