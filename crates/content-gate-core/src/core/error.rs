// crates/content-gate-core/src/core/error.rs
// ============================================================================
// Module: Content Gate Errors
// Description: Failure taxonomy for gate checks and URL resolution.
// Purpose: Give every failed checkpoint a stable, printable diagnostic.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`GateError`] enumerates every way a gate checkpoint can fail. The engine
//! never returns these to callers; they are folded into
//! [`crate::GateReason`] so the decision carries its own diagnostic.

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Failure raised by a gate checkpoint or a URL resolution.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Display strings are the diagnostic text embedded in decision reasons.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum GateError {
    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL")]
    InvalidUrl,
    /// Reachability was unavailable or unknown within the probe timeout.
    #[error("no internet connection")]
    NoConnectivity,
    /// The current time is earlier than the target date.
    #[error("target date not reached")]
    DateNotReached,
    /// The device form factor is excluded from external content.
    #[error("device not supported")]
    UnsupportedDevice,
    /// The server answered with a status outside the success band.
    #[error("server error: {0}")]
    ServerError(u16),
    /// The request failed before an HTTP response was received.
    #[error("network error: {0}")]
    NetworkError(String),
    /// The peer answered with something that is not a usable HTTP response.
    #[error("invalid response")]
    InvalidResponse,
    /// The request did not complete within its timeout.
    #[error("request timed out")]
    Timeout,
}

impl GateError {
    /// Returns true when the error came from resolving a URL rather than a
    /// local precondition.
    #[must_use]
    pub const fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl
                | Self::ServerError(_)
                | Self::NetworkError(_)
                | Self::InvalidResponse
                | Self::Timeout
        )
    }
}
