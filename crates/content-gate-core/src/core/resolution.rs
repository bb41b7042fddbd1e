// crates/content-gate-core/src/core/resolution.rs
// ============================================================================
// Module: Content Gate Resolution Results
// Description: Resolved destination values and status classification.
// Purpose: Share one success band across every resolver implementation.
// Dependencies: serde, crate::core::error
// ============================================================================

//! ## Overview
//! A resolver turns a candidate URL into a [`Resolution`] or a
//! [`GateError`]. The success band is deliberately wide: statuses
//! 200 through 403 inclusive count as "content exists", so destinations that
//! answer with an auth challenge still gate to external content.

use std::ops::RangeInclusive;

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::GateError;

/// HTTP statuses treated as a live destination.
pub const SUCCESS_STATUS_RANGE: RangeInclusive<u16> = 200 ..= 403;

/// Successfully resolved destination.
///
/// # Invariants
/// - `status` lies within [`SUCCESS_STATUS_RANGE`].
/// - `final_url` is the last redirect target, or the requested URL when the
///   server did not redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Destination after following redirects.
    pub final_url: String,
    /// HTTP status of the final response.
    pub status: u16,
}

/// Returns true when `status` falls inside [`SUCCESS_STATUS_RANGE`].
#[must_use]
pub const fn is_success_status(status: u16) -> bool {
    status >= *SUCCESS_STATUS_RANGE.start() && status <= *SUCCESS_STATUS_RANGE.end()
}

/// Classifies a final response into a [`Resolution`] or a server error.
///
/// # Errors
///
/// Returns [`GateError::ServerError`] when `status` is outside the success band.
pub fn classify_status(status: u16, final_url: impl Into<String>) -> Result<Resolution, GateError> {
    if is_success_status(status) {
        Ok(Resolution {
            final_url: final_url.into(),
            status,
        })
    } else {
        Err(GateError::ServerError(status))
    }
}
