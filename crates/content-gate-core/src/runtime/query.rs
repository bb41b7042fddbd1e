// crates/content-gate-core/src/runtime/query.rs
// ============================================================================
// Module: Content Gate Query Helpers
// Description: Query-string augmentation and routing-token extraction.
// Purpose: Build `push_id` / `pathid` request URLs without string splicing.
// Dependencies: url, crate::core
// ============================================================================

//! ## Overview
//! Request URLs are augmented by parsing them, so a malformed URL surfaces as
//! [`GateError::InvalidUrl`] instead of producing a broken request. Setting a
//! parameter replaces earlier pairs of the same name, which keeps repeated
//! revalidations of a cached URL from stacking `push_id` values. The rest of
//! the query is passed through untouched, so signed or `;`-delimited
//! destinations reach the server as issued.

use url::Url;
use url::form_urlencoded;

use crate::core::GateError;

/// Query parameter carrying the device identity.
pub const PUSH_ID_PARAM: &str = "push_id";
/// Query parameter carrying the routing token.
pub const PATH_ID_PARAM: &str = "pathid";

/// Returns `raw` with `name=value` set as the final query pair.
///
/// Existing segments are kept byte for byte; only segments whose decoded key
/// equals `name` are removed.
///
/// # Errors
///
/// Returns [`GateError::InvalidUrl`] when `raw` cannot be parsed.
pub fn with_query_param(raw: &str, name: &str, value: &str) -> Result<String, GateError> {
    let mut url = Url::parse(raw).map_err(|_| GateError::InvalidUrl)?;
    let appended =
        form_urlencoded::Serializer::new(String::new()).append_pair(name, value).finish();
    let query = match url.query().filter(|query| !query.is_empty()) {
        Some(existing) => existing
            .split('&')
            .filter(|segment| !segment_has_key(segment, name))
            .chain(std::iter::once(appended.as_str()))
            .collect::<Vec<_>>()
            .join("&"),
        None => appended,
    };
    url.set_query(Some(&query));
    Ok(url.into())
}

/// Returns true when the decoded key of a raw query segment equals `name`.
fn segment_has_key(segment: &str, name: &str) -> bool {
    form_urlencoded::parse(segment.as_bytes()).next().is_some_and(|(key, _)| key == name)
}

/// Parses `raw` and returns its normalized serialization.
///
/// # Errors
///
/// Returns [`GateError::InvalidUrl`] when `raw` cannot be parsed.
pub fn normalize_url(raw: &str) -> Result<String, GateError> {
    Url::parse(raw).map(String::from).map_err(|_| GateError::InvalidUrl)
}

/// Returns the first non-empty `pathid` value carried by `raw`.
#[must_use]
pub fn extract_path_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    url.query_pairs()
        .find(|(key, _)| *key == PATH_ID_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
