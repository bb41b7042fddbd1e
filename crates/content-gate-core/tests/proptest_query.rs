// crates/content-gate-core/tests/proptest_query.rs
// ============================================================================
// Module: Query and Status Property-Based Tests
// Description: Property tests for URL augmentation and status classification.
// Purpose: Detect panics and invariant breaks across wide input ranges.
// ============================================================================

//! Property-based tests for query augmentation and the success band.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use content_gate_core::GateError;
use content_gate_core::PATH_ID_PARAM;
use content_gate_core::PUSH_ID_PARAM;
use content_gate_core::classify_status;
use content_gate_core::extract_path_id;
use content_gate_core::with_query_param;
use proptest::prelude::*;

proptest! {
    #[test]
    fn status_band_is_200_through_403(status in any::<u16>()) {
        let result = classify_status(status, "https://example.com/");
        if (200 ..= 403).contains(&status) {
            prop_assert_eq!(result.unwrap().status, status);
        } else {
            prop_assert_eq!(result, Err(GateError::ServerError(status)));
        }
    }

    #[test]
    fn repeated_augmentation_keeps_one_push_id(
        path in "[a-z]{1,8}",
        first in "[A-Za-z0-9]{10,20}",
        second in "[A-Za-z0-9]{10,20}",
    ) {
        let base = format!("https://example.com/{path}?keep=1");
        let once = with_query_param(&base, PUSH_ID_PARAM, &first).unwrap();
        let twice = with_query_param(&once, PUSH_ID_PARAM, &second).unwrap();
        prop_assert_eq!(twice.matches("push_id=").count(), 1);
        prop_assert!(twice.contains("keep=1"));
        let expected_suffix = format!("push_id={second}");
        prop_assert!(twice.ends_with(&expected_suffix));
    }

    #[test]
    fn path_id_survives_augmentation(token in "[A-Za-z0-9_-]{1,32}", push in "[A-Za-z0-9]{10,20}") {
        let url = with_query_param("https://cdn.example.com/play", PATH_ID_PARAM, &token).unwrap();
        let augmented = with_query_param(&url, PUSH_ID_PARAM, &push).unwrap();
        prop_assert_eq!(extract_path_id(&augmented), Some(token));
    }

    #[test]
    fn arbitrary_input_never_panics(raw in ".*") {
        let _ = with_query_param(&raw, PUSH_ID_PARAM, "x");
        let _ = extract_path_id(&raw);
    }
}
