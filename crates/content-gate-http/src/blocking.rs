// crates/content-gate-http/src/blocking.rs
// ============================================================================
// Module: Blocking Bridge
// Description: Drives collaborator futures from synchronous call sites.
// Purpose: Keep the blocking API usable from inside a host tokio runtime.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! Collaborators own a private current-thread runtime. Entering it directly
//! from a thread that already drives a runtime panics, so the bridge picks a
//! compatible context first:
//! - no ambient runtime: block on the private runtime in place;
//! - multi-thread host: move off the worker with `block_in_place`;
//! - current-thread host: block on a scoped helper thread.

use std::future::Future;
use std::thread;

use tokio::runtime::Handle;
use tokio::runtime::Runtime;
use tokio::runtime::RuntimeFlavor;

/// Runs `future` to completion on `runtime` from any calling context.
///
/// Returns `None` only when the helper thread panicked.
pub(crate) fn block_on_private<F>(runtime: &Runtime, future: F) -> Option<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    match Handle::try_current() {
        Err(_) => Some(runtime.block_on(future)),
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            Some(tokio::task::block_in_place(|| runtime.block_on(future)))
        }
        Ok(_) => thread::scope(|scope| scope.spawn(move || runtime.block_on(future)).join().ok()),
    }
}
