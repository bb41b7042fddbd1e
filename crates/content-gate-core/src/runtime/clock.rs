// crates/content-gate-core/src/runtime/clock.rs
// ============================================================================
// Module: Content Gate Clocks
// Description: Wall-clock and fixed clock implementations.
// Purpose: Keep the temporal gate replayable by injecting time.
// Dependencies: time, crate::interfaces
// ============================================================================

//! Clocks injected into the temporal gate.

use time::OffsetDateTime;

use crate::interfaces::Clock;

/// Clock reading UTC wall time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
