// crates/ops-warden-server/src/clock.rs
// ============================================================================
// Module: System Clock
// Description: Wall-clock time source for audit records.
// Purpose: Supply unix-millisecond timestamps to the core gateway.
// Dependencies: ops-warden-core
// ============================================================================

//! ## Overview
//! The core never reads wall-clock time; the host injects a time source.
//! This is the production implementation backed by the system clock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use ops_warden_core::Clock;
use ops_warden_core::Timestamp;

// ============================================================================
// SECTION: System Clock
// ============================================================================

/// Wall-clock time source emitting unix epoch milliseconds.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Timestamp::UnixMillis(i64::try_from(millis).unwrap_or(i64::MAX))
    }
}
