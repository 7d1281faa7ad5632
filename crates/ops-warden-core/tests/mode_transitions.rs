// crates/ops-warden-core/tests/mode_transitions.rs
// ============================================================================
// Module: Mode Transition Tests
// Description: Validate the mode controller state machine.
// Purpose: Ensure the restrictive default and transition validation hold.
// Dependencies: ops-warden-core
// ============================================================================

//! Mode controller tests: fixed restrictive initial mode, any-to-any
//! transitions between configured modes, and rejection of undefined modes
//! without state change.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

mod common;

use std::sync::Arc;

use ops_warden_core::DEFAULT_MODE;
use ops_warden_core::ModeController;
use ops_warden_core::ModeName;

use crate::common::demo_policy;

#[test]
fn controller_starts_in_the_restrictive_default() {
    let controller = ModeController::new(demo_policy());
    assert_eq!(controller.current_mode(), ModeName::new(DEFAULT_MODE));
}

#[test]
fn set_mode_transitions_between_configured_modes() {
    let controller = ModeController::new(demo_policy());
    controller.set_mode(ModeName::new("EMERGENCY")).expect("EMERGENCY is configured");
    assert_eq!(controller.current_mode(), ModeName::new("EMERGENCY"));
    controller.set_mode(ModeName::new("NORMAL")).expect("NORMAL is configured");
    assert_eq!(controller.current_mode(), ModeName::new("NORMAL"));
}

#[test]
fn set_mode_rejects_undefined_mode_and_keeps_current() {
    let controller = ModeController::new(demo_policy());
    let err = controller.set_mode(ModeName::new("PANIC")).expect_err("PANIC is undefined");
    assert_eq!(err.requested, ModeName::new("PANIC"));
    assert_eq!(err.available, vec![ModeName::new("EMERGENCY"), ModeName::new("NORMAL")]);
    assert_eq!(controller.current_mode(), ModeName::new(DEFAULT_MODE));
}

#[test]
fn rejected_transition_after_escalation_keeps_elevated_mode() {
    let controller = ModeController::new(demo_policy());
    controller.set_mode(ModeName::new("EMERGENCY")).expect("EMERGENCY is configured");
    let result = controller.set_mode(ModeName::new("LOCKDOWN"));
    assert!(result.is_err());
    assert_eq!(controller.current_mode(), ModeName::new("EMERGENCY"));
}

#[test]
fn controllers_do_not_share_state() {
    let policy = demo_policy();
    let first = ModeController::new(Arc::clone(&policy));
    let second = ModeController::new(policy);
    first.set_mode(ModeName::new("EMERGENCY")).expect("EMERGENCY is configured");
    assert_eq!(second.current_mode(), ModeName::new(DEFAULT_MODE));
}
