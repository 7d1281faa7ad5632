// crates/ops-warden-core/tests/decision.rs
// ============================================================================
// Module: Decision Engine Tests
// Description: Validate evaluation order and denial classification.
// Purpose: Ensure global blocks, mode blocks, and default deny hold.
// Dependencies: ops-warden-core, serde_json
// ============================================================================

//! Decision ordering tests: global block precedence, deny-over-allow within
//! a mode, default deny, idempotence, and the unused context extension
//! point.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

mod common;

use std::sync::Arc;

use ops_warden_core::Decision;
use ops_warden_core::DecisionEngine;
use ops_warden_core::DenialClass;
use ops_warden_core::ModeController;
use ops_warden_core::ModeName;
use ops_warden_core::PolicyDocument;
use ops_warden_core::ToolName;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::common::demo_policy;

/// Builds an engine with a fresh controller over the demo policy.
fn demo_engine() -> (DecisionEngine, Arc<ModeController>) {
    let policy = demo_policy();
    let modes = Arc::new(ModeController::new(Arc::clone(&policy)));
    (DecisionEngine::new(policy, Arc::clone(&modes)), modes)
}

/// Decides a tool with empty arguments and context.
fn decide(engine: &DecisionEngine, tool: &str) -> Decision {
    engine.decide(&ToolName::new(tool), &Map::new(), &Map::new())
}

/// Extracts the denial class, panicking on allow.
fn denial_class(decision: &Decision) -> DenialClass {
    match decision {
        Decision::Deny {
            class, ..
        } => *class,
        Decision::Allow => panic!("expected denial, got allow"),
    }
}

#[test]
fn restart_blocked_in_normal_then_allowed_in_emergency() {
    let (engine, modes) = demo_engine();
    let decision = decide(&engine, "restart_service");
    assert_eq!(denial_class(&decision), DenialClass::BlockedInMode);

    modes.set_mode(ModeName::new("EMERGENCY")).expect("EMERGENCY is configured");
    assert!(decide(&engine, "restart_service").is_allowed());
}

#[test]
fn blocked_in_mode_reason_carries_rationale() {
    let (engine, _modes) = demo_engine();
    match decide(&engine, "scale_fleet") {
        Decision::Deny {
            class,
            reason,
        } => {
            assert_eq!(class, DenialClass::BlockedInMode);
            assert!(reason.contains("Only observation is permitted outside incidents"));
        }
        Decision::Allow => panic!("scale_fleet must be blocked in the default mode"),
    }
}

#[test]
fn globally_blocked_in_every_mode() {
    let (engine, modes) = demo_engine();
    for mode in ["NORMAL", "EMERGENCY"] {
        modes.set_mode(ModeName::new(mode)).expect("configured mode");
        let decision = decide(&engine, "delete_database");
        assert_eq!(denial_class(&decision), DenialClass::GloballyBlocked);
    }
}

#[test]
fn global_block_wins_over_mode_allow_listing() {
    // A mode that explicitly allows the globally blocked tool must still
    // produce the global denial, not an allow or a mode-level denial.
    let policy: PolicyDocument = serde_json::from_value(json!({
        "policy_name": "override-attempt",
        "version": "1",
        "global_rules": { "always_blocked": ["delete_database"] },
        "modes": {
            "NORMAL": {
                "description": "attempts to re-enable a global block",
                "rationale": "none",
                "allowed_tools": ["delete_database"],
                "blocked_tools": []
            }
        }
    }))
    .expect("policy parses");
    let policy = Arc::new(policy);
    let modes = Arc::new(ModeController::new(Arc::clone(&policy)));
    let engine = DecisionEngine::new(policy, modes);
    let decision = decide(&engine, "delete_database");
    assert_eq!(denial_class(&decision), DenialClass::GloballyBlocked);
}

#[test]
fn block_wins_over_allow_within_one_mode() {
    let policy: PolicyDocument = serde_json::from_value(json!({
        "policy_name": "overlap",
        "version": "1",
        "global_rules": { "always_blocked": [] },
        "modes": {
            "NORMAL": {
                "description": "overlapping lists",
                "rationale": "tie-break check",
                "allowed_tools": ["restart_service"],
                "blocked_tools": ["restart_service"]
            }
        }
    }))
    .expect("policy parses");
    let policy = Arc::new(policy);
    let modes = Arc::new(ModeController::new(Arc::clone(&policy)));
    let engine = DecisionEngine::new(policy, modes);
    let decision = decide(&engine, "restart_service");
    assert_eq!(denial_class(&decision), DenialClass::BlockedInMode);
}

#[test]
fn unlisted_tool_is_denied_by_default() {
    let (engine, _modes) = demo_engine();
    let decision = decide(&engine, "unregistered_tool");
    assert_eq!(denial_class(&decision), DenialClass::NotWhitelisted);
}

#[test]
fn repeated_decisions_are_identical_under_unchanged_mode() {
    let (engine, _modes) = demo_engine();
    let first = decide(&engine, "read_logs");
    for _ in 0..50 {
        assert_eq!(decide(&engine, "read_logs"), first);
    }
}

#[test]
fn context_does_not_influence_the_verdict() {
    let (engine, _modes) = demo_engine();
    let mut context = Map::new();
    context.insert("caller".to_string(), Value::String("incident-bot".to_string()));
    context.insert("urgency".to_string(), Value::String("high".to_string()));
    let with_context = engine.decide(&ToolName::new("restart_service"), &Map::new(), &context);
    let without = decide(&engine, "restart_service");
    assert_eq!(with_context, without);
}
