// crates/ops-warden-core/src/runtime/decision.rs
// ============================================================================
// Module: Ops Warden Decision Engine
// Description: Mode-sensitive allow/deny evaluation for tool invocations.
// Purpose: Produce one decision per request with a fixed evaluation order.
// Dependencies: crate::{core, runtime::mode}
// ============================================================================

//! ## Overview
//! The decision engine evaluates one tool name against the policy document
//! and the current mode. The evaluation order is a policy invariant, not an
//! implementation detail: the global block list is checked first so no mode
//! configuration can re-enable a globally blocked tool, an explicit mode
//! block wins over an allow listing of the same tool, and absence from the
//! allow list is itself a denial (default deny).
//!
//! Decisions are pure: no side effects, and identical inputs under an
//! unchanged mode yield identical outputs. The mode is read exactly once per
//! evaluation, so a concurrent transition is observed atomically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Map;
use serde_json::Value;

use crate::core::decision::Decision;
use crate::core::decision::DenialClass;
use crate::core::policy::PolicyDocument;
use crate::core::policy::ToolName;
use crate::runtime::mode::ModeController;

// ============================================================================
// SECTION: Decision Engine
// ============================================================================

/// Mode-sensitive policy evaluator.
///
/// # Invariants
/// - Evaluation order: globally blocked, blocked in mode, not whitelisted,
///   allow. First match wins.
/// - The engine holds no mutable state of its own.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    /// Immutable policy document.
    policy: Arc<PolicyDocument>,
    /// Shared current-mode holder.
    modes: Arc<ModeController>,
}

impl DecisionEngine {
    /// Creates an engine over the shared policy and mode controller.
    #[must_use]
    pub const fn new(policy: Arc<PolicyDocument>, modes: Arc<ModeController>) -> Self {
        Self {
            policy,
            modes,
        }
    }

    /// Decides whether the tool may execute under the current mode.
    ///
    /// `args` and `context` are accepted for forward compatibility and do
    /// not influence the verdict.
    #[must_use]
    pub fn decide(
        &self,
        tool: &ToolName,
        _args: &Map<String, Value>,
        _context: &Map<String, Value>,
    ) -> Decision {
        if self.policy.always_blocked().contains(tool) {
            return Decision::Deny {
                class: DenialClass::GloballyBlocked,
                reason: format!("tool '{tool}' is globally blocked and can never be executed"),
            };
        }

        let mode = self.modes.current_mode();
        let Ok(rules) = self.policy.mode_rules(&mode) else {
            // The controller only holds configured modes; an unknown mode
            // here means the policy and controller disagree, so fail closed.
            return Decision::Deny {
                class: DenialClass::NotWhitelisted,
                reason: format!("mode '{mode}' is not defined by the loaded policy"),
            };
        };

        if rules.blocked_tools.contains(tool) {
            return Decision::Deny {
                class: DenialClass::BlockedInMode,
                reason: format!(
                    "tool '{tool}' is blocked in {mode} mode (rationale: {})",
                    rules.rationale
                ),
            };
        }

        if !rules.allowed_tools.contains(tool) {
            return Decision::Deny {
                class: DenialClass::NotWhitelisted,
                reason: format!("tool '{tool}' is not in the allowed list for {mode} mode"),
            };
        }

        Decision::Allow
    }

    /// Returns the policy document consulted by this engine.
    #[must_use]
    pub fn policy(&self) -> &Arc<PolicyDocument> {
        &self.policy
    }

    /// Returns the mode controller consulted by this engine.
    #[must_use]
    pub fn modes(&self) -> &Arc<ModeController> {
        &self.modes
    }
}
