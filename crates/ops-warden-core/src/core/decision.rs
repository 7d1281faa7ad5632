// crates/ops-warden-core/src/core/decision.rs
// ============================================================================
// Module: Ops Warden Decision Vocabulary
// Description: Allow/deny decision outcomes with denial classification.
// Purpose: Provide stable decision types shared by the engine and transports.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A decision is the verdict produced for one tool invocation under the
//! current mode. Denials carry a stable class label identifying the violated
//! rule plus a human-readable reason, so transports can report structured
//! denials without re-deriving policy state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Denial Classes
// ============================================================================

/// Class of rule violated by a denied invocation.
///
/// # Invariants
/// - Variants are stable for serialization and audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialClass {
    /// Tool is listed in the global always-blocked set.
    GloballyBlocked,
    /// Tool is explicitly blocked in the current mode.
    BlockedInMode,
    /// Tool is absent from the current mode's allow list (default deny).
    NotWhitelisted,
}

impl DenialClass {
    /// Returns a stable label for this denial class.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GloballyBlocked => "globally_blocked",
            Self::BlockedInMode => "blocked_in_mode",
            Self::NotWhitelisted => "not_whitelisted",
        }
    }
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Verdict for a single tool invocation under the current mode.
///
/// # Invariants
/// - `Deny` carries the violated rule class and a displayable reason.
/// - Decisions are pure data; producing one has no side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Decision {
    /// The tool may execute.
    Allow,
    /// The tool must not execute.
    Deny {
        /// Violated rule class.
        class: DenialClass,
        /// Human-readable denial reason.
        reason: String,
    },
}

impl Decision {
    /// Returns true when the decision permits execution.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}
