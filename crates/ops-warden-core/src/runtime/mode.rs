// crates/ops-warden-core/src/runtime/mode.rs
// ============================================================================
// Module: Ops Warden Mode Controller
// Description: Process-wide current mode with validated transitions.
// Purpose: Hold the single mutable state cell consulted by every decision.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The mode controller owns the current operational mode. It starts in the
//! fixed most-restrictive default regardless of policy content and only
//! changes through an explicit, validated transition. Readers always observe
//! either the pre- or post-transition mode in its entirety; the value is
//! swapped under one write lock.
//!
//! Security posture: the initial mode is a fail-safe constant, not derived
//! from the policy document; loading rejects policies that do not define it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use thiserror::Error;

use crate::core::policy::ModeName;
use crate::core::policy::PolicyDocument;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed most-restrictive initial mode.
pub const DEFAULT_MODE: &str = "NORMAL";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transition rejection for modes absent from the policy document.
///
/// # Invariants
/// - The current mode is unchanged when this error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid mode: {requested} (available: {})", available_label(.available))]
pub struct InvalidModeError {
    /// Mode that was requested.
    pub requested: ModeName,
    /// Modes defined by the policy document.
    pub available: Vec<ModeName>,
}

/// Formats the available-mode list for error display.
fn available_label(modes: &[ModeName]) -> String {
    let names: Vec<&str> = modes.iter().map(ModeName::as_str).collect();
    names.join(", ")
}

// ============================================================================
// SECTION: Mode Controller
// ============================================================================

/// Holder of the process-wide current mode.
///
/// # Invariants
/// - The current mode is always a key of the policy document's mode map.
/// - Transitions are atomic: readers see the old or the new mode, never an
///   intermediate value.
#[derive(Debug)]
pub struct ModeController {
    /// Immutable policy document used to validate transitions.
    policy: Arc<PolicyDocument>,
    /// Current operational mode.
    current: RwLock<ModeName>,
}

impl ModeController {
    /// Creates a controller starting in [`DEFAULT_MODE`].
    ///
    /// The caller must have verified that the policy defines the default
    /// mode; loading in `ops-warden-config` enforces this.
    #[must_use]
    pub fn new(policy: Arc<PolicyDocument>) -> Self {
        Self {
            policy,
            current: RwLock::new(ModeName::new(DEFAULT_MODE)),
        }
    }

    /// Returns a snapshot of the current mode.
    #[must_use]
    pub fn current_mode(&self) -> ModeName {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Transitions to the given mode.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidModeError`] when the mode is not defined by the
    /// policy document; the current mode is unchanged in that case.
    pub fn set_mode(&self, mode: ModeName) -> Result<(), InvalidModeError> {
        if !self.policy.contains_mode(&mode) {
            return Err(InvalidModeError {
                requested: mode,
                available: self.policy.mode_names(),
            });
        }
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = mode;
        Ok(())
    }

    /// Returns the policy document backing this controller.
    #[must_use]
    pub fn policy(&self) -> &Arc<PolicyDocument> {
        &self.policy
    }
}
