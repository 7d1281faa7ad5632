// crates/ops-warden-core/src/core/policy.rs
// ============================================================================
// Module: Ops Warden Policy Document
// Description: Declarative allow/block policy types and read accessors.
// Purpose: Provide an immutable-after-load, strongly typed policy model.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The policy document defines global rules and per-mode allow/block lists
//! for tool execution. It is parsed fully at load time and never mutated
//! afterwards; the runtime shares it behind an `Arc`. Tool and mode names are
//! opaque identifiers matched by exact string comparison.
//!
//! Security posture: policy documents are untrusted input and must be
//! validated before use; loading is the responsibility of
//! `ops-warden-config`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Opaque tool identifier.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied. Uniqueness is by
///   exact match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a new tool identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque operational mode identifier.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization is applied. Uniqueness is by
///   exact match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeName(String);

impl ModeName {
    /// Creates a new mode identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Policy Document
// ============================================================================

/// Global rules applying in every mode.
///
/// # Invariants
/// - `always_blocked` overrides any mode-level allow; no mode configuration
///   can re-enable a globally blocked tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalRules {
    /// Tools that may never execute, regardless of mode.
    pub always_blocked: BTreeSet<ToolName>,
}

/// Allow/block rules for a single operational mode.
///
/// # Invariants
/// - `blocked_tools` takes precedence over `allowed_tools` on overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRules {
    /// Human-readable description of the mode.
    pub description: String,
    /// Rationale surfaced in denial reasons for blocked tools.
    pub rationale: String,
    /// Tools explicitly permitted in this mode.
    pub allowed_tools: BTreeSet<ToolName>,
    /// Tools explicitly blocked in this mode.
    pub blocked_tools: BTreeSet<ToolName>,
}

/// Declarative policy document: global rules plus per-mode rules.
///
/// # Invariants
/// - Immutable after load; every field is required on the wire.
/// - Every mode referenced by the mode controller must exist in `modes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Policy name for operator display.
    pub policy_name: String,
    /// Policy document version string.
    pub version: String,
    /// Rules applying in every mode.
    pub global_rules: GlobalRules,
    /// Per-mode allow/block rules keyed by mode name.
    pub modes: BTreeMap<ModeName, ModeRules>,
}

impl PolicyDocument {
    /// Returns the rules for the given mode.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownModeError`] when the mode is not defined.
    pub fn mode_rules(&self, mode: &ModeName) -> Result<&ModeRules, UnknownModeError> {
        self.modes.get(mode).ok_or_else(|| UnknownModeError {
            requested: mode.clone(),
            available: self.mode_names(),
        })
    }

    /// Returns the globally blocked tool set.
    #[must_use]
    pub const fn always_blocked(&self) -> &BTreeSet<ToolName> {
        &self.global_rules.always_blocked
    }

    /// Returns true when the mode is defined by this policy.
    #[must_use]
    pub fn contains_mode(&self, mode: &ModeName) -> bool {
        self.modes.contains_key(mode)
    }

    /// Returns the configured mode names in deterministic order.
    #[must_use]
    pub fn mode_names(&self) -> Vec<ModeName> {
        self.modes.keys().cloned().collect()
    }

    /// Flags suspicious-but-tolerated policy constructs.
    ///
    /// A tool listed in both `allowed_tools` and `blocked_tools` of one mode
    /// is reported here rather than rejected; the decision engine resolves
    /// the overlap with deny precedence.
    #[must_use]
    pub fn lint(&self) -> Vec<PolicyWarning> {
        let mut warnings = Vec::new();
        for (mode, rules) in &self.modes {
            for tool in rules.allowed_tools.intersection(&rules.blocked_tools) {
                warnings.push(PolicyWarning::OverlappingTool {
                    mode: mode.clone(),
                    tool: tool.clone(),
                });
            }
        }
        warnings
    }
}

// ============================================================================
// SECTION: Warnings and Errors
// ============================================================================

/// Non-fatal findings surfaced by policy lint.
///
/// # Invariants
/// - Warnings never change decision outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyWarning {
    /// A tool appears in both the allow and block list of one mode.
    OverlappingTool {
        /// Mode containing the overlap.
        mode: ModeName,
        /// Tool listed on both sides.
        tool: ToolName,
    },
}

impl fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverlappingTool {
                mode,
                tool,
            } => {
                write!(
                    f,
                    "tool '{tool}' is both allowed and blocked in mode '{mode}'; block wins"
                )
            }
        }
    }
}

/// Lookup error for modes absent from the policy document.
///
/// # Invariants
/// - `available` lists the configured modes in deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode: {requested} (available: {})", format_mode_list(.available))]
pub struct UnknownModeError {
    /// Mode that was requested.
    pub requested: ModeName,
    /// Modes defined by the policy document.
    pub available: Vec<ModeName>,
}

/// Formats a mode list for error display.
fn format_mode_list(modes: &[ModeName]) -> String {
    let names: Vec<&str> = modes.iter().map(ModeName::as_str).collect();
    names.join(", ")
}

// ============================================================================
// SECTION: Tests
// ============================================================================
