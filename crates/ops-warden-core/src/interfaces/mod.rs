// crates/ops-warden-core/src/interfaces/mod.rs
// ============================================================================
// Module: Ops Warden Interfaces
// Description: Backend-agnostic interfaces for operations and time sources.
// Purpose: Define the contract surfaces used by the Ops Warden runtime.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the gateway integrates with operation backends
//! without embedding backend-specific details. Implementations must be
//! deterministic where possible and fail closed on invalid input: an
//! operation that cannot decode its arguments rejects them rather than
//! guessing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::policy::ToolName;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Tool Descriptors
// ============================================================================

/// Coarse tool classification for catalog display.
///
/// # Invariants
/// - Variants are stable for serialization; they are descriptive only and
///   carry no authorization weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolCategory {
    /// Observation-only operation, safe in every mode.
    ReadOnly,
    /// State-changing operation, typically gated to an elevated mode.
    Active,
    /// Destructive operation, expected to be globally blocked.
    Destructive,
}

/// Expected JSON type of one operation parameter.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// JSON string parameter.
    String,
    /// JSON integer parameter.
    Integer,
}

/// Descriptive metadata for one operation parameter.
///
/// # Invariants
/// - Descriptive only; the operation's own argument decoding is
///   authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    /// Parameter name as accepted in the arguments map.
    pub name: &'static str,
    /// Expected JSON type.
    pub kind: ParameterKind,
    /// Whether the parameter must be present.
    pub required: bool,
    /// Short human-readable description.
    pub description: &'static str,
}

/// Descriptive metadata for one registered tool.
///
/// # Invariants
/// - Descriptive only; the decision engine remains authoritative for
///   whether the tool may run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    /// Tool name used for registry lookup and policy matching.
    pub name: ToolName,
    /// Short human-readable description.
    pub description: &'static str,
    /// Coarse classification for catalog display.
    pub category: ToolCategory,
    /// Parameter metadata for catalog display.
    pub parameters: Vec<ParameterSpec>,
}

// ============================================================================
// SECTION: Operation
// ============================================================================

/// Failures raised by a dispatched operation.
///
/// # Invariants
/// - Variants are stable for programmatic handling; `InvalidArguments`
///   covers arity and type mismatches, `Fault` covers everything else.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The operation rejected its arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// The operation failed for a domain reason.
    #[error("{0}")]
    Fault(String),
}

/// Backend-agnostic executable operation.
pub trait Operation: Send + Sync {
    /// Returns descriptive catalog metadata for this operation.
    fn descriptor(&self) -> ToolDescriptor;

    /// Invokes the operation with named arguments.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError`] when arguments cannot be decoded or the
    /// operation fails for a domain reason.
    fn invoke(&self, args: &Map<String, Value>) -> Result<Value, OperationError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Time source supplying timestamps for audit records.
pub trait Clock: Send + Sync {
    /// Returns the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Deterministic clock issuing monotonically increasing logical time.
///
/// # Invariants
/// - Issued values increase by one per call, starting at 1.
#[derive(Debug, Default)]
pub struct LogicalClock {
    /// Next logical value to issue.
    next: std::sync::atomic::AtomicU64,
}

impl LogicalClock {
    /// Creates a logical clock starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: std::sync::atomic::AtomicU64::new(0),
        }
    }
}

impl Clock for LogicalClock {
    fn now(&self) -> Timestamp {
        let value = self.next.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Timestamp::Logical(value + 1)
    }
}
