// crates/ops-warden-core/src/runtime/gateway.rs
// ============================================================================
// Module: Ops Warden Execution Gateway
// Description: Policy-gated dispatch of tool requests to operations.
// Purpose: Decide, dispatch, and audit every tool invocation exactly once.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The execution gateway orchestrates one request end to end: consult the
//! decision engine, and on allow look the tool up in the operation registry,
//! record one audit entry, and invoke the operation. Denied requests return
//! immediately; the registry is never touched and no audit record is
//! produced for them. The gateway performs no retries; a failed dispatch is
//! reported once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::audit::AuditLog;
use crate::core::audit::AuditRecord;
use crate::core::audit::AuditSink;
use crate::core::audit::NoopAuditSink;
use crate::core::decision::Decision;
use crate::core::decision::DenialClass;
use crate::core::policy::ToolName;
use crate::interfaces::Clock;
use crate::interfaces::OperationError;
use crate::runtime::decision::DecisionEngine;
use crate::runtime::registry::OperationRegistry;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// One tool invocation request.
///
/// # Invariants
/// - `context` is accepted and passed through unused (reserved extension
///   point).
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    /// Tool to execute.
    pub tool_name: ToolName,
    /// Named arguments for the operation.
    #[serde(default)]
    pub arguments: Map<String, Value>,
    /// Caller-supplied context, currently unused by decision logic.
    #[serde(default)]
    pub context: Map<String, Value>,
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Execution failures distinct from policy violations.
///
/// # Invariants
/// - Variants are stable for programmatic handling; underlying operation
///   messages are preserved, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Tool is policy-allowed but has no registered implementation.
    #[error("unknown tool: {tool}")]
    UnknownTool {
        /// Tool that was requested.
        tool: ToolName,
    },
    /// Operation rejected its arguments.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments {
        /// Tool that rejected the arguments.
        tool: ToolName,
        /// Rejection detail from the operation.
        message: String,
    },
    /// Operation failed for a domain reason.
    #[error("operation {tool} failed: {message}")]
    Operation {
        /// Tool that failed.
        tool: ToolName,
        /// Failure message from the operation.
        message: String,
    },
}

/// Outcome of one gateway execution.
///
/// # Invariants
/// - `Denied` means the operation registry was never consulted for
///   dispatch and no audit record was produced.
#[derive(Debug)]
pub enum ExecutionResult {
    /// Request was denied by policy and not dispatched.
    Denied {
        /// Violated rule class.
        class: DenialClass,
        /// Human-readable denial reason.
        reason: String,
    },
    /// Operation completed normally.
    Succeeded {
        /// Operation result value.
        value: Value,
    },
    /// Operation was dispatched but failed, or had no implementation.
    Failed {
        /// Execution failure detail.
        error: ExecutionError,
    },
}

// ============================================================================
// SECTION: Execution Gateway
// ============================================================================

/// Policy-gated dispatcher for tool requests.
///
/// # Invariants
/// - Exactly one audit record is appended per invocation that reaches an
///   operation, regardless of the operation's outcome.
/// - Denied requests produce no audit record and no side effects.
pub struct ExecutionGateway {
    /// Decision engine consulted before every dispatch.
    engine: DecisionEngine,
    /// Registry of executable operations.
    registry: OperationRegistry,
    /// Append-only audit log of dispatched invocations.
    audit: Arc<AuditLog>,
    /// Mirror sink for audit records.
    sink: Arc<dyn AuditSink>,
    /// Time source for audit timestamps.
    clock: Arc<dyn Clock>,
}

impl ExecutionGateway {
    /// Creates a gateway with a no-op audit mirror.
    #[must_use]
    pub fn new(
        engine: DecisionEngine,
        registry: OperationRegistry,
        audit: Arc<AuditLog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            registry,
            audit,
            sink: Arc::new(NoopAuditSink),
            clock,
        }
    }

    /// Replaces the audit mirror sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Executes one tool request end to end.
    #[must_use]
    pub fn execute(&self, request: &ToolRequest) -> ExecutionResult {
        let decision =
            self.engine.decide(&request.tool_name, &request.arguments, &request.context);
        if let Decision::Deny {
            class,
            reason,
        } = decision
        {
            return ExecutionResult::Denied {
                class,
                reason,
            };
        }

        let Some(operation) = self.registry.get(&request.tool_name) else {
            return ExecutionResult::Failed {
                error: ExecutionError::UnknownTool {
                    tool: request.tool_name.clone(),
                },
            };
        };

        let record = AuditRecord {
            timestamp: self.clock.now(),
            action: request.tool_name.clone(),
            details: Value::Object(request.arguments.clone()),
        };
        self.sink.record(&record);
        self.audit.append(record);

        match operation.invoke(&request.arguments) {
            Ok(value) => ExecutionResult::Succeeded {
                value,
            },
            Err(OperationError::InvalidArguments(message)) => ExecutionResult::Failed {
                error: ExecutionError::InvalidArguments {
                    tool: request.tool_name.clone(),
                    message,
                },
            },
            Err(OperationError::Fault(message)) => ExecutionResult::Failed {
                error: ExecutionError::Operation {
                    tool: request.tool_name.clone(),
                    message,
                },
            },
        }
    }

    /// Returns the decision engine used by this gateway.
    #[must_use]
    pub const fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Returns the operation registry used by this gateway.
    #[must_use]
    pub const fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Returns the audit log written by this gateway.
    #[must_use]
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }
}
