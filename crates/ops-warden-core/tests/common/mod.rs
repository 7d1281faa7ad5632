// crates/ops-warden-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared fixtures for Ops Warden core tests.
// Purpose: Provide a reusable demo policy and counting operations.
// Dependencies: ops-warden-core, serde_json
// ============================================================================

//! ## Overview
//! Shared fixtures: the two-mode demo policy from the shipped configuration
//! and operation stubs that count invocations so tests can assert that
//! denied requests never reach the registry.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use ops_warden_core::AuditLog;
use ops_warden_core::Clock;
use ops_warden_core::DecisionEngine;
use ops_warden_core::ExecutionGateway;
use ops_warden_core::LogicalClock;
use ops_warden_core::ModeController;
use ops_warden_core::Operation;
use ops_warden_core::OperationError;
use ops_warden_core::OperationRegistry;
use ops_warden_core::PolicyDocument;
use ops_warden_core::ToolCategory;
use ops_warden_core::ToolDescriptor;
use ops_warden_core::ToolName;
use ops_warden_core::ToolRequest;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

/// Demo policy mirroring the shipped `config/ops-policy.json`.
pub fn demo_policy() -> Arc<PolicyDocument> {
    let policy: PolicyDocument = serde_json::from_value(json!({
        "policy_name": "fleet-operations",
        "version": "1.0",
        "global_rules": { "always_blocked": ["delete_database"] },
        "modes": {
            "NORMAL": {
                "description": "Steady-state operations",
                "rationale": "Only observation is permitted outside incidents",
                "allowed_tools": ["get_service_status", "read_logs", "list_services"],
                "blocked_tools": ["restart_service", "scale_fleet"]
            },
            "EMERGENCY": {
                "description": "Incident response",
                "rationale": "Remediation actions are permitted during incidents",
                "allowed_tools": [
                    "get_service_status",
                    "read_logs",
                    "list_services",
                    "restart_service",
                    "scale_fleet"
                ],
                "blocked_tools": []
            }
        }
    }))
    .expect("demo policy parses");
    Arc::new(policy)
}

/// Operation stub counting how often it was invoked.
pub struct CountingOperation {
    /// Tool name reported by the descriptor.
    pub name: ToolName,
    /// Number of invocations observed.
    pub calls: Arc<AtomicUsize>,
    /// Result returned on invocation.
    pub outcome: Result<Value, fn() -> OperationError>,
}

impl CountingOperation {
    /// Creates a stub that succeeds with an empty object.
    pub fn succeeding(name: &str, calls: Arc<AtomicUsize>) -> Self {
        Self {
            name: ToolName::new(name),
            calls,
            outcome: Ok(json!({"status": "success"})),
        }
    }

    /// Creates a stub that fails with the supplied error constructor.
    pub fn failing(name: &str, calls: Arc<AtomicUsize>, error: fn() -> OperationError) -> Self {
        Self {
            name: ToolName::new(name),
            calls,
            outcome: Err(error),
        }
    }
}

impl Operation for CountingOperation {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: "counting stub",
            category: ToolCategory::ReadOnly,
            parameters: Vec::new(),
        }
    }

    fn invoke(&self, _args: &Map<String, Value>) -> Result<Value, OperationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(value) => Ok(value.clone()),
            Err(error) => Err(error()),
        }
    }
}

/// Builds a gateway over the demo policy with counting stubs for every tool.
pub fn demo_gateway() -> (ExecutionGateway, Arc<ModeController>, Arc<AtomicUsize>) {
    let policy = demo_policy();
    let modes = Arc::new(ModeController::new(Arc::clone(&policy)));
    let engine = DecisionEngine::new(Arc::clone(&policy), Arc::clone(&modes));
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = OperationRegistry::new();
    for tool in [
        "get_service_status",
        "read_logs",
        "list_services",
        "restart_service",
        "scale_fleet",
        "delete_database",
    ] {
        registry
            .register(CountingOperation::succeeding(tool, Arc::clone(&calls)))
            .expect("unique tool name");
    }
    let clock: Arc<dyn Clock> = Arc::new(LogicalClock::new());
    let gateway = ExecutionGateway::new(engine, registry, Arc::new(AuditLog::new()), clock);
    (gateway, modes, calls)
}

/// Builds a request with empty arguments and context.
pub fn request(tool: &str) -> ToolRequest {
    ToolRequest {
        tool_name: ToolName::new(tool),
        arguments: Map::new(),
        context: Map::new(),
    }
}
