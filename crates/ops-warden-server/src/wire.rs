// crates/ops-warden-server/src/wire.rs
// ============================================================================
// Module: HTTP Wire Types
// Description: Request and response payloads for the gateway boundary.
// Purpose: Keep the transport contract explicit and separate from core types.
// Dependencies: ops-warden-core, ops-warden-ops, serde
// ============================================================================

//! ## Overview
//! Wire types translate between HTTP JSON payloads and core types. Response
//! field names are the boundary contract: `success`, `result`, `error`,
//! `policy_violation`, and `blocked_reason` for tool execution, matching
//! the documented gateway boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use ops_warden_core::AuditRecord;
use ops_warden_core::ModeName;
use ops_warden_core::ToolDescriptor;
use ops_warden_core::ToolName;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Tool Execution
// ============================================================================

/// Response payload for `POST /tools/execute`.
///
/// # Invariants
/// - `policy_violation` is true only for denials; execution failures keep
///   it false so callers can distinguish the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecuteResponse {
    /// Whether the operation completed normally.
    pub success: bool,
    /// Operation result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error message on denial or failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when the request was denied by policy.
    pub policy_violation: bool,
    /// Denial reason when `policy_violation` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
}

// ============================================================================
// SECTION: Mode Control
// ============================================================================

/// Request payload for `POST /policy/set-mode`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetModeRequest {
    /// Mode to switch to.
    pub mode: ModeName,
}

/// Response payload for a successful mode change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetModeResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Mode now in effect.
    pub new_mode: ModeName,
    /// Tools allowed in the new mode.
    pub allowed_tools: Vec<ToolName>,
}

/// Response payload for `GET /policy/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyStatusResponse {
    /// Current operational mode.
    pub current_mode: ModeName,
    /// Description of the current mode.
    pub description: String,
    /// Tools allowed in the current mode.
    pub allowed_tools: Vec<ToolName>,
    /// Tools blocked in the current mode.
    pub blocked_tools: Vec<ToolName>,
}

// ============================================================================
// SECTION: Catalog and Diagnostics
// ============================================================================

/// Response payload for `GET /tools/catalog`.
///
/// # Invariants
/// - Descriptive only; the decision engine remains authoritative.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCatalogResponse {
    /// Registered tool descriptors in name order.
    pub tools: Vec<ToolDescriptor>,
    /// Current operational mode.
    pub current_mode: ModeName,
    /// Tools allowed in the current mode.
    pub allowed_in_current_mode: Vec<ToolName>,
}

/// Response payload for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service name.
    pub service: String,
    /// Service status label.
    pub status: String,
    /// Current operational mode.
    pub current_mode: ModeName,
    /// Policy engine status label.
    pub policy_engine: String,
}

/// Response payload for `GET /fleet/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetStatusResponse {
    /// Service health labels keyed by service name.
    pub services: BTreeMap<String, String>,
    /// Current number of instances.
    pub fleet_size: u32,
    /// Most recent audit entries, oldest first.
    pub recent_actions: Vec<AuditRecord>,
}

/// Request payload for `POST /fleet/simulate-incident`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulateIncidentRequest {
    /// Service whose health is overridden.
    pub service: String,
    /// Health label to apply; defaults to `critical`.
    #[serde(default = "default_incident_status")]
    pub status: String,
}

/// Default incident health label.
fn default_incident_status() -> String {
    "critical".to_string()
}

/// Response payload for `POST /fleet/simulate-incident`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateIncidentResponse {
    /// Always true on the success path.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error body for 4xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}
