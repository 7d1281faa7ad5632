// crates/ops-warden-ops/src/operations.rs
// ============================================================================
// Module: Built-in Operations
// Description: Operation implementations over the simulated fleet backend.
// Purpose: Expose the demo tool set through the core Operation interface.
// Dependencies: ops-warden-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Each built-in operation decodes its arguments into a typed struct with
//! `deny_unknown_fields`, so arity and type mismatches surface as
//! `InvalidArguments` before the backend is touched. Domain failures from
//! the backend map to operation faults with their messages preserved.
//!
//! The destructive `delete_database` operation is implemented but always
//! faults; policy is expected to list it in `global_rules.always_blocked`
//! so the gateway never dispatches it in the first place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use ops_warden_core::Operation;
use ops_warden_core::OperationError;
use ops_warden_core::OperationRegistry;
use ops_warden_core::ParameterKind;
use ops_warden_core::ParameterSpec;
use ops_warden_core::RegistryError;
use ops_warden_core::ToolCategory;
use ops_warden_core::ToolDescriptor;
use ops_warden_core::ToolName;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::backend::FleetBackend;

// ============================================================================
// SECTION: Argument Decoding
// ============================================================================

/// Decodes the arguments map into a typed argument struct.
///
/// # Errors
///
/// Returns [`OperationError::InvalidArguments`] on any mismatch, including
/// unknown fields.
fn decode_args<T: DeserializeOwned>(args: &Map<String, Value>) -> Result<T, OperationError> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|err| OperationError::InvalidArguments(err.to_string()))
}

/// Maps a backend domain failure to an operation fault.
fn fault(err: crate::backend::FleetError) -> OperationError {
    OperationError::Fault(err.to_string())
}

// ============================================================================
// SECTION: Read-Only Operations
// ============================================================================

/// Lists the known services.
pub struct ListServices {
    /// Shared fleet backend.
    backend: Arc<FleetBackend>,
}

/// Arguments for [`ListServices`] (none accepted).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListServicesArgs {}

impl Operation for ListServices {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolName::new("list_services"),
            description: "List all available services",
            category: ToolCategory::ReadOnly,
            parameters: Vec::new(),
        }
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<Value, OperationError> {
        let ListServicesArgs {} = decode_args(args)?;
        Ok(json!({ "services": self.backend.list_services() }))
    }
}

/// Reports health for one service or the whole fleet.
pub struct GetServiceStatus {
    /// Shared fleet backend.
    backend: Arc<FleetBackend>,
}

/// Arguments for [`GetServiceStatus`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetServiceStatusArgs {
    /// Specific service to check; all services when absent.
    service_name: Option<String>,
}

impl Operation for GetServiceStatus {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolName::new("get_service_status"),
            description: "Get the current health status of services",
            category: ToolCategory::ReadOnly,
            parameters: vec![ParameterSpec {
                name: "service_name",
                kind: ParameterKind::String,
                required: false,
                description: "Specific service to check (optional)",
            }],
        }
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<Value, OperationError> {
        let args: GetServiceStatusArgs = decode_args(args)?;
        self.backend.service_status(args.service_name.as_deref()).map_err(fault)
    }
}

/// Returns recent simulated log lines.
pub struct ReadLogs {
    /// Shared fleet backend.
    backend: Arc<FleetBackend>,
}

/// Arguments for [`ReadLogs`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadLogsArgs {
    /// Number of log lines to return; defaults to 10.
    lines: Option<usize>,
}

/// Default number of log lines returned.
const DEFAULT_LOG_LINES: usize = 10;

impl Operation for ReadLogs {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolName::new("read_logs"),
            description: "Read recent system logs",
            category: ToolCategory::ReadOnly,
            parameters: vec![ParameterSpec {
                name: "lines",
                kind: ParameterKind::Integer,
                required: false,
                description: "Number of log lines to retrieve (default 10)",
            }],
        }
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<Value, OperationError> {
        let args: ReadLogsArgs = decode_args(args)?;
        Ok(self.backend.read_logs(args.lines.unwrap_or(DEFAULT_LOG_LINES)))
    }
}

// ============================================================================
// SECTION: State-Changing Operations
// ============================================================================

/// Restarts a service.
pub struct RestartService {
    /// Shared fleet backend.
    backend: Arc<FleetBackend>,
}

/// Arguments for [`RestartService`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RestartServiceArgs {
    /// Service to restart.
    service_name: String,
}

impl Operation for RestartService {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolName::new("restart_service"),
            description: "Restart a service (elevated mode only)",
            category: ToolCategory::Active,
            parameters: vec![ParameterSpec {
                name: "service_name",
                kind: ParameterKind::String,
                required: true,
                description: "Name of the service to restart",
            }],
        }
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<Value, OperationError> {
        let args: RestartServiceArgs = decode_args(args)?;
        self.backend.restart_service(&args.service_name).map_err(fault)
    }
}

/// Scales the number of fleet instances.
pub struct ScaleFleet {
    /// Shared fleet backend.
    backend: Arc<FleetBackend>,
}

/// Arguments for [`ScaleFleet`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScaleFleetArgs {
    /// Target number of instances.
    count: u32,
}

impl Operation for ScaleFleet {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolName::new("scale_fleet"),
            description: "Scale the number of service instances (elevated mode only)",
            category: ToolCategory::Active,
            parameters: vec![ParameterSpec {
                name: "count",
                kind: ParameterKind::Integer,
                required: true,
                description: "Target number of instances",
            }],
        }
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<Value, OperationError> {
        let args: ScaleFleetArgs = decode_args(args)?;
        self.backend.scale_fleet(args.count).map_err(fault)
    }
}

// ============================================================================
// SECTION: Destructive Operations
// ============================================================================

/// Deletes a database. Expected to be globally blocked by policy.
pub struct DeleteDatabase;

/// Arguments for [`DeleteDatabase`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeleteDatabaseArgs {
    /// Database to delete.
    db_name: String,
}

impl Operation for DeleteDatabase {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: ToolName::new("delete_database"),
            description: "Delete a database (always blocked by policy)",
            category: ToolCategory::Destructive,
            parameters: vec![ParameterSpec {
                name: "db_name",
                kind: ParameterKind::String,
                required: true,
                description: "Name of the database",
            }],
        }
    }

    fn invoke(&self, args: &Map<String, Value>) -> Result<Value, OperationError> {
        let args: DeleteDatabaseArgs = decode_args(args)?;
        // Reaching this point means policy failed to block a destructive
        // operation; refuse rather than simulate a deletion.
        Err(OperationError::Fault(format!(
            "refusing to delete database '{}': destructive operation reached the backend",
            args.db_name
        )))
    }
}

// ============================================================================
// SECTION: Registry Builder
// ============================================================================

/// Builds the registry with every built-in operation registered.
///
/// # Errors
///
/// Returns [`RegistryError`] when a tool name collides, which indicates a
/// bug in the built-in set.
pub fn builtin_registry(backend: Arc<FleetBackend>) -> Result<OperationRegistry, RegistryError> {
    let mut registry = OperationRegistry::new();
    registry.register(ListServices {
        backend: Arc::clone(&backend),
    })?;
    registry.register(GetServiceStatus {
        backend: Arc::clone(&backend),
    })?;
    registry.register(ReadLogs {
        backend: Arc::clone(&backend),
    })?;
    registry.register(RestartService {
        backend: Arc::clone(&backend),
    })?;
    registry.register(ScaleFleet {
        backend,
    })?;
    registry.register(DeleteDatabase)?;
    Ok(registry)
}
