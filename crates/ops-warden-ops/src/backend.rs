// crates/ops-warden-ops/src/backend.rs
// ============================================================================
// Module: Simulated Fleet Backend
// Description: In-memory fleet of services with health states.
// Purpose: Provide deterministic operational state for the demo operations.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The fleet backend simulates a small service fleet: four named services
//! with a health state each and an instance count. State lives behind one
//! mutex; every method takes the lock for the duration of one state
//! transition so callers observe whole states only. Domain failures
//! (unknown service, out-of-range fleet size) are typed errors, not result
//! payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Smallest fleet size accepted by scaling.
pub const MIN_FLEET_SIZE: u32 = 1;
/// Largest fleet size accepted by scaling.
pub const MAX_FLEET_SIZE: u32 = 100;
/// Initial fleet size.
const INITIAL_FLEET_SIZE: u32 = 3;
/// Simulated log lines returned by the log reader.
const LOG_LINES: &[&str] = &[
    "[INFO] web-server processing request - 200 OK",
    "[INFO] database connection pool: 45/100 active",
    "[WARN] api-gateway response time: 234ms (threshold: 200ms)",
    "[INFO] cache hit rate: 87%",
    "[INFO] fleet health check: all instances responding",
];

// ============================================================================
// SECTION: Service Health
// ============================================================================

/// Health state of one simulated service.
///
/// # Invariants
/// - Variants are stable for serialization and status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceHealth {
    /// Service is operating normally.
    Healthy,
    /// Service is degraded but serving.
    Degraded,
    /// Service is in a critical state.
    Critical,
}

impl ServiceHealth {
    /// Returns a stable label for this health state.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Critical => "critical",
        }
    }

    /// Parses a health label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "healthy" => Some(Self::Healthy),
            "degraded" => Some(Self::Degraded),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Domain failures raised by the fleet backend.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FleetError {
    /// The named service does not exist.
    #[error("service '{name}' not found (available: {})", .available.join(", "))]
    UnknownService {
        /// Service that was requested.
        name: String,
        /// Services known to the backend.
        available: Vec<String>,
    },
    /// Requested fleet size is out of bounds.
    #[error("fleet size must be between {MIN_FLEET_SIZE} and {MAX_FLEET_SIZE}, got {requested}")]
    FleetSizeOutOfRange {
        /// Requested instance count.
        requested: u32,
    },
}

// ============================================================================
// SECTION: Fleet State
// ============================================================================

/// Mutable fleet state guarded by the backend mutex.
#[derive(Debug)]
struct FleetState {
    /// Service health keyed by service name.
    services: BTreeMap<String, ServiceHealth>,
    /// Current number of instances.
    fleet_size: u32,
}

impl Default for FleetState {
    fn default() -> Self {
        let services = ["web-server", "api-gateway", "database", "cache"]
            .into_iter()
            .map(|name| (name.to_string(), ServiceHealth::Healthy))
            .collect();
        Self {
            services,
            fleet_size: INITIAL_FLEET_SIZE,
        }
    }
}

/// Simulated fleet of services.
///
/// # Invariants
/// - State transitions are atomic; callers observe whole states only.
/// - The service set is fixed for the process lifetime; only health and
///   fleet size change.
#[derive(Debug, Default)]
pub struct FleetBackend {
    /// Guarded fleet state.
    state: Mutex<FleetState>,
}

impl FleetBackend {
    /// Creates a backend with four healthy services and the initial fleet
    /// size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists the known service names. Read-only and idempotent.
    #[must_use]
    pub fn list_services(&self) -> Vec<String> {
        let state = self.lock();
        state.services.keys().cloned().collect()
    }

    /// Reports health for one service or the whole fleet. Read-only and
    /// idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::UnknownService`] when a named service does not
    /// exist.
    pub fn service_status(&self, service: Option<&str>) -> Result<Value, FleetError> {
        let state = self.lock();
        match service {
            Some(name) => {
                let health = state
                    .services
                    .get(name)
                    .copied()
                    .ok_or_else(|| Self::unknown_service(&state, name))?;
                Ok(json!({
                    "service": name,
                    "health": health.label(),
                }))
            }
            None => {
                let services: BTreeMap<&str, &str> = state
                    .services
                    .iter()
                    .map(|(name, health)| (name.as_str(), health.label()))
                    .collect();
                Ok(json!({
                    "services": services,
                    "fleet_size": state.fleet_size,
                }))
            }
        }
    }

    /// Returns up to `lines` simulated log lines. Read-only and idempotent.
    #[must_use]
    pub fn read_logs(&self, lines: usize) -> Value {
        let selected: Vec<&str> = LOG_LINES.iter().copied().take(lines).collect();
        json!({
            "log_lines": selected,
            "total_available": LOG_LINES.len(),
        })
    }

    /// Restarts a service, resetting it to healthy. State-changing; not
    /// idempotent from the caller's perspective (each call is a restart).
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::UnknownService`] when the service does not
    /// exist.
    pub fn restart_service(&self, name: &str) -> Result<Value, FleetError> {
        let mut state = self.lock();
        if !state.services.contains_key(name) {
            return Err(Self::unknown_service(&state, name));
        }
        state.services.insert(name.to_string(), ServiceHealth::Healthy);
        Ok(json!({
            "status": "success",
            "service": name,
            "action": "restart",
            "new_health": ServiceHealth::Healthy.label(),
        }))
    }

    /// Scales the fleet to `count` instances. State-changing.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::FleetSizeOutOfRange`] when `count` is outside
    /// the supported bounds.
    pub fn scale_fleet(&self, count: u32) -> Result<Value, FleetError> {
        if !(MIN_FLEET_SIZE..=MAX_FLEET_SIZE).contains(&count) {
            return Err(FleetError::FleetSizeOutOfRange {
                requested: count,
            });
        }
        let mut state = self.lock();
        let old_size = state.fleet_size;
        state.fleet_size = count;
        Ok(json!({
            "status": "success",
            "action": "scale",
            "old_size": old_size,
            "new_size": count,
        }))
    }

    /// Overrides one service's health. Used for incident simulation only;
    /// not exposed as a registered tool.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::UnknownService`] when the service does not
    /// exist.
    pub fn set_service_health(
        &self,
        name: &str,
        health: ServiceHealth,
    ) -> Result<(), FleetError> {
        let mut state = self.lock();
        if !state.services.contains_key(name) {
            return Err(Self::unknown_service(&state, name));
        }
        state.services.insert(name.to_string(), health);
        Ok(())
    }

    /// Returns a snapshot of services and fleet size for status reporting.
    #[must_use]
    pub fn snapshot(&self) -> (BTreeMap<String, ServiceHealth>, u32) {
        let state = self.lock();
        (state.services.clone(), state.fleet_size)
    }

    /// Acquires the state lock, recovering from poisoning.
    fn lock(&self) -> std::sync::MutexGuard<'_, FleetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Builds the unknown-service error with the available service list.
    fn unknown_service(state: &FleetState, name: &str) -> FleetError {
        FleetError::UnknownService {
            name: name.to_string(),
            available: state.services.keys().cloned().collect(),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
