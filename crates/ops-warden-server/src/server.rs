// crates/ops-warden-server/src/server.rs
// ============================================================================
// Module: Warden HTTP Server
// Description: axum application exposing the execution gateway.
// Purpose: Translate HTTP requests into gateway calls and structured results.
// Dependencies: ops-warden-core, ops-warden-config, ops-warden-ops, axum, tokio
// ============================================================================

//! ## Overview
//! The server builds the gateway from configuration and exposes it over
//! HTTP. Request bodies are read as raw bytes so the configured size cap is
//! enforced before parsing. Policy violations and execution failures are
//! returned as structured 200 responses; only malformed requests produce
//! 4xx statuses. Security posture: request payloads are untrusted input and
//! are size-capped and strictly parsed before use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use bytes::Bytes;
use ops_warden_config::WardenConfig;
use ops_warden_config::load_policy;
use ops_warden_core::AuditLog;
use ops_warden_core::Clock;
use ops_warden_core::DecisionEngine;
use ops_warden_core::ExecutionError;
use ops_warden_core::ExecutionGateway;
use ops_warden_core::ExecutionResult;
use ops_warden_core::ModeController;
use ops_warden_core::PolicyDocument;
use ops_warden_core::StderrAuditSink;
use ops_warden_core::ToolRequest;
use ops_warden_ops::FleetBackend;
use ops_warden_ops::ServiceHealth;
use ops_warden_ops::builtin_registry;
use serde::de::DeserializeOwned;

use crate::clock::SystemClock;
use crate::wire::ErrorResponse;
use crate::wire::FleetStatusResponse;
use crate::wire::HealthResponse;
use crate::wire::PolicyStatusResponse;
use crate::wire::SetModeRequest;
use crate::wire::SetModeResponse;
use crate::wire::SimulateIncidentRequest;
use crate::wire::SimulateIncidentResponse;
use crate::wire::ToolCatalogResponse;
use crate::wire::ToolExecuteResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of audit entries included in the fleet status response.
const RECENT_AUDIT_ENTRIES: usize = 10;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Warden server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Server State
// ============================================================================

/// Shared state for route handlers.
pub struct ServerState {
    /// Execution gateway performing decisions and dispatch.
    gateway: ExecutionGateway,
    /// Mode controller shared with the gateway's engine.
    modes: Arc<ModeController>,
    /// Loaded policy document.
    policy: Arc<PolicyDocument>,
    /// Simulated fleet backend for diagnostics.
    backend: Arc<FleetBackend>,
    /// Maximum accepted request body size.
    max_body_bytes: usize,
}

// ============================================================================
// SECTION: Warden Server
// ============================================================================

/// Warden HTTP server instance.
pub struct WardenServer {
    /// Bind address for the listener.
    bind: String,
    /// Shared handler state.
    state: Arc<ServerState>,
}

impl WardenServer {
    /// Builds a server from configuration, loading the policy document.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the policy cannot be loaded or the
    /// built-in registry fails to assemble.
    pub fn from_config(config: &WardenConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let policy = load_policy(&config.policy.path)
            .map_err(|err| ServerError::Config(err.to_string()))?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self::from_parts(config, Arc::new(policy), clock)
    }

    /// Builds a server from preloaded parts. Used by `from_config` and by
    /// tests that inject a deterministic clock.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the built-in registry fails to
    /// assemble.
    pub fn from_parts(
        config: &WardenConfig,
        policy: Arc<PolicyDocument>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServerError> {
        let backend = Arc::new(FleetBackend::new());
        let registry = builtin_registry(Arc::clone(&backend))
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let modes = Arc::new(ModeController::new(Arc::clone(&policy)));
        let engine = DecisionEngine::new(Arc::clone(&policy), Arc::clone(&modes));
        let gateway = ExecutionGateway::new(engine, registry, Arc::new(AuditLog::new()), clock)
            .with_sink(Arc::new(StderrAuditSink));
        let state = Arc::new(ServerState {
            gateway,
            modes,
            policy,
            backend,
            max_body_bytes: config.server.max_body_bytes,
        });
        Ok(Self {
            bind: config.server.bind.clone(),
            state,
        })
    }

    /// Returns the axum router over the server state.
    #[must_use]
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.state))
    }

    /// Returns the shared handler state.
    #[must_use]
    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr: SocketAddr = self
            .bind
            .parse()
            .map_err(|_| ServerError::Config("invalid bind address".to_string()))?;
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app)
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

/// Builds the application router.
fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(handle_health))
        .route("/policy/status", get(handle_policy_status))
        .route("/policy/set-mode", post(handle_set_mode))
        .route("/tools/execute", post(handle_execute))
        .route("/tools/catalog", get(handle_catalog))
        .route("/fleet/status", get(handle_fleet_status))
        .route("/fleet/simulate-incident", post(handle_simulate_incident))
        .with_state(state)
}

// ============================================================================
// SECTION: Body Parsing
// ============================================================================

/// Parses a size-capped JSON request body.
///
/// # Errors
///
/// Returns a ready-to-send rejection: 413 when the body exceeds the cap,
/// 400 when it fails to parse.
fn parse_body<T: DeserializeOwned>(
    state: &ServerState,
    bytes: &Bytes,
) -> Result<T, (StatusCode, axum::Json<ErrorResponse>)> {
    if bytes.len() > state.max_body_bytes {
        return Err((
            StatusCode::PAYLOAD_TOO_LARGE,
            axum::Json(ErrorResponse {
                error: "request body too large".to_string(),
            }),
        ));
    }
    serde_json::from_slice(bytes.as_ref()).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(ErrorResponse {
                error: format!("invalid request body: {err}"),
            }),
        )
    })
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `GET /`.
async fn handle_health(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    axum::Json(HealthResponse {
        service: "ops-warden".to_string(),
        status: "operational".to_string(),
        current_mode: state.modes.current_mode(),
        policy_engine: "active".to_string(),
    })
}

/// Handles `GET /policy/status`.
async fn handle_policy_status(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let mode = state.modes.current_mode();
    match state.policy.mode_rules(&mode) {
        Ok(rules) => (
            StatusCode::OK,
            axum::Json(PolicyStatusResponse {
                current_mode: mode,
                description: rules.description.clone(),
                allowed_tools: rules.allowed_tools.iter().cloned().collect(),
                blocked_tools: rules.blocked_tools.iter().cloned().collect(),
            }),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Handles `POST /policy/set-mode`.
async fn handle_set_mode(
    State(state): State<Arc<ServerState>>,
    bytes: Bytes,
) -> impl IntoResponse {
    let request: SetModeRequest = match parse_body(&state, &bytes) {
        Ok(request) => request,
        Err(rejection) => return rejection.into_response(),
    };
    match state.modes.set_mode(request.mode.clone()) {
        Ok(()) => {
            let allowed_tools = state
                .policy
                .mode_rules(&request.mode)
                .map(|rules| rules.allowed_tools.iter().cloned().collect())
                .unwrap_or_default();
            (
                StatusCode::OK,
                axum::Json(SetModeResponse {
                    success: true,
                    new_mode: request.mode,
                    allowed_tools,
                }),
            )
                .into_response()
        }
        Err(err) => (
            StatusCode::BAD_REQUEST,
            axum::Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Handles `POST /tools/execute`.
async fn handle_execute(
    State(state): State<Arc<ServerState>>,
    bytes: Bytes,
) -> impl IntoResponse {
    let request: ToolRequest = match parse_body(&state, &bytes) {
        Ok(request) => request,
        Err(rejection) => return rejection.into_response(),
    };
    let response = match state.gateway.execute(&request) {
        ExecutionResult::Denied {
            class,
            reason,
        } => ToolExecuteResponse {
            success: false,
            result: None,
            error: Some(format!("policy violation: {}", class.label())),
            policy_violation: true,
            blocked_reason: Some(reason),
        },
        ExecutionResult::Succeeded {
            value,
        } => ToolExecuteResponse {
            success: true,
            result: Some(value),
            error: None,
            policy_violation: false,
            blocked_reason: None,
        },
        ExecutionResult::Failed {
            error,
        } => ToolExecuteResponse {
            success: false,
            result: None,
            error: Some(execution_error_label(&error)),
            policy_violation: false,
            blocked_reason: None,
        },
    };
    (StatusCode::OK, axum::Json(response)).into_response()
}

/// Formats an execution failure for the wire.
fn execution_error_label(error: &ExecutionError) -> String {
    format!("execution error: {error}")
}

/// Handles `GET /tools/catalog`.
async fn handle_catalog(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let mode = state.modes.current_mode();
    let allowed_in_current_mode = state
        .policy
        .mode_rules(&mode)
        .map(|rules| rules.allowed_tools.iter().cloned().collect())
        .unwrap_or_default();
    axum::Json(ToolCatalogResponse {
        tools: state.gateway.registry().descriptors(),
        current_mode: mode,
        allowed_in_current_mode,
    })
}

/// Handles `GET /fleet/status`.
async fn handle_fleet_status(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let (services, fleet_size) = state.backend.snapshot();
    let services = services
        .into_iter()
        .map(|(name, health)| (name, health.label().to_string()))
        .collect();
    axum::Json(FleetStatusResponse {
        services,
        fleet_size,
        recent_actions: state.gateway.audit().recent(RECENT_AUDIT_ENTRIES),
    })
}

/// Handles `POST /fleet/simulate-incident`.
async fn handle_simulate_incident(
    State(state): State<Arc<ServerState>>,
    bytes: Bytes,
) -> impl IntoResponse {
    let request: SimulateIncidentRequest = match parse_body(&state, &bytes) {
        Ok(request) => request,
        Err(rejection) => return rejection.into_response(),
    };
    let Some(health) = ServiceHealth::parse(&request.status) else {
        return (
            StatusCode::BAD_REQUEST,
            axum::Json(ErrorResponse {
                error: format!("unknown health status: {}", request.status),
            }),
        )
            .into_response();
    };
    match state.backend.set_service_health(&request.service, health) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(SimulateIncidentResponse {
                success: true,
                message: format!(
                    "simulated incident: {} set to {}",
                    request.service,
                    health.label()
                ),
            }),
        )
            .into_response(),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            axum::Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
