// crates/ops-warden-config/src/lib.rs
// ============================================================================
// Module: Ops Warden Configuration
// Description: Configuration and policy loading for Ops Warden.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: ops-warden-core, serde, serde_json, thiserror, toml
// ============================================================================

//! ## Overview
//! The warden configuration is loaded from a TOML file and the policy
//! document from a JSON file. Both loads are fail-closed: path limits, a
//! size cap, a UTF-8 check, and a strict parse; missing or invalid input
//! aborts startup rather than serving with a partial policy. The policy
//! load additionally requires the fixed initial mode to be defined, so the
//! mode controller can never reference an unknown mode.
//!
//! Security posture: configuration and policy files are untrusted input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use ops_warden_core::DEFAULT_MODE;
use ops_warden_core::ModeName;
use ops_warden_core::PolicyDocument;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "ops-warden.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "OPS_WARDEN_CONFIG";
/// Maximum configuration or policy file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default request body cap for the HTTP server.
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
/// Upper bound accepted for the request body cap.
const MAX_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;
/// Default bind address for the HTTP server.
const DEFAULT_BIND: &str = "127.0.0.1:8000";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling; any variant is fatal at
///   startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML or JSON parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Warden Config
// ============================================================================

/// HTTP server settings.
///
/// # Invariants
/// - `bind` is non-empty; `max_body_bytes` is within (0, 8 MiB].
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default request body cap.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Validates server settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a setting is out of bounds.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind must not be empty".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be positive".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes exceeds the supported maximum".to_string(),
            ));
        }
        Ok(())
    }
}

/// Policy source settings.
///
/// # Invariants
/// - `path` points at the JSON policy document; it is required.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicySourceConfig {
    /// Filesystem path of the JSON policy document.
    pub path: PathBuf,
}

/// Top-level warden configuration.
///
/// # Invariants
/// - Validated fully at load; an instance in hand passed validation.
#[derive(Debug, Clone, Deserialize)]
pub struct WardenConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Policy source settings.
    pub policy: PolicySourceConfig,
}

impl WardenConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path argument, the `OPS_WARDEN_CONFIG`
    /// environment variable, then `ops-warden.toml` in the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path);
        let content = read_limited(&resolved)?;
        let config: Self =
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        if self.policy.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("policy.path must not be empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Policy Loading
// ============================================================================

/// Loads and validates a policy document from a JSON file.
///
/// The document must define the fixed initial mode and at least one mode
/// overall; both checks fail closed at startup.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, parsed, or the
/// document fails validation.
pub fn load_policy(path: &Path) -> Result<PolicyDocument, ConfigError> {
    let content = read_limited(path)?;
    let policy: PolicyDocument =
        serde_json::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    if policy.modes.is_empty() {
        return Err(ConfigError::Invalid("policy must define at least one mode".to_string()));
    }
    if !policy.contains_mode(&ModeName::new(DEFAULT_MODE)) {
        return Err(ConfigError::Invalid(format!(
            "policy must define the initial mode '{DEFAULT_MODE}'"
        )));
    }
    Ok(policy)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> PathBuf {
    if let Some(path) = path {
        return path.to_path_buf();
    }
    if let Ok(value) = env::var(CONFIG_ENV_VAR)
        && !value.trim().is_empty()
    {
        return PathBuf::from(value);
    }
    PathBuf::from(DEFAULT_CONFIG_NAME)
}

/// Validates path shape before touching the filesystem.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Reads a file with the shared size and encoding guards.
fn read_limited(path: &Path) -> Result<String, ConfigError> {
    validate_path(path)?;
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    Ok(content.to_string())
}
