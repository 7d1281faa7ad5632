//! Config load validation tests for ops-warden-config.
// crates/ops-warden-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use ops_warden_config::ConfigError;
use ops_warden_config::WardenConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<WardenConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(WardenConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(WardenConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(WardenConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(WardenConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let result = WardenConfig::load(Some(Path::new("does-not-exist/ops-warden.toml")));
    match result {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("expected io error, got {other}")),
        Ok(_) => Err("expected missing-file load to fail".to_string()),
    }
}

#[test]
fn load_rejects_missing_policy_section() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[server]\nbind = \"127.0.0.1:8000\"\n").map_err(|err| err.to_string())?;
    match WardenConfig::load(Some(file.path())) {
        Err(ConfigError::Parse(_)) => Ok(()),
        Err(other) => Err(format!("expected parse error, got {other}")),
        Ok(_) => Err("expected load without [policy] to fail".to_string()),
    }
}

#[test]
fn load_rejects_empty_bind() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[server]\nbind = \"\"\n\n[policy]\npath = \"policy.json\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(WardenConfig::load(Some(file.path())), "server.bind must not be empty")?;
    Ok(())
}

#[test]
fn load_rejects_zero_body_cap() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[server]\nmax_body_bytes = 0\n\n[policy]\npath = \"policy.json\"\n")
        .map_err(|err| err.to_string())?;
    assert_invalid(WardenConfig::load(Some(file.path())), "max_body_bytes must be positive")?;
    Ok(())
}

#[test]
fn load_accepts_minimal_config_with_defaults() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"[policy]\npath = \"config/ops-policy.json\"\n")
        .map_err(|err| err.to_string())?;
    let config = WardenConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.server.bind != "127.0.0.1:8000" {
        return Err(format!("unexpected default bind: {}", config.server.bind));
    }
    if config.server.max_body_bytes != 64 * 1024 {
        return Err(format!("unexpected default body cap: {}", config.server.max_body_bytes));
    }
    Ok(())
}
