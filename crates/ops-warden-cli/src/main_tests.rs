// crates/ops-warden-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Argument parsing and policy check plumbing tests.
// Purpose: Validate CLI surface without spawning processes.
// Dependencies: ops-warden-cli, clap, tempfile
// ============================================================================

//! ## Overview
//! CLI tests cover argument parsing shapes and the `policy check` command's
//! load-and-lint flow against files on disk.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::use_debug,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::io::Write;

use clap::Parser;
use tempfile::NamedTempFile;

use super::Cli;
use super::Commands;
use super::PolicyCommand;
use super::command_policy_check;

#[test]
fn parse_serve_with_config_path() {
    let cli = Cli::parse_from(["ops-warden", "serve", "--config", "warden.toml"]);
    match cli.command {
        Some(Commands::Serve(command)) => {
            assert_eq!(command.config.as_deref().map(|p| p.display().to_string()),
                       Some("warden.toml".to_string()));
        }
        other => panic!("expected serve command, got {other:?}"),
    }
}

#[test]
fn parse_policy_check() {
    let cli = Cli::parse_from(["ops-warden", "policy", "check", "--file", "policy.json"]);
    match cli.command {
        Some(Commands::Policy {
            command: PolicyCommand::Check(command),
        }) => {
            assert_eq!(command.file.display().to_string(), "policy.json");
        }
        other => panic!("expected policy check command, got {other:?}"),
    }
}

#[test]
fn parse_version_flag() {
    let cli = Cli::parse_from(["ops-warden", "--version"]);
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}

#[test]
fn policy_check_succeeds_on_a_valid_document() {
    let mut file = NamedTempFile::new().expect("temp policy file");
    file.write_all(
        br#"{ "policy_name": "p", "version": "1",
              "global_rules": { "always_blocked": [] },
              "modes": {
                  "NORMAL": { "description": "d", "rationale": "r",
                              "allowed_tools": ["read_logs"], "blocked_tools": [] } } }"#,
    )
    .expect("policy written");
    let command = super::PolicyCheckCommand {
        file: file.path().to_path_buf(),
    };
    assert!(command_policy_check(&command).is_ok());
}

#[test]
fn policy_check_fails_on_malformed_document() {
    let mut file = NamedTempFile::new().expect("temp policy file");
    file.write_all(b"{ not json").expect("content written");
    let command = super::PolicyCheckCommand {
        file: file.path().to_path_buf(),
    };
    assert!(command_policy_check(&command).is_err());
}
