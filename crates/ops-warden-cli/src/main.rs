// crates/ops-warden-cli/src/main.rs
// ============================================================================
// Module: Ops Warden CLI Entry Point
// Description: Command dispatcher for the warden server and policy tooling.
// Purpose: Provide a safe CLI for serving and for policy inspection.
// Dependencies: clap, ops-warden-config, ops-warden-core, ops-warden-server
// ============================================================================

//! ## Overview
//! The Ops Warden CLI starts the HTTP server and inspects policy documents
//! offline. Startup is fail-closed: a config or policy problem aborts with
//! a non-zero exit code before the server binds. Policy lint findings
//! (tools listed as both allowed and blocked) are surfaced as warnings on
//! stderr rather than silently resolved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use ops_warden_config::WardenConfig;
use ops_warden_config::load_policy;
use ops_warden_core::Clock;
use ops_warden_core::PolicyDocument;
use ops_warden_server::SystemClock;
use ops_warden_server::WardenServer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "ops-warden", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Ops Warden HTTP server.
    Serve(ServeCommand),
    /// Policy inspection utilities.
    Policy {
        /// Selected policy subcommand.
        #[command(subcommand)]
        command: PolicyCommand,
    },
}

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Path to the warden configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Policy subcommands.
#[derive(Subcommand, Debug)]
enum PolicyCommand {
    /// Load and validate a policy document, reporting lint findings.
    Check(PolicyCheckCommand),
}

/// Arguments for `policy check`.
#[derive(Args, Debug)]
struct PolicyCheckCommand {
    /// Path to the JSON policy document.
    #[arg(long, value_name = "PATH")]
    file: PathBuf,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failure carrying a displayable message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Displayable failure message.
    message: String,
}

impl CliError {
    /// Creates a CLI error from a message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&format!("ops-warden: error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("ops-warden {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        write_stderr_line("ops-warden: no command given; try --help")
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
        return Ok(ExitCode::FAILURE);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Policy {
            command: PolicyCommand::Check(command),
        } => command_policy_check(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = WardenConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))?;
    let policy = load_policy(&config.policy.path)
        .map_err(|err| CliError::new(format!("policy load failed: {err}")))?;
    warn_policy_lint(&policy)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let server = WardenServer::from_parts(&config, Arc::new(policy), clock)
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    write_stderr_line(&format!("ops-warden: serving on {}", config.server.bind))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Policy Commands
// ============================================================================

/// Executes the `policy check` command.
fn command_policy_check(command: &PolicyCheckCommand) -> CliResult<ExitCode> {
    let policy = load_policy(&command.file)
        .map_err(|err| CliError::new(format!("policy check failed: {err}")))?;
    warn_policy_lint(&policy)?;
    let summary = serde_json::json!({
        "policy_name": policy.policy_name,
        "version": policy.version,
        "modes": policy.mode_names(),
        "always_blocked": policy.always_blocked(),
    });
    let rendered = serde_json::to_string_pretty(&summary)
        .map_err(|err| CliError::new(format!("summary serialization failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Writes policy lint findings as stderr warnings.
fn warn_policy_lint(policy: &PolicyDocument) -> CliResult<()> {
    for warning in policy.lint() {
        write_stderr_line(&format!("ops-warden: warning: {warning}"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream failure.
fn output_error(stream: &str, err: &std::io::Error) -> String {
    format!("failed to write to {stream}: {err}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod main_tests;
