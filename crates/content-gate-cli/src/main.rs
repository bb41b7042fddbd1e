// crates/content-gate-cli/src/main.rs
// ============================================================================
// Module: Content Gate CLI Entry Point
// Description: Command dispatcher for gate evaluation and state inspection.
// Purpose: Run the gate engine against real collaborators from the shell.
// Dependencies: clap, content-gate-config, content-gate-core, content-gate-http,
//               content-gate-store-sqlite, serde_json, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `content-gate` binary loads `content-gate.toml` (or the file named by
//! `--config` / `CONTENT_GATE_CONFIG`), applies command-line overrides, and
//! runs one command. Decisions and state are printed as JSON on stdout; logs
//! go to stderr, filtered by `CONTENT_GATE_LOG`. A native decision is still a
//! successful run; only configuration and bootstrap failures exit non-zero.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use content_gate_config::ContentGateConfig;
use content_gate_core::DeviceClass;
use content_gate_core::DeviceIdentity;
use content_gate_core::GateEngine;
use content_gate_core::GateKeys;
use content_gate_core::GateState;
use content_gate_core::StoredDeviceIdentity;
use content_gate_http::HttpResolver;
use content_gate_http::TcpConnectivityProbe;
use content_gate_store_sqlite::SqliteKeyValueStore;
use serde_json::json;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "CONTENT_GATE_LOG";
/// Log filter applied when `CONTENT_GATE_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "content-gate", version, about = "Sticky external/native content gate")]
struct Cli {
    /// Optional config file path (defaults to content-gate.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected command.
    #[command(subcommand)]
    command: Commands,
}

/// Supported commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the gate and print the decision.
    Evaluate(GateOverrides),
    /// Print the persisted state for the configured cache key.
    State(GateOverrides),
    /// Print the persisted device identity, creating it if absent.
    DeviceId(StoreOverride),
}

/// Command-line overrides for the `[gate]`, `[store]`, and `[device]` sections.
#[derive(Args, Debug, Default)]
struct GateOverrides {
    /// Destination URL.
    #[arg(long, value_name = "URL")]
    url: Option<String>,
    /// RFC 3339 instant before which external content is withheld.
    #[arg(long, value_name = "RFC3339")]
    target_date: Option<String>,
    /// Skip the device-class checkpoint.
    #[arg(long)]
    no_device_check: bool,
    /// Resolve timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
    /// Cache key scoping persisted state.
    #[arg(long, value_name = "KEY")]
    cache_key: Option<String>,
    /// Device class (phone, tablet, desktop, unknown).
    #[arg(long, value_name = "CLASS")]
    device_class: Option<DeviceClass>,
    /// Store path override.
    #[command(flatten)]
    store: StoreOverride,
}

/// Command-line override for the store path.
#[derive(Args, Debug, Default)]
struct StoreOverride {
    /// SQLite database path.
    #[arg(long = "store", value_name = "PATH")]
    path: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_logging();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    let mut config = ContentGateConfig::load_or_default(cli.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    match cli.command {
        Commands::Evaluate(overrides) => {
            apply_overrides(&mut config, overrides)?;
            command_evaluate(&config)
        }
        Commands::State(overrides) => {
            apply_overrides(&mut config, overrides)?;
            command_state(&config)
        }
        Commands::DeviceId(store) => {
            apply_store_override(&mut config, store);
            command_device_id(&config)
        }
    }
}

/// Installs the stderr log subscriber.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Applies command-line overrides and revalidates the configuration.
fn apply_overrides(config: &mut ContentGateConfig, overrides: GateOverrides) -> CliResult<()> {
    if let Some(url) = overrides.url {
        config.gate.url = Some(url);
    }
    if let Some(target_date) = overrides.target_date {
        config.gate.target_date = Some(target_date);
    }
    if overrides.no_device_check {
        config.gate.check_device = false;
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        config.gate.timeout_ms = timeout_ms;
    }
    if let Some(cache_key) = overrides.cache_key {
        config.gate.cache_key = Some(cache_key);
    }
    if let Some(class) = overrides.device_class {
        config.device.class = class;
    }
    apply_store_override(config, overrides.store);
    config.validate().map_err(|err| CliError::new(err.to_string()))
}

/// Applies the store path override.
fn apply_store_override(config: &mut ContentGateConfig, store: StoreOverride) {
    if let Some(path) = store.path {
        config.store.path = path;
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Evaluates the gate against real collaborators.
fn command_evaluate(config: &ContentGateConfig) -> CliResult<ExitCode> {
    let request = config.gate.to_request().map_err(|err| CliError::new(err.to_string()))?;
    let engine = GateEngine::builder()
        .store(open_store(config)?)
        .probe(
            TcpConnectivityProbe::new(config.probe.clone())
                .map_err(|err| CliError::new(err.to_string()))?,
        )
        .resolver(
            HttpResolver::new(config.http.clone())
                .map_err(|err| CliError::new(err.to_string()))?,
        )
        .device_classifier(config.device.class)
        .build()
        .map_err(|err| CliError::new(err.to_string()))?;
    debug!(url = %request.url, cache_key = request.cache_key(), "evaluating gate");
    let decision = engine.evaluate(&request);
    write_json(&decision)?;
    Ok(ExitCode::SUCCESS)
}

/// Prints persisted state without evaluating.
fn command_state(config: &ContentGateConfig) -> CliResult<ExitCode> {
    let url = config
        .gate
        .url
        .as_deref()
        .ok_or_else(|| CliError::new("gate.url is required".to_string()))?;
    let cache_key = config.gate.cache_key.as_deref().unwrap_or(url);
    let store = open_store(config)?;
    let state = GateState::load(&store, &GateKeys::derive(cache_key, url))
        .map_err(|err| CliError::new(err.to_string()))?;
    write_json(&json!({
        "cache_key": cache_key,
        "state": state,
    }))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the persisted device identity.
fn command_device_id(config: &ContentGateConfig) -> CliResult<ExitCode> {
    let identity = StoredDeviceIdentity::new(Arc::new(open_store(config)?));
    write_stdout_line(&identity.device_id())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens the configured SQLite store.
fn open_store(config: &ContentGateConfig) -> CliResult<SqliteKeyValueStore> {
    SqliteKeyValueStore::new(&config.store).map_err(|err| CliError::new(err.to_string()))
}

/// Writes a value as pretty JSON on stdout.
fn write_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("json encoding failed: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
