// crates/mysql-publisher-cli/src/main.rs
// ============================================================================
// Module: MySQL Publisher CLI Entry Point
// Description: Command dispatcher for publishing metric batches to MySQL.
// Purpose: Host the publisher plugin outside a metrics pipeline.
// Dependencies: clap, mysql-publisher, mysql-publisher-config, tracing-subscriber
// ============================================================================

//! ## Overview
//! The CLI plays the part of the plugin host: it prints the plugin
//! descriptor and config policy, and publishes a single batch read from a file
//! or stdin using configuration from a TOML file and the environment.
//! Security posture: inputs are untrusted and size-limited.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use mysql_publisher::MysqlDatastoreOptions;
use mysql_publisher::MysqlPublisherPlugin;
use mysql_publisher_config::ConfigMap;
use mysql_publisher_config::apply_env_overrides;
use mysql_publisher_config::load_config_file;
use mysql_publisher_config::publisher_config_policy;
use mysql_publisher_config::resolve_config_path;
use mysql_publisher_core::SNAP_JSON_CONTENT_TYPE;
use mysql_publisher_core::plugin_meta;
use mysql_publisher_core::runtime::MAX_BATCH_BYTES;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "mysql-publisher", version, about = "Publish metric batches into MySQL")]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the plugin descriptor as JSON.
    Meta,
    /// Print the config policy as JSON.
    Policy,
    /// Publish one batch.
    Publish(PublishCommand),
}

/// Arguments for `publish`.
#[derive(Args, Debug)]
struct PublishCommand {
    /// TOML config file (falls back to `MYSQL_PUBLISHER_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Batch encoding.
    #[arg(long, value_name = "TYPE", default_value = SNAP_JSON_CONTENT_TYPE)]
    content_type: String,
    /// Batch file; stdin when omitted.
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,
    /// TCP connect timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    connect_timeout_ms: Option<u64>,
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

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    match cli.command {
        Commands::Meta => command_meta(),
        Commands::Policy => command_policy(),
        Commands::Publish(command) => command_publish(&command),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing(level: &str) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| CliError::new(format!("invalid log level '{level}': {err}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CliError::new(format!("cannot initialize logging: {err}")))
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Prints the plugin descriptor.
fn command_meta() -> CliResult<ExitCode> {
    let json = serde_json::to_string_pretty(&plugin_meta())
        .map_err(|err| CliError::new(format!("cannot serialize metadata: {err}")))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error(&err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the config policy.
fn command_policy() -> CliResult<ExitCode> {
    let policy = publisher_config_policy().map_err(|err| CliError::new(err.to_string()))?;
    let json = policy.to_json().map_err(|err| CliError::new(err.to_string()))?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error(&err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Publishes one batch to MySQL.
fn command_publish(command: &PublishCommand) -> CliResult<ExitCode> {
    let config = load_host_config(command.config.as_deref(), env_lookup)?;
    let options = datastore_options(command.connect_timeout_ms);
    let mut plugin =
        MysqlPublisherPlugin::mysql(options).map_err(|err| CliError::new(err.to_string()))?;
    let payload = read_batch(command.input.as_deref())?;
    let report = plugin
        .publish(&command.content_type, &payload, &config)
        .map_err(|err| CliError::new(err.to_string()))?;
    plugin.close();
    write_stdout_line(&format!("published {} rows", report.rows_inserted))
        .map_err(|err| CliError::new(output_error(&err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable.
fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Builds the host config map from the config file and environment.
fn load_host_config(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> CliResult<ConfigMap> {
    let mut config = match resolve_config_path(path, &lookup) {
        Some(path) => {
            info!(path = %path.display(), "loading config file");
            load_config_file(&path).map_err(|err| CliError::new(err.to_string()))?
        }
        None => ConfigMap::new(),
    };
    let policy = publisher_config_policy().map_err(|err| CliError::new(err.to_string()))?;
    apply_env_overrides(&mut config, &policy, &lookup);
    Ok(config)
}

/// Builds datastore options from CLI flags.
fn datastore_options(connect_timeout_ms: Option<u64>) -> MysqlDatastoreOptions {
    let defaults = MysqlDatastoreOptions::default();
    MysqlDatastoreOptions {
        connect_timeout_ms: connect_timeout_ms.unwrap_or(defaults.connect_timeout_ms),
        ..defaults
    }
}

/// Reads the batch payload from a file or stdin.
fn read_batch(input: Option<&Path>) -> CliResult<Vec<u8>> {
    let result = match input {
        Some(path) => read_bytes_with_limit(path, MAX_BATCH_BYTES),
        None => read_to_limit(std::io::stdin().lock(), MAX_BATCH_BYTES),
    };
    result.map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(format!("cannot read batch: {err}")),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!("batch too large: {size} bytes (max {limit})")),
    })
}

/// Errors returned by bounded reads.
#[derive(Debug)]
enum ReadLimitError {
    /// I/O failure.
    Io(std::io::Error),
    /// Input exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    if size > u64::try_from(max_bytes).unwrap_or(u64::MAX) {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    read_to_limit(file, max_bytes)
}

/// Reads a stream to its end, failing once it exceeds `max_bytes`.
fn read_to_limit(reader: impl Read, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let read_limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    reader.take(read_limit).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

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

/// Formats an output error message.
fn output_error(error: &std::io::Error) -> String {
    format!("cannot write output: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
