// crates/notification-policy-cli/src/main.rs
// ============================================================================
// Module: Notification Policy CLI Entry Point
// Description: Command dispatcher for notification policy lifecycle workflows.
// Purpose: Apply, refresh, import, and delete policies tracked in a state file.
// Dependencies: clap, notification-policy-client, notification-policy-config,
//               notification-policy-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `notification-policy` drives the resource lifecycle from the command line.
//! Desired configuration comes from a TOML policy definition; the last
//! observed remote state is kept as JSON in a state file. Results are written
//! to stdout as pretty JSON and failures to stderr with a non-zero exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use notification_policy_client::HttpNotificationPolicyClient;
use notification_policy_config::AuditConfig;
use notification_policy_config::PolicyDefinition;
use notification_policy_config::ProviderConfig;
use notification_policy_core::AuditSink;
use notification_policy_core::JsonlAuditSink;
use notification_policy_core::NoopAuditSink;
use notification_policy_core::NotificationPolicyApi;
use notification_policy_core::NotificationPolicyResource;
use notification_policy_core::PolicyState;
use notification_policy_core::notification_policy_schema;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum state file size in bytes.
const MAX_STATE_FILE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "notification-policy", version, disable_help_subcommand = true)]
struct Cli {
    /// Provider config path (overrides `NOTIFICATION_POLICY_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update a policy from a definition file.
    Apply(ApplyCommand),
    /// Refresh the state file from the remote policy.
    Refresh(StateArgs),
    /// Import an existing policy into a state file.
    Import(ImportCommand),
    /// Delete the remote policy and remove the state file.
    Delete(StateArgs),
    /// Print the resource schema as JSON.
    Schema,
}

/// State file argument shared by lifecycle commands.
#[derive(Args, Debug)]
struct StateArgs {
    /// Path to the JSON state file.
    #[arg(long, value_name = "FILE")]
    state: PathBuf,
}

/// Arguments for `apply`.
#[derive(Args, Debug)]
struct ApplyCommand {
    /// Path to the TOML policy definition.
    #[arg(long, value_name = "FILE")]
    policy: PathBuf,
    /// State file location.
    #[command(flatten)]
    state: StateArgs,
}

/// Arguments for `import`.
#[derive(Args, Debug)]
struct ImportCommand {
    /// Import identifier in the form `<account_id>/<policy_id>`.
    #[arg(value_name = "ACCOUNT/POLICY")]
    id: String,
    /// State file location.
    #[command(flatten)]
    state: StateArgs,
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
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli) -> CliResult<ExitCode> {
    if matches!(cli.command, Commands::Schema) {
        write_json(&notification_policy_schema())?;
        return Ok(ExitCode::SUCCESS);
    }
    let config = ProviderConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let client_config = config.api.client_config().map_err(|err| CliError::new(err.to_string()))?;
    let client = HttpNotificationPolicyClient::new(&client_config)
        .map_err(|err| CliError::new(err.to_string()))?;
    let resource = NotificationPolicyResource::with_audit(client, build_audit_sink(&config.audit)?);

    match cli.command {
        Commands::Apply(command) => command_apply(&resource, &config, &command),
        Commands::Refresh(args) => command_refresh(&resource, &args),
        Commands::Import(command) => command_import(&resource, &command),
        Commands::Delete(args) => command_delete(&resource, &args),
        Commands::Schema => Ok(ExitCode::SUCCESS),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `apply`: create when untracked, otherwise refresh and update on
/// drift. A partially applied write still updates the state file.
fn command_apply<A: NotificationPolicyApi>(
    resource: &NotificationPolicyResource<A>,
    config: &ProviderConfig,
    command: &ApplyCommand,
) -> CliResult<ExitCode> {
    let desired = PolicyDefinition::load(&command.policy, config.defaults.account_id.as_ref())
        .map_err(|err| CliError::new(format!("failed to load policy: {err}")))?;
    let outcome = match read_state(&command.state.state)? {
        None => resource.create(&desired),
        Some(prior) => resource.read(&prior).and_then(|current| {
            if desired.differs_from(&current) {
                resource.update(&current, &desired)
            } else {
                Ok(current)
            }
        }),
    };
    let next = match outcome {
        Ok(next) => next,
        Err(err) => {
            if let Some(recovered) = err.recovered_state() {
                write_state(&command.state.state, recovered)?;
            }
            return Err(CliError::new(err.to_string()));
        }
    };
    write_state(&command.state.state, &next)?;
    write_json(&next)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `refresh`.
fn command_refresh<A: NotificationPolicyApi>(
    resource: &NotificationPolicyResource<A>,
    args: &StateArgs,
) -> CliResult<ExitCode> {
    let prior = require_state(&args.state)?;
    let current = resource.read(&prior).map_err(|err| CliError::new(err.to_string()))?;
    write_state(&args.state, &current)?;
    write_json(&current)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `import`.
fn command_import<A: NotificationPolicyApi>(
    resource: &NotificationPolicyResource<A>,
    command: &ImportCommand,
) -> CliResult<ExitCode> {
    if command.state.state.exists() {
        return Err(CliError::new(format!(
            "state file {} already exists",
            command.state.state.display()
        )));
    }
    let imported = resource.import(&command.id).map_err(|err| CliError::new(err.to_string()))?;
    write_state(&command.state.state, &imported)?;
    write_json(&imported)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `delete`.
fn command_delete<A: NotificationPolicyApi>(
    resource: &NotificationPolicyResource<A>,
    args: &StateArgs,
) -> CliResult<ExitCode> {
    let state = require_state(&args.state)?;
    resource.delete(&state).map_err(|err| CliError::new(err.to_string()))?;
    fs::remove_file(&args.state).map_err(|err| {
        CliError::new(format!("failed to remove state file {}: {err}", args.state.display()))
    })?;
    write_json(&json!({
        "account_id": state.account_id,
        "id": state.id,
        "deleted": true,
    }))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Builds the lifecycle audit sink from configuration.
fn build_audit_sink(config: &AuditConfig) -> CliResult<Arc<dyn AuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    let Some(path) = &config.path else {
        return Ok(Arc::new(JsonlAuditSink::new(std::io::stderr())));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.trim())
        .map_err(|err| CliError::new(format!("failed to open audit log {path}: {err}")))?;
    Ok(Arc::new(JsonlAuditSink::new(file)))
}

// ============================================================================
// SECTION: State Files
// ============================================================================

/// Errors raised by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
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
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads the state file, returning `None` when it does not exist.
fn read_state(path: &Path) -> CliResult<Option<PolicyState>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = read_bytes_with_limit(path, MAX_STATE_FILE_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read state file {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "state file {} is {size} bytes, exceeding the {limit} byte limit",
            path.display()
        )),
    })?;
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|err| CliError::new(format!("invalid state file {}: {err}", path.display())))
}

/// Reads the state file, failing when it does not exist.
fn require_state(path: &Path) -> CliResult<PolicyState> {
    read_state(path)?
        .ok_or_else(|| CliError::new(format!("state file {} does not exist", path.display())))
}

/// Writes the state file through a temporary sibling and a rename.
fn write_state(path: &Path, state: &PolicyState) -> CliResult<()> {
    let mut bytes = serde_json::to_vec_pretty(state)
        .map_err(|err| CliError::new(format!("failed to encode state: {err}")))?;
    bytes.push(b'\n');
    let staging = path.with_extension("tmp");
    fs::write(&staging, &bytes)
        .and_then(|()| fs::rename(&staging, path))
        .map_err(|err| {
            CliError::new(format!("failed to write state file {}: {err}", path.display()))
        })
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a value to stdout as pretty JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("failed to encode output: {err}")))?;
    write_stdout_line(&rendered)
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
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

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
