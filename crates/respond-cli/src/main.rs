// crates/respond-cli/src/main.rs
// ============================================================================
// Module: Respond CLI Entry Point
// Description: Command dispatcher for the respond trigger engine.
// Purpose: Run chat commands against the configured response store.
// Dependencies: clap, respond-cli, respond-config, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! `respond` loads `respond.toml`, opens the configured store, fills the
//! trigger cache, and runs one command. Replies go to stdout one per line,
//! failures go to stderr with a failure exit code, and logs go to stderr
//! filtered by `RESPOND_LOG`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use respond_broker::CommandRunner;
use respond_broker::DisabledPublisher;
use respond_broker::HastePublisher;
use respond_broker::PastebinPublisher;
use respond_broker::ShellRunner;
use respond_broker::TextPublisher;
use respond_cli::AddRequest;
use respond_cli::AddTriggersRequest;
use respond_cli::AdminGate;
use respond_cli::ChancePolicy;
use respond_cli::EditRequest;
use respond_cli::Reply;
use respond_cli::Session;
use respond_config::PublishType;
use respond_config::RespondConfig;
use respond_config::StoreType;
use respond_core::InMemoryResponseStore;
use respond_core::Respond;
use respond_core::ResponseStore;
use respond_store_sqlite::SqliteResponseStore;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter.
const LOG_ENV: &str = "RESPOND_LOG";
/// Log filter used when `RESPOND_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "info";
/// Nickname used for `%nick%` when `--nick` is omitted.
const DEFAULT_NICK: &str = "someone";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "respond", version, about = "Trigger-based canned responses")]
struct Cli {
    /// Optional config file path (defaults to respond.toml or `RESPOND_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Caller hostmask (`nick!user@host`) used for admin checks.
    #[arg(long, value_name = "MASK", global = true)]
    hostmask: Option<String>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a chat message into responses.
    Emit(EmitCommand),
    /// Create a response with one or more triggers.
    Add(AddCommand),
    /// Append triggers to an existing response.
    AddTriggers(AddTriggersCommand),
    /// Edit a response or trigger.
    Edit(EditCommand),
    /// Remove a response (and its triggers) or a trigger.
    Remove(RemoveCommand),
    /// Publish (or print) every response and trigger.
    List(ListCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `emit`.
#[derive(Args, Debug)]
struct EmitCommand {
    /// Incoming chat message.
    message: String,
    /// Nickname substituted for `%nick%`.
    #[arg(long)]
    nick: Option<String>,
}

/// Arguments for `add`.
#[derive(Args, Debug)]
struct AddCommand {
    /// Trigger chance between 0 and 1 (defaults to `respond.default_chance`).
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    chance: Option<f64>,
    /// Treat the response as a shell command.
    #[arg(long, action = ArgAction::SetTrue)]
    executable: bool,
    /// Trigger texts.
    #[arg(required = true)]
    triggers: Vec<String>,
    /// Response text.
    #[arg(long)]
    response: String,
    /// Author identity.
    #[arg(long)]
    author: String,
}

/// Arguments for `add-triggers`.
#[derive(Args, Debug)]
struct AddTriggersCommand {
    /// Trigger chance between 0 and 1 (defaults to `respond.default_chance`).
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    chance: Option<f64>,
    /// Target response id.
    response_id: i64,
    /// Trigger texts.
    #[arg(required = true)]
    triggers: Vec<String>,
    /// Author identity.
    #[arg(long)]
    author: String,
}

/// Arguments for `edit`.
#[derive(Args, Debug)]
struct EditCommand {
    /// `response` or `trigger`.
    target: String,
    /// Entity id.
    id: i64,
    /// Replacement text.
    text: String,
    /// Replacement chance (triggers only; keeps the stored chance when omitted).
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    chance: Option<f64>,
    /// Replacement executable flag (responses only).
    #[arg(long)]
    executable: Option<bool>,
}

/// Arguments for `remove`.
#[derive(Args, Debug)]
struct RemoveCommand {
    /// `response` or `trigger`.
    target: String,
    /// Entity id.
    id: i64,
}

/// Arguments for `list`.
#[derive(Args, Debug)]
struct ListCommand {
    /// Print the report instead of publishing it.
    #[arg(long, action = ArgAction::SetTrue)]
    local: bool,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a respond configuration file.
    Validate,
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
        Self { message }
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
    init_tracing();
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = RespondConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    if let Commands::Config { command: ConfigCommand::Validate } = cli.command {
        write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    match config.store.store_type {
        StoreType::Memory => {
            let session = open_session(InMemoryResponseStore::new(), &config)?;
            dispatch(session, cli.command, cli.hostmask.as_deref()).await
        }
        StoreType::Sqlite => {
            let sqlite = config
                .store
                .sqlite()
                .ok_or_else(|| CliError::new("sqlite store requires path".to_string()))?;
            let store = SqliteResponseStore::new(sqlite)
                .map_err(|err| CliError::new(format!("failed to open store: {err}")))?;
            let session = open_session(store, &config)?;
            dispatch(session, cli.command, cli.hostmask.as_deref()).await
        }
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// SECTION: Session Wiring
// ============================================================================

/// Loads the engine over `store` and wires the configured collaborators.
fn open_session<S: ResponseStore>(store: S, config: &RespondConfig) -> CliResult<Session<S>> {
    let engine = Respond::load(store)
        .map_err(|err| CliError::new(format!("failed to load triggers: {err}")))?;
    let admin = AdminGate::new(config.respond.no_admin, config.respond.admins.clone());
    let chance = ChancePolicy {
        default_chance: config.respond.chance().map_err(|err| CliError::new(err.to_string()))?,
        clamp: config.respond.clamp_chance,
    };
    Ok(Session::new(engine, admin, chance, build_publisher(config)?, build_runner(config)))
}

/// Builds the configured report publisher.
fn build_publisher(config: &RespondConfig) -> CliResult<Box<dyn TextPublisher>> {
    let publish = &config.publish;
    let timeout = Duration::from_millis(publish.timeout_ms);
    let base_url = publish.effective_base_url();
    let publisher: Box<dyn TextPublisher> = match publish.publish_type {
        PublishType::Haste => Box::new(
            HastePublisher::new(base_url, timeout).map_err(|err| CliError::new(err.to_string()))?,
        ),
        PublishType::Pastebin => {
            let key = publish.api_key.as_deref().unwrap_or_default();
            Box::new(
                PastebinPublisher::new(base_url, key, timeout)
                    .map_err(|err| CliError::new(err.to_string()))?,
            )
        }
        PublishType::None => Box::new(DisabledPublisher),
    };
    Ok(publisher)
}

/// Builds the executable-response runner when execution is enabled.
fn build_runner(config: &RespondConfig) -> Option<Box<dyn CommandRunner>> {
    let exec = &config.exec;
    exec.enabled.then(|| {
        Box::new(ShellRunner::new(
            exec.shell.clone(),
            Duration::from_millis(exec.timeout_ms),
            exec.max_output_lines,
        )) as Box<dyn CommandRunner>
    })
}

// ============================================================================
// SECTION: Command Dispatch
// ============================================================================

/// Runs one command against the session and prints its output.
async fn dispatch<S: ResponseStore>(
    mut session: Session<S>,
    command: Commands,
    hostmask: Option<&str>,
) -> CliResult<ExitCode> {
    let lines = match command {
        Commands::Emit(command) => {
            let nick = command.nick.as_deref().unwrap_or(DEFAULT_NICK);
            let replies = session.emit(&command.message, nick).await;
            Ok(replies.iter().map(render_reply).collect())
        }
        Commands::Add(command) => session.add(
            hostmask,
            AddRequest {
                triggers: command.triggers,
                response: command.response,
                chance: command.chance,
                author: command.author,
                executable: command.executable,
            },
        ),
        Commands::AddTriggers(command) => session.add_triggers(
            hostmask,
            AddTriggersRequest {
                response_id: command.response_id,
                triggers: command.triggers,
                chance: command.chance,
                author: command.author,
            },
        ),
        Commands::Edit(command) => session.edit(
            hostmask,
            &EditRequest {
                target: command.target,
                id: command.id,
                text: command.text,
                chance: command.chance,
                executable: command.executable,
            },
        ),
        Commands::Remove(command) => session.remove(hostmask, &command.target, command.id),
        Commands::List(command) => session.list(hostmask, command.local).await,
        Commands::Config { .. } => Ok(Vec::new()),
    }
    .map_err(|err| CliError::new(err.to_string()))?;
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Renders a reply as `intent: message`.
fn render_reply(reply: &Reply) -> String {
    format!("{}: {}", reply.intent.as_str(), reply.message)
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

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
