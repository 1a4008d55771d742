// crates/respond-broker/src/exec.rs
// ============================================================================
// Module: Respond Command Runner
// Description: Runs executable responses through a shell with a timeout.
// Purpose: Turn executable response text into reply lines.
// Dependencies: async-trait, tokio
// ============================================================================

//! ## Overview
//! [`ShellRunner`] runs `shell -c <text>` and returns the non-empty lines of
//! its standard output, capped at a configured count.
//! Invariants:
//! - Standard input is closed; the command cannot block on input.
//! - A command that outlives its timeout is killed and reported as an error.
//! - A non-zero exit status is an error carrying the command's stderr.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum characters of stderr carried into an error.
const MAX_STDERR_CHARS: usize = 512;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Command runner failures.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The command text was blank.
    #[error("command is empty")]
    EmptyCommand,
    /// The shell could not be started.
    #[error("failed to spawn {shell}: {reason}")]
    Spawn {
        /// Shell that failed to start.
        shell: String,
        /// Underlying I/O error.
        reason: String,
    },
    /// The command exceeded its timeout.
    #[error("command timed out after {0} ms")]
    Timeout(u128),
    /// Waiting on the command failed.
    #[error("command io error: {0}")]
    Io(String),
    /// The command exited unsuccessfully.
    #[error("command exited with status {status}: {stderr}")]
    Failed {
        /// Exit code, or `signal` when terminated by a signal.
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },
}

// ============================================================================
// SECTION: Runner Trait
// ============================================================================

/// Runs executable response text and returns reply lines.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` and returns its reply lines.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] when the command cannot run or fails.
    async fn run(&self, command: &str) -> Result<Vec<String>, ExecError>;
}

// ============================================================================
// SECTION: Shell Runner
// ============================================================================

/// Runs commands as `shell -c <command>`.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    /// Shell binary.
    shell: PathBuf,
    /// Per-command timeout.
    timeout: Duration,
    /// Maximum reply lines returned.
    max_lines: usize,
}

impl ShellRunner {
    /// Creates a shell runner.
    #[must_use]
    pub fn new(shell: impl Into<PathBuf>, timeout: Duration, max_lines: usize) -> Self {
        Self { shell: shell.into(), timeout, max_lines }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<Vec<String>, ExecError> {
        if command.trim().is_empty() {
            return Err(ExecError::EmptyCommand);
        }
        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ExecError::Spawn {
                shell: self.shell.display().to_string(),
                reason: err.to_string(),
            })?;
        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ExecError::Timeout(self.timeout.as_millis()))?
            .map_err(|err| ExecError::Io(err.to_string()))?;
        if !output.status.success() {
            let status =
                output.status.code().map_or_else(|| "signal".to_string(), |code| code.to_string());
            let stderr: String = String::from_utf8_lossy(&output.stderr)
                .trim()
                .chars()
                .take(MAX_STDERR_CHARS)
                .collect();
            return Err(ExecError::Failed { status, stderr });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let lines = reply_lines(&stdout, self.max_lines);
        debug!(lines = lines.len(), "executable response finished");
        Ok(lines)
    }
}

/// Splits command output into at most `max_lines` non-empty lines.
pub(crate) fn reply_lines(output: &str, max_lines: usize) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .take(max_lines)
        .map(ToString::to_string)
        .collect()
}
