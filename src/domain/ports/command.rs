use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0}: command not found")]
    NotFound(String),
    #[error("{program} timed out after {timeout_secs}s")]
    Timeout { program: String, timeout_secs: u64 },
    #[error("failed to run {program}: {reason}")]
    Io { program: String, reason: String },
}

/// Captured result of an external program that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    /// First non-empty line of stderr, falling back to stdout.
    #[must_use]
    pub fn first_error_line(&self) -> &str {
        self.stderr
            .lines()
            .chain(self.stdout.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, bounded by the runner's timeout.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::NotFound` when the program does not exist,
    /// `CommandError::Timeout` when it did not finish in time, and
    /// `CommandError::Io` for any other spawn or wait failure. A non-zero
    /// exit status is not an error; inspect [`CommandOutput::exit_code`].
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;

    /// Resolves `program` against `PATH`.
    fn which(&self, program: &str) -> Option<PathBuf>;
}
