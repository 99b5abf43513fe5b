use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::command::{CommandError, CommandOutput, CommandRunner};

/// Runs external programs on the tokio runtime, killing any that outlive the timeout.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        tracing::debug!(program, ?args, "running external command");

        let output = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| {
            tracing::warn!(program, "external command timed out");
            CommandError::Timeout {
                program: program.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        })?
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => CommandError::NotFound(program.to_string()),
            _ => CommandError::Io {
                program: program.to_string(),
                reason: e.to_string(),
            },
        })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which_in(program, std::env::var_os("PATH"))
    }
}

/// Resolves `program` against a `PATH`-style list; names with a slash are checked as-is.
#[must_use]
pub fn which_in(program: &str, path: Option<impl AsRef<OsStr>>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    which::which_in(program, path, cwd).ok()
}
