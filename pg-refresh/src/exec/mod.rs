//! External command execution.
//!
//! Every external tool (backup CLI, pg_restore, createdb, dropdb) is run through
//! the [`CommandRunner`] trait so pipeline logic can be exercised against
//! [`ScriptedRunner`] instead of real processes.

pub mod scripted;

use crate::utils::{RefreshError, Result};
use async_trait::async_trait;
use std::fmt;
use tokio::process::Command;
use tracing::debug;

pub use scripted::ScriptedRunner;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Return stdout, or an `ExternalCommand` error carrying stderr on non-zero exit
    pub fn into_stdout(self, invocation: &Invocation) -> Result<String> {
        if self.is_success() {
            return Ok(self.stdout);
        }
        let status = match self.code {
            Some(code) => format!("exit status {}", code),
            None => "signal".to_string(),
        };
        Err(RefreshError::ExternalCommand {
            command: invocation.to_string(),
            status,
            stderr: self.stderr.trim().to_string(),
        })
    }
}

/// Runs an external program to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation`, capturing stdout and stderr separately.
    ///
    /// A non-zero exit is not an error here; callers decide via
    /// [`CommandOutput::into_stdout`].
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Spawns real processes with `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!("Running: {}", invocation);

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|source| RefreshError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
