//! Package manager subprocesses
//!
//! This module provides:
//! - The `ProcessRunner` trait used for `yarn info` queries and the reinstall
//! - `SystemProcessRunner`, which spawns real commands in the workspace root

use crate::error::ProcessError;
use crate::progress::Progress;
use async_trait::async_trait;
use std::future::Future;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Trait for running package manager commands
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command and return its standard output
    async fn run_capture(&self, command: &str, args: &[&str]) -> Result<String, ProcessError>;

    /// Run a command for its side effects
    async fn run(&self, command: &str, args: &[&str]) -> Result<(), ProcessError>;
}

/// Renders a command the way it is shown to users
pub fn command_line(command: &str, args: &[&str]) -> String {
    std::iter::once(command)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runner that executes real commands
#[derive(Debug, Clone)]
pub struct SystemProcessRunner {
    /// Directory commands run in
    working_dir: PathBuf,
    /// Show a spinner while `run` is in progress
    show_progress: bool,
    /// Deadline for each command
    timeout: Option<Duration>,
}

impl SystemProcessRunner {
    /// Create a runner for the given directory
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            show_progress: false,
            timeout: None,
        }
    }

    /// Enable the spinner for long-running commands
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Set a deadline for each command
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn output(&self, command: &str, args: &[&str]) -> Result<Output, ProcessError> {
        let line = command_line(command, args);
        debug!("Running '{}' in {}", line, self.working_dir.display());

        let child = Command::new(command)
            .args(args)
            .current_dir(&self.working_dir)
            .kill_on_drop(true)
            .output();
        let output = self.with_deadline(&line, child).await?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(ProcessError::Failed {
                command: line,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    async fn with_deadline<T>(
        &self,
        line: &str,
        fut: impl Future<Output = std::io::Result<T>>,
    ) -> Result<T, ProcessError> {
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| ProcessError::Timeout {
                    command: line.to_string(),
                    after: limit,
                })?,
            None => fut.await,
        };

        result.map_err(|source| ProcessError::SpawnFailed {
            command: line.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run_capture(&self, command: &str, args: &[&str]) -> Result<String, ProcessError> {
        let output = self.output(command, args).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Output of the command goes straight to the user's terminal
    async fn run(&self, command: &str, args: &[&str]) -> Result<(), ProcessError> {
        let line = command_line(command, args);
        debug!("Running '{}' in {}", line, self.working_dir.display());

        let mut progress = Progress::new(self.show_progress);
        progress.spinner(&format!("Running '{}'", line));

        let child = Command::new(command)
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status();
        let result = self.with_deadline(&line, child).await;
        progress.finish_and_clear();

        let status = result?;
        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::Failed {
                command: line,
                code: status.code(),
                stderr: String::new(),
            })
        }
    }
}
