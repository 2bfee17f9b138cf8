//! Child-process execution of the packaging tool

use super::redact_args;
use crate::cmd::progress;
use crate::config::AppConfig;
use crate::error::{IntunePubError, Result};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// How often the spinner advances while the child runs
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captured result of a finished tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub status: String,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ToolOutput {
    /// stderr followed by stdout, for failure diagnostics
    pub fn combined(&self) -> String {
        let lines: Vec<&str> = self
            .stderr
            .iter()
            .chain(self.stdout.iter())
            .map(String::as_str)
            .filter(|l| !l.trim().is_empty())
            .collect();

        if lines.is_empty() {
            "(no output)".to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Turn a non-zero exit into `ToolFailed`
    pub fn into_result(self, description: &str) -> Result<ToolOutput> {
        if self.success {
            Ok(self)
        } else {
            Err(IntunePubError::ToolFailed {
                description: description.to_string(),
                status: self.status.clone(),
                output: self.combined(),
            })
        }
    }
}

/// Runs the external tool with a given argument vector
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    async fn run(&self, args: &[String], description: &str) -> Result<ToolOutput>;
}

/// Spawns the configured wintuner binary
#[derive(Debug, Clone)]
pub struct WintunerRunner {
    program: String,
    timeout: Option<Duration>,
    poll_interval: Duration,
}

impl WintunerRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.tool_path.clone()).with_timeout(config.tool_timeout)
    }

    /// Kill the child and fail once it has run this long. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

impl ToolRunner for WintunerRunner {
    async fn run(&self, args: &[String], description: &str) -> Result<ToolOutput> {
        tracing::debug!("Running {} {}", self.program, redact_args(args).join(" "));

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => IntunePubError::ToolNotFound(self.program.clone()),
                _ => IntunePubError::IoError(e),
            })?;

        let spinner = progress::create_polled_spinner(description);
        let started = Instant::now();
        let mut ticker = tokio::time::interval(self.poll_interval);

        // Dropping this future drops the child, which kills it (kill_on_drop)
        let wait = child.wait_with_output();
        tokio::pin!(wait);

        let output = loop {
            tokio::select! {
                result = &mut wait => break result,
                _ = ticker.tick() => {
                    spinner.tick();
                    if let Some(limit) = self.timeout {
                        if started.elapsed() >= limit {
                            progress::finish_spinner_error(
                                &spinner,
                                &format!("{} timed out", description),
                            );
                            return Err(IntunePubError::ToolTimedOut {
                                description: description.to_string(),
                                seconds: limit.as_secs(),
                            });
                        }
                    }
                }
            }
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                progress::finish_spinner_error(&spinner, &format!("{} failed", description));
                return Err(e.into());
            }
        };

        let result = ToolOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: lines(&output.stdout),
            stderr: lines(&output.stderr),
        };

        if result.success {
            progress::finish_spinner_success(&spinner, &format!("{} completed", description));
        } else {
            progress::finish_spinner_error(
                &spinner,
                &format!("{} failed ({})", description, result.status),
            );
        }
        tracing::debug!(
            "{} exited after {:?}: {}",
            self.program,
            started.elapsed(),
            result.status
        );

        Ok(result)
    }
}
