//! Command dispatch to the bridge executable

use crate::config::{secs_to_duration, BRIDGE_CONFIG, TIMING_CONFIG};
use crate::error::{MamlError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Raw result of a finished child process
#[derive(Debug, Clone, Default)]
pub struct RawOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<i32>,
}

impl RawOutput {
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            stdout: text.into().into_bytes(),
            stderr: Vec::new(),
            exit_code: Some(0),
        }
    }
}

/// Launches the bridge executable and waits for it to exit
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<RawOutput>;
}

/// Runs the bridge as a real child process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<RawOutput> {
        // kill_on_drop reaps the child if the awaiting future is cancelled
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(RawOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code(),
        })
    }
}

/// Captured output of one bridge invocation, right-trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Carried for callers; never inspected by this crate
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    fn from_raw(raw: RawOutput) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&raw.stdout).trim_end().to_string(),
            stderr: String::from_utf8_lossy(&raw.stderr).trim_end().to_string(),
            exit_code: raw.exit_code,
        }
    }

    /// The command ran but wrote nothing to either stream
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

/// One bridge invocation: `[-s <serial>] <command> [args...]`
#[derive(Debug, Clone, Default)]
pub struct BridgeCommand {
    command: String,
    args: Vec<String>,
    serial: Option<String>,
    echo: bool,
    print_stdout: bool,
    print_stderr: bool,
    delay: Option<f64>,
}

impl BridgeCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    /// `shell` pass-through with the given device-side arguments
    pub fn shell<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("shell").args(args)
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

    /// Target a specific device; `None` or an empty serial leaves it untargeted
    pub fn serial(mut self, serial: Option<&str>) -> Self {
        self.serial = serial.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    /// Log the full command line before running it
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn print_stdout(mut self, print: bool) -> Self {
        self.print_stdout = print;
        self
    }

    pub fn print_stderr(mut self, print: bool) -> Self {
        self.print_stderr = print;
        self
    }

    /// Seconds to sleep after the command returns
    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = Some(seconds);
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn target(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    /// Arguments passed to the bridge executable
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 3);
        if let Some(serial) = &self.serial {
            argv.push("-s".to_string());
            argv.push(serial.clone());
        }
        argv.push(self.command.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    pub fn display_line(&self, program: &str) -> String {
        let mut line = program.to_string();
        for arg in self.argv() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

/// Handle on the bridge tool; every device operation goes through `dispatch`
pub struct Bridge<R = ProcessRunner> {
    adb_path: String,
    runner: R,
    poll_interval: Duration,
}

impl Bridge<ProcessRunner> {
    /// Create a bridge using the configured executable (default `adb`)
    pub fn new() -> Self {
        Self::with_path(BRIDGE_CONFIG.adb_path.clone())
    }

    /// Create a bridge with a custom executable path
    pub fn with_path(adb_path: impl Into<String>) -> Self {
        Self::with_runner(adb_path, ProcessRunner)
    }
}

impl Default for Bridge<ProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Bridge<R> {
    pub fn with_runner(adb_path: impl Into<String>, runner: R) -> Self {
        Self {
            adb_path: adb_path.into(),
            runner,
            poll_interval: TIMING_CONFIG.connection.poll_interval(),
        }
    }

    /// Override the interval between attempts of a bounded connect
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn adb_path(&self) -> &str {
        &self.adb_path
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run one bridge command to completion and capture its output
    pub async fn dispatch(&self, command: &BridgeCommand) -> Result<CommandOutput> {
        let line = command.display_line(&self.adb_path);
        if command.echo {
            info!("  {}", line);
        } else {
            debug!(command = %line, "dispatching bridge command");
        }

        let raw = self
            .runner
            .run(&self.adb_path, &command.argv())
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => MamlError::BridgeNotFound(self.adb_path.clone()),
                _ => MamlError::Launch {
                    command: line.clone(),
                    source: e,
                },
            })?;
        let output = CommandOutput::from_raw(raw);

        if command.print_stderr {
            info!("STDERR for {}\n{}", line, output.stderr);
        }
        if command.print_stdout {
            info!("STDOUT for {}\n{}", line, output.stdout);
        }

        if let Some(delay) = command.delay {
            sleep(delay).await;
        }

        Ok(output)
    }

    /// Shorthand for a plain `[-s serial] <command> [args...]` invocation
    pub async fn adb<I, S>(
        &self,
        command: &str,
        args: I,
        serial: Option<&str>,
    ) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch(&BridgeCommand::new(command).args(args).serial(serial))
            .await
    }
}

/// Sleep for a number of seconds; non-positive values return immediately
///
/// Values too large for a `Duration` sleep for the longest time the timer supports.
pub async fn sleep(seconds: f64) {
    let duration = secs_to_duration(seconds);
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
