//! Subprocess execution

use crate::strategy::CommandExecutionStrategy;
use async_trait::async_trait;
use std::borrow::Cow;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncReadExt;
#[cfg(unix)]
use tokio::net::unix::pipe;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Read buffer size for captured output
const OUTPUT_INITIAL_CAPACITY: usize = 4096;

/// Outcome of one command invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Captured stdout and stderr, in the order the child wrote them
    pub output: Vec<u8>,
    /// Set when the command could not be spawned, exited non-zero or timed out
    pub error: Option<String>,
    /// Exit code, when the process ran and exited normally
    pub exit_code: Option<i32>,
}

impl CommandResult {
    /// Build a result from a finished process
    pub fn completed(output: Vec<u8>, status: ExitStatus) -> Self {
        Self {
            output,
            error: (!status.success()).then(|| describe_status(status)),
            exit_code: status.code(),
        }
    }

    /// Build a result for a command that never produced an exit status
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            output: Vec::new(),
            error: Some(error.into()),
            exit_code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Output decoded as UTF-8, replacing invalid sequences
    pub fn output_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

/// Render an unsuccessful exit status the way process tooling usually does
fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit status {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal: {}", signal);
        }
    }

    status.to_string()
}

/// Runs a command strategy and reports what happened.
///
/// Implementations never return an error: every failure is folded into
/// [`CommandResult::error`] so the caller shapes a single response.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, strategy: &CommandExecutionStrategy) -> CommandResult;
}

/// Executor backed by real child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child and report a failure once `timeout` elapses
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, strategy: &CommandExecutionStrategy) -> CommandResult {
        debug!("Spawning {}", strategy);

        let mut command = Command::new(strategy.program());
        command
            .args(strategy.args())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let (mut reader, mut child) = match spawn_with_combined_output(command) {
            Ok(spawned) => spawned,
            Err(e) => {
                warn!("Failed to spawn {}: {}", strategy.program(), e);
                return CommandResult::failed(e.to_string());
            }
        };

        let mut output = Vec::with_capacity(OUTPUT_INITIAL_CAPACITY);
        let run = async {
            let mut chunk = [0u8; OUTPUT_INITIAL_CAPACITY];
            loop {
                let n = reader.read(&mut chunk).await?;
                if n == 0 {
                    break;
                }
                output.extend_from_slice(&chunk[..n]);
            }
            child.wait().await
        };

        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.map_err(|_| limit),
            None => Ok(run.await),
        };

        match outcome {
            Ok(Ok(status)) => {
                let result = CommandResult::completed(output, status);
                debug!("Command finished with {:?}", result.exit_code);
                result
            }
            Ok(Err(e)) => {
                warn!("Failed to collect output of {}: {}", strategy.program(), e);
                CommandResult {
                    output,
                    ..CommandResult::failed(e.to_string())
                }
            }
            Err(limit) => {
                warn!("Command timed out after {:?}: {}", limit, strategy);
                child.kill().await.ok();
                CommandResult {
                    output,
                    ..CommandResult::failed(format!("timed out after {:?}", limit))
                }
            }
        }
    }
}

/// Spawn with stdout and stderr writing into one pipe, so the captured bytes
/// keep the order the child wrote them in.
///
/// `command` holds the parent's copies of the write end and is dropped on
/// return, which lets the reader see EOF once the child exits.
#[cfg(unix)]
fn spawn_with_combined_output(mut command: Command) -> io::Result<(pipe::Receiver, Child)> {
    let (reader, writer) = nix::unistd::pipe().map_err(io::Error::from)?;
    let writer_for_stderr = writer.try_clone()?;

    command
        .stdout(Stdio::from(writer))
        .stderr(Stdio::from(writer_for_stderr));
    let child = command.spawn()?;

    Ok((pipe::Receiver::from_owned_fd(reader)?, child))
}

/// Without unix pipes only stdout is captured
#[cfg(not(unix))]
fn spawn_with_combined_output(
    mut command: Command,
) -> io::Result<(tokio::process::ChildStdout, Child)> {
    command.stdout(Stdio::piped()).stderr(Stdio::null());
    let mut child = command.spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout was not captured"))?;
    Ok((stdout, child))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(command_line: &str) -> CommandExecutionStrategy {
        CommandExecutionStrategy::ShellInterpreted {
            command_line: command_line.to_string(),
        }
    }

    fn direct(program: &str, args: &[&str]) -> CommandExecutionStrategy {
        CommandExecutionStrategy::DirectArgumentVector {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_failed_result() {
        let result = CommandResult::failed("boom");
        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("boom"));
        assert!(result.output.is_empty());
        assert_eq!(result.exit_code, None);
    }

    #[test]
    fn test_output_lossy_replaces_invalid_utf8() {
        let result = CommandResult {
            output: vec![b'o', b'k', 0xff],
            ..Default::default()
        };
        assert_eq!(result.output_lossy(), "ok\u{fffd}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_command_success() {
        let result = ProcessExecutor::new().execute(&shell("echo hello")).await;
        assert!(result.is_success());
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.output_lossy(), "hello\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_interprets_separators() {
        let result = ProcessExecutor::new()
            .execute(&shell("echo first; echo second"))
            .await;
        assert!(result.is_success());
        assert_eq!(result.output_lossy(), "first\nsecond\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_nonzero_exit_keeps_output() {
        let result = ProcessExecutor::new()
            .execute(&shell("echo out; echo err 1>&2; exit 3"))
            .await;
        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("exit status 3"));
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.output_lossy(), "out\nerr\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_direct_argument_is_literal() {
        let result = ProcessExecutor::new()
            .execute(&direct("echo", &["a; echo injected"]))
            .await;
        assert!(result.is_success());
        assert_eq!(result.output_lossy(), "a; echo injected\n");
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let result = ProcessExecutor::new()
            .execute(&direct("cmdinject-no-such-program", &[]))
            .await;
        assert!(!result.is_success());
        assert!(result.error.is_some());
        assert_eq!(result.exit_code, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_reports_failure() {
        let executor = ProcessExecutor::with_timeout(Some(Duration::from_millis(100)));
        let result = executor.execute(&shell("sleep 5")).await;
        assert_eq!(result.error.as_deref(), Some("timed out after 100ms"));
        assert_eq!(result.exit_code, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_keeps_output_written_before_kill() {
        let executor = ProcessExecutor::with_timeout(Some(Duration::from_millis(500)));
        let result = executor
            .execute(&shell("echo started; echo warming 1>&2; sleep 5"))
            .await;
        assert_eq!(result.error.as_deref(), Some("timed out after 500ms"));
        assert_eq!(result.output_lossy(), "started\nwarming\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_and_stderr_keep_write_order() {
        let result = ProcessExecutor::new()
            .execute(&shell("echo one; echo two 1>&2; echo three; echo four 1>&2"))
            .await;
        assert!(result.is_success());
        assert_eq!(result.output_lossy(), "one\ntwo\nthree\nfour\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_killed_by_signal() {
        let result = ProcessExecutor::new().execute(&shell("kill -9 $$")).await;
        assert_eq!(result.error.as_deref(), Some("signal: 9"));
        assert_eq!(result.exit_code, None);
    }
}
