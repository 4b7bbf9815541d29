//! Shell process executor with streaming output capture.
//!
//! One `run` call owns its child process and both stream handles
//! exclusively. Three tasks run concurrently once the child is launched:
//! a stdout drain, a stderr drain, and the exit wait. The result is only
//! assembled after all three complete, so both output strings are stable
//! and no trailing output is lost.
//!
//! The command is wrapped with a trailer that echoes a sentinel line
//! carrying the command's exit status. The sentinel is authoritative for
//! the exit code (the native status belongs to the trailer's `echo`); the
//! native status is the fallback when the shell died before reaching the
//! trailer.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use scribe_types::{ExecError, ProcessExecutorResult};

use crate::notify::Notifier;
use crate::process::{ChildGuard, set_new_session};
use crate::shell::DetectedShell;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const EXIT_SENTINEL: &str = "EXIT_CODE: ";

pub struct ProcessExecutor {
    shell: DetectedShell,
    working_dir: PathBuf,
    timeout: Duration,
    notifier: Arc<dyn Notifier>,
}

impl ProcessExecutor {
    #[must_use]
    pub fn new(
        shell: DetectedShell,
        working_dir: impl Into<PathBuf>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            shell,
            working_dir: working_dir.into(),
            timeout: DEFAULT_TIMEOUT,
            notifier,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run a command, bounded by the executor's timeout.
    ///
    /// A timeout is a typed failure, never a fabricated exit code. When
    /// the command ran to completion the result always carries its real
    /// exit code and both fully-drained streams.
    pub async fn run(&self, command: &str) -> Result<ProcessExecutorResult, ExecError> {
        tokio::time::timeout(self.timeout, self.run_unbounded(command))
            .await
            .map_err(|_| ExecError::Timeout {
                timeout: self.timeout,
            })?
    }

    /// Synchronous façade over [`run`](Self::run).
    ///
    /// Bridges callers without a runtime; must not be invoked from inside
    /// an async context.
    pub fn run_blocking(&self, command: &str) -> Result<ProcessExecutorResult, ExecError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ExecError::Launch {
                cause: e.to_string(),
            })?;
        runtime.block_on(self.run(command))
    }

    async fn run_unbounded(&self, command: &str) -> Result<ProcessExecutorResult, ExecError> {
        if command.trim().is_empty() {
            return Err(ExecError::Launch {
                cause: "command must not be empty".to_string(),
            });
        }

        let mut cmd = Command::new(&self.shell.binary);
        cmd.args(&self.shell.args)
            .arg(wrap_with_sentinel(command))
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("TERM", "dumb")
            .env("BASH_SILENCE_DEPRECATION_WARNING", "1")
            .env("GIT_PAGER", "cat");
        set_new_session(&mut cmd);

        let child = cmd.spawn().map_err(|e| ExecError::Launch {
            cause: e.to_string(),
        })?;
        let mut guard = ChildGuard::new(child);

        let stdout = guard
            .child_mut()
            .stdout
            .take()
            .ok_or_else(|| ExecError::Stream {
                cause: "failed to capture stdout".to_string(),
            })?;
        let stderr = guard
            .child_mut()
            .stderr
            .take()
            .ok_or_else(|| ExecError::Stream {
                cause: "failed to capture stderr".to_string(),
            })?;

        // Dropping this future (cancellation, timeout) drops the guard,
        // which kills the child's process group.
        let (stdout_text, stderr_text, status) = tokio::join!(
            drain_lines(stdout),
            drain_lines(stderr),
            guard.child_mut().wait(),
        );
        let stdout_text = stdout_text.map_err(stream_error)?;
        let stderr_text = stderr_text.map_err(stream_error)?;
        let status = status.map_err(stream_error)?;
        guard.disarm();

        let (std_output, sentinel_code) = split_sentinel(stdout_text);
        let exit_code = sentinel_code.unwrap_or_else(|| status.code().unwrap_or(-1));

        let result = ProcessExecutorResult {
            exit_code,
            std_output,
            err_output: stderr_text,
        };

        if result.is_success() {
            self.notifier
                .notify(&format!("Shell command `{command}` executed successfully"));
        } else {
            self.notifier.put_text(&format!(
                "Error executing shell command:\n```bash\n{}\n```",
                result.err_output
            ));
        }
        tracing::debug!(exit_code, "shell command finished");

        Ok(result)
    }
}

/// Append the exit-status trailer.
///
/// The user command runs in a brace group so the trailer sees its exit
/// status even when the command is a pipeline or list. The group is closed
/// on its own line so a trailing `;` or comment in the command cannot
/// break the wrapper. The trailer starts with a newline of its own so the
/// sentinel never glues onto output that lacks a final newline;
/// [`split_sentinel`] compensates when the output did end with one.
fn wrap_with_sentinel(command: &str) -> String {
    format!("{{ {command}\n}}; EXIT_CODE=$?; printf '\\n{EXIT_SENTINEL}%s\\n' \"$EXIT_CODE\"")
}

/// Drain a stream line-by-line until exhausted.
///
/// A separator goes between lines, not after the last. Lines are read as
/// raw bytes and decoded lossily, so invalid UTF-8 becomes replacement
/// characters instead of ending the drain early. End of stream is reached
/// only when the child has exited and the pipe's buffered output has been
/// fully consumed, so output emitted right at process exit is never
/// truncated. Genuine I/O errors propagate to the caller.
async fn drain_lines<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<String> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut collected = String::new();
    let mut first = true;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        if !first {
            collected.push('\n');
        }
        first = false;
        collected.push_str(&String::from_utf8_lossy(&line));
    }
    Ok(collected)
}

fn stream_error(e: std::io::Error) -> ExecError {
    ExecError::Stream {
        cause: e.to_string(),
    }
}

/// Strip the sentinel line from the end of captured stdout, returning the
/// command's own output and the parsed exit code.
///
/// The trailer's injected newline leaves one artifact blank line behind
/// when the command's output already ended with a newline; that blank is
/// removed here. Output with no sentinel is returned untouched.
fn split_sentinel(output: String) -> (String, Option<i32>) {
    let (head, last) = match output.rsplit_once('\n') {
        Some((head, last)) => (head, last),
        None => ("", output.as_str()),
    };
    if let Some(code) = last
        .strip_prefix(EXIT_SENTINEL)
        .and_then(|s| s.trim().parse::<i32>().ok())
    {
        let head = head.strip_suffix('\n').unwrap_or(head);
        return (head.to_string(), Some(code));
    }
    (output, None)
}
