//! The [`Invoker`] seam and its subprocess-backed implementation

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Error, Invocation, Result};

/// Runs an external command in a working directory.
///
/// Implementations must not fail: every outcome, including the inability to
/// start the command, is described by the returned [`Invocation`].
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Run `command` (program followed by its arguments) inside `working_dir`.
    async fn invoke(&self, command: &[String], working_dir: &Path) -> Invocation;
}

/// [`Invoker`] that spawns a real child process and waits for it.
///
/// Without a timeout the call blocks until the child exits. With one, the
/// child is killed once the deadline passes and the invocation reports a
/// timeout error.
#[derive(Debug, Clone, Default)]
pub struct ProcessInvoker {
    timeout: Option<Duration>,
}

impl ProcessInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every command by `timeout` (`None` waits indefinitely).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn run(&self, command: &[String], working_dir: &Path) -> Result<Invocation> {
        if !working_dir.exists() {
            return Err(Error::MissingDirectory {
                path: working_dir.to_path_buf(),
            });
        }

        let (program, args) = command.split_first().ok_or(Error::EmptyCommand)?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| Error::TimedOut {
                    command: command.join(" "),
                    timeout,
                })?,
            None => cmd.output().await,
        }
        .map_err(|source| Error::Launch {
            program: program.clone(),
            source,
        })?;

        Ok(Invocation::completed(
            exit_code(output.status),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        ))
    }
}

#[async_trait]
impl Invoker for ProcessInvoker {
    async fn invoke(&self, command: &[String], working_dir: &Path) -> Invocation {
        tracing::debug!(?command, dir = %working_dir.display(), "Running external command");

        match self.run(command, working_dir).await {
            Ok(invocation) => {
                if !invocation.success {
                    tracing::debug!(
                        returncode = ?invocation.returncode,
                        "External command exited unsuccessfully"
                    );
                }
                invocation
            }
            Err(e) => {
                tracing::warn!(error = %e, "External command could not be run");
                e.into()
            }
        }
    }
}

/// Exit code of a finished child. Signal deaths map to the negated signal
/// number on Unix.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
