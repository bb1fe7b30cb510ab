//! Normalised outcome of running an external command

use serde::Serialize;

/// Result of a single external command run.
///
/// Either the command ran to completion (`returncode` is set and both streams
/// are captured, whatever the exit code) or it never produced an exit status
/// at all, in which case `error` describes why and the streams are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returncode: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Invocation {
    /// A command that exited. Zero means success.
    pub fn completed(returncode: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            success: returncode == 0,
            stdout: Some(stdout.into()),
            stderr: Some(stderr.into()),
            returncode: Some(returncode),
            error: None,
        }
    }

    /// A command that could not be run (or waited on) at all.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: None,
            stderr: None,
            returncode: None,
            error: Some(error.into()),
        }
    }

    /// Captured stdout, empty if nothing was captured.
    pub fn stdout(&self) -> &str {
        self.stdout.as_deref().unwrap_or("")
    }

    /// Captured stderr, empty if nothing was captured.
    pub fn stderr(&self) -> &str {
        self.stderr.as_deref().unwrap_or("")
    }

    /// Best available explanation of a failure.
    ///
    /// Prefers the launch error, then captured stderr, then `"Unknown error"`.
    pub fn failure_reason(&self) -> &str {
        if let Some(error) = self.error.as_deref() {
            return error;
        }
        match self.stderr() {
            "" => "Unknown error",
            stderr => stderr,
        }
    }
}

impl From<crate::Error> for Invocation {
    fn from(err: crate::Error) -> Self {
        Self::failed(err.to_string())
    }
}
