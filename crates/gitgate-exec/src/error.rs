//! Error types for gitgate-exec

use std::path::PathBuf;
use std::time::Duration;

/// Result type for gitgate-exec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while launching or waiting on an external command
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Directory does not exist: {}", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("No command given")]
    EmptyCommand,

    #[error("Failed to run {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command timed out after {timeout:?}: {command}")]
    TimedOut { command: String, timeout: Duration },
}
