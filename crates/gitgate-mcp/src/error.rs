//! Error types for the gateway
//!
//! These are internal faults only. A git command that fails, or a tool call
//! with bad arguments, is an ordinary tool result and never becomes an
//! [`Error`].

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur inside the gateway itself
#[derive(Debug, Error)]
pub enum Error {
    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error on the transport or while reading configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error in the configuration file
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration values that cannot be used
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}
