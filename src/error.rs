// src/error.rs

//! Error types for aptpkg

use thiserror::Error;

/// Errors raised by the apt facade, its collaborators and configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied insufficient or contradictory arguments.
    /// Always raised before any external command runs.
    #[error("Invalid invocation: {0}")]
    InvocationError(String),

    /// A queried entity could not be resolved from tool output
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// An external tool exited non-zero where data was expected
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// The external tool could not be located
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Fetching a remote key file failed
    #[error("Download error: {0}")]
    DownloadError(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
