//! Error handling and custom error types
//!
//! Provides unified error handling across the conversion pipeline using thiserror.
//! Every variant renders as a single human-readable line, since the orchestrator
//! surfaces `to_string()` directly as the failure message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to encode image: {0}")]
    Encoding(String),

    #[error("Please provide design data or upload an image.")]
    EmptyInput,

    #[error("Network error: {0}")]
    Transport(String),

    /// Shown to the user verbatim.
    #[error("{0}")]
    Service(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
