//! Error type shared by every command.
//!
//! All failures surface at the command boundary, where they are printed to
//! stderr and mapped to exit code 1.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A hand-written flag check failed (e.g. `--api_key` missing for firebase).
    #[error("{0}")]
    Validation(String),

    /// clap rejected the command line (missing required flag, invalid choice).
    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("Invalid JSON in {field}: {source}")]
    Parse {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Request to the chat service failed: {0}")]
    Remote(String),

    #[error("Request to the chat service timed out after {0} seconds")]
    Timeout(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// The user-facing error category.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Usage(_) => "ValidationError",
            Self::Parse { .. } => "ParseError",
            Self::FileRead { .. } => "FileReadError",
            Self::Auth(_) => "AuthError",
            Self::Remote(_) => "RemoteError",
            Self::Timeout(_) => "TimeoutError",
            Self::Io(_) => "IoError",
            Self::Prompt(_) => "PromptError",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
