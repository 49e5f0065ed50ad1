//! Error types for pvalsim-cli

use pvalsim::error::SimError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Configuration file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Simulation or statistics error
    #[error(transparent)]
    Sim(#[from] SimError),

    /// IO error while writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialized
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Numeric status for this error
    pub(crate) fn code(&self) -> u8 {
        match self {
            Self::FileNotFound(_) => 3,
            Self::Sim(SimError::Config { .. }) => 4,
            Self::Sim(e) if e.is_invalid_input() => 5,
            Self::Sim(SimError::Io(_)) | Self::Io(_) => 7,
            Self::Sim(_) | Self::Output(_) => 1,
        }
    }

    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Output(e.to_string())
    }
}
