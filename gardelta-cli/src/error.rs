//! CLI error type.

use std::fmt;

use gardelta::archive::ArchiveError;
use gardelta::pipeline::PipelineError;

/// Errors that terminate the CLI with a non-zero exit status.
#[derive(Debug)]
pub enum CliError {
    /// Archive download or extraction failed.
    Archive(ArchiveError),

    /// The processing pipeline failed.
    Pipeline(PipelineError),

    /// Logging subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Archive(e) => write!(f, "{}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Logging(msg) => write!(f, "failed to set up logging: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Archive(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Logging(_) => None,
        }
    }
}

impl From<ArchiveError> for CliError {
    fn from(e: ArchiveError) -> Self {
        CliError::Archive(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
