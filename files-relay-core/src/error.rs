//! Stage failure taxonomy.
//!
//! Every failure in a pipeline run ends up as one [`PipelineError`]. The error
//! knows the [`Stage`] it happened in and its [`ErrorKind`], so callers can
//! attribute it and map it to an exit status without string matching.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::contract::BoxError;
use crate::pipeline::{Operation, Stage};
use crate::read::ReadError;

/// Coarse classification of a failure, one per taxonomy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Read,
    Auth,
    Transfer,
    Operation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Input => "InputError",
            ErrorKind::Read => "ReadError",
            ErrorKind::Auth => "AuthError",
            ErrorKind::Transfer => "TransferError",
            ErrorKind::Operation => "OperationError",
        })
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// No file path or file id was supplied (or it was blank).
    #[error("missing {0}")]
    MissingTarget(&'static str),

    /// The supplied path does not resolve to an existing regular file.
    #[error("path did not resolve to a file: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("failed to read file: {0}")]
    Read(#[from] ReadError),

    #[error("failed to obtain authorization: {0}")]
    Auth(#[source] BoxError),

    #[error("{operation} request failed: {source}")]
    Transfer {
        operation: Operation,
        #[source]
        source: BoxError,
    },

    /// The requested operation name is not recognised.
    #[error("invalid operation: {}", .0.as_deref().unwrap_or("<none>"))]
    InvalidOperation(Option<String>),
}

impl PipelineError {
    /// The stage at which the run halted.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::MissingTarget(_) | PipelineError::InvalidOperation(_) => Stage::Start,
            PipelineError::InvalidPath(_) => Stage::Validating,
            PipelineError::Read(_) => Stage::Reading,
            PipelineError::Auth(_) => Stage::AcquiringCredential,
            PipelineError::Transfer { .. } => Stage::Transferring,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::MissingTarget(_) | PipelineError::InvalidPath(_) => ErrorKind::Input,
            PipelineError::Read(_) => ErrorKind::Read,
            PipelineError::Auth(_) => ErrorKind::Auth,
            PipelineError::Transfer { .. } => ErrorKind::Transfer,
            PipelineError::InvalidOperation(_) => ErrorKind::Operation,
        }
    }
}
