//! Service-level error type.

use std::time::Duration;

use thiserror::Error;

use super::ErrorKind;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Compilation error ({kind}): {message}")]
    Compile {
        kind: ErrorKind,
        message: String,
        line: Option<usize>,
    },

    #[error("No compiled interpreter for '{0}'")]
    NotFound(String),

    #[error("Execution timeout ({} seconds)", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Runtime error ({kind}): {message}")]
    Runtime {
        kind: ErrorKind,
        message: String,
        line: Option<usize>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// User-relative line number, when the engine reported one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ServiceError::Compile { line, .. } | ServiceError::Runtime { line, .. } => *line,
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ServiceError::Compile { kind, .. } | ServiceError::Runtime { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
