//! Application-level errors (wraps domain errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("cannot write {}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
