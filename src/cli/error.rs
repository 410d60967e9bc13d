//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Script { .. } => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::WriteFailed { .. } => crate::exitcode::CANTCREAT,
                ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
                ApplicationError::Domain(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use rstest::rstest;

    #[rstest]
    #[case(CliError::Usage("x".into()), crate::exitcode::USAGE)]
    #[case(ApplicationError::script(3, "bad").into(), crate::exitcode::DATAERR)]
    #[case(ApplicationError::Config { message: "x".into() }.into(), crate::exitcode::CONFIG)]
    #[case(
        ApplicationError::from(DomainError::OrphanNodes { count: 1 }).into(),
        crate::exitcode::SOFTWARE
    )]
    #[case(
        ApplicationError::WriteFailed {
            path: "out.svelte".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into(),
        crate::exitcode::CANTCREAT
    )]
    fn given_error_when_mapping_then_sysexits_code(#[case] err: CliError, #[case] code: i32) {
        assert_eq!(err.exit_code(), code);
    }
}
