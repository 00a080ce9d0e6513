//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::Application(e.into())
    }
}

impl From<InfraError> for CliError {
    fn from(e: InfraError) -> Self {
        CliError::Application(e.into())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(ApplicationError::MissingRelations) => crate::exitcode::USAGE,
            CliError::Application(ApplicationError::Domain(e)) => match e {
                DomainError::NotFound => crate::exitcode::NO_MATCH,
                DomainError::UnknownRecordType(_) | DomainError::MalformedRecord { .. } => {
                    crate::exitcode::DATAERR
                }
                _ => crate::exitcode::SOFTWARE,
            },
            CliError::Application(ApplicationError::Infra(e)) => match e {
                InfraError::Io { source, .. } => match source.kind() {
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                        crate::exitcode::NOINPUT
                    }
                    _ => crate::exitcode::IOERR,
                },
                InfraError::Decode { .. } | InfraError::Relations { .. } => {
                    crate::exitcode::DATAERR
                }
                InfraError::Encoding { .. } => crate::exitcode::CANTCREAT,
                InfraError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}
