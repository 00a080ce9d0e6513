//! Infrastructure-level errors (file access, decoding, relation tables)

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Infrastructure errors add I/O-level concerns around the domain.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid text in {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("cannot encode character {ch:?} on output line {line} as latin-1")]
    Encoding { line: usize, ch: char },

    #[error("invalid relation table {path}: {message}")]
    Relations { path: PathBuf, message: String },

    #[error("config error: {message}")]
    Config { message: String },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;

/// Extension trait for converting `io::Result` to `InfraResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs::read(&path).with_path_context("read records", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> InfraResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> InfraResult<T> {
        self.map_err(|e| InfraError::io(format!("{}: {}", action, path.display()), e))
    }
}
