//! Error types for the shared utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the utilities in this crate.
///
/// Cleanup failures never show up here: removing a temporary directory is
/// best-effort and its errors are swallowed.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested sub-directory resolves outside the platform temp root.
    #[error(
        "sub-directory '{requested}' resolves to '{resolved}', which is outside of the temp root '{root}'"
    )]
    PathEscape {
        requested: String,
        resolved: PathBuf,
        root: PathBuf,
    },

    /// The directory exists but the current process cannot write to it.
    #[error("unable to write to temporary directory '{path}'")]
    PermissionDenied { path: PathBuf },

    /// Underlying filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a path escape error.
    pub fn path_escape(
        requested: impl Into<String>,
        resolved: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self::PathEscape {
            requested: requested.into(),
            resolved: resolved.into(),
            root: root.into(),
        }
    }

    /// Create a permission denied error.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied { path: path.into() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error is a path escape.
    pub fn is_path_escape(&self) -> bool {
        matches!(self, Self::PathEscape { .. })
    }

    /// Check if this error is a permission failure.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_path_escape_display() {
        let err = Error::path_escape("../../etc", "/etc", "/tmp");
        assert_eq!(
            err.to_string(),
            "sub-directory '../../etc' resolves to '/etc', which is outside of the temp root '/tmp'"
        );
        assert!(err.is_path_escape());
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_permission_denied_display() {
        let err = Error::permission_denied("/tmp/locked");
        assert_eq!(
            err.to_string(),
            "unable to write to temporary directory '/tmp/locked'"
        );
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("unknown log level 'loud'");
        assert_eq!(err.to_string(), "configuration error: unknown log level 'loud'");
        assert!(StdError::source(&err).is_none());
    }
}
