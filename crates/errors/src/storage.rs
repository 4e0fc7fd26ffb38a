//! Mirror storage error types

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("no such file or directory: {path}")]
    PathNotFound { path: String },

    #[error("I/O error: {message}")]
    IoError { message: String },

    /// A digest string (sidecar body or hex literal) that is not an MD5
    #[error("invalid digest {value:?}: {reason}")]
    InvalidDigest { value: String, reason: String },

    #[error("invalid path: {path}")]
    InvalidPath { path: String },
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
        }
    }
}

impl StorageError {
    /// Classify an `io::Error` raised while touching `path`
    #[must_use]
    pub fn from_io_with_path(err: &std::io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            ErrorKind::NotFound => Self::PathNotFound { path },
            _ => Self::IoError {
                message: format!("{path}: {err}"),
            },
        }
    }
}

impl UserFacingError for StorageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied { .. } => {
                Some("Adjust filesystem permissions on the mirror root and retry.")
            }
            Self::PathNotFound { .. } => Some("Check that --output points at the mirror root."),
            Self::InvalidDigest { .. } => {
                Some("The source published an unreadable .md5 sidecar; report it upstream.")
            }
            Self::InvalidPath { .. } => {
                Some("Siva filenames must be plain names without path separators, '?' or '#'.")
            }
            Self::IoError { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::PermissionDenied { .. } => "storage.permission_denied",
            Self::PathNotFound { .. } => "storage.path_not_found",
            Self::IoError { .. } => "storage.io_error",
            Self::InvalidDigest { .. } => "storage.invalid_digest",
            Self::InvalidPath { .. } => "storage.invalid_path",
        };
        Some(code)
    }
}
