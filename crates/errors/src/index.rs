//! Catalog index error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum IndexError {
    #[error("could not open index file {location}: {message}")]
    OpenFailed { location: String, message: String },

    #[error("index is empty: no header row")]
    MissingHeader,

    #[error("index header is missing required column {column}")]
    MissingColumn { column: String },

    #[error("malformed index row {line}: {message}")]
    MalformedRow { line: usize, message: String },

    #[error("invalid filter {criterion}: {message}")]
    InvalidFilter { criterion: String, message: String },

    #[error("failed to decompress index: {message}")]
    DecompressFailed { message: String },
}

impl UserFacingError for IndexError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::OpenFailed { .. } => {
                Some("Check the --index location or your connection to the archive source.")
            }
            Self::MissingHeader | Self::MissingColumn { .. } | Self::MalformedRow { .. } => {
                Some("The cached index may be truncated; delete it from the cache dir and retry.")
            }
            Self::InvalidFilter { .. } => Some("Fix the --url or --lang filter and retry."),
            Self::DecompressFailed { .. } => Some("Delete the cached index and retry."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::OpenFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::OpenFailed { .. } => "index.open_failed",
            Self::MissingHeader => "index.missing_header",
            Self::MissingColumn { .. } => "index.missing_column",
            Self::MalformedRow { .. } => "index.malformed_row",
            Self::InvalidFilter { .. } => "index.invalid_filter",
            Self::DecompressFailed { .. } => "index.decompress_failed",
        };
        Some(code)
    }
}
