//! Network-related error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum NetworkError {
    #[error("connection timeout to {url}")]
    Timeout { url: String },

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("malformed digest sidecar at {url}: {reason}")]
    MalformedDigest { url: String, reason: String },

    #[error("rate limited: retry after {seconds} seconds")]
    RateLimited { seconds: u64 },
}

impl UserFacingError for NetworkError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { .. } | Self::ConnectionRefused(_) => {
                Some("Check network connectivity to the archive source and retry.")
            }
            Self::InvalidUrl(_) => Some("Fix the source URL in the configuration or flags."),
            Self::RateLimited { .. } => Some("Lower --jobs or wait before retrying."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::ConnectionRefused(_)
                | Self::RequestFailed(_)
                | Self::RateLimited { .. }
        ) || matches!(self, Self::HttpError { status, .. } if *status >= 500)
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Timeout { .. } => "network.timeout",
            Self::RequestFailed(_) => "network.request_failed",
            Self::ConnectionRefused(_) => "network.connection_refused",
            Self::InvalidUrl(_) => "network.invalid_url",
            Self::HttpError { .. } => "network.http_error",
            Self::MalformedDigest { .. } => "network.malformed_digest",
            Self::RateLimited { .. } => "network.rate_limited",
        };
        Some(code)
    }
}
