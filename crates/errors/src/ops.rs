//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum OpsError {
    #[error("could not read from standard input: {message}")]
    StdinUnreadable { message: String },

    #[error("invalid item identifier on line {line}: {reason}")]
    InvalidItem { line: usize, reason: String },

    #[error("component not found: {component}")]
    MissingComponent { component: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::StdinUnreadable { .. } => Some("Pipe one siva filename per line into --stdin."),
            Self::InvalidItem { .. } => Some("Each line must name a single siva file."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::StdinUnreadable { .. } => "ops.stdin_unreadable",
            Self::InvalidItem { .. } => "ops.invalid_item",
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::SerializationError { .. } => "ops.serialization_error",
        };
        Some(code)
    }
}
