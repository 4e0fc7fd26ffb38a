//! CLI error handling

use std::fmt;

use pga_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(pga_errors::ConfigError),
    /// Operations error
    Ops(pga_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if e.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Ops(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<pga_errors::ConfigError> for CliError {
    fn from(e: pga_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<pga_errors::Error> for CliError {
    fn from(e: pga_errors::Error) -> Self {
        match e {
            pga_errors::Error::Config(e) => CliError::Config(e),
            other => CliError::Ops(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pga_errors::{GuardError, NetworkError};

    #[test]
    fn test_ops_error_renders_code_and_hint() {
        let err = CliError::from(pga_errors::Error::from(GuardError::OutcomesLost {
            expected: 3,
            received: 2,
        }));
        let text = err.to_string();
        assert!(text.contains("Code:"), "{text}");
        assert!(!text.contains("Retry:"), "{text}");
    }

    #[test]
    fn test_retryable_error_mentions_retry() {
        let err = CliError::from(pga_errors::Error::from(NetworkError::Timeout {
            url: "http://pga.sourced.tech/".to_string(),
        }));
        assert!(err.to_string().contains("Retry: safe to retry"));
    }

    #[test]
    fn test_config_error_is_labelled() {
        let err = CliError::from(pga_errors::Error::from(pga_errors::ConfigError::NotFound {
            path: "/etc/pga.toml".to_string(),
        }));
        assert!(err.to_string().starts_with("Configuration error: "));
    }
}
