//! Concurrency budget

use pga_errors::{Error, GuardError};
use std::fmt;
use std::num::NonZeroUsize;

/// Maximum number of probes running at once, fixed for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyBudget(NonZeroUsize);

impl ConcurrencyBudget {
    /// # Errors
    ///
    /// Returns `GuardError::InvalidBudget` for zero.
    pub fn new(value: usize) -> Result<Self, Error> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or_else(|| GuardError::InvalidBudget { value }.into())
    }

    #[must_use]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ConcurrencyBudget {
    fn default() -> Self {
        NonZeroUsize::new(pga_config::constants::DEFAULT_JOBS).map_or(Self(NonZeroUsize::MIN), Self)
    }
}

impl From<NonZeroUsize> for ConcurrencyBudget {
    fn from(value: NonZeroUsize) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConcurrencyBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
