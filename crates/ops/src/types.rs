//! Operation requests and reports

use crate::ItemSource;
use pga_guard::ConcurrencyBudget;
use pga_types::RunTally;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of a status run
#[derive(Debug, Clone)]
pub struct StatusRequest {
    pub source: ItemSource,
    pub jobs: ConcurrencyBudget,
}

/// Final summary of a status run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub run_id: String,
    pub tally: RunTally,
    /// Absolute location of the local mirror root
    pub destination: String,
    pub duration_ms: u64,
}

impl StatusReport {
    /// Whether any item was flagged
    #[must_use]
    pub fn has_flagged(&self) -> bool {
        self.tally.flagged > 0
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in '{}'", self.tally, self.destination)
    }
}
