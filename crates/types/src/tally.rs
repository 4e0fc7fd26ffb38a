//! Aggregate counts for a status run

use crate::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Running tally owned by the single collector of a run.
///
/// `completed <= total` holds at all times and the run is over exactly when
/// the two are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    pub total: usize,
    pub flagged: usize,
    pub completed: usize,
}

impl RunTally {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            flagged: 0,
            completed: 0,
        }
    }

    /// Fold one outcome into the tally. Returns `false` without changing
    /// anything if the tally is already complete.
    pub fn record(&mut self, outcome: &Outcome) -> bool {
        if self.is_complete() {
            return false;
        }
        self.completed += 1;
        if outcome.is_flagged() {
            self.flagged += 1;
        }
        true
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }
}

impl fmt::Display for RunTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} corrupted", self.flagged, self.total)
    }
}
