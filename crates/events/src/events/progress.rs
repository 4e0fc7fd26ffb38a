use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Progress tracking events
///
/// Every progress stream has a single producer; consumers may assume that
/// `Updated.current` is non-decreasing for a given `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressEvent {
    /// Progress tracking started
    Started {
        id: String,
        operation: String,
        total: Option<u64>,
    },

    /// Progress updated
    Updated {
        id: String,
        current: u64,
        total: Option<u64>,
    },

    /// Progress completed successfully
    Completed {
        id: String,
        total_processed: u64,
        duration: Duration,
    },

    /// Progress failed
    Failed {
        id: String,
        failure: super::FailureContext,
        completed_items: u64,
    },
}

impl ProgressEvent {
    /// Create a simple progress started event
    pub fn started(
        id: impl Into<String>,
        operation: impl Into<String>,
        total: Option<u64>,
    ) -> Self {
        Self::Started {
            id: id.into(),
            operation: operation.into(),
            total,
        }
    }

    /// Create a progress update event
    pub fn updated(id: impl Into<String>, current: u64, total: Option<u64>) -> Self {
        Self::Updated {
            id: id.into(),
            current,
            total,
        }
    }

    /// Create a progress completed event
    pub fn completed(id: impl Into<String>, total_processed: u64, duration: Duration) -> Self {
        Self::Completed {
            id: id.into(),
            total_processed,
            duration,
        }
    }

    /// Create a progress failed event
    pub fn failed(
        id: impl Into<String>,
        failure: super::FailureContext,
        completed_items: u64,
    ) -> Self {
        Self::Failed {
            id: id.into(),
            failure,
            completed_items,
        }
    }

    /// Identifier of the progress stream this event belongs to
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Started { id, .. }
            | Self::Updated { id, .. }
            | Self::Completed { id, .. }
            | Self::Failed { id, .. } => id,
        }
    }
}
