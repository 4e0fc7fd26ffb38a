//! Per-item verdicts and outcomes

use crate::ItemId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of checking one local copy against its remote reference.
///
/// Every probe-side failure mode is a verdict rather than an error so that a
/// probe always answers. Only `Current` counts as ok.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Local copy matches the remote digest.
    Current,
    /// No local copy exists.
    Missing,
    /// Local digest differs from the remote digest.
    Stale { local: String, remote: String },
    /// The remote reference could not be obtained.
    Unreachable { reason: String },
    /// The local copy exists but could not be read.
    Unreadable { reason: String },
}

impl Verdict {
    /// Whether this verdict counts against the mirror.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        !matches!(self, Self::Current)
    }

    /// Short label for logs and tables.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Missing => "missing",
            Self::Stale { .. } => "stale",
            Self::Unreachable { .. } => "unreachable",
            Self::Unreadable { .. } => "unreadable",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current | Self::Missing => f.write_str(self.label()),
            Self::Stale { local, remote } => write!(f, "stale (local {local}, remote {remote})"),
            Self::Unreachable { reason } => write!(f, "unreachable: {reason}"),
            Self::Unreadable { reason } => write!(f, "unreadable: {reason}"),
        }
    }
}

/// Exactly one outcome is produced per dispatched item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub item: ItemId,
    /// Resolved relative storage path that was probed.
    pub path: String,
    pub verdict: Verdict,
}

impl Outcome {
    #[must_use]
    pub fn new(item: ItemId, path: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            item,
            path: path.into(),
            verdict,
        }
    }

    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.verdict.is_flagged()
    }
}
