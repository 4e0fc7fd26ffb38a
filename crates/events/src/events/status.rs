use pga_types::{ItemId, RunTally, Verdict};
use serde::{Deserialize, Serialize};

/// Where the items of a status run came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemOrigin {
    /// Newline-delimited list (standard input or a supplied text)
    List,
    /// Rows selected from the catalog index
    Catalog { rows: usize },
}

/// Mirror status run events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    /// Item identifiers were materialised from their source.
    ItemsLoaded { origin: ItemOrigin, count: usize },

    /// Dispatch is about to begin.
    RunStarted {
        run_id: String,
        items: usize,
        jobs: usize,
        destination: String,
    },

    /// An item's local copy is corrupted, stale, or missing.
    ItemFlagged {
        run_id: String,
        item: ItemId,
        path: String,
        verdict: Verdict,
    },

    /// Every outcome has been collected.
    RunCompleted {
        run_id: String,
        tally: RunTally,
        destination: String,
        duration_ms: u64,
    },
}
