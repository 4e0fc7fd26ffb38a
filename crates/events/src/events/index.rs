use serde::{Deserialize, Serialize};

/// Catalog index events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndexEvent {
    /// Fetching the catalog from a remote location.
    FetchStarted { location: String },

    /// Catalog downloaded and written to the cache.
    Fetched { location: String, bytes: u64 },

    /// A cached copy was reused instead of downloading.
    CacheHit { path: String },

    /// Catalog rows were scanned and filtered.
    RowsFiltered { scanned: usize, matched: usize },
}
