//! Fixed defaults for the Public Git Archive layout
//!
//! The category/generation pair and the shard width are part of the archive's
//! published layout; they are configurable only so that mirrors of other
//! generations can be audited.

pub const DEFAULT_SOURCE_URL: &str = "http://pga.sourced.tech/";

pub const DEFAULT_CATEGORY: &str = "siva";
pub const DEFAULT_GENERATION: &str = "latest";

/// Catalog location relative to the source URL.
pub const INDEX_PATH: &str = "csv/latest.csv.gz";

/// Default concurrency budget for status checks.
pub const DEFAULT_JOBS: usize = 10;

pub const APP_DIR: &str = "pga";
pub const CONFIG_FILE: &str = "config.toml";
pub const LOGS_SUBDIR: &str = "logs";
