#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for pga
//!
//! This crate sits between the CLI and the specialised crates. It wires the
//! catalog, storage roots and verification dispatcher together into the
//! operations the CLI exposes.

mod context;
mod source;
mod status;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use source::{items_from_text, load_items, read_stdin, ItemSource};
pub use status::status;
pub use types::{StatusReport, StatusRequest};

use pga_errors::Error;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Mirror status summary
    StatusReport(StatusReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            pga_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

}
