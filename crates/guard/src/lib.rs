#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Bounded-concurrency verification of mirrored siva files
//!
//! A run has three parts:
//!
//! - the [`Dispatcher`] spawns one task per item and gates the probes behind
//!   a semaphore holding exactly `budget` permits;
//! - each task runs a [`VerificationProbe`] and sends exactly one
//!   [`Outcome`](pga_types::Outcome) over a bounded channel;
//! - the [`Collector`] is the only reader of that channel and the only
//!   writer of the [`RunTally`], so progress needs no locks.

mod budget;
mod collector;
mod dispatcher;
mod probe;

pub use budget::ConcurrencyBudget;
pub use collector::Collector;
pub use dispatcher::{Dispatch, Dispatcher};
pub use probe::{ArchiveProbe, VerificationProbe};

use pga_errors::Error;
use pga_events::EventEmitter;
use pga_types::{ItemId, RunTally};

/// Progress stream id used for status runs
pub const PROGRESS_ID: &str = "status";

/// Verify every item and return the final tally.
///
/// An empty item list completes immediately with `0 of 0` and spawns
/// nothing.
///
/// # Errors
///
/// Returns `GuardError::OutcomesLost` if a verification task dies without
/// reporting its outcome.
pub async fn verify_items<E>(
    dispatcher: &Dispatcher,
    items: Vec<ItemId>,
    run_id: &str,
    events: &E,
) -> Result<RunTally, Error>
where
    E: EventEmitter,
{
    if items.is_empty() {
        return Ok(RunTally::new(0));
    }

    events.emit_progress_started(
        PROGRESS_ID,
        "Checking status",
        Some(items.len() as u64),
    );

    let dispatch = dispatcher.dispatch(items);
    Collector::new(run_id, events).collect(dispatch).await
}
