//! Single-reader outcome fold

use crate::{Dispatch, PROGRESS_ID};
use pga_errors::{Error, GuardError};
use pga_events::{AppEvent, EventEmitter, FailureContext, ProgressEvent, StatusEvent};
use pga_types::RunTally;
use std::time::Instant;

/// Reads outcomes in arrival order and folds them into the run tally
pub struct Collector<'a, E> {
    run_id: &'a str,
    events: &'a E,
}

impl<'a, E> Collector<'a, E>
where
    E: EventEmitter,
{
    #[must_use]
    pub fn new(run_id: &'a str, events: &'a E) -> Self {
        Self { run_id, events }
    }

    /// Consume exactly `dispatch.total()` outcomes.
    ///
    /// # Errors
    ///
    /// Returns `GuardError::OutcomesLost` when every sender is gone before
    /// the tally is complete, which only happens if a task panicked.
    pub async fn collect(&self, dispatch: Dispatch) -> Result<RunTally, Error> {
        let Dispatch {
            total,
            mut outcomes,
            mut tasks,
        } = dispatch;
        let start = Instant::now();
        let mut tally = RunTally::new(total);

        while !tally.is_complete() {
            let Some(outcome) = outcomes.recv().await else {
                while let Some(joined) = tasks.join_next().await {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "verification task failed");
                    }
                }
                let err = GuardError::OutcomesLost {
                    expected: total,
                    received: tally.completed,
                };
                self.events.emit(AppEvent::Progress(ProgressEvent::failed(
                    PROGRESS_ID,
                    FailureContext::from_error(&err),
                    tally.completed as u64,
                )));
                return Err(err.into());
            };

            if outcome.is_flagged() {
                tracing::debug!(
                    path = %outcome.path,
                    verdict = %outcome.verdict,
                    "File is corrupted or not up to date"
                );
                self.events.emit_for_run(
                    self.run_id,
                    AppEvent::Status(StatusEvent::ItemFlagged {
                        run_id: self.run_id.to_string(),
                        item: outcome.item.clone(),
                        path: outcome.path.clone(),
                        verdict: outcome.verdict.clone(),
                    }),
                );
            }

            tally.record(&outcome);
            self.events.emit_progress_updated(
                PROGRESS_ID,
                tally.completed as u64,
                Some(total as u64),
            );
        }

        // Every task has sent its outcome; reap them
        while tasks.join_next().await.is_some() {}

        self.events
            .emit_progress_completed(PROGRESS_ID, tally.completed as u64, start.elapsed());
        Ok(tally)
    }
}
