//! Structured logging integration for events
//!
//! Mirrors every event that reaches the CLI into the tracing subscriber so a
//! `--debug` log file holds the full run history next to library logs.

use pga_events::{AppEvent, EventMessage, GeneralEvent, IndexEvent, StatusEvent};
use tracing::{debug, error, info, trace, warn};

/// Log an `EventMessage` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;
    let level = meta.tracing_level();

    match event {
        AppEvent::Status(status_event) => match status_event {
            StatusEvent::ItemsLoaded { origin, count } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    origin = ?origin,
                    count = count,
                    "Items loaded"
                );
            }
            StatusEvent::RunStarted {
                run_id,
                items,
                jobs,
                destination,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    run_id = %run_id,
                    items = items,
                    jobs = jobs,
                    destination = %destination,
                    "Status run started"
                );
            }
            StatusEvent::ItemFlagged {
                run_id,
                item,
                path,
                verdict,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    run_id = %run_id,
                    item = %item,
                    path = %path,
                    verdict = %verdict,
                    "Item flagged"
                );
            }
            StatusEvent::RunCompleted {
                run_id,
                tally,
                destination,
                duration_ms,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    run_id = %run_id,
                    total = tally.total,
                    flagged = tally.flagged,
                    destination = %destination,
                    duration_ms = duration_ms,
                    "Status run completed"
                );
            }
        },

        AppEvent::Index(index_event) => match index_event {
            IndexEvent::FetchStarted { location } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    location = %location,
                    "Catalog fetch started"
                );
            }
            IndexEvent::Fetched { location, bytes } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    location = %location,
                    bytes = bytes,
                    "Catalog fetched"
                );
            }
            IndexEvent::CacheHit { path } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    path = %path,
                    "Catalog cache hit"
                );
            }
            IndexEvent::RowsFiltered { scanned, matched } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    scanned = scanned,
                    matched = matched,
                    "Catalog rows filtered"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::OperationStarted { operation } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if *success {
                    info!(
                        source = meta.source.as_str(),
                        event_id = %meta.event_id,
                        correlation = ?meta.correlation_id,
                        operation = %operation,
                        "Operation completed successfully"
                    );
                } else {
                    warn!(
                        source = meta.source.as_str(),
                        event_id = %meta.event_id,
                        correlation = ?meta.correlation_id,
                        operation = %operation,
                        "Operation completed with issues"
                    );
                }
            }
            GeneralEvent::OperationFailed { operation, failure } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    retryable = failure.retryable,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Operation failed"
                );
            }
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    context = ?context,
                    "Warning"
                );
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    context = ?context,
                    "Debug log"
                );
            }
        },

        // Progress updates arrive once per item; log them at their own level
        AppEvent::Progress(progress_event) => match level {
            tracing::Level::ERROR => {
                error!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?progress_event, "Progress event");
            }
            tracing::Level::WARN => {
                warn!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?progress_event, "Progress event");
            }
            tracing::Level::INFO => {
                info!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?progress_event, "Progress event");
            }
            tracing::Level::DEBUG => {
                debug!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?progress_event, "Progress event");
            }
            tracing::Level::TRACE => {
                trace!(source = meta.source.as_str(), event_id = %meta.event_id, event = ?progress_event, "Progress event");
            }
        },
    }
}
