#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in pga
//!
//! Library crates never print. Everything a user should see (progress,
//! flagged items, warnings) travels as an [`AppEvent`] over an unbounded
//! channel to the CLI, which owns the terminal.
//!
//! ## Architecture
//!
//! - **Domain events**: grouped by functional domain (General, Progress, Status, Index)
//! - **Unified `EventEmitter` trait**: single API for all event emissions
//! - **Metadata**: every emission is wrapped with an [`EventMeta`] for correlation and log routing

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{
    AppEvent, FailureContext, GeneralEvent, IndexEvent, ItemOrigin, ProgressEvent, StatusEvent,
};

use tokio::sync::mpsc::UnboundedSender;

/// A single event together with its emission metadata
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with metadata derived from the event itself
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout pga
///
/// This trait provides a single, consistent API for emitting events regardless of
/// whether you have a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event with explicit metadata
    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        self.emit_with_meta(meta, event);
    }

    /// Emit an event correlated with a status run
    fn emit_for_run(&self, run_id: &str, event: AppEvent) {
        let meta =
            EventMeta::new(event.log_level(), event.event_source()).with_correlation_id(run_id);
        self.emit_with_meta(meta, event);
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit an operation failed event
    fn emit_operation_failed(&self, operation: impl Into<String>, failure: FailureContext) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            failure,
        }));
    }

    /// Emit a progress started event
    fn emit_progress_started(
        &self,
        id: impl Into<String>,
        operation: impl Into<String>,
        total: Option<u64>,
    ) {
        self.emit(AppEvent::Progress(ProgressEvent::started(
            id, operation, total,
        )));
    }

    /// Emit a progress update event
    fn emit_progress_updated(&self, id: impl Into<String>, current: u64, total: Option<u64>) {
        self.emit(AppEvent::Progress(ProgressEvent::updated(
            id, current, total,
        )));
    }

    /// Emit a progress completed event
    fn emit_progress_completed(
        &self,
        id: impl Into<String>,
        total_processed: u64,
        duration: std::time::Duration,
    ) {
        self.emit(AppEvent::Progress(ProgressEvent::completed(
            id,
            total_processed,
            duration,
        )));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
