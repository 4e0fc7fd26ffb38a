//! Event handling and progress display

use console::Style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use pga_events::{
    AppEvent, EventMessage, GeneralEvent, IndexEvent, ProgressEvent, StatusEvent,
};
use std::collections::HashMap;

/// Event handler for progress display and user feedback
pub struct EventHandler {
    /// Multi-progress manager; messages are printed through it so they do
    /// not tear the bars
    multi_progress: MultiProgress,
    /// Active progress bars by progress id
    bars: HashMap<String, ProgressBar>,
    colors_enabled: bool,
    debug_enabled: bool,
    /// JSON mode: nothing but the final document may reach the terminal
    quiet: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug_enabled: bool, quiet: bool) -> Self {
        let multi_progress = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self {
            multi_progress,
            bars: HashMap::new(),
            colors_enabled,
            debug_enabled,
            quiet,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        if self.debug_enabled {
            crate::logging::log_event_with_tracing(&message);
        }

        match message.event {
            AppEvent::Progress(event) => self.handle_progress(event),
            AppEvent::Status(event) => self.handle_status(&event),
            AppEvent::Index(event) => self.handle_index(&event),
            AppEvent::General(event) => self.handle_general(&event),
        }
    }

    fn handle_progress(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started {
                id,
                operation,
                total,
            } => {
                let pb = match total {
                    Some(total) => ProgressBar::new(total),
                    None => ProgressBar::new_spinner(),
                };
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
                ) {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb.set_message(operation);

                let pb = self.multi_progress.add(pb);
                self.bars.insert(id, pb);
            }
            ProgressEvent::Updated { id, current, total } => {
                if let Some(pb) = self.bars.get(&id) {
                    if let Some(total) = total {
                        pb.set_length(total);
                    }
                    pb.set_position(current);
                }
            }
            ProgressEvent::Completed { id, .. } => {
                if let Some(pb) = self.bars.remove(&id) {
                    pb.finish();
                }
            }
            ProgressEvent::Failed { id, failure, .. } => {
                if let Some(pb) = self.bars.remove(&id) {
                    pb.abandon_with_message(format!("Failed: {}", failure.message));
                }
            }
        }
    }

    fn handle_status(&self, event: &StatusEvent) {
        match event {
            StatusEvent::ItemFlagged { path, .. } => {
                let line = format!("File is corrupted or not up to date {path}");
                self.show_warning(&line);
            }
            StatusEvent::ItemsLoaded { .. }
            | StatusEvent::RunStarted { .. }
            | StatusEvent::RunCompleted { .. } => {}
        }
    }

    fn handle_index(&self, event: &IndexEvent) {
        match event {
            IndexEvent::FetchStarted { location } => {
                self.show_status(&format!("Downloading catalog {location}"));
            }
            IndexEvent::Fetched { bytes, .. } => {
                self.show_status(&format!("Catalog cached ({bytes} bytes)"));
            }
            IndexEvent::RowsFiltered { scanned, matched } if scanned != matched => {
                self.show_status(&format!(
                    "Selected {matched} of {scanned} repositories"
                ));
            }
            IndexEvent::RowsFiltered { .. } | IndexEvent::CacheHit { .. } => {}
        }
    }

    fn handle_general(&self, event: &GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => self.show_warning(&format!("Warning: {message} ({context})")),
                None => self.show_warning(&format!("Warning: {message}")),
            },
            GeneralEvent::OperationFailed { operation, failure } => {
                self.show_error(&format!("{operation} failed: {}", failure.message));
            }
            GeneralEvent::DebugLog { .. }
            | GeneralEvent::OperationStarted { .. }
            | GeneralEvent::OperationCompleted { .. } => {}
        }
    }

    /// Show status message
    fn show_status(&self, message: &str) {
        self.print(message);
    }

    /// Show warning message
    fn show_warning(&self, message: &str) {
        if self.colors_enabled {
            self.print(&Style::new().yellow().apply_to(message).to_string());
        } else {
            self.print(message);
        }
    }

    /// Show error message
    fn show_error(&self, message: &str) {
        if self.colors_enabled {
            self.print(&Style::new().red().bold().apply_to(message).to_string());
        } else {
            self.print(message);
        }
    }

    fn print(&self, message: &str) {
        if self.quiet {
            return;
        }
        // A hidden draw target (stderr is not a terminal) swallows println
        if self.multi_progress.is_hidden() {
            eprintln!("{message}");
        } else {
            self.multi_progress.println(message).unwrap_or(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pga_events::FailureContext;
    use pga_types::{ItemId, Verdict};
    use std::time::Duration;

    fn message(event: AppEvent) -> EventMessage {
        EventMessage::from_event(event)
    }

    #[test]
    fn test_progress_bar_lifecycle() {
        let mut handler = EventHandler::new(false, false, true);

        handler.handle_event(message(AppEvent::Progress(ProgressEvent::started(
            "status",
            "Checking siva files",
            Some(3),
        ))));
        assert!(handler.bars.contains_key("status"));

        handler.handle_event(message(AppEvent::Progress(ProgressEvent::updated(
            "status",
            2,
            Some(3),
        ))));
        assert_eq!(handler.bars["status"].position(), 2);

        handler.handle_event(message(AppEvent::Progress(ProgressEvent::completed(
            "status",
            3,
            Duration::from_millis(5),
        ))));
        assert!(!handler.bars.contains_key("status"));
    }

    #[test]
    fn test_failed_progress_removes_bar() {
        let mut handler = EventHandler::new(false, false, true);
        handler.handle_event(message(AppEvent::Progress(ProgressEvent::started(
            "status", "Checking", None,
        ))));
        handler.handle_event(message(AppEvent::Progress(ProgressEvent::failed(
            "status",
            FailureContext::new(None::<String>, "lost", None::<String>, false),
            1,
        ))));
        assert!(handler.bars.is_empty());
    }

    #[test]
    fn test_updates_for_unknown_bar_are_ignored() {
        let mut handler = EventHandler::new(false, false, true);
        handler.handle_event(message(AppEvent::Progress(ProgressEvent::updated(
            "nope", 1, None,
        ))));
        assert!(handler.bars.is_empty());
    }

    #[test]
    fn test_status_and_general_events_do_not_panic() {
        let mut handler = EventHandler::new(true, false, true);
        let item: ItemId = "ab12".parse().unwrap();
        handler.handle_event(message(AppEvent::Status(StatusEvent::ItemFlagged {
            run_id: "run".to_string(),
            item,
            path: "siva/latest/ab/ab12".to_string(),
            verdict: Verdict::Missing,
        })));
        handler.handle_event(message(AppEvent::General(GeneralEvent::warning(
            "catalog size unknown",
        ))));
        handler.handle_event(message(AppEvent::Index(IndexEvent::RowsFiltered {
            scanned: 10,
            matched: 2,
        })));
    }
}
