//! Output rendering and formatting

use console::{Style, Term};
use pga_ops::{OperationResult, StatusReport};
use pga_types::ColorChoice;
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.term.write_line(&self.format_plain(result))
        }
    }

    /// Render as JSON
    #[allow(clippy::unused_self)]
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn format_plain(&self, result: &OperationResult) -> String {
        let OperationResult::StatusReport(report) = result;
        self.format_status_report(report)
    }

    fn format_status_report(&self, report: &StatusReport) -> String {
        let line = report.to_string();
        if !self.colors_enabled() {
            return line;
        }
        let style = if report.has_flagged() {
            Style::new().yellow().bold()
        } else {
            Style::new().green()
        };
        style.apply_to(line).force_styling(true).to_string()
    }

    /// Whether to use colors in output
    fn colors_enabled(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}
