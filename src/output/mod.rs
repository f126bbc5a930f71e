//! Output formatting and display system
//!
//! Console output is produced incrementally: the coordinator is attached to
//! the probe as an observer and prints each line as soon as the event occurs.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{FormattingOptions, OutputFormatter, PlainFormatter};

use crate::{
    error::Result,
    models::{EndpointSpec, ProbeResult, RunReport},
    probe::ProbeObserver,
};
use async_trait::async_trait;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            ..FormattingOptions::default()
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Prints run progress to stdout as events arrive
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter }
    }

    pub fn render_banner(&self, base_url: &str, total: usize) -> Result<String> {
        self.formatter.format_banner(base_url, total)
    }

    pub fn render_probe(&self, result: &ProbeResult) -> Result<String> {
        self.formatter.format_probe_result(result)
    }

    pub fn render_completion(&self, report: &RunReport) -> Result<String> {
        self.formatter.format_completion(report)
    }

    pub fn render_warning(&self, warning: &str) -> Result<String> {
        self.formatter.format_warning(warning)
    }

    fn emit(&self, rendered: Result<String>) {
        match rendered {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to format output: {}", e),
        }
    }
}

#[async_trait]
impl ProbeObserver for OutputCoordinator {
    async fn on_run_start(&self, base_url: &str, total: usize) {
        self.emit(self.render_banner(base_url, total));
    }

    async fn on_probe_complete(&self, _spec: &EndpointSpec, result: &ProbeResult) {
        self.emit(self.render_probe(result));
    }

    async fn on_run_complete(&self, report: &RunReport) {
        self.emit(self.render_completion(report));
    }
}

/// Machine-readable rendering of a finished run
pub struct JsonReporter;

impl JsonReporter {
    pub fn render(report: &RunReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
