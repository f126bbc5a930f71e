//! Core formatting trait and the plain text implementation

use crate::{
    error::Result,
    models::{ProbeResult, RunReport},
};
use serde_json::Value;

/// Main trait for output formatting
pub trait OutputFormatter: Send + Sync {
    /// Line printed before the first probe
    fn format_banner(&self, base_url: &str, total: usize) -> Result<String>;

    /// One probe: the summary line plus any body or parse-failure lines
    fn format_probe_result(&self, result: &ProbeResult) -> Result<String>;

    /// Line printed after the last probe
    fn format_completion(&self, report: &RunReport) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Pretty-print bodies and show request timings
    pub verbose_mode: bool,
    /// Print the parsed body of 200 responses
    pub show_response_bodies: bool,
    /// Bodies longer than this are truncated
    pub max_body_chars: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            show_response_bodies: true,
            max_body_chars: 2000,
        }
    }
}

/// `"200 OK"`, `"418"` or `"ERROR"` for a transport failure
pub(crate) fn status_label(result: &ProbeResult) -> String {
    if result.is_transport_failure() {
        return "ERROR".to_string();
    }
    match &result.status_text {
        Some(text) => format!("{} {}", result.status_code, text),
        None => result.status_code.to_string(),
    }
}

/// `" - description"`, or nothing when there is no description
pub(crate) fn description_suffix(result: &ProbeResult) -> String {
    if result.description.is_empty() {
        String::new()
    } else {
        format!(" - {}", result.description)
    }
}

/// Render a JSON body on one line, or indented under the response label in verbose mode
pub(crate) fn render_body(body: &Value, options: &FormattingOptions) -> String {
    let rendered = if options.verbose_mode {
        serde_json::to_string_pretty(body)
            .unwrap_or_else(|_| body.to_string())
            .replace('\n', "\n   ")
    } else {
        body.to_string()
    };

    let total = rendered.chars().count();
    if total > options.max_body_chars {
        let kept: String = rendered.chars().take(options.max_body_chars).collect();
        format!("{}... ({} more chars)", kept, total - options.max_body_chars)
    } else {
        rendered
    }
}

pub(crate) fn endpoint_count(total: usize) -> String {
    if total == 1 {
        "1 endpoint".to_string()
    } else {
        format!("{} endpoints", total)
    }
}

/// Plain text formatter for logs and scripts
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_banner(&self, base_url: &str, total: usize) -> Result<String> {
        Ok(format!(
            "Testing API endpoints at {} ({})...\n",
            base_url,
            endpoint_count(total)
        ))
    }

    fn format_probe_result(&self, result: &ProbeResult) -> Result<String> {
        let marker = if result.succeeded { "[PASS]" } else { "[FAIL]" };
        let mut output = format!(
            "{} {} {} - {}{}",
            marker,
            result.method,
            result.path,
            status_label(result),
            description_suffix(result)
        );

        if let Some(error) = &result.error_message {
            output.push_str(&format!(": {}", error));
        }

        if self.options.verbose_mode {
            output.push_str(&format!(" ({:.0}ms)", result.elapsed_ms()));
        }

        if self.options.show_response_bodies {
            if let Some(body) = &result.body {
                output.push_str(&format!("\n   Response: {}", render_body(body, &self.options)));
            }
        }

        if let Some(parse_error) = &result.body_parse_error {
            output.push_str(&format!("\n   Warning: response body is not valid JSON: {}", parse_error));
        }

        Ok(output)
    }

    fn format_completion(&self, report: &RunReport) -> Result<String> {
        let mut output = format!(
            "\nTesting complete! {} passed, {} failed",
            report.passed(),
            report.failed()
        );
        if self.options.verbose_mode {
            output.push_str(&format!(" in {:.2}s", report.total_duration.as_secs_f64()));
        }
        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("Warning: {}", warning))
    }
}
