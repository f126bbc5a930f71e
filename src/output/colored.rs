//! Colored formatter implementation with terminal color support
//!
//! Uses ANSI colors and the emoji markers the console output is known for.

use super::formatter::{
    description_suffix, endpoint_count, render_body, status_label, FormattingOptions, OutputFormatter,
};
use crate::{
    error::Result,
    models::{ProbeResult, RunReport},
};
use colored::*;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub success: Color,
    pub failure: Color,
    pub warning: Color,
    pub highlight: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            failure: Color::Red,
            warning: Color::Yellow,
            highlight: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn dimmed(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.dimmed()
        } else {
            text.normal()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_banner(&self, base_url: &str, total: usize) -> Result<String> {
        Ok(format!(
            "🔍 Testing API endpoints at {} ({})...\n",
            self.bold(base_url),
            endpoint_count(total)
        ))
    }

    fn format_probe_result(&self, result: &ProbeResult) -> Result<String> {
        let (marker, status_color) = if result.succeeded {
            ("✅", self.color_scheme.success)
        } else {
            ("❌", self.color_scheme.failure)
        };

        let mut output = format!(
            "{} {} {} - {}{}",
            marker,
            result.method,
            result.path,
            self.colorize(&status_label(result), status_color),
            description_suffix(result)
        );

        if let Some(error) = &result.error_message {
            output.push_str(&format!(": {}", self.colorize(error, self.color_scheme.failure)));
        }

        if self.options.verbose_mode {
            let timing = format!("({:.0}ms)", result.elapsed_ms());
            output.push_str(&format!(" {}", self.colorize(&timing, self.color_scheme.muted)));
        }

        if self.options.show_response_bodies {
            if let Some(body) = &result.body {
                output.push_str(&format!(
                    "\n   Response: {}",
                    self.dimmed(&render_body(body, &self.options))
                ));
            }
        }

        if let Some(parse_error) = &result.body_parse_error {
            let warning = format!("Response body is not valid JSON: {}", parse_error);
            output.push_str(&format!("\n   ⚠ {}", self.colorize(&warning, self.color_scheme.warning)));
        }

        Ok(output)
    }

    fn format_completion(&self, report: &RunReport) -> Result<String> {
        let failed_color = if report.failed() > 0 {
            self.color_scheme.failure
        } else {
            self.color_scheme.muted
        };

        let mut output = format!(
            "\n✅ Testing complete! {} passed, {} failed",
            self.colorize(&report.passed().to_string(), self.color_scheme.success),
            self.colorize(&report.failed().to_string(), failed_color)
        );
        if self.options.verbose_mode {
            let duration = format!("in {:.2}s", report.total_duration.as_secs_f64());
            output.push_str(&format!(" {}", self.colorize(&duration, self.color_scheme.highlight)));
        }
        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", self.colorize(warning, self.color_scheme.warning)))
    }
}

/// Helper functions for color management
impl ColoredFormatter {
    /// Check if terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && std::env::var("TERM").map(|term| term != "dumb").unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::EndpointSpec;
    use crate::types::RunState;
    use chrono::Utc;
    use std::time::Duration;

    // Colors off so assertions see the exact text
    fn formatter() -> ColoredFormatter {
        ColoredFormatter::new(FormattingOptions {
            enable_color: false,
            ..FormattingOptions::default()
        })
    }

    fn spec() -> EndpointSpec {
        EndpointSpec::get("/api/eqp/activities", "List activities")
    }

    #[test]
    fn test_banner_marker() {
        let banner = formatter().format_banner("https://jetty.test", 4).unwrap();
        assert_eq!(banner, "🔍 Testing API endpoints at https://jetty.test (4 endpoints)...\n");
    }

    #[test]
    fn test_markers_follow_success() {
        let ok = ProbeResult::responded(&spec(), 200, Some("OK".into()), Utc::now(), Duration::ZERO)
            .with_body(serde_json::json!([1, 2]));
        assert_eq!(
            formatter().format_probe_result(&ok).unwrap(),
            "✅ GET /api/eqp/activities - 200 OK - List activities\n   Response: [1,2]"
        );

        let denied = ProbeResult::responded(&spec(), 403, Some("Forbidden".into()), Utc::now(), Duration::ZERO);
        assert_eq!(
            formatter().format_probe_result(&denied).unwrap(),
            "❌ GET /api/eqp/activities - 403 Forbidden - List activities"
        );
    }

    #[test]
    fn test_transport_failure_line() {
        let failed = ProbeResult::transport_failure(&spec(), &AppError::timeout("request timed out"), Utc::now(), Duration::ZERO);
        let output = formatter().format_probe_result(&failed).unwrap();
        assert!(output.starts_with("❌ GET /api/eqp/activities - ERROR - List activities: "));
        assert!(output.contains("timed out"));
    }

    #[test]
    fn test_parse_warning() {
        let result = ProbeResult::responded(&spec(), 200, Some("OK".into()), Utc::now(), Duration::ZERO)
            .with_body_parse_error("expected value");
        let output = formatter().format_probe_result(&result).unwrap();
        assert!(output.starts_with("✅ "));
        assert!(output.ends_with("\n   ⚠ Response body is not valid JSON: expected value"));
    }

    #[test]
    fn test_completion_counts() {
        let report = RunReport {
            base_url: "https://jetty.test".into(),
            results: vec![
                ProbeResult::responded(&spec(), 200, None, Utc::now(), Duration::ZERO),
                ProbeResult::responded(&spec(), 500, None, Utc::now(), Duration::ZERO),
            ],
            state: RunState::Completed,
            started_at: Utc::now(),
            total_duration: Duration::ZERO,
        };
        assert_eq!(
            formatter().format_completion(&report).unwrap(),
            "\n✅ Testing complete! 1 passed, 1 failed"
        );
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let colored = ColoredFormatter::new(FormattingOptions::default());
        let ok = ProbeResult::responded(&spec(), 200, Some("OK".into()), Utc::now(), Duration::ZERO);
        let output = colored.format_probe_result(&ok).unwrap();
        assert!(output.contains("200 OK"));
        assert!(output.contains("GET /api/eqp/activities"));
    }
}
