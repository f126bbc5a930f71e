//! Topic help pages shown by `--help-topic`
//!
//! clap renders the flag reference; these pages cover what doesn't fit
//! into a one-line flag description.

use crate::config::env::EnvManager;
use colored::*;

/// Topics accepted by `--help-topic`
pub const HELP_TOPICS: &[&str] = &["config", "endpoints", "examples", "output", "exit-codes"];

/// Help pages for the CLI application
#[derive(Debug, Default)]
pub struct HelpSystem;

impl HelpSystem {
    pub fn new() -> Self {
        Self
    }

    /// Render a topic page, or `None` when the topic is unknown
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "config" | "configuration" | "env" | "environment" => Some(self.format_configuration_help(use_colors)),
            "endpoints" | "endpoint" => Some(self.format_endpoints_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            "output" | "formatting" => Some(self.format_output_help(use_colors)),
            "exit-codes" | "exit" => Some(self.format_exit_codes_help(use_colors)),
            _ => None,
        }
    }

    /// Shown for an unknown topic
    pub fn display_topic_list(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n", self.header("AVAILABLE HELP TOPICS:", use_colors));
        for topic in HELP_TOPICS {
            output.push_str(&format!("  {}\n", topic));
        }
        output
    }

    fn header(&self, title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n\n", self.header("CONFIGURATION REFERENCE:", use_colors));
        output.push_str(&EnvManager::display_env_help());
        output.push_str("\nA .env file in the working directory is loaded automatically.\n");
        output.push_str("Write a commented template with: eprobe --write-env-example .env\n");
        output
    }

    fn format_endpoints_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n\n", self.header("ENDPOINT DEFINITIONS:", use_colors));
        output.push_str("Each endpoint is written as \"METHOD /path description words\".\n");
        output.push_str("The method is case-insensitive and the description is optional.\n");
        output.push_str("Paths are appended to the base URL exactly as written.\n\n");
        output.push_str("  --endpoint \"GET /api/health Health check\"   (repeatable)\n");
        output.push_str("  PROBE_ENDPOINTS=\"GET /a First;GET /b Second\"\n\n");
        output.push_str("Without any endpoint configuration these are probed:\n");
        for (method, path, description) in crate::defaults::DEFAULT_ENDPOINTS {
            output.push_str(&format!("  {} {} - {}\n", method, path, description));
        }
        output
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Probe the default endpoints",
                command: "eprobe --token $API_TOKEN",
                description: "Check the four default endpoints on https://jetty.test",
            },
            ExampleHelp {
                title: "Local server, no pacing",
                command: "eprobe --base-url http://localhost:8080 --delay-ms 0 --endpoint \"GET /health\"",
                description: "Probe a single endpoint on a development server",
            },
            ExampleHelp {
                title: "CI gate",
                command: "eprobe --timeout 10 --fail-on-error --no-color",
                description: "Exit non-zero if any endpoint fails or takes longer than 10s",
            },
            ExampleHelp {
                title: "Machine-readable report",
                command: "eprobe --json > report.json",
                description: "Write every probe result as JSON",
            },
        ];

        let mut output = format!("{}\n", self.header("EXAMPLES:", use_colors));
        for example in &examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_output_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n\n", self.header("OUTPUT FORMATS:", use_colors));
        output.push_str("Console (default): one line per endpoint as it completes,\n");
        output.push_str("  ✅ for 2xx responses, ❌ for anything else, followed by the\n");
        output.push_str("  parsed response body of 200 responses.\n");
        output.push_str("Plain (--no-color): same layout with [PASS]/[FAIL] markers.\n");
        output.push_str("JSON (--json): the complete run report, printed once at the end.\n");
        output.push_str("--verbose adds request timings; --debug adds structured logs on stderr.\n");
        output
    }

    fn format_exit_codes_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n\n", self.header("EXIT CODES:", use_colors));
        output.push_str("  0  Run completed (failed probes included unless --fail-on-error)\n");
        output.push_str("  1  Invalid configuration or arguments\n");
        output.push_str("  5  I/O error\n");
        output.push_str("  6  --fail-on-error and at least one probe failed\n");
        output
    }
}

struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!(
                "  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n", self.title, self.command, self.description)
        }
    }
}
