//! Command-line interface

pub mod help;

pub use help::HelpSystem;

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Endpoint Probe - sequential HTTP smoke tests against an authenticated API
#[derive(Parser, Debug, Clone)]
#[command(name = "eprobe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL endpoint paths are appended to
    #[arg(short, long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Delay between consecutive requests in milliseconds
    #[arg(short, long, value_name = "MS", value_parser = parse_delay)]
    pub delay_ms: Option<u64>,

    /// Request timeout in seconds (no timeout when omitted)
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Endpoint to probe as "METHOD /path description" (can be used multiple times)
    #[arg(short, long = "endpoint", value_name = "ENDPOINT", action = ArgAction::Append)]
    pub endpoints: Vec<String>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show request timings and run details
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output with structured logs
    #[arg(long)]
    pub debug: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with a non-zero status when any endpoint fails
    #[arg(long)]
    pub fail_on_error: bool,

    /// Show help for specific topic (config, endpoints, examples, output, exit-codes)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,

    /// Write a commented example .env file and exit
    #[arg(long, value_name = "PATH")]
    pub write_env_example: Option<PathBuf>,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        for endpoint in &self.endpoints {
            if endpoint.split_whitespace().count() < 2 {
                return Err(format!(
                    "Invalid --endpoint '{}': expected \"METHOD /path [description]\"",
                    endpoint
                ));
            }
        }

        Ok(())
    }

    /// Whether this invocation only prints information and exits
    pub fn is_informational(&self) -> bool {
        self.help_topic.is_some() || self.write_env_example.is_some()
    }

    /// Explicit color choice, if any
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override()
            .unwrap_or_else(crate::output::ColoredFormatter::supports_color)
    }

    /// Render the requested help topic
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        match &self.help_topic {
            Some(topic) => help_system.display_topic_help(topic, use_colors).unwrap_or_else(|| {
                format!("Unknown help topic: '{}'\n\n{}", topic, help_system.display_topic_list(use_colors))
            }),
            None => help_system.display_topic_list(use_colors),
        }
    }
}

/// Parse timeout seconds, 1 through 300
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > crate::defaults::MAX_TIMEOUT_SECS {
                Err(format!(
                    "Duration cannot exceed {} seconds",
                    crate::defaults::MAX_TIMEOUT_SECS
                ))
            } else {
                Ok(secs)
            }
        })
}

fn parse_delay(s: &str) -> Result<u64, String> {
    if s.starts_with('+') {
        return Err(format!("Invalid delay: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid delay: {}", s))
        .and_then(|ms| {
            if ms > crate::defaults::MAX_INTER_REQUEST_DELAY_MS {
                Err(format!(
                    "Delay cannot exceed {}ms",
                    crate::defaults::MAX_INTER_REQUEST_DELAY_MS
                ))
            } else {
                Ok(ms)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::parse_from(["eprobe"]);
        assert_eq!(cli.base_url, None);
        assert_eq!(cli.token, None);
        assert_eq!(cli.delay_ms, None);
        assert_eq!(cli.timeout, None);
        assert!(cli.endpoints.is_empty());
        assert!(!cli.json);
        assert!(!cli.fail_on_error);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "eprobe",
            "--base-url", "http://localhost:8080",
            "--token", "abc",
            "--delay-ms", "0",
            "--timeout", "30",
            "--endpoint", "GET /a First endpoint",
            "-e", "post /b",
            "--no-color",
            "--debug",
            "--fail-on-error",
        ]);

        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(cli.delay_ms, Some(0));
        assert_eq!(cli.timeout, Some(30));
        assert_eq!(cli.endpoints, vec!["GET /a First endpoint", "post /b"]);
        assert!(cli.no_color);
        assert!(cli.debug);
        assert!(cli.fail_on_error);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_conflicting_flags() {
        let cli = Cli::parse_from(["eprobe", "--color", "--no-color"]);
        assert!(cli.validate().unwrap_err().contains("--color"));

        let cli = Cli::parse_from(["eprobe", "--json", "--verbose"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_malformed_endpoint_flag() {
        let cli = Cli::parse_from(["eprobe", "--endpoint", "/missing-method"]);
        assert!(cli.validate().unwrap_err().contains("/missing-method"));
    }

    #[test]
    fn test_duration_parsing() {
        assert_eq!(parse_duration("1").unwrap(), 1);
        assert_eq!(parse_duration("300").unwrap(), 300);

        assert!(parse_duration("0").is_err());
        assert!(parse_duration("301").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("-5").is_err());
        assert!(parse_duration("+10").is_err());
        assert!(parse_duration("0x10").is_err());
        assert!(parse_duration("10.5").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_delay_parsing() {
        assert_eq!(parse_delay("0").unwrap(), 0);
        assert_eq!(parse_delay("60000").unwrap(), 60_000);
        assert!(parse_delay("60001").is_err());
        assert!(parse_delay("-1").is_err());
        assert!(parse_delay("+5").is_err());
    }

    #[test]
    fn test_invalid_values_rejected_by_clap() {
        assert!(Cli::try_parse_from(["eprobe", "--timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["eprobe", "--delay-ms", "soon"]).is_err());
    }

    #[test]
    fn test_color_override() {
        assert_eq!(Cli::parse_from(["eprobe", "--color"]).color_override(), Some(true));
        assert_eq!(Cli::parse_from(["eprobe", "--no-color"]).color_override(), Some(false));
        assert_eq!(Cli::parse_from(["eprobe"]).color_override(), None);
        assert!(!Cli::parse_from(["eprobe", "--no-color"]).use_colors());
    }

    #[test]
    fn test_help_display() {
        let cli = Cli::parse_from(["eprobe", "--no-color", "--help-topic", "output"]);
        assert!(cli.is_informational());
        assert!(cli.display_help().contains("OUTPUT FORMATS"));

        let cli = Cli::parse_from(["eprobe", "--no-color", "--help-topic", "nope"]);
        assert!(cli.display_help().contains("Unknown help topic: 'nope'"));
    }
}
