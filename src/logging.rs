//! Structured logging for probe runs
//!
//! Entries carry a session id shared by every event of one run, optional
//! correlation ids, and free-form structured fields. Output goes to stderr
//! so stdout carries only the console report (or the JSON report).

use crate::error::{AppError, Result};
use crate::models::config::mask_token;
use crate::models::{Config, EndpointSpec, ProbeResult, RunReport};
use crate::probe::ProbeObserver;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Fatal => "\x1b[35m",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }

    /// Level implied by the verbosity flags
    pub fn for_config(config: &Config) -> Self {
        if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// One JSON object per line
    Json,
    /// Compact single-line format
    Compact,
}

#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    context_fields: HashMap<String, serde_json::Value>,
}

/// Logger with level filtering, shared context and several output formats
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with level and format derived from the configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        Self {
            min_level: LogLevel::for_config(config),
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    pub async fn session_id(&self) -> Option<String> {
        self.context.read().await.session_id.clone()
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        let entry = self.with_context(entry).await;
        let _ = writeln!(io::stderr(), "{}", self.render(&entry));
    }

    /// Merge the session id and context fields into an entry
    async fn with_context(&self, mut entry: LogEntry) -> LogEntry {
        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry
                .fields
                .insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        for (key, value) in &context.context_fields {
            entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        entry
    }

    /// Render an entry in the configured format
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
            LogFormat::Compact => self.format_compact(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            // Sorted so the same entry always renders the same way
            let mut fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => serde_json::json!({
                "error": "Failed to serialize log entry",
                "message": entry.message,
            })
            .to_string(),
        }
    }

    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!(
            "{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add the outcome of one probe
    pub fn probe_result(self, result: &ProbeResult) -> Self {
        let mut builder = self
            .field("method", &result.method)
            .field("path", &result.path)
            .field("status_code", result.status_code)
            .field("status", result.status().as_str())
            .field("elapsed_ms", result.elapsed_ms());
        if let Some(error) = &result.error_message {
            builder = builder.field("error", error);
        }
        if let Some(parse_error) = &result.body_parse_error {
            builder = builder.field("body_parse_error", parse_error);
        }
        builder
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    /// The entry as it would be written, before context fields are merged
    pub fn build(self) -> LogEntry {
        self.entry
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Writes one structured entry per run event
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("probe".to_string(), config),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Tag every following entry with a fresh session id and the run settings
    pub async fn start_session(&self, config: &Config) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.logger.set_session_id(session_id.clone()).await;
        self.logger.add_context_field("base_url".to_string(), &config.base_url).await;

        self.logger
            .debug("Resolved configuration")
            .field("auth_token", mask_token(&config.auth_token))
            .field("inter_request_delay_ms", config.inter_request_delay_ms)
            .field("timeout_seconds", config.timeout_seconds)
            .field("endpoints", config.endpoints.len())
            .log()
            .await;

        session_id
    }
}

#[async_trait]
impl ProbeObserver for ProbeLogger {
    async fn on_run_start(&self, base_url: &str, total: usize) {
        self.logger
            .info("Run started")
            .field("target", base_url)
            .field("endpoints", total)
            .log()
            .await;
    }

    async fn on_probe_complete(&self, spec: &EndpointSpec, result: &ProbeResult) {
        let level = if result.is_transport_failure() {
            LogLevel::Warn
        } else {
            LogLevel::Info
        };
        self.logger
            .log(level, &format!("{} -> {}", spec, result.status_code))
            .probe_result(result)
            .log()
            .await;
    }

    async fn on_run_complete(&self, report: &RunReport) {
        self.logger
            .info("Run complete")
            .field("passed", report.passed())
            .field("failed", report.failed())
            .field("duration_ms", report.total_duration.as_millis() as u64)
            .log()
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::Duration;

    fn plain_logger(format: LogFormat) -> Logger {
        let mut logger = Logger::new("test".to_string());
        logger.set_color(false);
        logger.set_format(format);
        logger
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("debug").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("WARNING").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::Fatal.as_str(), "FATAL");
    }

    #[test]
    fn test_level_follows_flags() {
        let mut config = Config::default();
        assert_eq!(LogLevel::for_config(&config), LogLevel::Warn);
        config.verbose = true;
        assert_eq!(LogLevel::for_config(&config), LogLevel::Info);
        config.debug = true;
        assert_eq!(LogLevel::for_config(&config), LogLevel::Debug);

        let logger = Logger::with_config("probe".to_string(), &config);
        assert_eq!(logger.format(), LogFormat::Json);
    }

    #[test]
    fn test_would_log() {
        let mut logger = Logger::new("test".to_string());
        logger.set_level(LogLevel::Warn);
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
        assert!(logger.would_log(LogLevel::Fatal));
    }

    #[test]
    fn test_console_rendering() {
        let logger = plain_logger(LogFormat::Console);
        let entry = logger
            .info("Run started")
            .correlation_id("0123456789abcdef")
            .field("endpoints", 4)
            .field("base_url", "https://jetty.test")
            .build();

        let rendered = logger.render(&entry);
        assert!(rendered.contains(" INFO [test] Run started [01234567]"));
        assert!(rendered.ends_with("{base_url=\"https://jetty.test\", endpoints=4}"));
    }

    #[test]
    fn test_short_correlation_id_does_not_panic() {
        let logger = plain_logger(LogFormat::Console);
        let entry = logger.info("x").correlation_id("abc").build();
        assert!(logger.render(&entry).contains("[abc]"));
    }

    #[test]
    fn test_json_and_compact_rendering() {
        let logger = plain_logger(LogFormat::Json);
        let entry = logger.warn("slow").field("elapsed_ms", 12.5).build();
        let value: serde_json::Value = serde_json::from_str(&logger.render(&entry)).unwrap();
        assert_eq!(value["level"], "Warn");
        assert_eq!(value["fields"]["elapsed_ms"], 12.5);

        let compact = plain_logger(LogFormat::Compact);
        assert!(compact.render(&entry).ends_with("W test: slow"));
    }

    #[test]
    fn test_probe_and_error_fields() {
        let logger = plain_logger(LogFormat::Json);
        let spec = EndpointSpec::get("/api/eqp/equipment", "List equipment");
        let error = AppError::network("connection refused");
        let result = ProbeResult::transport_failure(&spec, &error, Utc::now(), Duration::from_millis(7));

        let entry = logger.warn("failed").probe_result(&result).error_info(&error).build();
        assert_eq!(entry.fields["status_code"], 0);
        assert_eq!(entry.fields["status"], "failed");
        assert_eq!(entry.fields["path"], "/api/eqp/equipment");
        assert_eq!(entry.fields["error_category"], "NETWORK");
        assert_eq!(entry.fields["error_recoverable"], true);
        assert!(entry.fields["error"].as_str().unwrap().contains("refused"));
    }

    #[tokio::test]
    async fn test_context_is_merged() {
        let logger = plain_logger(LogFormat::Json);
        logger.set_session_id("session-1".to_string()).await;
        logger.add_context_field("base_url".to_string(), "https://jetty.test").await;

        let entry = logger.with_context(logger.info("x").field("base_url", "override").build()).await;
        assert_eq!(entry.fields["session_id"], "session-1");
        assert_eq!(entry.fields["base_url"], "override");
    }

    #[tokio::test]
    async fn test_probe_logger_session() {
        let config = Config::default();
        let probe_logger = ProbeLogger::new(&config);

        let session_id = probe_logger.start_session(&config).await;
        assert!(Uuid::parse_str(&session_id).is_ok());
        assert_eq!(probe_logger.logger().session_id().await, Some(session_id));

        // Below the default level, so these only exercise the paths
        let spec = EndpointSpec::get("/api/eqp/operations", "");
        let result = ProbeResult::responded(&spec, 200, None, Utc::now(), Duration::ZERO);
        probe_logger.on_run_start(&config.base_url, 1).await;
        probe_logger.on_probe_complete(&spec, &result).await;
    }
}
