//! Configuration data model and validation

use crate::models::endpoint::{default_endpoints, EndpointSpec};
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub auth_token: String,

    /// Pause between the end of one probe and the start of the next
    #[serde(default = "default_delay_ms")]
    pub inter_request_delay_ms: u64,

    /// Whole-request timeout; no timeout when unset
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Endpoints to probe, in order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<EndpointSpec>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Print the run report as JSON instead of console lines
    #[serde(default)]
    pub json_output: bool,

    /// Exit non-zero when any probe fails
    #[serde(default)]
    pub fail_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: String::new(),
            inter_request_delay_ms: default_delay_ms(),
            timeout_seconds: None,
            endpoints: default_endpoints(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            json_output: false,
            fail_on_error: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inter_request_delay(&self) -> Duration {
        Duration::from_millis(self.inter_request_delay_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Immutable settings handed to the probe for the duration of a run
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            base_url: self.base_url.clone(),
            auth_token: self.auth_token.clone(),
            inter_request_delay: self.inter_request_delay(),
            request_timeout: self.timeout(),
        }
    }

    /// Validate the configuration and return the first error found
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::config("Base URL cannot be empty"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::config(format!(
                        "Base URL must use http or https: {}", self.base_url
                    )));
                }
                if parsed.host().is_none() {
                    return Err(AppError::config(format!("Base URL has no host: {}", self.base_url)));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!("Invalid base URL '{}': {}", self.base_url, e)));
            }
        }

        if self.endpoints.is_empty() {
            return Err(AppError::config("At least one endpoint must be configured"));
        }

        for endpoint in &self.endpoints {
            endpoint
                .validate()
                .map_err(|e| AppError::config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
        }

        if self.inter_request_delay_ms > crate::defaults::MAX_INTER_REQUEST_DELAY_MS {
            return Err(AppError::config(format!(
                "Inter-request delay cannot exceed {}ms",
                crate::defaults::MAX_INTER_REQUEST_DELAY_MS
            )));
        }

        if let Some(timeout) = self.timeout_seconds {
            if timeout == 0 {
                return Err(AppError::config("Timeout must be greater than 0"));
            }
            if timeout > crate::defaults::MAX_TIMEOUT_SECS {
                return Err(AppError::config(format!(
                    "Timeout cannot exceed {} seconds",
                    crate::defaults::MAX_TIMEOUT_SECS
                )));
            }
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("PROBE_BASE_URL") {
            self.base_url = base_url.trim().to_string();
        }

        if let Ok(token) = std::env::var("PROBE_AUTH_TOKEN") {
            self.auth_token = token.trim().to_string();
        }

        if let Ok(delay) = std::env::var("PROBE_DELAY_MS") {
            self.inter_request_delay_ms = delay.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_DELAY_MS value '{}': {}", delay, e)))?;
        }

        if let Ok(timeout) = std::env::var("PROBE_TIMEOUT_SECONDS") {
            let timeout = timeout.trim();
            self.timeout_seconds = if timeout.is_empty() {
                None
            } else {
                Some(timeout.parse()
                    .map_err(|e| AppError::config(format!("Invalid PROBE_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?)
            };
        }

        if let Ok(endpoints) = std::env::var("PROBE_ENDPOINTS") {
            let parsed = EndpointSpec::parse_list(&endpoints)
                .map_err(|e| AppError::config(format!("Invalid PROBE_ENDPOINTS value: {}", e)))?;
            if !parsed.is_empty() {
                self.endpoints = parsed;
            }
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Settings a probe run reads; fixed before the run starts
#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub base_url: String,
    pub auth_token: String,
    pub inter_request_delay: Duration,
    pub request_timeout: Option<Duration>,
}

impl RunConfig {
    pub fn new<U: Into<String>, T: Into<String>>(base_url: U, auth_token: T) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: auth_token.into(),
            inter_request_delay: crate::defaults::DEFAULT_INTER_REQUEST_DELAY,
            request_timeout: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Full URL for a path. The path is appended verbatim.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("base_url", &self.base_url)
            .field("auth_token", &mask_token(&self.auth_token))
            .field("inter_request_delay", &self.inter_request_delay)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Hide all but the first few characters of a token for display
pub fn mask_token(token: &str) -> String {
    match token.chars().count() {
        0 => "<none>".to_string(),
        n if n <= 8 => "*".repeat(n),
        _ => format!("{}****", token.chars().take(4).collect::<String>()),
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    crate::defaults::DEFAULT_BASE_URL.to_string()
}

fn default_delay_ms() -> u64 {
    crate::defaults::DEFAULT_INTER_REQUEST_DELAY.as_millis() as u64
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
