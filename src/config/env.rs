//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::EndpointSpec;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load an env file if it exists. Variables already set in the
    /// environment keep their values. Returns whether a file was loaded.
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<bool> {
        if !path.exists() {
            if debug {
                eprintln!("No {} file found, using defaults and CLI arguments", path.display());
            }
            return Ok(false);
        }

        dotenv::from_path(path)
            .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

        if debug {
            eprintln!("Loaded configuration from {}", path.display());
        }
        Ok(true)
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Endpoint Probe Configuration
#
# Values here are defaults; real environment variables and command-line
# arguments take precedence.

# Base URL every endpoint path is appended to
# PROBE_BASE_URL=https://jetty.test

# Bearer token sent as "Authorization: Bearer <token>"
# PROBE_AUTH_TOKEN=YOUR_AUTH_TOKEN_HERE

# Pause between consecutive requests in milliseconds (0-60000)
# PROBE_DELAY_MS=200

# Whole-request timeout in seconds (1-300). Unset means no timeout.
# PROBE_TIMEOUT_SECONDS=10

# Endpoints to probe, "METHOD /path description" separated by ';'
# PROBE_ENDPOINTS=GET /api/eqp/operations List operations;GET /api/eqp/equipment List equipment

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Probing a local development server:
# PROBE_BASE_URL=http://localhost:8080
# PROBE_DELAY_MS=0
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "PROBE_BASE_URL" => {
                let parsed = url::Url::parse(value.trim())
                    .map_err(|e| AppError::config(format!("Invalid PROBE_BASE_URL value '{}': {}", value, e)))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::config(format!("PROBE_BASE_URL must use http or https: {}", value)));
                }
            }
            "PROBE_DELAY_MS" => {
                let delay: u64 = value
                    .trim()
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid PROBE_DELAY_MS value '{}': {}", value, e)))?;
                if delay > crate::defaults::MAX_INTER_REQUEST_DELAY_MS {
                    return Err(AppError::config(format!(
                        "PROBE_DELAY_MS must be at most {}, got: {}",
                        crate::defaults::MAX_INTER_REQUEST_DELAY_MS,
                        delay
                    )));
                }
            }
            "PROBE_TIMEOUT_SECONDS" => {
                if !value.trim().is_empty() {
                    let timeout: u64 = value.trim().parse().map_err(|e| {
                        AppError::config(format!("Invalid PROBE_TIMEOUT_SECONDS value '{}': {}", value, e))
                    })?;
                    if timeout == 0 || timeout > crate::defaults::MAX_TIMEOUT_SECS {
                        return Err(AppError::config(format!(
                            "PROBE_TIMEOUT_SECONDS must be between 1 and {}, got: {}",
                            crate::defaults::MAX_TIMEOUT_SECS,
                            timeout
                        )));
                    }
                }
            }
            "PROBE_ENDPOINTS" => {
                for endpoint in EndpointSpec::parse_list(value)? {
                    endpoint
                        .validate()
                        .map_err(|e| AppError::config(format!("Invalid PROBE_ENDPOINTS entry '{}': {}", endpoint, e)))?;
                }
            }
            "ENABLE_COLOR" => {
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            // The token is opaque; anything goes
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("PROBE_BASE_URL", "Base URL endpoint paths are appended to", "https://jetty.test"),
            ("PROBE_AUTH_TOKEN", "Bearer token sent with every request", "eyJhbGciOi..."),
            ("PROBE_DELAY_MS", "Delay between requests in milliseconds (0-60000)", "200"),
            ("PROBE_TIMEOUT_SECONDS", "Request timeout in seconds (1-300)", "10"),
            ("PROBE_ENDPOINTS", "';'-separated \"METHOD /path description\" list", "GET /api/health Health check"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<22} {}\n", var, description));
            help.push_str(&format!("  {:<22} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate the assignments in an env file without loading it
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                if let Err(e) = Self::validate_env_var(key.trim(), value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }

    #[cfg(test)]
    pub(crate) fn clear_supported_vars() {
        for (name, _, _) in Self::get_supported_env_vars() {
            std::env::remove_var(name);
        }
    }
}
