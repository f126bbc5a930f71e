//! Non-fatal configuration checks
//!
//! `Config::validate` rejects configurations that cannot run. The checks
//! here flag configurations that run but probably not the way the user
//! intended.

use crate::{
    error::Result,
    models::{Config, EndpointSpec},
};
use colored::*;
use std::collections::HashSet;

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run `Config::validate`, then collect advisory warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_auth_token(&config.auth_token));
        warnings.extend(Self::validate_base_url(&config.base_url));
        warnings.extend(Self::validate_endpoints(&config.endpoints));
        warnings.extend(Self::validate_pacing(config));

        Ok(warnings)
    }

    fn validate_auth_token(token: &str) -> Vec<ValidationWarning> {
        if token.is_empty() {
            vec![ValidationWarning::new(
                ValidationLevel::Warning,
                "No auth token configured; authenticated endpoints will likely return 401".to_string(),
            )]
        } else if token == crate::defaults::PLACEHOLDER_AUTH_TOKEN {
            vec![ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Auth token is still the placeholder '{}'", token),
            )]
        } else if token.chars().any(char::is_whitespace) {
            vec![ValidationWarning::new(
                ValidationLevel::Warning,
                "Auth token contains whitespace".to_string(),
            )]
        } else {
            Vec::new()
        }
    }

    fn validate_base_url(base_url: &str) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        // Config::validate has already parsed it
        let Ok(parsed) = url::Url::parse(base_url) else {
            return warnings;
        };

        let is_local = match parsed.host() {
            Some(url::Host::Domain(host)) => host == "localhost",
            Some(url::Host::Ipv4(ip)) => ip.is_loopback() || ip.is_private(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            None => false,
        };

        if parsed.scheme() == "http" && !is_local {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Base URL '{}' uses HTTP; the bearer token is sent unencrypted", base_url),
            ));
        }

        if base_url.ends_with('/') {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Base URL '{}' ends with '/'; request URLs will contain '//'", base_url),
            ));
        }

        if parsed.query().is_some() || parsed.fragment().is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Base URL '{}' has a query or fragment; endpoint paths are appended after it", base_url),
            ));
        }

        warnings
    }

    fn validate_endpoints(endpoints: &[EndpointSpec]) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for endpoint in endpoints {
            if !seen.insert((endpoint.method.as_str(), endpoint.path.as_str())) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Endpoint '{}' is listed more than once", endpoint),
                ));
            }

            if !matches!(endpoint.method.as_str(), "GET" | "HEAD" | "OPTIONS") {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Endpoint '{}' is not a read-only method and is sent without a body", endpoint),
                ));
            }

            if endpoint.description.is_empty() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Endpoint '{}' has no description", endpoint),
                ));
            }
        }

        warnings
    }

    fn validate_pacing(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.inter_request_delay_ms == 0 && config.endpoints.len() > 1 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Inter-request delay is 0; requests are sent back to back".to_string(),
            ));
        }

        if let Some(timeout) = config.timeout_seconds {
            if timeout > 60 {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Long timeout of {}s will slow down failure detection", timeout),
                ));
            }
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
