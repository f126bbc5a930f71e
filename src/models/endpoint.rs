//! Endpoint definitions

use crate::error::{AppError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between endpoint definitions in `PROBE_ENDPOINTS`
pub const ENDPOINT_LIST_SEPARATOR: char = ';';

/// A single endpoint to probe: HTTP method, path relative to the base URL,
/// and a human-readable description used in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
}

impl EndpointSpec {
    pub fn new<M, P, D>(method: M, path: P, description: D) -> Self
    where
        M: Into<String>,
        P: Into<String>,
        D: Into<String>,
    {
        Self {
            method: method.into(),
            path: path.into(),
            description: description.into(),
        }
    }

    /// Shorthand for a GET endpoint
    pub fn get<P: Into<String>, D: Into<String>>(path: P, description: D) -> Self {
        Self::new("GET", path, description)
    }

    /// Parse the method into a reqwest method
    pub fn http_method(&self) -> Result<Method> {
        Method::from_bytes(self.method.as_bytes())
            .map_err(|_| AppError::validation(format!("Invalid HTTP method '{}'", self.method)))
    }

    /// Check the definition is usable before a run starts
    pub fn validate(&self) -> Result<()> {
        if self.method.is_empty() {
            return Err(AppError::validation(format!("Endpoint '{}' has no HTTP method", self.path)));
        }
        self.http_method()?;

        if self.path.is_empty() {
            return Err(AppError::validation(format!("Endpoint '{}' has an empty path", self.method)));
        }
        if !self.path.starts_with('/') {
            return Err(AppError::validation(format!(
                "Endpoint path '{}' must start with '/'", self.path
            )));
        }

        Ok(())
    }

    /// Parse a `;`-separated list of endpoint definitions, skipping blanks
    pub fn parse_list(value: &str) -> Result<Vec<Self>> {
        value
            .split(ENDPOINT_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::from_str)
            .collect()
    }
}

impl fmt::Display for EndpointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Parses `"METHOD /path description words"`. The description is optional.
impl FromStr for EndpointSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();

        let method = parts
            .next()
            .ok_or_else(|| AppError::parse("Endpoint definition is empty"))?;
        let path = parts
            .next()
            .ok_or_else(|| AppError::parse(format!("Endpoint definition '{}' is missing a path", s.trim())))?;
        let description = parts.collect::<Vec<_>>().join(" ");

        Ok(Self::new(method.to_uppercase(), path, description))
    }
}

/// The endpoint list used when nothing else is configured
pub fn default_endpoints() -> Vec<EndpointSpec> {
    crate::defaults::DEFAULT_ENDPOINTS
        .iter()
        .map(|&(method, path, description)| EndpointSpec::new(method, path, description))
        .collect()
}
