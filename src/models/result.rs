//! Probe results and run reports

use crate::error::AppError;
use crate::models::EndpointSpec;
use crate::types::{ProbeStatus, RunState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Outcome of probing a single endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// HTTP method that was sent
    pub method: String,

    /// Path exactly as configured
    pub path: String,

    /// Endpoint description
    pub description: String,

    /// HTTP status code, 0 when no response was received
    pub status_code: u16,

    /// Reason phrase for the status code, if any
    pub status_text: Option<String>,

    /// True iff a 2xx response was received
    pub succeeded: bool,

    /// Transport failure cause
    pub error_message: Option<String>,

    /// Parsed JSON body of a 200 response
    pub body: Option<Value>,

    /// Why the body of a 200 response could not be parsed as JSON
    pub body_parse_error: Option<String>,

    /// When the request was issued
    pub started_at: DateTime<Utc>,

    /// Time from issuing the request to having the full response
    pub elapsed: Duration,
}

impl ProbeResult {
    /// Result for a request that produced an HTTP response
    pub fn responded(
        spec: &EndpointSpec,
        status_code: u16,
        status_text: Option<String>,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        Self {
            method: spec.method.clone(),
            path: spec.path.clone(),
            description: spec.description.clone(),
            status_code,
            status_text,
            succeeded: (200..300).contains(&status_code),
            error_message: None,
            body: None,
            body_parse_error: None,
            started_at,
            elapsed,
        }
    }

    /// Result for a request that never produced a response
    pub fn transport_failure(
        spec: &EndpointSpec,
        error: &AppError,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        Self {
            method: spec.method.clone(),
            path: spec.path.clone(),
            description: spec.description.clone(),
            status_code: 0,
            status_text: None,
            succeeded: false,
            error_message: Some(error.to_string()),
            body: None,
            body_parse_error: None,
            started_at,
            elapsed,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_body_parse_error<S: Into<String>>(mut self, error: S) -> Self {
        self.body_parse_error = Some(error.into());
        self
    }

    pub fn status(&self) -> ProbeStatus {
        ProbeStatus::from_succeeded(self.succeeded)
    }

    /// No response was received at all
    pub fn is_transport_failure(&self) -> bool {
        self.status_code == 0
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Ordered results of a complete run. `results[i]` belongs to the i-th
/// endpoint that was passed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub base_url: String,
    pub results: Vec<ProbeResult>,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub total_duration: Duration,
}

impl RunReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Status codes in run order
    pub fn status_codes(&self) -> Vec<u16> {
        self.results.iter().map(|r| r.status_code).collect()
    }
}
