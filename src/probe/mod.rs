//! Sequential endpoint probing
//!
//! `EndpointProbe` sends one request per endpoint, strictly in order, and
//! pauses for the configured delay between consecutive requests. Every
//! outcome, including transport failures, is folded into a `ProbeResult`,
//! so a run always reaches `RunState::Completed` with one result per
//! endpoint.

pub mod observer;

pub use observer::ProbeObserver;

use crate::{
    client::{HttpClient, HttpRequest, NetworkClient},
    error::Result,
    models::{EndpointSpec, ProbeResult, RunConfig, RunReport},
    types::RunState,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Probes endpoints against a single base URL
pub struct EndpointProbe {
    client: Arc<dyn HttpClient>,
    config: RunConfig,
    observers: Vec<Arc<dyn ProbeObserver>>,
    state: RwLock<RunState>,
}

impl EndpointProbe {
    /// Create a probe backed by a `NetworkClient`
    pub fn new(config: RunConfig) -> Result<Self> {
        let client = NetworkClient::with_timeout(config.request_timeout)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a probe with a caller-supplied transport
    pub fn with_client(config: RunConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            config,
            observers: Vec::new(),
            state: RwLock::new(RunState::NotStarted),
        }
    }

    /// Register an observer; observers are notified in registration order
    pub fn with_observer(mut self, observer: Arc<dyn ProbeObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// State of the most recent run
    pub async fn state(&self) -> RunState {
        *self.state.read().await
    }

    /// Probe one endpoint. Never fails: transport errors become a result with
    /// status code 0.
    pub async fn probe(&self, spec: &EndpointSpec) -> ProbeResult {
        let result = self.execute(spec).await;

        for observer in &self.observers {
            observer.on_probe_complete(spec, &result).await;
        }

        result
    }

    /// Probe every endpoint in order. No endpoint is skipped, whatever the
    /// outcome of the ones before it.
    pub async fn run_all(&self, specs: &[EndpointSpec]) -> RunReport {
        *self.state.write().await = RunState::Running;

        let started_at = Utc::now();
        let start = Instant::now();

        for observer in &self.observers {
            observer.on_run_start(&self.config.base_url, specs.len()).await;
        }

        let mut results = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            if index > 0 && !self.config.inter_request_delay.is_zero() {
                tokio::time::sleep(self.config.inter_request_delay).await;
            }
            results.push(self.probe(spec).await);
        }

        *self.state.write().await = RunState::Completed;

        let report = RunReport {
            base_url: self.config.base_url.clone(),
            results,
            state: RunState::Completed,
            started_at,
            total_duration: start.elapsed(),
        };

        for observer in &self.observers {
            observer.on_run_complete(&report).await;
        }

        report
    }

    async fn execute(&self, spec: &EndpointSpec) -> ProbeResult {
        let started_at = Utc::now();
        let start = Instant::now();

        let method = match spec.http_method() {
            Ok(method) => method,
            Err(e) => return ProbeResult::transport_failure(spec, &e, started_at, start.elapsed()),
        };

        let mut request = HttpRequest::new(self.config.endpoint_url(&spec.path), method)
            .with_bearer_token(&self.config.auth_token)
            .accept_json();
        if let Some(timeout) = self.config.request_timeout {
            request = request.with_timeout(timeout);
        }

        match self.client.execute_request(request).await {
            Ok(response) => {
                let result = ProbeResult::responded(
                    spec,
                    response.status_code,
                    response.status_text.clone(),
                    started_at,
                    start.elapsed(),
                );

                // Only a 200 body is inspected; a malformed one is recorded, not raised
                if response.status_code != 200 {
                    return result;
                }
                if let Some(read_error) = response.body_error {
                    return result.with_body_parse_error(format!("body could not be read: {}", read_error));
                }
                match serde_json::from_str::<Value>(&response.body) {
                    Ok(body) => result.with_body(body),
                    Err(e) => result.with_body_parse_error(e.to_string()),
                }
            }
            Err(error) => ProbeResult::transport_failure(spec, &error, started_at, start.elapsed()),
        }
    }
}

/// Convenience wrapper: probe `specs` with a fresh network-backed probe
pub async fn run_all(specs: &[EndpointSpec], config: RunConfig) -> Result<RunReport> {
    Ok(EndpointProbe::new(config)?.run_all(specs).await)
}
