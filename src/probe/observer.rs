//! Hooks for reporting on a run without touching the probing logic

use crate::models::{EndpointSpec, ProbeResult, RunReport};
use async_trait::async_trait;

/// Receives run events in order: one `on_run_start`, one `on_probe_complete`
/// per endpoint, then one `on_run_complete`. Observers cannot alter results.
#[async_trait]
pub trait ProbeObserver: Send + Sync {
    async fn on_run_start(&self, _base_url: &str, _total: usize) {}

    async fn on_probe_complete(&self, _spec: &EndpointSpec, _result: &ProbeResult) {}

    async fn on_run_complete(&self, _report: &RunReport) {}
}
