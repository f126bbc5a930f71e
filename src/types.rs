//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Outcome of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStatus {
    /// A response with a 2xx status was received
    Succeeded,
    /// A non-2xx response was received or the request never completed
    Failed,
}

impl ProbeStatus {
    pub fn from_succeeded(succeeded: bool) -> Self {
        if succeeded {
            Self::Succeeded
        } else {
            Self::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Lifecycle of a run. `Completed` is terminal and is reached regardless of
/// how many probes failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    NotStarted,
    Running,
    Completed,
}

impl Default for RunState {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_status_from_succeeded() {
        assert_eq!(ProbeStatus::from_succeeded(true), ProbeStatus::Succeeded);
        assert_eq!(ProbeStatus::from_succeeded(false), ProbeStatus::Failed);
        assert_eq!(ProbeStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_run_state_default() {
        assert_eq!(RunState::default(), RunState::NotStarted);
    }
}
