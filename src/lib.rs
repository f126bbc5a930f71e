//! Endpoint Probe
//!
//! A sequential HTTP endpoint smoke tester. Each configured endpoint is
//! requested once against a base URL with a bearer token, with a fixed
//! delay between requests, and the outcome of every request is collected
//! into an ordered run report.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, EndpointSpec, ProbeResult, RunConfig, RunReport};
pub use probe::{EndpointProbe, ProbeObserver};
pub use output::{ColoredFormatter, JsonReporter, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_BASE_URL: &str = "https://jetty.test";
    pub const DEFAULT_INTER_REQUEST_DELAY: Duration = Duration::from_millis(200);
    pub const MAX_INTER_REQUEST_DELAY_MS: u64 = 60_000;
    pub const MAX_TIMEOUT_SECS: u64 = 300;
    /// Token value shipped in sample configurations; never valid against a real service.
    pub const PLACEHOLDER_AUTH_TOKEN: &str = "YOUR_AUTH_TOKEN_HERE";
    /// (method, path, description)
    pub const DEFAULT_ENDPOINTS: &[(&str, &str, &str)] = &[
        ("GET", "/api/eqp/operations", "List operations"),
        ("GET", "/api/eqp/equipment", "List equipment"),
        ("GET", "/api/eqp/activities", "List activities"),
        ("GET", "/api/eqp/locations", "List locations"),
    ];
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
