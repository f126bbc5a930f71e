//! Data models and structures for the endpoint probe

pub mod config;
pub mod endpoint;
pub mod result;

// Re-export main model types
pub use config::{Config, RunConfig};
pub use endpoint::EndpointSpec;
pub use result::{ProbeResult, RunReport};
