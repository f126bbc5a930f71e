//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::{config::mask_token, Config, EndpointSpec},
};
use std::path::PathBuf;

/// Builds the final configuration: defaults, then `.env`, then the
/// environment, then CLI flags, then validation
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read defaults from a different env file
    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = path.into();
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(ref base_url) = self.cli.base_url {
            config.base_url = base_url.trim().to_string();
        }

        if let Some(ref token) = self.cli.token {
            config.auth_token = token.trim().to_string();
        }

        if let Some(delay_ms) = self.cli.delay_ms {
            config.inter_request_delay_ms = delay_ms;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = Some(timeout);
        }

        if !self.cli.endpoints.is_empty() {
            config.endpoints = self
                .cli
                .endpoints
                .iter()
                .map(|definition| {
                    definition
                        .parse::<EndpointSpec>()
                        .map_err(|e| AppError::config(format!("Invalid --endpoint '{}': {}", definition, e)))
                })
                .collect::<Result<Vec<_>>>()?;
        }

        match self.cli.color_override() {
            Some(enabled) => config.enable_color = enabled,
            None => config.enable_color = config.enable_color && self.cli.use_colors(),
        }

        // CLI-only switches
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
        config.json_output = self.cli.json;
        config.fail_on_error = self.cli.fail_on_error;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
        }

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Human-readable configuration summary with the token masked
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Base URL: {}", config.base_url));
    summary.push(format!("Auth Token: {}", mask_token(&config.auth_token)));
    summary.push(format!("Delay: {}ms", config.inter_request_delay_ms));
    summary.push(match config.timeout_seconds {
        Some(secs) => format!("Timeout: {}s", secs),
        None => "Timeout: none".to_string(),
    });
    summary.push(format!("Endpoints: {}", config.endpoints.len()));
    for endpoint in &config.endpoints {
        summary.push(format!("  {}", endpoint));
    }
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
