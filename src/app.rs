//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config, EnvManager, ValidationLevel},
    error::{AppError, Result},
    logging::ProbeLogger,
    models::{Config, RunReport},
    output::{JsonReporter, OutputCoordinator, OutputFormatterFactory},
    probe::EndpointProbe,
};
use std::path::Path;
use std::sync::Arc;

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::config)?;
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        // `colored` strips ANSI codes off a non-terminal stdout unless told otherwise
        if let Some(enabled) = self.cli.color_override() {
            colored::control::set_override(enabled);
        }

        if self.cli.is_informational() {
            return self.run_informational();
        }

        let config = load_config(self.cli.clone())?;
        let report = Self::execute(&config).await?;
        Self::check_outcome(&config, &report)
    }

    /// Handle flags that print or write something and exit without probing
    fn run_informational(&self) -> Result<()> {
        if let Some(ref path) = self.cli.write_env_example {
            EnvManager::save_example_env_file(path)?;
            println!("Wrote example configuration to {}", path.display());
        }

        if self.cli.help_topic.is_some() {
            println!("{}", self.cli.display_help());
        }

        Ok(())
    }

    /// Probe every configured endpoint, printing progress or the JSON report
    pub async fn execute(config: &Config) -> Result<RunReport> {
        let warnings = validate_config(config)?;
        for warning in &warnings {
            if warning.level >= ValidationLevel::Warning || config.verbose {
                eprintln!("{}", warning.format(config.enable_color));
            }
        }

        let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.verbose);
        let coordinator = Arc::new(OutputCoordinator::new(formatter));

        if config.debug {
            eprintln!("{} v{}", crate::PKG_NAME, crate::VERSION);
            if let (Some(built), Some(commit)) = (option_env!("BUILD_TIME"), option_env!("GIT_COMMIT")) {
                eprintln!("Built {} from {}", built, commit);
            }
            eprintln!("{}", display_config_summary(config));

            // Invalid .env lines only get this far when real environment variables shadow them
            if let Ok(Some(problems)) = EnvManager::check_env_file(Path::new(".env")) {
                for problem in problems {
                    if let Ok(text) = coordinator.render_warning(&problem) {
                        eprintln!("{}", text);
                    }
                }
            }
        }

        let logger = Arc::new(ProbeLogger::new(config));
        logger.start_session(config).await;

        let mut probe = EndpointProbe::new(config.run_config())?.with_observer(logger);
        if !config.json_output {
            probe = probe.with_observer(coordinator);
        }

        let report = probe.run_all(&config.endpoints).await;

        if config.json_output {
            println!("{}", JsonReporter::render(&report)?);
        }

        Ok(report)
    }

    /// A completed run is a success unless `fail_on_error` is set and a probe failed
    pub fn check_outcome(config: &Config, report: &RunReport) -> Result<()> {
        if config.fail_on_error && !report.all_passed() {
            return Err(AppError::test_execution(format!(
                "{} of {} endpoints failed",
                report.failed(),
                report.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EndpointSpec;
    use clap::Parser;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn config_for(server: &MockServer, endpoints: Vec<EndpointSpec>) -> Config {
        Config {
            base_url: server.uri(),
            auth_token: "test-token".into(),
            inter_request_delay_ms: 0,
            endpoints,
            enable_color: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_new_rejects_conflicting_flags() {
        let cli = Cli::parse_from(["eprobe", "--color", "--no-color"]);
        let error = App::new(cli).err().unwrap();
        assert!(matches!(error, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_execute_collects_every_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/denied"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let config = config_for(
            &server,
            vec![EndpointSpec::get("/ok", "Works"), EndpointSpec::get("/denied", "Needs auth")],
        );
        let report = App::execute(&config).await.unwrap();

        assert_eq!(report.status_codes(), vec![200, 401]);
        assert_eq!(report.passed(), 1);
        assert!(App::check_outcome(&config, &report).is_ok());

        let strict = Config { fail_on_error: true, ..config };
        let error = App::check_outcome(&strict, &report).unwrap_err();
        assert_eq!(error.exit_code(), 6);
        assert!(error.to_string().contains("1 of 2 endpoints failed"));
    }

    #[tokio::test]
    async fn test_execute_json_mode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let config = Config {
            json_output: true,
            fail_on_error: true,
            ..config_for(&server, vec![EndpointSpec::get("/items", "Items")])
        };
        let report = App::execute(&config).await.unwrap();
        assert!(report.all_passed());
        assert!(App::check_outcome(&config, &report).is_ok());
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_config() {
        let config = Config { endpoints: vec![], ..Config::default() };
        assert!(App::execute(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_write_env_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.env");
        let cli = Cli::parse_from(["eprobe", "--write-env-example", path.to_str().unwrap()]);

        App::new(cli).unwrap().run().await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("PROBE_BASE_URL"));
    }
}
