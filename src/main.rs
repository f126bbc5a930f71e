//! Endpoint Probe - Main CLI Application
//!
//! Sends one authenticated request to each configured endpoint, in order,
//! and reports which ones answered with a 2xx status.

use clap::Parser;
use endpoint_probe::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter},
};
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        let error = AppError::internal(format!("panic: {}", panic_info));
        eprintln!("{}", error.user_friendly_message());
        process::exit(error.exit_code());
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    let result = match App::new(cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
