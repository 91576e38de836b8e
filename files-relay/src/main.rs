use std::process::ExitCode;

use clap::Parser;
use files_relay::exitcode;
use files_relay::load_config::load_config;
use files_relay::{logging, run, Cli, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match load_config(&cli.config).map_err(CliError::Config) {
        Ok(config) => config,
        Err(e) => {
            let _ = logging::init(None);
            tracing::error!(error = %e, config_path = ?cli.config, "Configuration could not be loaded");
            eprintln!("[ERROR] {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    if let Err(e) = logging::init(config.logging.directory.as_deref()).map_err(CliError::Config) {
        eprintln!("[ERROR] {e}");
        return ExitCode::from(e.exit_code());
    }
    config.trace_loaded();

    match run(cli.command, &config).await {
        Ok(delivery) => {
            match serde_json::to_string_pretty(&delivery.response) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!(error = %e, "Failed to render response as JSON"),
            }
            tracing::info!(operation = %delivery.operation, "files-relay completed successfully");
            ExitCode::from(exitcode::OK)
        }
        Err(e) => {
            let code = e.exit_code();
            tracing::error!(error = %e, exit_code = code, "files-relay exited with error");
            eprintln!("[ERROR] {e}");
            ExitCode::from(code)
        }
    }
}
