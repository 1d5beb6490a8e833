//! Galley CLI binary.
//!
//! Sends one request through the orchestrator and prints the response
//! envelope as JSON. Credentials come from the environment or a `.env` file.

use clap::Parser;
use galley::GalleyConfig;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{Cli, run_command};

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    #[cfg(feature = "observability")]
    let provider = {
        use galley::observability::{ObservabilityConfig, init_observability_with_config};
        init_observability_with_config(
            ObservabilityConfig::default()
                .with_log_level(log_level)
                .with_json_logs(cli.json_logs),
        )
        .map_err(|e| anyhow::anyhow!("Failed to initialize observability: {}", e))?
    };

    #[cfg(not(feature = "observability"))]
    init_tracing(log_level, cli.json_logs)?;

    let config = match &cli.config {
        Some(path) => GalleyConfig::from_file(path)?,
        None => GalleyConfig::load()?,
    };

    let result = run_command(cli.command, config).await;

    #[cfg(feature = "observability")]
    galley::observability::shutdown_observability(provider);

    result
}

#[cfg(not(feature = "observability"))]
fn init_tracing(log_level: &str, json_logs: bool) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
