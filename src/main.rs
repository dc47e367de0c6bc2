use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use ratewatch::cli::{parse_args, run_cli_command, run_command, CliCommand};
use ratewatch::startup::{build_services, AppConfig};

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Version, help and argument errors need no config or runtime
    if let Some(result) = run_cli_command(&command) {
        return result;
    }

    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ratewatch=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!("Starting with {:?}", config);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(command, config))
}

async fn run(command: CliCommand, config: AppConfig) -> Result<()> {
    let services = build_services(&config)?;
    run_command(command, services).await
}
