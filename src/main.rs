mod main_runtime;

use anyhow::Context;
use clap::Parser;
use taixiu_tracker::cli::{self, Cli, Commands};
use taixiu_tracker::config::AppConfig;

use main_runtime::{init_logging, init_logging_simple, run_service};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_from(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;

    match cli.command.unwrap_or_default() {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            init_logging(&config.logging);
            run_service(config).await.context("service exited with an error")?;
        }
        Commands::Probe { feed } => {
            init_logging_simple();
            cli::probe_feed(&config, feed)
                .await
                .with_context(|| format!("probe of {} feed failed", feed))?;
        }
    }

    Ok(())
}
