mod cli;
mod config;
mod download;
mod error;
mod folders;
mod json;
mod listing;
#[cfg(test)]
mod testing;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};
use config::Config;
use download::HttpSource;
use listing::HrefZipParser;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dwd_cdc=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_current_dir()?;
    let source = HttpSource::new();

    match &cli.command {
        Commands::Retrieve {} => {
            let archives = command::retrieve(&config, &source, &HrefZipParser::new()).await?;
            println!(
                "Extracted {} archives into `{}`",
                archives,
                config.raw_dir().display()
            );
        }
        Commands::Stations {} => {
            let directory = command::stations(&config, &source).await?;
            println!("Station metadata saved to `{}`", directory);
        }
    }

    Ok(())
}
