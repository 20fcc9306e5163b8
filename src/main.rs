mod auth;
mod cli;
mod commands;
mod config;
mod docker;
mod dotenv;
mod error;
mod repo;
mod runner;
mod ui;
mod vault;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use error::KeywayError;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // KEYWAY_LOG=keyway=debug for verbose output. Secret values are never logged.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("KEYWAY_LOG").unwrap_or_else(|_| EnvFilter::new("keyway=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Docker { env, args } => commands::docker::run(env, args),
        Command::Run { env, cmd } => commands::run::run(env, cmd),
    };

    // The wrapped process already reported its failure; just mirror its status.
    if let Err(err) = &result {
        if let Some(KeywayError::CommandFailed {
            code: Some(code), ..
        }) = err.downcast_ref::<KeywayError>()
        {
            std::process::exit(*code);
        }
        ui::error(&format!("{:#}", err));
        std::process::exit(1);
    }

    Ok(())
}
