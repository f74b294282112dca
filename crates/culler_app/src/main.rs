mod config;
mod logging;
mod review;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use culler_engine::{Culler, ReqwestPhotosClient};
use culler_logging::{culler_debug, culler_error};

use crate::config::AppConfig;
use crate::review::CommandError;

/// Review photos from a photo library one at a time and collect the keepers in an album.
#[derive(Debug, Parser)]
#[command(name = "photo-culler", version)]
struct Cli {
    /// Configuration file (defaults to ./culler.ron when present).
    #[arg(long, short, env = "PHOTO_CULLER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one random eligible photo that has not been reviewed yet.
    Pick,
    /// Mark a photo viewed and add it to the target album.
    Approve { id: String },
    /// Mark a photo viewed without adding it anywhere.
    Skip { id: String },
    /// Interactive review loop on the terminal.
    Review,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply_env(|key| std::env::var(key).ok());
    logging::initialize(
        config.log_destination,
        culler_logging::parse_level(&config.log_level),
    );
    culler_debug!("Running {:?} with viewed ledger {:?}", cli.command, config.viewed_file);

    let api = ReqwestPhotosClient::new(config.api_settings()).context("building API client")?;
    let culler = Culler::new(config.culler_config(), Arc::new(api));
    let credential = config.credential();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    let result = match &cli.command {
        Command::Pick => runtime.block_on(review::pick(&culler, credential.as_ref())),
        Command::Approve { id } => {
            runtime.block_on(review::approve(&culler, credential.as_ref(), id))
        }
        Command::Skip { id } => review::skip(&culler, id),
        Command::Review => {
            let stdin = io::stdin().lock();
            runtime
                .block_on(review::review(
                    &culler,
                    credential.as_ref(),
                    stdin,
                    io::stdout(),
                ))
                .and_then(|stats| Ok(serde_json::to_value(stats)?))
        }
    };

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(CommandError::Cull(err)) => {
            culler_error!("{:?} failed: {}", cli.command, err);
            println!("{}", serde_json::to_string_pretty(&err.payload())?);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err).with_context(|| format!("{:?} failed", cli.command)),
    }
}
