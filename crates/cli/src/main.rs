// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! hcitrack - follow long-running harvester operations to completion

mod adapters;
mod commands;
mod completions;
mod error;
mod logging;
mod notify;
mod output;

use clap::{Parser, Subcommand};
use commands::track::{self, TrackArgs, TrackOptions};
use completions::CompletionsArgs;
use error::CliError;
use hcitrack_core::{OperationKind, Outcome};
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "hcitrack",
    version,
    about = "Track support bundles and image downloads until they are ready"
)]
struct Cli {
    /// API origin, e.g. https://harvester.example.com
    #[arg(long, global = true)]
    server: Option<String>,

    /// Cluster id, for multi-cluster deployments
    #[arg(long, global = true)]
    cluster: Option<String>,

    /// Tracker config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory the finished artifact is downloaded to
    #[arg(long, global = true, default_value = ".")]
    output: PathBuf,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Event output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a support bundle and download it when ready
    Bundle(TrackArgs),
    /// Track an image download preparation and download the image when ready
    Image(TrackArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Exit status for cancelled runs (128 + SIGINT)
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::setup_logging(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<CliError>() {
                Some(cli_error) => eprint!("{}", cli_error),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let (kind, args) = match cli.command {
        Commands::Bundle(args) => (OperationKind::Bundle, args),
        Commands::Image(args) => (OperationKind::ImageDownload, args),
        Commands::Completions(args) => {
            completions::write_completions::<Cli>(args.shell, &mut std::io::stdout());
            return Ok(ExitCode::SUCCESS);
        }
    };

    let options = TrackOptions {
        server: cli.server,
        cluster: cli.cluster,
        config: cli.config,
        output_dir: cli.output,
        format: cli.format,
    };

    let outcome = track::track(kind, args, options).await?;
    Ok(match outcome {
        Outcome::Completed => ExitCode::SUCCESS,
        Outcome::Failed { .. } => ExitCode::FAILURE,
        Outcome::Cancelled => ExitCode::from(EXIT_CANCELLED),
    })
}
