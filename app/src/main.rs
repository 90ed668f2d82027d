#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, InfoStrategy, InitStrategy, ProcessInput,
    ProcessStrategy, VersionStrategy,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "dmex")]
#[command(about = "Extract DME orders from physician notes", long_about = None)]
struct Cli {
    /// Config file (defaults to ./dmex.json, then ~/dmex/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a note, extract the order and submit it
    Process {
        /// Note file, overriding the configured path
        #[arg(short, long)]
        note: Option<PathBuf>,
    },
    /// Read a note and print the extracted order without submitting
    Extract {
        /// Note file, overriding the configured path
        #[arg(short, long)]
        note: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },
    /// Initialize configuration
    Init,
    /// Show resolved configuration and device registry
    Info,
    /// Show version
    Version,
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config;
    match cli.command {
        Commands::Process { note } => ProcessStrategy.execute(ProcessInput { config, note }).await,
        Commands::Extract { note, pretty } => {
            ExtractStrategy
                .execute(ExtractInput {
                    config,
                    note,
                    pretty,
                })
                .await
        }
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(config).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
