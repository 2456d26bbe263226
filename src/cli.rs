use crate::demo::{run_demo, DemoArgs};
use crate::server;
use crate::watch;
use clap::{Args, Parser, Subcommand};
use insureflow::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "InsureFlow",
    about = "Run the InsureFlow submission workflow service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Poll the intake store and dispatch the processing pipeline
    Watch(WatchArgs),
    /// Run a seeded end-to-end walkthrough of the submission pipeline
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Preload the store with the demo submission set
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct WatchArgs {
    /// Override the watched intake directory
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
    /// Override the processed-item ledger path
    #[arg(long)]
    pub(crate) ledger: Option<PathBuf>,
    /// Override the polling interval in seconds
    #[arg(long)]
    pub(crate) interval_secs: Option<u64>,
    /// Pipeline command launched per new item (item id appended as last arg)
    #[arg(long)]
    pub(crate) command: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Watch(args) => watch::run(args).await,
        Command::Demo(args) => run_demo(args),
    }
}
