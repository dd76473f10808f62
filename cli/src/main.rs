// CLI-specific lint overrides
#![allow(clippy::print_stdout, reason = "CLI tools print to stdout")]
#![allow(clippy::print_stderr, reason = "CLI tools print to stderr")]
#![allow(clippy::unwrap_used, reason = "CLI can unwrap for user-facing errors")]
#![allow(clippy::expect_used, reason = "CLI can expect for user-facing errors")]

mod cli;
mod commands;
mod output;
mod wallet;

use clap::Parser;
use cli::{Cli, Commands, RecoveryCommands};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send(args) => commands::send::run(args, cli.json).await,
        Commands::Info(args) => commands::info::run(args, cli.json).await,
        Commands::Recovery { command } => match command {
            RecoveryCommands::Status(args) => commands::recovery::status(args, cli.json).await,
            RecoveryCommands::Queue(args) => commands::recovery::queue(args, cli.json).await,
            RecoveryCommands::Execute(args) => commands::recovery::execute(args, cli.json).await,
            RecoveryCommands::Deploy(args) => commands::recovery::deploy(args, cli.json).await,
        },
    }
}
