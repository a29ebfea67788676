use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxwatch::cli::setup::setup;
use fxwatch::core::log::init_logging;
use std::path::Path;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxwatch::AppCommand {
    fn from(cmd: Commands) -> fxwatch::AppCommand {
        match cmd {
            Commands::Rates { base } => fxwatch::AppCommand::Rates { base },
            Commands::Search { query } => fxwatch::AppCommand::Search {
                query: query.unwrap_or_default(),
            },
            Commands::Watch => fxwatch::AppCommand::Watch,
            Commands::Theme { toggle } => fxwatch::AppCommand::Theme { toggle },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example configuration (to --config-path if given)
    Setup,
    /// Fetch and display the latest rates for the tracked currencies
    Rates {
        /// Base currency to quote against, overriding the configured one
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Search the currency catalog by code, name or country
    Search { query: Option<String> },
    /// Interactive dashboard
    Watch,
    /// Show or toggle the dark mode preference
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(cli.config_path.as_deref().map(Path::new)).map(|path| {
            println!("Wrote example configuration to {}", path.display());
        }),
        Some(cmd) => fxwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
