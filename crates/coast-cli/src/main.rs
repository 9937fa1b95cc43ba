use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use coast_core::AppConfig;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "coast")]
#[command(author, version, about = "Kinetic mouse-wheel scrolling for the terminal")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Files to open (shorthand for `view`)
    files: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open files in the kinetic pager
    View {
        /// Files to open, one view each
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Drive the engine with a scripted wheel burst and print the trajectory
    Simulate(commands::simulate::SimulateArgs),
    /// Show or edit the kinetic constants
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration with slider positions
    Show,
    /// Print the configuration file path
    Path,
    /// Reset the kinetic constants to their defaults
    Reset,
    /// Set one kinetic constant (`40%` sets a slider position)
    Set {
        key: String,
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // The pager owns the terminal, so its logs go to a file
    let files = match cli.command {
        Some(Commands::View { ref files }) => Some(files.clone()),
        None if !cli.files.is_empty() => Some(cli.files.clone()),
        _ => None,
    };
    if files.is_some() {
        logging::init_file(&config)?;
    } else {
        logging::init_stderr(&config);
    }

    if let Some(files) = files {
        return commands::view::run(config, &files);
    }

    match cli.command {
        Some(Commands::Simulate(args)) => commands::simulate::run(config, args).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Reset => commands::config::reset(&config),
            ConfigAction::Set { key, value } => commands::config::set(&config, &key, &value),
        },
        Some(Commands::View { .. }) | None => {
            println!("Nothing to view.\n\nUsage:\n  coast <FILE>...\n  coast --help");
            Ok(())
        }
    }
}
