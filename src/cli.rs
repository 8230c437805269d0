use std::path::PathBuf;

use clap::{Parser, Subcommand};
use homedir_manager::config::RuntimeConfig;
use homedir_manager::error::AppError;
use homedir_manager::telemetry;
use tracing::info;

use crate::commands::{self, CleanupArgs, CommandStatus};

#[derive(Parser, Debug)]
#[command(
    name = "jasmin-homedir-manager",
    about = "Reclaim home directories of expired JASMIN training accounts",
    version
)]
pub struct Cli {
    /// Settings file (defaults to $HOMEDIR_SETTINGS, then settings.toml)
    #[arg(long, global = true)]
    settings_file: Option<PathBuf>,
    /// Print the steps each candidate would go through without changing anything
    #[arg(long, global = true)]
    dry_run: bool,
    /// Ask for confirmation before cleaning each home directory
    #[arg(long, global = true)]
    careful: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Move expired training-account homes into the reclamation area and mark the accounts NORMAL
    CleanupTrainingAccounts,
}

pub fn run() -> Result<CommandStatus, AppError> {
    let cli = Cli::parse();
    let runtime = RuntimeConfig::load();
    telemetry::init(&runtime.telemetry)?;

    if cli.dry_run {
        println!("DRY RUN MODE: No actual changes will be made");
    }

    let args = CleanupArgs {
        settings_file: cli.settings_file.unwrap_or(runtime.settings_file),
        dry_run: cli.dry_run,
        careful: cli.careful,
    };
    info!(?args, command = ?cli.command, "starting");

    match cli.command {
        Command::CleanupTrainingAccounts => commands::cleanup_training_accounts(&args),
    }
}
