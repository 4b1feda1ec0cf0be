//! Painlog CLI - Command-line interface for the pain journal
//!
//! Provides commands for:
//! - Recording, amending, listing, and removing pain episodes
//! - Exporting the journal as a JSON document
//! - Backing up to / restoring from Google Drive
//! - Viewing sync status

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use painlog_core::config::Config;

mod commands;
mod output;

use commands::{
    add::AddCommand, backup::BackupCommand, edit::EditCommand, export::ExportCommand,
    list::ListCommand, remove::RemoveCommand, restore::RestoreCommand, status::StatusCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "painlog", version, about = "Local-first pain journal with Drive backup")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a new pain episode
    Add(AddCommand),
    /// Amend an existing episode by id
    Edit(EditCommand),
    /// List recorded episodes
    List(ListCommand),
    /// Remove an episode by id
    Remove(RemoveCommand),
    /// Export the journal as a JSON document
    Export(ExportCommand),
    /// Push the full journal to Google Drive
    Backup(BackupCommand),
    /// Pull the Drive document and merge it into the journal
    Restore(RestoreCommand),
    /// Show remote sync status
    Status(StatusCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    // Setup tracing: -v flags override the configured level
    let filter = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Add(cmd) => cmd.execute(format, &config).await,
        Commands::Edit(cmd) => cmd.execute(format, &config).await,
        Commands::List(cmd) => cmd.execute(format, &config).await,
        Commands::Remove(cmd) => cmd.execute(format, &config).await,
        Commands::Export(cmd) => cmd.execute(format, &config).await,
        Commands::Backup(cmd) => cmd.execute(format, &config).await,
        Commands::Restore(cmd) => cmd.execute(format, &config).await,
        Commands::Status(cmd) => cmd.execute(format, &config).await,
    }
}
