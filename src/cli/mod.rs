//! CLI parser and command dispatch.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "prelaunch")]
#[command(about = "GitBoost pre-launch backend: email capture and blueprint generator")]
#[command(version)]
pub struct Cli {
    /// Data directory holding the database file
    #[arg(long, global = true, env = "PRELAUNCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address: a port, a host, or host:port (default 127.0.0.1:$PORT)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Report signup and generation statistics
    Stats,

    /// Delete the database file, or empty its tables in place
    Reset {
        /// Keep the file, clear both tables and reclaim space
        #[arg(long)]
        truncate: bool,
    },
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.data_dir.clone())?;

    match cli.command {
        Commands::Serve { bind } => commands::serve::cmd_serve(&settings, bind.as_deref()).await,
        Commands::Db { command } => match command {
            DbCommands::Stats => commands::db::cmd_stats(&settings).await,
            DbCommands::Reset { truncate } => commands::db::cmd_reset(&settings, truncate).await,
        },
    }
}
