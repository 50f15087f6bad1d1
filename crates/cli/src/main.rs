//! Mapa CLI - Database migrations and map inspection.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! mapa-cli migrate
//!
//! # Print a user's map as JSON
//! mapa-cli map show ana@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `map show` - Print one owner's map

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mapa-cli")]
#[command(author, version, about = "Mapa CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect stored user maps
    Map {
        #[command(subcommand)]
        action: MapAction,
    },
}

#[derive(Subcommand)]
enum MapAction {
    /// Print the map owned by an email as JSON
    Show {
        /// Owner email address
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Map { action } => match action {
            MapAction::Show { email } => commands::map::show(&email).await?,
        },
    }
    Ok(())
}
