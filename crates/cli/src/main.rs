//! Bihar Bhojan CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bb-cli migrate
//!
//! # Validate a menu file before deploying it
//! bb-cli menu check data/menu.json
//!
//! # List bookings, optionally only one status
//! bb-cli bookings list --status pending
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `menu check` - Validate a menu JSON file
//! - `bookings list` - Print bookings, newest date first

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bb-cli")]
#[command(author, version, about = "Bihar Bhojan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Work with the menu file
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Inspect table bookings
    Bookings {
        #[command(subcommand)]
        action: BookingsAction,
    },
}

#[derive(Subcommand)]
enum MenuAction {
    /// Validate a menu JSON file
    Check {
        /// Path to the menu file
        #[arg(default_value = "data/menu.json")]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum BookingsAction {
    /// List bookings, newest date first
    List {
        /// Only show bookings with this status (`pending`, `confirmed`, `cancelled`)
        #[arg(short, long)]
        status: Option<String>,
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
        Commands::Menu { action } => match action {
            MenuAction::Check { path } => commands::menu::check(&path).await?,
        },
        Commands::Bookings { action } => match action {
            BookingsAction::List { status } => {
                commands::bookings::list(status.as_deref()).await?;
            }
        },
    }
    Ok(())
}
