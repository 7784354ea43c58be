//! Cadastro CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the customer and session tables
//! cadastro-cli migrate
//!
//! # Insert sample customers (existing emails are skipped)
//! cadastro-cli seed
//! ```
//!
//! Both commands read `CADASTRO_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cadastro-cli")]
#[command(author, version, about = "Cadastro CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (customers and sessions)
    Migrate,
    /// Seed the database with sample customers
    Seed,
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
        Commands::Seed => {
            let summary = commands::seed::run().await?;
            tracing::info!(
                inserted = summary.inserted,
                skipped = summary.skipped,
                total = summary.total,
                "Seed complete"
            );
        }
    }
    Ok(())
}
