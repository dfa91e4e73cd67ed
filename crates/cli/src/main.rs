//! Farm Market CLI - Database migrations and model checks.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema migrations and create the session table
//! farm-cli migrate
//!
//! # Load the configured models and report what was found
//! farm-cli models check
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `models check` - Verify the disease model and crop recommender load

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "farm-cli")]
#[command(author, version, about = "Farm Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect the prediction models
    Models {
        #[command(subcommand)]
        action: ModelsAction,
    },
}

#[derive(Subcommand)]
enum ModelsAction {
    /// Load both models from the configured paths
    Check,
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
        Commands::Models { action } => match action {
            ModelsAction::Check => commands::models::check()?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_models_check() {
        let cli = Cli::try_parse_from(["farm-cli", "models", "check"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Models {
                action: ModelsAction::Check
            })
        ));
    }
}
