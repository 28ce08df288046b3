//! Lottomate CLI - lottery draws, predictions, and account management
//!
//! A command-line interface for viewing draw history, managing the premium
//! subscription, generating number predictions, and signing in to the
//! hosted backend.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lottomate")]
#[command(author, version, about = "Lottery companion CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override config path (or set LOTTOMATE_CONFIG_PATH env var)
    #[arg(long, env = "LOTTOMATE_CONFIG_PATH", global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, register, and inspect the current identity
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },

    /// View and record draw results
    Draws {
        #[command(subcommand)]
        action: commands::draws::DrawsAction,
    },

    /// Generate and list number predictions
    Predict {
        #[command(subcommand)]
        action: commands::predict::PredictAction,
    },

    /// Manage the premium subscription
    Subscription {
        #[command(subcommand)]
        action: commands::subscription::SubscriptionAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Point the core config loader at the override, if provided
    if let Some(config_path) = &cli.config {
        std::env::set_var("LOTTOMATE_CONFIG_PATH", config_path);
    }

    let config = lottomate_core::load_config()?;
    log::debug!("backend configured: {}", config.backend_configured());
    let store = lottomate_core::AppStore::open_default()?;

    let ctx = commands::Context {
        config,
        store,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Auth { action } => commands::auth::execute(&ctx, action).await,
        Commands::Draws { action } => commands::draws::execute(&ctx, action).await,
        Commands::Predict { action } => commands::predict::execute(&ctx, action).await,
        Commands::Subscription { action } => commands::subscription::execute(&ctx, action).await,
        Commands::Config { action } => commands::config::execute(&ctx, action).await,
    }
}
