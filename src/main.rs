//! Auth portal - Application entry point
//!
//! CLI-based entry point that dispatches to various commands.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_portal::{
    cli::{Cli, Commands},
    commands,
    config::Config,
    errors::AppResult,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Environment first, so RUST_LOG from the dotenv file applies
    let dotenv = match cli.config.as_deref() {
        Some(path) => dotenvy::from_filename(path).map(|_| ()),
        None => dotenvy::dotenv().map(|_| ()),
    };

    // Initialize tracing (verbose mode sets debug level)
    init_tracing(cli.verbose);

    if let (Err(e), Some(path)) = (&dotenv, cli.config.as_deref()) {
        tracing::error!("Failed to load config file {}: {}", path, e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = Config::from_env()?;
    tracing::debug!(config = ?config, "Configuration loaded");

    match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Jobs(args) => commands::jobs::execute(args, config).await,
        Commands::ClearResets => commands::clear_resets::execute(config).await,
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
