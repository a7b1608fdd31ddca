use anyhow::Context;
use clap::Parser;
use cli::Cli;
use commands::App;
use database::{connect, run_migrations, DbRepository, MemoryRepository, RecordStore};

mod cli;
mod commands;
mod display;
mod logging;
mod seed;

/// The main entry point for the Agrotrack application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let level = cli.log_level.unwrap_or(config.logging.level);
    let _log_guard = logging::init(&config.logging, level)?;

    let store: Box<dyn RecordStore> = if cli.memory {
        tracing::info!("Using the in-memory record store; nothing will be persisted.");
        Box::new(MemoryRepository::new())
    } else {
        // Initialize the database connection and run migrations
        let pool = connect().await.context("Failed to connect to the database")?;
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        Box::new(DbRepository::new(pool))
    };

    let app = App::new(store, &config);
    app.run(cli.command, &mut std::io::stdout().lock()).await
}
