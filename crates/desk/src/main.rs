use clap::Parser;
use dotenvy::dotenv;
use tracing::debug;

use common::logger;
use storage::SqliteStore;

use crate::cli::Cli;
use crate::config::Settings;
use crate::state::AppState;

mod cli;
mod config;
mod render;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    debug!("Using model {} at {}", settings.model, settings.base_url);

    let store = SqliteStore::open(settings.db_path()).await?;
    let mut state = AppState::hydrate(store).await;

    cli::run(cli.command, &settings, &mut state).await
}
