use log::{error, info};
use std::sync::Arc;

mod cafes;
mod config;
mod error;
mod web;

use crate::cafes::store::CafeStore;
use crate::config::Config;
use crate::error::Result;
use crate::web::csrf::CsrfSigner;
use crate::web::server::start_web_server;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    info!("Starting Cafe Finder...");

    if let Err(e) = run(Config::load()).await {
        error!("Cafe Finder stopped: {}", e);
        std::process::exit(1);
    }

    info!("Cafe Finder shutdown complete");
}

async fn run(config: Config) -> Result<()> {
    let location = config.database_location()?;
    let store = Arc::new(CafeStore::open(&location)?);
    info!("Cafe store ready with {} cafes", store.count().await?);

    // Runs until Ctrl+C; actix handles the signal and drains workers
    let csrf = CsrfSigner::from_config(&config)?;
    start_web_server(config, store, csrf).await?;
    Ok(())
}
