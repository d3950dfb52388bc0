use dotenvy::dotenv;
use hf_system::config::load_app_config;
use hf_system::console::run_stdio;
use hf_system::core::desk::ShipmentDesk;
use hf_system::errors::Result;
use hf_system::store::{RecordStore, SeaOrmStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Tracing first so config problems are logged
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. .env is optional; variables may come from the environment
    dotenv().ok();

    // 3. Configuration
    let config = load_app_config().inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Store
    let store = SeaOrmStore::connect(&config)
        .await
        .inspect_err(|e| error!("Failed to open shipment store: {}", e))?;

    // 5. Desk and console
    let desk = ShipmentDesk::open(Arc::new(store.clone()) as Arc<dyn RecordStore>).await;
    let desk = run_stdio(desk, config.catalog).await?;
    desk.close().await;

    store.disconnect().await?;
    info!("Bye.");
    Ok(())
}
