//! food-order server
//!
//! Configuration comes from `FOOD_ORDER_CONFIG` (or `config.yaml`) plus
//! environment overrides; see [`food_order::config`]. Log verbosity follows
//! `RUST_LOG` and defaults to `info`.

use anyhow::Result;
use food_order::config::AppConfig;
use food_order::server::{ServerBuilder, bootstrap};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::load()?;
    tracing::info!(
        backend = %config.storage.backend,
        fail_closed = config.startup.fail_closed,
        "Starting food-order"
    );

    let service = match bootstrap(&config).await {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Startup aborted");
            return Err(e);
        }
    };

    ServerBuilder::new()
        .with_service(service)
        .serve(&config.bind_address())
        .await
}
