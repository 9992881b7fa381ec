//! Turn an [`AppConfig`] into a ready [`OrderService`]
//!
//! Opens the configured backend, loads the catalog from it once, and decides
//! what to do when the backend cannot be opened.

use crate::config::{AppConfig, StorageBackend, StorageConfig};
use crate::core::{MenuCatalog, MenuSource, OrderRepository, OrderService};
use crate::storage::{InMemoryOrderRepository, JsonFileOrderRepository, UnavailableRepository};
use anyhow::{Context, Result};
use std::sync::Arc;

/// An opened backend, seen through both of its capabilities
pub struct OpenedStorage {
    pub repository: Arc<dyn OrderRepository>,
    pub menu: Arc<dyn MenuSource>,
}

impl OpenedStorage {
    fn from_backend<B>(backend: B) -> Self
    where
        B: OrderRepository + MenuSource + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            repository: backend.clone(),
            menu: backend,
        }
    }
}

/// Open the backend named in `config`.
pub async fn open_storage(config: &StorageConfig) -> Result<OpenedStorage> {
    match config.backend {
        StorageBackend::InMemory => Ok(OpenedStorage::from_backend(InMemoryOrderRepository::new())),
        StorageBackend::JsonFile => {
            let repo = JsonFileOrderRepository::open(&config.data_file).await?;
            Ok(OpenedStorage::from_backend(repo))
        }
        StorageBackend::Postgres => open_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &StorageConfig) -> Result<OpenedStorage> {
    use crate::storage::PostgresOrderRepository;

    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;
    let repo = PostgresOrderRepository::connect(url, config.max_connections).await?;
    Ok(OpenedStorage::from_backend(repo))
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_config: &StorageConfig) -> Result<OpenedStorage> {
    anyhow::bail!("postgres backend requires building with the `postgres` feature")
}

/// Load the catalog once. A failure leaves the catalog empty.
pub async fn load_catalog(menu: &dyn MenuSource) -> MenuCatalog {
    match menu.load_menu().await {
        Ok(items) => {
            let catalog = MenuCatalog::new(items);
            tracing::info!(items = catalog.len(), "Menu catalog loaded");
            catalog
        }
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "Failed to load menu, serving an empty catalog");
            MenuCatalog::empty()
        }
    }
}

/// Build the service for `config`.
///
/// If the backend cannot be opened and `startup.fail_closed` is set, the
/// error is returned. Otherwise the service runs degraded: the built-in menu
/// is served and every order call answers `STORAGE_UNAVAILABLE`.
pub async fn bootstrap(config: &AppConfig) -> Result<OrderService> {
    let backend = config.storage.backend;

    match open_storage(&config.storage).await {
        Ok(storage) => {
            let catalog = load_catalog(storage.menu.as_ref()).await;
            tracing::info!(backend = %backend, "Storage ready");
            Ok(OrderService::new(Arc::new(catalog), storage.repository))
        }
        Err(e) if config.startup.fail_closed => {
            Err(e).with_context(|| format!("Storage backend '{}' could not be opened", backend))
        }
        Err(e) => {
            let reason = format!("{:#}", e);
            tracing::warn!(
                backend = %backend,
                error = %reason,
                "Storage unavailable, serving built-in menu and rejecting order calls"
            );
            let repository = UnavailableRepository::new(backend.as_str(), reason);
            Ok(OrderService::new(
                Arc::new(MenuCatalog::seeded()),
                Arc::new(repository),
            ))
        }
    }
}
