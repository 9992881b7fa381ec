//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::{build_api_routes, build_health_routes};
use crate::core::{MenuCatalog, OrderRepository, OrderService};
use anyhow::Result;
use axum::Router;
use axum::http::Method;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder for creating the HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_catalog(MenuCatalog::seeded())
///     .with_repository(InMemoryOrderRepository::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    service: Option<OrderService>,
    catalog: Option<MenuCatalog>,
    repository: Option<Arc<dyn OrderRepository>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            service: None,
            catalog: None,
            repository: None,
            custom_routes: Vec::new(),
        }
    }

    /// Use an already assembled service. Takes precedence over
    /// [`with_catalog`](Self::with_catalog) and [`with_repository`](Self::with_repository).
    pub fn with_service(mut self, service: OrderService) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_catalog(mut self, catalog: MenuCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_repository(mut self, repository: impl OrderRepository + 'static) -> Self {
        self.repository = Some(Arc::new(repository));
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    fn into_service(self) -> Result<(OrderService, Vec<Router>)> {
        let service = match self.service {
            Some(service) => service,
            None => {
                let repository = self.repository.ok_or_else(|| {
                    anyhow::anyhow!(
                        "OrderRepository is required. Call .with_repository() or .with_service()"
                    )
                })?;
                let catalog = self.catalog.unwrap_or_default();
                OrderService::new(Arc::new(catalog), repository)
            }
        };
        Ok((service, self.custom_routes))
    }

    /// Build the final router with health, API and custom routes, plus CORS
    /// and request tracing.
    pub fn build(self) -> Result<Router> {
        let (service, custom_routes) = self.into_service()?;
        let state = AppState::new(service);

        let mut app = build_health_routes(state.clone()).merge(build_api_routes(state));
        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
            .allow_headers(Any);

        Ok(app.layer(cors).layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
