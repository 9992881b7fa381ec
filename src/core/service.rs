//! Order orchestration
//!
//! [`OrderService`] combines the catalog, the aggregator and a repository. It
//! is the only entry point the HTTP layer uses for orders.

use crate::core::aggregator::OrderAggregator;
use crate::core::catalog::MenuCatalog;
use crate::core::error::OrderingError;
use crate::core::model::{CartLine, CustomerDetails, Order};
use crate::core::repository::OrderRepository;
use std::sync::Arc;

/// Creates, reads and advances orders
#[derive(Clone)]
pub struct OrderService {
    catalog: Arc<MenuCatalog>,
    repository: Arc<dyn OrderRepository>,
    aggregator: OrderAggregator,
}

impl OrderService {
    pub fn new(catalog: Arc<MenuCatalog>, repository: Arc<dyn OrderRepository>) -> Self {
        Self {
            catalog,
            repository,
            aggregator: OrderAggregator::new(),
        }
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    pub fn backend_name(&self) -> &'static str {
        self.repository.backend_name()
    }

    /// Aggregate `lines` against the catalog and persist the result.
    ///
    /// An empty cart is rejected before the repository is touched.
    pub async fn create_order(
        &self,
        lines: &[CartLine],
        customer: CustomerDetails,
    ) -> Result<Order, OrderingError> {
        let draft = self.aggregator.build(&self.catalog, lines, customer)?;
        let dropped = lines.len() - draft.items.len();

        let order = self.repository.create(draft).await?;

        tracing::info!(
            order_id = order.id,
            items = order.items.len(),
            dropped_lines = dropped,
            total = %order.total,
            backend = self.repository.backend_name(),
            "Order created"
        );

        Ok(order)
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, OrderingError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(OrderingError::OrderNotFound { id })
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderingError> {
        Ok(self.repository.list_all().await?)
    }

    /// Set the status of an order. Any non-empty status is accepted.
    pub async fn set_status(&self, id: i64, status: &str) -> Result<Order, OrderingError> {
        if status.trim().is_empty() {
            return Err(OrderingError::Validation {
                field: "status".to_string(),
                message: "Status is required".to_string(),
            });
        }

        let order = self
            .repository
            .update_status(id, status)
            .await?
            .ok_or(OrderingError::OrderNotFound { id })?;

        tracing::info!(order_id = order.id, status = %order.status, "Order status updated");

        Ok(order)
    }
}
