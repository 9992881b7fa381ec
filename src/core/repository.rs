//! Storage capability traits
//!
//! Every backend implements the same contract, so callers hold an
//! `Arc<dyn OrderRepository>` and never branch on which backend is active.

use crate::core::model::{MenuItem, NewOrder, Order};
use anyhow::Result;
use async_trait::async_trait;

/// Persistence for orders and their line items
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order and return it with its assigned id.
    ///
    /// Either the order and all of its items become visible, or nothing does.
    async fn create(&self, order: NewOrder) -> Result<Order>;

    /// Get an order with its items
    async fn get_by_id(&self, id: i64) -> Result<Option<Order>>;

    /// List all orders, newest first
    async fn list_all(&self) -> Result<Vec<Order>>;

    /// Replace the status of an order and return the updated order.
    ///
    /// The status is stored as given. Concurrent updates are last-writer-wins.
    async fn update_status(&self, id: i64, status: &str) -> Result<Option<Order>>;

    /// Short backend name used in logs and health output
    fn backend_name(&self) -> &'static str;
}

/// Source of the menu the catalog is built from at startup
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Load every menu item, seeding the backend first if it holds none.
    async fn load_menu(&self) -> Result<Vec<MenuItem>>;
}

/// Newest first; ties on the timestamp fall back to the higher id.
pub(crate) fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}
