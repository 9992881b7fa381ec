//! In-memory order repository
//!
//! Reference behaviour for every other backend. Nothing survives a restart.

use crate::core::catalog::seed_menu;
use crate::core::model::{MenuItem, NewOrder, Order};
use crate::core::repository::{MenuSource, OrderRepository, newest_first};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory order repository
///
/// Orders live in an `RwLock`-guarded map; ids come from an atomic counter,
/// so concurrent creates never share an id. Cloning shares the same state.
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<i64, Order>>>,
    next_id: Arc<AtomicI64>,
    menu: Arc<Vec<MenuItem>>,
}

impl InMemoryOrderRepository {
    /// Create an empty repository serving the built-in menu
    pub fn new() -> Self {
        Self::with_menu(seed_menu())
    }

    /// Create an empty repository serving `menu`
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            menu: Arc::new(menu),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let order = order.into_order(self.allocate_id());

        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        orders.insert(order.id, order.clone());

        Ok(order)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut all: Vec<Order> = orders.values().cloned().collect();
        newest_first(&mut all);
        Ok(all)
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<Option<Order>> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(orders.get_mut(&id).map(|order| {
            order.status = status.to_string();
            order.clone()
        }))
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}

#[async_trait]
impl MenuSource for InMemoryOrderRepository {
    async fn load_menu(&self) -> Result<Vec<MenuItem>> {
        Ok(self.menu.as_ref().clone())
    }
}
