//! File-backed order repository storing everything in one JSON document.
//!
//! # Layout
//!
//! ```json
//! {
//!   "menuItems": [ { "id": 1, "name": "Margherita Pizza", ... } ],
//!   "orders": [ { "id": 1, "status": "pending", "items": [ ... ], ... } ],
//!   "nextOrderId": 2
//! }
//! ```
//!
//! # Durability
//!
//! Reads are served from an in-memory mirror of the document. Every mutation
//! rewrites the whole file and waits for it to be flushed before returning, so
//! a crash after a successful `create` or `update_status` keeps that change.
//! The mirror is only updated once the write has succeeded.
//!
//! The file is rewritten in place. A crash in the middle of a write can leave
//! a truncated document that fails to parse on the next start; this backend
//! makes no attempt to recover from that.

use crate::core::catalog::seed_menu;
use crate::core::model::{MenuItem, NewOrder, Order};
use crate::core::repository::{MenuSource, OrderRepository, newest_first};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The persisted document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDocument {
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default = "first_order_id")]
    pub next_order_id: i64,
}

fn first_order_id() -> i64 {
    1
}

impl Default for DataDocument {
    fn default() -> Self {
        Self {
            menu_items: Vec::new(),
            orders: Vec::new(),
            next_order_id: first_order_id(),
        }
    }
}

/// JSON-file order repository
///
/// The write half of the lock is held across the whole
/// read-modify-write-file cycle, which serializes id allocation.
#[derive(Clone)]
pub struct JsonFileOrderRepository {
    path: Arc<PathBuf>,
    state: Arc<RwLock<DataDocument>>,
}

impl JsonFileOrderRepository {
    /// Open the document at `path`, creating it (with the built-in menu) if it
    /// does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let load_path = path.clone();
        let mut document = tokio::task::spawn_blocking(move || read_document(&load_path)).await??;

        // Older documents carry no linePrice and may hold prices like `10`
        document.orders = document.orders.into_iter().map(Order::normalized).collect();

        // Ids already on disk are never handed out again
        let highest = document.orders.iter().map(|o| o.id).max().unwrap_or(0);
        let after_highest = highest
            .checked_add(1)
            .ok_or_else(|| anyhow!("Data file {} has no order ids left after {}", path.display(), highest))?;
        document.next_order_id = document.next_order_id.max(after_highest);

        let seeded = document.menu_items.is_empty();
        if seeded {
            document.menu_items = seed_menu();
        }

        let repo = Self {
            path: Arc::new(path),
            state: Arc::new(RwLock::new(document.clone())),
        };

        if seeded {
            repo.persist(&document).await?;
            tracing::info!(path = %repo.path.display(), "Seeded menu into data file");
        }

        tracing::debug!(
            path = %repo.path.display(),
            orders = document.orders.len(),
            next_order_id = document.next_order_id,
            "Opened data file"
        );

        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `document` to disk and wait until it is flushed.
    async fn persist(&self, document: &DataDocument) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(document).context("Failed to serialize data file")?;
        let path = Arc::clone(&self.path);

        tokio::task::spawn_blocking(move || write_document(&path, &bytes))
            .await?
            .with_context(|| format!("Failed to write data file {}", self.path.display()))
    }
}

fn read_document(path: &Path) -> Result<DataDocument> {
    if !path.exists() {
        return Ok(DataDocument::default());
    }

    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(DataDocument::default());
    }

    serde_json::from_slice(&content)
        .with_context(|| format!("Failed to parse data file {}", path.display()))
}

fn write_document(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

#[async_trait]
impl OrderRepository for JsonFileOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order> {
        let mut state = self.state.write().await;

        let mut next = state.clone();
        let order = order.into_order(next.next_order_id);
        next.next_order_id = next
            .next_order_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("Order id space exhausted in {}", self.path.display()))?;
        next.orders.push(order.clone());

        self.persist(&next).await?;
        *state = next;

        Ok(order)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders = state.orders.clone();
        newest_first(&mut orders);
        Ok(orders)
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<Option<Order>> {
        let mut state = self.state.write().await;

        let Some(index) = state.orders.iter().position(|o| o.id == id) else {
            return Ok(None);
        };

        let mut next = state.clone();
        next.orders[index].status = status.to_string();
        let updated = next.orders[index].clone();

        self.persist(&next).await?;
        *state = next;

        Ok(Some(updated))
    }

    fn backend_name(&self) -> &'static str {
        "json_file"
    }
}

#[async_trait]
impl MenuSource for JsonFileOrderRepository {
    async fn load_menu(&self) -> Result<Vec<MenuItem>> {
        Ok(self.state.read().await.menu_items.clone())
    }
}
