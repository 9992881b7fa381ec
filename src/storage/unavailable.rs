//! Stand-in repository for a backend that failed to start
//!
//! When storage cannot be opened and startup is not fail-closed, the server
//! still comes up: the menu is served from the built-in catalog and every
//! order operation answers with [`StorageError::Unavailable`].

use crate::core::error::StorageError;
use crate::core::model::{MenuItem, NewOrder, Order};
use crate::core::repository::{MenuSource, OrderRepository};
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct UnavailableRepository {
    backend: &'static str,
    reason: String,
}

impl UnavailableRepository {
    /// `backend` names the backend that failed, `reason` is its startup error.
    pub fn new(backend: &'static str, reason: impl Into<String>) -> Self {
        Self {
            backend,
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn error(&self) -> anyhow::Error {
        StorageError::unavailable(self.backend, self.reason.clone()).into()
    }
}

#[async_trait]
impl OrderRepository for UnavailableRepository {
    async fn create(&self, _order: NewOrder) -> Result<Order> {
        Err(self.error())
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<Order>> {
        Err(self.error())
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        Err(self.error())
    }

    async fn update_status(&self, _id: i64, _status: &str) -> Result<Option<Order>> {
        Err(self.error())
    }

    fn backend_name(&self) -> &'static str {
        self.backend
    }
}

#[async_trait]
impl MenuSource for UnavailableRepository {
    async fn load_menu(&self) -> Result<Vec<MenuItem>> {
        Err(self.error())
    }
}
