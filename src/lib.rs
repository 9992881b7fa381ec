//! # food-order
//!
//! Backend core of a restaurant ordering service: a read-only menu catalog,
//! cart aggregation into priced orders, and order persistence behind a single
//! repository trait with interchangeable backends.
//!
//! ## Features
//!
//! - **Snapshot pricing**: orders copy the item name and unit price at creation
//! - **Exact money**: prices and totals are `rust_decimal::Decimal` at scale 2
//! - **Pluggable storage**: in-memory, single JSON file, or PostgreSQL
//!   (`postgres` feature), all honoring the same contract
//! - **Degraded startup**: the menu stays up when storage cannot be opened
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use food_order::prelude::*;
//!
//! let service = OrderService::new(
//!     Arc::new(MenuCatalog::seeded()),
//!     Arc::new(InMemoryOrderRepository::new()),
//! );
//!
//! let order = service
//!     .create_order(&[CartLine::new(1, 2), CartLine::new(7, 1)], CustomerDetails::default())
//!     .await?;
//! assert_eq!(order.total.to_string(), "28.97");
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        AggregationError, CartLine, CustomerDetails, ErrorResponse, MenuCatalog, MenuItem,
        MenuSource, NewOrder, Order, OrderAggregator, OrderItem, OrderRepository, OrderService,
        OrderStatus, OrderingError, StorageError,
    };

    // === Storage ===
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresOrderRepository;
    pub use crate::storage::{InMemoryOrderRepository, JsonFileOrderRepository, UnavailableRepository};

    // === Config ===
    pub use crate::config::{AppConfig, StorageBackend};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, bootstrap};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
