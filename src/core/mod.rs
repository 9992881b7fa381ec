//! Core module containing the ordering domain: model, catalog, aggregation,
//! storage traits and the service tying them together

pub mod aggregator;
pub mod catalog;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use aggregator::{AggregationError, OrderAggregator};
pub use catalog::{MenuCatalog, seed_menu};
pub use error::{ErrorResponse, OrderingError, StorageError};
pub use model::{CartLine, CustomerDetails, MenuItem, NewOrder, Order, OrderItem, OrderStatus};
pub use repository::{MenuSource, OrderRepository};
pub use service::OrderService;
