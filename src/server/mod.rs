//! Server module for building the HTTP server
//!
//! This module provides:
//! - `ServerBuilder` to assemble the router and serve it with graceful shutdown
//! - the menu, order and health handlers
//! - `bootstrap` to open the configured storage and build the service

pub mod bootstrap;
pub mod builder;
pub mod handlers;
pub mod router;

pub use bootstrap::{OpenedStorage, bootstrap, load_catalog, open_storage};
pub use builder::ServerBuilder;
pub use handlers::{AppState, CreateOrderRequest, UpdateStatusRequest};
