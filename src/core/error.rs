//! Typed error handling for the ordering service
//!
//! Storage backends return `anyhow::Result`; everything that reaches a caller
//! of [`OrderService`](crate::core::service::OrderService) or the HTTP layer is
//! an [`OrderingError`], which knows its HTTP status and a stable error code.
//!
//! # Error Categories
//!
//! - client errors: [`OrderingError::EmptyCart`], [`OrderingError::Validation`]
//! - lookups: [`OrderingError::MenuItemNotFound`], [`OrderingError::OrderNotFound`]
//! - storage faults: [`StorageError`]
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get_order(42).await {
//!     Ok(order) => println!("{} is {}", order.id, order.status),
//!     Err(OrderingError::OrderNotFound { id }) => println!("no order {}", id),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type returned by the service and the HTTP handlers
#[derive(Debug, Error)]
pub enum OrderingError {
    /// The submitted cart was missing or had no lines
    #[error("Cart cannot be empty")]
    EmptyCart,

    #[error("Menu item with id '{id}' not found")]
    MenuItemNotFound { id: i64 },

    #[error("Order with id '{id}' not found")]
    OrderNotFound { id: i64 },

    /// Request payload failed boundary validation
    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by a storage backend
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The backend could not be reached (at startup or for this call)
    #[error("Storage backend '{backend}' is unavailable: {message}")]
    Unavailable { backend: String, message: String },

    /// A transaction was rolled back; nothing it wrote is visible
    #[error("Transaction rolled back: {message}")]
    Transaction { message: String },

    /// Any other backend failure
    #[error("Storage error: {message}")]
    Operation { message: String },
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl OrderingError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderingError::EmptyCart => StatusCode::BAD_REQUEST,
            OrderingError::MenuItemNotFound { .. } => StatusCode::NOT_FOUND,
            OrderingError::OrderNotFound { .. } => StatusCode::NOT_FOUND,
            OrderingError::Validation { .. } => StatusCode::BAD_REQUEST,
            OrderingError::Storage(e) => e.status_code(),
            OrderingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderingError::EmptyCart => "EMPTY_CART",
            OrderingError::MenuItemNotFound { .. } => "MENU_ITEM_NOT_FOUND",
            OrderingError::OrderNotFound { .. } => "ORDER_NOT_FOUND",
            OrderingError::Validation { .. } => "VALIDATION_ERROR",
            OrderingError::Storage(e) => e.error_code(),
            OrderingError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            OrderingError::MenuItemNotFound { id } => Some(serde_json::json!({ "menuItemId": id })),
            OrderingError::OrderNotFound { id } => Some(serde_json::json!({ "orderId": id })),
            OrderingError::Validation { field, .. } => Some(serde_json::json!({ "field": field })),
            OrderingError::Storage(StorageError::Unavailable { backend, .. }) => {
                Some(serde_json::json!({ "backend": backend }))
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            OrderingError::MenuItemNotFound { .. } | OrderingError::OrderNotFound { .. }
        )
    }
}

impl StorageError {
    pub fn unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Unavailable {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            StorageError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            StorageError::Transaction { .. } | StorageError::Operation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Unavailable { .. } => "STORAGE_UNAVAILABLE",
            StorageError::Transaction { .. } => "STORAGE_TRANSACTION_FAILED",
            StorageError::Operation { .. } => "STORAGE_ERROR",
        }
    }
}

/// Backends report failures as `anyhow::Error`. A [`StorageError`] carried
/// inside keeps its variant; anything else becomes [`StorageError::Operation`].
impl From<anyhow::Error> for OrderingError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<StorageError>() {
            Ok(storage) => OrderingError::Storage(storage),
            Err(other) => OrderingError::Storage(StorageError::Operation {
                message: format!("{:#}", other),
            }),
        }
    }
}

impl IntoResponse for OrderingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
