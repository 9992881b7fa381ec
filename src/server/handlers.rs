//! HTTP handlers for menu and order operations
//!
//! Handlers are thin: they parse the request, call [`OrderService`] or the
//! catalog, and let [`OrderingError`] render failures.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors};

use crate::core::{CartLine, CustomerDetails, MenuItem, Order, OrderService, OrderingError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: OrderService,
}

impl AppState {
    pub fn new(service: OrderService) -> Self {
        Self { service }
    }
}

/// Body of `POST /api/orders`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// A missing list is treated as an empty cart
    #[serde(default)]
    pub cart_items: Option<Vec<CartLine>>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
}

impl CreateOrderRequest {
    fn into_parts(self) -> (Vec<CartLine>, CustomerDetails) {
        let customer = CustomerDetails {
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            delivery_address: self.delivery_address,
        };
        (self.cart_items.unwrap_or_default(), customer)
    }
}

/// Body of `PATCH /api/orders/{id}/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(
        required(message = "Status is required"),
        length(min = 1, message = "Status is required")
    )]
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Request parsing helpers
// ---------------------------------------------------------------------------

fn parse_id(raw: &str) -> Result<i64, OrderingError> {
    raw.trim().parse().map_err(|_| OrderingError::Validation {
        field: "id".to_string(),
        message: format!("'{}' is not a valid id", raw),
    })
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, OrderingError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| OrderingError::Validation {
            field: "body".to_string(),
            message: rejection.body_text(),
        })
}

/// Report the first failing field, sorted by name so the output is stable.
fn validation_error(errors: ValidationErrors) -> OrderingError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    match fields.into_iter().next() {
        Some((field, errs)) => OrderingError::Validation {
            field: field.to_string(),
            message: errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid value".to_string()),
        },
        None => OrderingError::Validation {
            field: "body".to_string(),
            message: errors.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// GET /api/menu
pub async fn list_menu(State(state): State<AppState>) -> Json<Vec<MenuItem>> {
    Json(state.service.catalog().list_all())
}

/// GET /api/menu/{id}
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuItem>, OrderingError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.catalog().get(id)?.clone()))
}

/// GET /api/menu/category/{category}
pub async fn list_menu_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<MenuItem>> {
    Json(state.service.catalog().list_by_category(&category))
}

/// GET /api/menu/categories
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.service.catalog().list_categories())
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, OrderingError> {
    let (lines, customer) = json_body(payload)?.into_parts();
    let order = state.service.create_order(&lines, customer).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, OrderingError> {
    Ok(Json(state.service.list_orders().await?))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, OrderingError> {
    let id = parse_id(&id)?;
    tracing::debug!(order_id = id, "Fetching order");
    Ok(Json(state.service.get_order(id).await?))
}

/// PATCH /api/orders/{id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Order>, OrderingError> {
    let id = parse_id(&id)?;
    let body = json_body(payload)?;
    body.validate().map_err(validation_error)?;

    let status = body.status.unwrap_or_default();
    Ok(Json(state.service.set_status(id, &status).await?))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// GET /health and /healthz
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "food-order",
        "backend": state.service.backend_name(),
    }))
}
