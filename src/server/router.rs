//! Route table

use super::handlers::{
    AppState, create_order, get_menu_item, get_order, health_check, list_categories, list_menu,
    list_menu_by_category, list_orders, update_order_status,
};
use axum::{
    Router,
    routing::{get, patch},
};

/// Build the API routes, mounted under `/api`:
/// - GET /api/menu - Full menu
/// - GET /api/menu/categories - Distinct categories
/// - GET /api/menu/category/{category} - Items of one category
/// - GET /api/menu/{id} - One menu item
/// - GET|POST /api/orders - List or create orders
/// - GET /api/orders/{id} - One order
/// - PATCH /api/orders/{id}/status - Change an order's status
pub fn build_api_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/menu", get(list_menu))
        .route("/menu/categories", get(list_categories))
        .route("/menu/category/{category}", get(list_menu_by_category))
        .route("/menu/{id}", get(get_menu_item))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", patch(update_order_status));

    Router::new().nest("/api", api).with_state(state)
}

/// Build health check routes
pub fn build_health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .with_state(state)
}
