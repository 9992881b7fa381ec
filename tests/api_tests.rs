//! End-to-end tests of the HTTP surface through `axum-test`.

use axum::http::StatusCode;
use axum_test::TestServer;
use food_order::prelude::*;
use serde_json::{Value, json};

async fn create_test_server() -> TestServer {
    let app = ServerBuilder::new()
        .with_catalog(MenuCatalog::seeded())
        .with_repository(InMemoryOrderRepository::new())
        .build()
        .expect("Failed to build app");
    TestServer::try_new(app).expect("Failed to create test server")
}

async fn degraded_test_server() -> TestServer {
    let app = ServerBuilder::new()
        .with_catalog(MenuCatalog::seeded())
        .with_repository(UnavailableRepository::new("postgres", "connection refused"))
        .build()
        .expect("Failed to build app");
    TestServer::try_new(app).expect("Failed to create test server")
}

async fn place_order(server: &TestServer, body: Value) -> Value {
    let response = server.post("/api/orders").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

// =============================================================================
// Health
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = create_test_server().await;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "food-order");
        assert_eq!(body["backend"], "in_memory");
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let server = create_test_server().await;
        server.get("/healthz").await.assert_status_ok();
    }
}

// =============================================================================
// Menu
// =============================================================================

mod menu_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_menu() {
        let server = create_test_server().await;

        let response = server.get("/api/menu").await;
        response.assert_status_ok();

        let body: Vec<Value> = response.json();
        assert_eq!(body.len(), 8);
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[0]["name"], "Margherita Pizza");
        assert_eq!(body[0]["price"], "12.99");
        assert!(body[0]["imageUrl"].is_string());
    }

    #[tokio::test]
    async fn test_get_menu_item() {
        let server = create_test_server().await;

        let response = server.get("/api/menu/7").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["name"], "Coca Cola");
        assert_eq!(body["category"], "Drinks");
    }

    #[tokio::test]
    async fn test_get_unknown_menu_item_is_404() {
        let server = create_test_server().await;

        let response = server.get("/api/menu/999").await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["code"], "MENU_ITEM_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_non_numeric_menu_id_is_400() {
        let server = create_test_server().await;

        let response = server.get("/api/menu/pizza").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_by_category_ignores_case() {
        let server = create_test_server().await;

        let body: Vec<Value> = server.get("/api/menu/category/pizza").await.json();
        assert_eq!(body.len(), 2);

        let body: Vec<Value> = server.get("/api/menu/category/Sushi").await.json();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_list_categories() {
        let server = create_test_server().await;

        let body: Vec<String> = server.get("/api/menu/categories").await.json();
        assert_eq!(
            body,
            vec!["Burgers", "Desserts", "Drinks", "Pizza", "Salads", "Sides"]
        );
    }
}

// =============================================================================
// Orders
// =============================================================================

mod order_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_order_prices_from_catalog() {
        let server = create_test_server().await;

        let body = place_order(
            &server,
            json!({
                "cartItems": [
                    { "menuItemId": 1, "quantity": 2 },
                    { "menuItemId": 7, "quantity": 1 },
                    { "menuItemId": 999, "quantity": 5 }
                ],
                "customerName": "Ada",
                "customerPhone": "555-0100",
                "deliveryAddress": "1 Main St"
            }),
        )
        .await;

        assert_eq!(body["total"], "28.97");
        assert_eq!(body["status"], "pending");
        assert_eq!(body["customerName"], "Ada");
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["menuItemName"], "Margherita Pizza");
        assert_eq!(body["items"][0]["price"], "12.99");
        assert_eq!(body["items"][0]["linePrice"], "25.98");
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_only_unknown_items_gives_zero_total() {
        let server = create_test_server().await;

        let body = place_order(
            &server,
            json!({ "cartItems": [{ "menuItemId": 999, "quantity": 1 }] }),
        )
        .await;

        assert_eq!(body["total"], "0.00");
        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let server = create_test_server().await;

        for payload in [json!({ "cartItems": [] }), json!({ "customerName": "Ada" })] {
            let response = server.post("/api/orders").json(&payload).await;
            response.assert_status(StatusCode::BAD_REQUEST);

            let body: Value = response.json();
            assert_eq!(body["code"], "EMPTY_CART");
        }

        let orders: Vec<Value> = server.get("/api/orders").await.json();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let server = create_test_server().await;

        let response = server
            .post("/api/orders")
            .json(&json!({ "cartItems": "lots" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_order_and_not_found() {
        let server = create_test_server().await;
        let created = place_order(
            &server,
            json!({ "cartItems": [{ "menuItemId": 3, "quantity": 1 }] }),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let response = server.get(&format!("/api/orders/{}", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, created);

        let response = server.get("/api/orders/4242").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["code"], "ORDER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let server = create_test_server().await;
        let first = place_order(
            &server,
            json!({ "cartItems": [{ "menuItemId": 6, "quantity": 1 }] }),
        )
        .await;
        let second = place_order(
            &server,
            json!({ "cartItems": [{ "menuItemId": 8, "quantity": 1 }] }),
        )
        .await;

        let orders: Vec<Value> = server.get("/api/orders").await.json();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0]["id"], second["id"]);
        assert_eq!(orders[1]["id"], first["id"]);
    }
}

// =============================================================================
// Status updates
// =============================================================================

mod status_tests {
    use super::*;

    async fn order_id(server: &TestServer) -> i64 {
        let created = place_order(
            server,
            json!({ "cartItems": [{ "menuItemId": 5, "quantity": 2 }] }),
        )
        .await;
        created["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_update_status() {
        let server = create_test_server().await;
        let id = order_id(&server).await;

        let response = server
            .patch(&format!("/api/orders/{}/status", id))
            .json(&json!({ "status": "preparing" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["status"], "preparing");
        assert_eq!(body["total"], "23.98");
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_or_empty_status_is_rejected() {
        let server = create_test_server().await;
        let id = order_id(&server).await;

        for payload in [json!({}), json!({ "status": "" })] {
            let response = server
                .patch(&format!("/api/orders/{}/status", id))
                .json(&payload)
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);

            let body: Value = response.json();
            assert_eq!(body["code"], "VALIDATION_ERROR");
            assert_eq!(body["details"]["field"], "status");
        }

        let body: Value = server.get(&format!("/api/orders/{}", id)).await.json();
        assert_eq!(body["status"], "pending");
    }

    #[tokio::test]
    async fn test_update_unknown_order_is_404() {
        let server = create_test_server().await;

        let response = server
            .patch("/api/orders/4242/status")
            .json(&json!({ "status": "ready" }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Degraded mode
// =============================================================================

mod degraded_tests {
    use super::*;

    #[tokio::test]
    async fn test_menu_still_served() {
        let server = degraded_test_server().await;

        let body: Vec<Value> = server.get("/api/menu").await.json();
        assert_eq!(body.len(), 8);
    }

    #[tokio::test]
    async fn test_order_calls_are_503() {
        let server = degraded_test_server().await;

        let response = server
            .post("/api/orders")
            .json(&json!({ "cartItems": [{ "menuItemId": 1, "quantity": 1 }] }))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["code"], "STORAGE_UNAVAILABLE");
        assert_eq!(body["details"]["backend"], "postgres");

        server
            .get("/api/orders")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
        server
            .get("/api/orders/1")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }
}
