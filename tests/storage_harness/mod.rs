//! Shared test harness for storage backend testing
//!
//! Provides helpers that build `NewOrder` drafts with known contents, plus the
//! `order_repository_tests!` macro that runs the repository contract against
//! any backend factory.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod order_repository_tests;

use chrono::{DateTime, Duration, Utc};
use food_order::core::{CustomerDetails, NewOrder, Order, OrderItem};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Draft builders
// ---------------------------------------------------------------------------

/// Two pizzas and a cola, total 28.97
pub fn pizza_and_cola_items() -> Vec<OrderItem> {
    vec![
        OrderItem::new(1, "Margherita Pizza", 2, dec!(12.99)),
        OrderItem::new(7, "Coca Cola", 1, dec!(2.99)),
    ]
}

pub fn total_of(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::new(0, 2), |acc, item| acc + item.line_price)
}

/// A pending draft with the given customer name and items
pub fn draft_order(customer_name: &str, items: Vec<OrderItem>) -> NewOrder {
    draft_order_at(customer_name, items, Utc::now())
}

pub fn draft_order_at(
    customer_name: &str,
    items: Vec<OrderItem>,
    created_at: DateTime<Utc>,
) -> NewOrder {
    NewOrder {
        created_at,
        status: "pending".to_string(),
        total: total_of(&items),
        customer: CustomerDetails {
            customer_name: Some(customer_name.to_string()),
            customer_phone: Some("555-0100".to_string()),
            delivery_address: Some("1 Main St".to_string()),
        },
        items,
    }
}

/// A draft created `minutes` before now
pub fn draft_minutes_ago(customer_name: &str, minutes: i64) -> NewOrder {
    draft_order_at(
        customer_name,
        pizza_and_cola_items(),
        Utc::now() - Duration::minutes(minutes),
    )
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

/// Assert two orders match on everything except timestamp precision.
pub fn assert_same_order(actual: &Order, expected: &Order) {
    assert_eq!(actual.id, expected.id, "id");
    assert_eq!(actual.status, expected.status, "status");
    assert_eq!(actual.total, expected.total, "total");
    assert_eq!(actual.customer_name, expected.customer_name, "customer_name");
    assert_eq!(actual.customer_phone, expected.customer_phone, "customer_phone");
    assert_eq!(
        actual.delivery_address, expected.delivery_address,
        "delivery_address"
    );
    assert_eq!(actual.items, expected.items, "items");

    let drift = (actual.created_at - expected.created_at).num_milliseconds().abs();
    assert!(drift < 1, "created_at drifted by {}ms", drift);
}

pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}
