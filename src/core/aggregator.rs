//! Cart aggregation
//!
//! Turns client cart lines into a [`NewOrder`] against a catalog snapshot.
//! No I/O happens here; given the same catalog and inputs the output differs
//! only in `created_at`.

use crate::core::catalog::MenuCatalog;
use crate::core::error::OrderingError;
use crate::core::model::{CartLine, CustomerDetails, NewOrder, OrderItem, OrderStatus, zero_money};
use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("Cart cannot be empty")]
    EmptyCart,
}

impl From<AggregationError> for OrderingError {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::EmptyCart => OrderingError::EmptyCart,
        }
    }
}

/// Builds orders from carts
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderAggregator;

impl OrderAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build a pending order from `lines`.
    ///
    /// Lines whose menu item id is unknown to `catalog` are skipped without
    /// error, so a cart whose lines all miss still yields an order with no
    /// items and a zero total. Quantities are taken as given.
    pub fn build(
        &self,
        catalog: &MenuCatalog,
        lines: &[CartLine],
        customer: CustomerDetails,
    ) -> Result<NewOrder, AggregationError> {
        if lines.is_empty() {
            return Err(AggregationError::EmptyCart);
        }

        let mut items = Vec::with_capacity(lines.len());
        let mut total = zero_money();

        for line in lines {
            let Some(menu_item) = catalog.find(line.menu_item_id) else {
                tracing::debug!(
                    menu_item_id = line.menu_item_id,
                    quantity = line.quantity,
                    "Dropping cart line for unknown menu item"
                );
                continue;
            };

            let item = OrderItem::snapshot(menu_item, line.quantity);
            total += item.line_price;
            items.push(item);
        }

        Ok(NewOrder {
            created_at: Utc::now(),
            status: OrderStatus::Pending.as_str().to_string(),
            total,
            customer,
            items,
        })
    }
}
