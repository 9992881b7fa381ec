//! Domain types shared by the catalog, the aggregator and every storage backend
//!
//! All types serialize with camelCase field names, which is also the layout of
//! the JSON document written by the file-backed store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by every price and total.
pub const MONEY_SCALE: u32 = 2;

/// Zero with the money scale, so an empty order serializes as `"0.00"`.
pub fn zero_money() -> Decimal {
    Decimal::new(0, MONEY_SCALE)
}

/// `value` carried at the money scale, so `10` and `3.5` become `10.00` and `3.50`.
pub fn to_money(mut value: Decimal) -> Decimal {
    value.rescale(MONEY_SCALE);
    value
}

/// A dish or drink offered on the menu.
///
/// Owned by [`MenuCatalog`](crate::core::catalog::MenuCatalog); orders only
/// keep a weak reference to it through `menu_item_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl MenuItem {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            image_url: image_url.into(),
            created_at: Utc::now(),
        }
    }
}

/// One client-submitted cart line, not yet checked against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item_id: i64,
    pub quantity: i32,
}

impl CartLine {
    pub fn new(menu_item_id: i64, quantity: i32) -> Self {
        Self {
            menu_item_id,
            quantity,
        }
    }
}

/// Optional contact details attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
}

/// A line of an order, with the menu item's name and unit price captured at
/// the moment the order was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub menu_item_id: i64,
    pub menu_item_name: String,
    pub quantity: i32,
    /// Unit price snapshot.
    pub price: Decimal,
    /// `price × quantity`, fixed when the line is built. Documents written
    /// without it get it derived on load, see [`OrderItem::normalized`].
    #[serde(default)]
    pub line_price: Decimal,
}

impl OrderItem {
    pub fn new(
        menu_item_id: i64,
        menu_item_name: impl Into<String>,
        quantity: i32,
        price: Decimal,
    ) -> Self {
        Self {
            menu_item_id,
            menu_item_name: menu_item_name.into(),
            quantity,
            price: to_money(price),
            line_price: to_money(price * Decimal::from(quantity)),
        }
    }

    /// Rebuild a line read from storage: the unit price is brought to the
    /// money scale and `line_price` is derived from it.
    pub fn normalized(self) -> Self {
        Self::new(self.menu_item_id, self.menu_item_name, self.quantity, self.price)
    }

    /// Snapshot `item` for `quantity` units.
    pub fn snapshot(item: &MenuItem, quantity: i32) -> Self {
        Self::new(item.id, item.name.clone(), quantity, item.price)
    }
}

/// An order that has been aggregated but not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub total: Decimal,
    pub customer: CustomerDetails,
    pub items: Vec<OrderItem>,
}

impl NewOrder {
    /// Attach the id assigned by a repository.
    pub fn into_order(self, id: i64) -> Order {
        Order {
            id,
            created_at: self.created_at,
            status: self.status,
            total: self.total,
            customer_name: self.customer.customer_name,
            customer_phone: self.customer.customer_phone,
            delivery_address: self.customer.delivery_address,
            items: self.items,
        }
    }
}

/// A persisted order.
///
/// `total` is fixed at creation time and never recomputed on read. Only
/// `status` changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub total: Decimal,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Bring an order read from storage to the money scale. The total is
    /// rescaled, never recomputed from the lines.
    pub fn normalized(mut self) -> Self {
        self.total = to_money(self.total);
        self.items = self.items.into_iter().map(OrderItem::normalized).collect();
        self
    }
}

/// Conventional order statuses.
///
/// The stored status is an open string; this enum only names the values the
/// kitchen workflow uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown order status: {}", s))
    }
}
