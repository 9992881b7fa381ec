//! Read-only menu catalog
//!
//! The catalog is loaded once at startup and never mutated afterwards. It owns
//! the authoritative name and price of each menu item; orders snapshot both.

use crate::core::error::OrderingError;
use crate::core::model::{MenuItem, to_money};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Immutable menu lookup keyed by item id
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: BTreeMap<i64, MenuItem>,
}

impl MenuCatalog {
    /// Build a catalog from loaded items. A later item with a duplicate id
    /// replaces an earlier one. Prices are carried at the money scale.
    pub fn new(items: impl IntoIterator<Item = MenuItem>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|mut item| {
                    item.price = to_money(item.price);
                    (item.id, item)
                })
                .collect(),
        }
    }

    /// An empty catalog. Every cart line resolves to nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in restaurant menu.
    pub fn seeded() -> Self {
        Self::new(seed_menu())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in ascending id order
    pub fn list_all(&self) -> Vec<MenuItem> {
        self.items.values().cloned().collect()
    }

    pub fn get(&self, id: i64) -> Result<&MenuItem, OrderingError> {
        self.find(id).ok_or(OrderingError::MenuItemNotFound { id })
    }

    /// Non-failing lookup used while aggregating a cart.
    pub fn find(&self, id: i64) -> Option<&MenuItem> {
        self.items.get(&id)
    }

    /// Items whose category equals `category`, ignoring case. No partial matches.
    pub fn list_by_category(&self, category: &str) -> Vec<MenuItem> {
        let wanted = category.to_lowercase();
        self.items
            .values()
            .filter(|item| item.category.to_lowercase() == wanted)
            .cloned()
            .collect()
    }

    /// Distinct category labels, sorted ascending
    pub fn list_categories(&self) -> Vec<String> {
        self.items
            .values()
            .map(|item| item.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// The eight dishes every backend starts with when its menu is empty.
pub fn seed_menu() -> Vec<MenuItem> {
    [
        (1, "Margherita Pizza", "Classic tomato, mozzarella, and basil", 1299, "Pizza", "/images/margherita.jpg"),
        (2, "Pepperoni Pizza", "Pepperoni and mozzarella cheese", 1499, "Pizza", "/images/pepperoni.jpg"),
        (3, "Caesar Salad", "Fresh romaine lettuce with caesar dressing", 899, "Salads", "/images/caesar.jpg"),
        (4, "Chicken Burger", "Grilled chicken breast with lettuce and mayo", 1099, "Burgers", "/images/chicken-burger.jpg"),
        (5, "Beef Burger", "Juicy beef patty with cheese and vegetables", 1199, "Burgers", "/images/beef-burger.jpg"),
        (6, "French Fries", "Crispy golden fries", 499, "Sides", "/images/fries.jpg"),
        (7, "Coca Cola", "Refreshing cola drink", 299, "Drinks", "/images/coke.jpg"),
        (8, "Chocolate Cake", "Rich chocolate cake slice", 699, "Desserts", "/images/chocolate-cake.jpg"),
    ]
    .into_iter()
    .map(|(id, name, description, cents, category, image)| {
        MenuItem::new(id, name, description, Decimal::new(cents, 2), category, image)
    })
    .collect()
}
