//! PostgreSQL order repository using sqlx.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! food-order = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! - `menu_items`: the catalog
//! - `orders`: one row per order, `total` written inside the creating transaction
//! - `order_items`: one row per line, `order_id` references `orders(id)`
//!   with `ON DELETE CASCADE`
//!
//! Ids come from `BIGSERIAL` sequences, so concurrent creates never collide.

use crate::core::catalog::seed_menu;
use crate::core::error::StorageError;
use crate::core::model::{MenuItem, NewOrder, Order, OrderItem};
use crate::core::repository::{MenuSource, OrderRepository};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;

const BACKEND: &str = "postgres";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required tables and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS menu_items (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(200) NOT NULL,
            description VARCHAR(500) NOT NULL DEFAULT '',
            price NUMERIC(10, 2) NOT NULL,
            category VARCHAR(100) NOT NULL,
            image_url VARCHAR(500) NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create menu_items table: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            created_at TIMESTAMPTZ NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            total NUMERIC(10, 2) NOT NULL DEFAULT 0,
            customer_name VARCHAR(200) NULL,
            customer_phone VARCHAR(50) NULL,
            delivery_address VARCHAR(500) NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create orders table: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS order_items (
            id BIGSERIAL PRIMARY KEY,
            order_id BIGINT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            menu_item_id BIGINT NOT NULL,
            menu_item_name VARCHAR(200) NOT NULL,
            quantity INTEGER NOT NULL,
            price NUMERIC(10, 2) NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create order_items table: {}", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items (order_id)")
        .execute(pool)
        .await
        .map_err(|e| anyhow!("Failed to create order_items index: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

type OrderTuple = (
    i64,
    DateTime<Utc>,
    String,
    Decimal,
    Option<String>,
    Option<String>,
    Option<String>,
);

type OrderItemTuple = (i64, String, i32, Decimal);

/// An order row LEFT JOINed with one of its items (all item columns NULL
/// when the order has none).
type OrderWithItemTuple = (
    i64,
    DateTime<Utc>,
    String,
    Decimal,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<i32>,
    Option<Decimal>,
);

type MenuItemTuple = (i64, String, String, Decimal, String, String, DateTime<Utc>);

const ORDER_SELECT: &str = "SELECT id, created_at, status, total, customer_name, customer_phone, delivery_address FROM orders";

fn row_to_order(row: OrderTuple) -> Order {
    let (id, created_at, status, total, customer_name, customer_phone, delivery_address) = row;
    Order {
        id,
        created_at,
        status,
        total,
        customer_name,
        customer_phone,
        delivery_address,
        items: Vec::new(),
    }
}

fn row_to_item((menu_item_id, name, quantity, price): OrderItemTuple) -> OrderItem {
    OrderItem::new(menu_item_id, name, quantity, price)
}

/// Fold joined rows back into one `Order` per order id, keeping row order.
fn group_joined_rows(rows: Vec<OrderWithItemTuple>) -> Vec<Order> {
    let mut orders: IndexMap<i64, Order> = IndexMap::new();

    for (id, created_at, status, total, name, phone, address, item_id, item_name, qty, price) in rows
    {
        let order = orders
            .entry(id)
            .or_insert_with(|| row_to_order((id, created_at, status, total, name, phone, address)));

        if let (Some(item_id), Some(item_name), Some(qty), Some(price)) =
            (item_id, item_name, qty, price)
        {
            order.items.push(row_to_item((item_id, item_name, qty, price)));
        }
    }

    orders.into_values().collect()
}

// ---------------------------------------------------------------------------
// PostgresOrderRepository
// ---------------------------------------------------------------------------

/// Order repository backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use food_order::storage::PostgresOrderRepository;
///
/// let repo = PostgresOrderRepository::connect("postgres://localhost/food", 5).await?;
/// let order = repo.create(draft).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, then apply the schema.
    ///
    /// Connection failures are reported as [`StorageError::Unavailable`].
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| StorageError::unavailable(BACKEND, e.to_string()))?;

        ensure_schema(&pool).await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert the order row, its items, then the total.
    async fn insert_order(tx: &mut Transaction<'_, Postgres>, order: &NewOrder) -> Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO orders (created_at, status, total, customer_name, customer_phone, delivery_address) \
             VALUES ($1, $2, 0, $3, $4, $5) RETURNING id",
        )
        .bind(order.created_at)
        .bind(&order.status)
        .bind(&order.customer.customer_name)
        .bind(&order.customer.customer_phone)
        .bind(&order.customer.delivery_address)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| anyhow!("Failed to insert order: {}", e))?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, menu_item_id, menu_item_name, quantity, price) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(item.menu_item_id)
            .bind(&item.menu_item_name)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut **tx)
            .await
            .map_err(|e| anyhow!("Failed to insert order item: {}", e))?;
        }

        sqlx::query("UPDATE orders SET total = $1 WHERE id = $2")
            .bind(order.total)
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(|e| anyhow!("Failed to write order total: {}", e))?;

        Ok(id)
    }

    async fn fetch_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemTuple>(
            "SELECT menu_item_id, menu_item_name, quantity, price \
             FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to get order items: {}", e))?;

        Ok(rows.into_iter().map(row_to_item).collect())
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, mut order: NewOrder) -> Result<Order> {
        // TIMESTAMPTZ keeps microseconds
        order.created_at = order.created_at.trunc_subsecs(6);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::unavailable(BACKEND, e.to_string()))?;

        let id = match Self::insert_order(&mut tx, &order).await {
            Ok(id) => id,
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(error = %rollback, "Failed to roll back order transaction");
                }
                tracing::error!(error = %e, "Order transaction rolled back");
                return Err(StorageError::Transaction {
                    message: e.to_string(),
                }
                .into());
            }
        };

        tx.commit().await.map_err(|e| StorageError::Transaction {
            message: format!("Failed to commit order: {}", e),
        })?;

        Ok(order.into_order(id))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Order>> {
        let sql = format!("{} WHERE id = $1", ORDER_SELECT);
        let row = sqlx::query_as::<_, OrderTuple>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to get order: {}", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut order = row_to_order(row);
        order.items = self.fetch_items(id).await?;
        Ok(Some(order))
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderWithItemTuple>(
            "SELECT o.id, o.created_at, o.status, o.total, \
                    o.customer_name, o.customer_phone, o.delivery_address, \
                    oi.menu_item_id, oi.menu_item_name, oi.quantity, oi.price \
             FROM orders o \
             LEFT JOIN order_items oi ON oi.order_id = o.id \
             ORDER BY o.created_at DESC, o.id DESC, oi.id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to list orders: {}", e))?;

        Ok(group_joined_rows(rows))
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<Option<Order>> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to update order status: {}", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

#[async_trait]
impl MenuSource for PostgresOrderRepository {
    async fn load_menu(&self) -> Result<Vec<MenuItem>> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to count menu items: {}", e))?;

        if count == 0 {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| anyhow!("Failed to start seed transaction: {}", e))?;

            for item in seed_menu() {
                sqlx::query(
                    "INSERT INTO menu_items (id, name, description, price, category, image_url, created_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (id) DO NOTHING",
                )
                .bind(item.id)
                .bind(&item.name)
                .bind(&item.description)
                .bind(item.price)
                .bind(&item.category)
                .bind(&item.image_url)
                .bind(item.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| anyhow!("Failed to seed menu item: {}", e))?;
            }

            sqlx::query(
                "SELECT setval(pg_get_serial_sequence('menu_items', 'id'), (SELECT MAX(id) FROM menu_items))",
            )
            .execute(&mut *tx)
            .await
            .map_err(|e| anyhow!("Failed to advance menu_items sequence: {}", e))?;

            tx.commit()
                .await
                .map_err(|e| anyhow!("Failed to commit menu seed: {}", e))?;

            tracing::info!("Seeded menu_items table");
        }

        let rows = sqlx::query_as::<_, MenuItemTuple>(
            "SELECT id, name, description, price, category, image_url, created_at \
             FROM menu_items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| anyhow!("Failed to load menu items: {}", e))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, name, description, price, category, image_url, created_at)| MenuItem {
                    id,
                    name,
                    description,
                    price,
                    category,
                    image_url,
                    created_at,
                },
            )
            .collect())
    }
}
