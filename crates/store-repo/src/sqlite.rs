use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool, Transaction};
use std::collections::HashMap;
use std::str::FromStr;
use store_types::domain::order::{Order, OrderItem, OrderStatus};
use store_types::domain::product::Product;
use store_types::ports::order_repository::OrderRepository;
use store_types::ports::product_repository::ProductRepository;
use store_types::ports::RepoError;

use crate::filters::ProductFilters;

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

fn storage(e: sqlx::Error) -> RepoError {
    RepoError::Storage(e.to_string())
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| RepoError::Storage(e.to_string()))
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, category, price, stock, created_at, updated_at";

#[derive(FromRow)]
struct DbProduct {
    id: i64,
    name: String,
    description: String,
    category: String,
    price: f64,
    stock: i64,
    created_at: String,
    updated_at: String,
}

impl DbProduct {
    fn into_product(self) -> Result<Product, RepoError> {
        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            stock: self.stock,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

/// One row of the `orders LEFT JOIN order_items` result. The item columns
/// are nullable: an order with no items still produces one row.
#[derive(FromRow)]
struct DbOrderRow {
    id: i64,
    user_id: i64,
    total: f64,
    status: String,
    created_at: String,
    updated_at: String,
    product_id: Option<i64>,
    quantity: Option<i64>,
    item_price: Option<f64>,
}

impl DbOrderRow {
    fn item(&self) -> Option<OrderItem> {
        match (self.product_id, self.quantity, self.item_price) {
            (Some(product_id), Some(quantity), Some(price)) => Some(OrderItem {
                product_id,
                quantity,
                price,
            }),
            _ => None,
        }
    }

    fn into_order(self) -> Result<Order, RepoError> {
        let status = OrderStatus::parse(&self.status).unwrap_or(OrderStatus::Pending);
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            items: Vec::new(),
            total: self.total,
            status,
            created_at: parse_ts(&self.created_at)?,
            updated_at: parse_ts(&self.updated_at)?,
        })
    }
}

/// A value waiting to be bound to one positional parameter.
#[derive(Debug, Clone, PartialEq)]
enum Bind {
    Text(String),
    Real(f64),
}

/// Builds the filtered product listing statement. Predicates are appended
/// in a fixed key order (category, min_price, max_price, name) so an
/// identical filter set always yields byte-identical SQL, and each present
/// filter binds exactly one parameter. LIMIT and OFFSET are bound last, in
/// that order, after every filter parameter.
fn build_product_list_query(filters: &ProductFilters) -> (String, Vec<Bind>) {
    let mut clauses: Vec<&'static str> = Vec::new();
    let mut binds: Vec<Bind> = Vec::new();

    if let Some(category) = &filters.category {
        clauses.push("category = ?");
        binds.push(Bind::Text(category.clone()));
    }
    if let Some(min) = filters.min_price {
        clauses.push("price >= ?");
        binds.push(Bind::Real(min));
    }
    if let Some(max) = filters.max_price {
        clauses.push("price <= ?");
        binds.push(Bind::Real(max));
    }
    if let Some(name) = &filters.name {
        // SQLite LIKE is case-insensitive for ASCII. The wildcards wrap
        // the bound value, never the statement text.
        clauses.push("name LIKE ?");
        binds.push(Bind::Text(format!("%{name}%")));
    }

    let mut sql = format!("SELECT {PRODUCT_COLUMNS} FROM products");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id LIMIT ? OFFSET ?");
    (sql, binds)
}

/// Folds a flat join result back into nested orders, grouped by the
/// parent id. Orders come out in the order their first row was seen,
/// which matches the statement's ORDER BY; rows whose item columns are
/// NULL contribute an order with an empty item list.
fn fold_orders(rows: Vec<DbOrderRow>) -> Result<Vec<Order>, RepoError> {
    let mut slots: HashMap<i64, usize> = HashMap::new();
    let mut orders: Vec<Order> = Vec::new();

    for row in rows {
        match slots.get(&row.id) {
            Some(&slot) => {
                if let Some(item) = row.item() {
                    orders[slot].items.push(item);
                }
            }
            None => {
                slots.insert(row.id, orders.len());
                let item = row.item();
                let mut order = row.into_order()?;
                if let Some(item) = item {
                    order.items.push(item);
                }
                orders.push(order);
            }
        }
    }

    Ok(orders)
}

const ORDER_JOIN: &str = "SELECT o.id, o.user_id, o.total, o.status, o.created_at, o.updated_at, \
                          oi.product_id, oi.quantity, oi.price AS item_price \
                          FROM orders o LEFT JOIN order_items oi ON oi.order_id = o.id";

impl SqliteStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Apply the schema, one statement per migration file.
        for ddl in [
            include_str!("../migrations/0001_create_products.sql"),
            include_str!("../migrations/0002_create_orders.sql"),
            include_str!("../migrations/0003_create_order_items.sql"),
        ] {
            sqlx::query(ddl).execute(&pool).await?;
        }

        Ok(Self { pool })
    }
}

#[async_trait]
impl ProductRepository for SqliteStore {
    async fn create(&self, product: Product) -> Result<Product, RepoError> {
        let mut product = product;
        let now = Utc::now();
        let res = sqlx::query(
            "INSERT INTO products (name, description, category, price, stock, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.stock)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        product.id = res.last_insert_rowid();
        product.created_at = now;
        product.updated_at = now;
        Ok(product)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, RepoError> {
        let row: Option<DbProduct> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;
        row.map(|r| r.into_product()).transpose()
    }

    async fn update(&self, product: Product) -> Result<Option<Product>, RepoError> {
        let mut product = product;
        let now = Utc::now();
        let res = sqlx::query(
            "UPDATE products SET name = ?, description = ?, category = ?, price = ?, stock = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.stock)
        .bind(now.to_rfc3339())
        .bind(product.id)
        .execute(&self.pool)
        .await
        .map_err(storage)?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        product.updated_at = now;
        Ok(Some(product))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        let res = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(res.rows_affected() > 0)
    }

    async fn list(
        &self,
        page: u32,
        limit: u32,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Product>, RepoError> {
        let (sql, binds) = build_product_list_query(&ProductFilters::parse(filters));
        let mut query = sqlx::query_as::<_, DbProduct>(&sql);
        for bind in binds {
            query = match bind {
                Bind::Text(value) => query.bind(value),
                Bind::Real(value) => query.bind(value),
            };
        }
        let offset = (i64::from(page) - 1) * i64::from(limit);
        let rows = query
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        rows.into_iter().map(|r| r.into_product()).collect()
    }
}

/// All writes belonging to one order creation, executed on the reserved
/// transaction connection. Leaves commit/rollback to the caller.
async fn insert_order(
    tx: &mut Transaction<'_, sqlx::Sqlite>,
    order: &mut Order,
) -> Result<(), sqlx::Error> {
    let res = sqlx::query(
        "INSERT INTO orders (user_id, total, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(order.user_id)
    .bind(order.total)
    .bind(order.status.as_str())
    .bind(order.created_at.to_rfc3339())
    .bind(order.updated_at.to_rfc3339())
    .execute(&mut **tx)
    .await?;
    order.id = res.last_insert_rowid();

    for item in &order.items {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price)
             VALUES (?, ?, ?, ?)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl OrderRepository for SqliteStore {
    async fn create(&self, order: Order) -> Result<Order, RepoError> {
        let mut order = order;
        let now = Utc::now();
        order.created_at = now;
        order.updated_at = now;

        let mut tx = self.pool.begin().await.map_err(storage)?;
        match insert_order(&mut tx, &mut order).await {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(|e| RepoError::TransactionAborted(e.to_string()))?;
                Ok(order)
            }
            Err(e) => match tx.rollback().await {
                Ok(()) => Err(RepoError::TransactionAborted(e.to_string())),
                Err(rb) => Err(RepoError::ReconciliationRequired(format!(
                    "{e}; rollback: {rb}"
                ))),
            },
        }
    }

    async fn get(&self, id: i64) -> Result<Option<Order>, RepoError> {
        let rows: Vec<DbOrderRow> = sqlx::query_as(&format!("{ORDER_JOIN} WHERE o.id = ?"))
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;
        let mut orders = fold_orders(rows)?;
        Ok(orders.pop())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, RepoError> {
        let rows: Vec<DbOrderRow> = sqlx::query_as(&format!(
            "{ORDER_JOIN} WHERE o.user_id = ? ORDER BY o.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;
        fold_orders(rows)
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        let updated = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        OrderRepository::get(self, id).await
    }
}
