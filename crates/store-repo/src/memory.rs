use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use store_types::domain::order::{Order, OrderStatus};
use store_types::domain::product::Product;
use store_types::ports::order_repository::OrderRepository;
use store_types::ports::product_repository::ProductRepository;
use store_types::ports::RepoError;

use crate::filters::ProductFilters;

/// In-memory adapter with the same observable semantics as the SQLite
/// one: storage-assigned ids and timestamps, filter/pagination behavior,
/// newest-first user listings. Used by service-level tests.
#[derive(Clone)]
pub struct MemoryStore {
    products: Arc<DashMap<i64, Product>>,
    orders: Arc<DashMap<i64, Order>>,
    next_product_id: Arc<AtomicI64>,
    next_order_id: Arc<AtomicI64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: Arc::new(DashMap::new()),
            orders: Arc::new(DashMap::new()),
            next_product_id: Arc::new(AtomicI64::new(1)),
            next_order_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, product: Product) -> Result<Product, RepoError> {
        let mut product = product;
        let now = Utc::now();
        product.id = self.next_product_id.fetch_add(1, Ordering::SeqCst);
        product.created_at = now;
        product.updated_at = now;
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, RepoError> {
        Ok(self.products.get(&id).map(|r| r.clone()))
    }

    async fn update(&self, product: Product) -> Result<Option<Product>, RepoError> {
        let mut product = product;
        match self.products.get_mut(&product.id) {
            Some(mut existing) => {
                product.updated_at = Utc::now();
                *existing = product.clone();
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.products.remove(&id).is_some())
    }

    async fn list(
        &self,
        page: u32,
        limit: u32,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Product>, RepoError> {
        let filters = ProductFilters::parse(filters);
        let mut matching: Vec<Product> = self
            .products
            .iter()
            .filter(|kv| filters.matches(kv.value()))
            .map(|kv| kv.value().clone())
            .collect();
        matching.sort_by_key(|p| p.id);

        let offset = (page.max(1) as usize - 1) * limit as usize;
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, order: Order) -> Result<Order, RepoError> {
        // Mirror the SQLite CHECK constraint so callers observe the same
        // all-or-nothing outcome.
        if order.items.iter().any(|item| item.quantity <= 0) {
            return Err(RepoError::TransactionAborted(
                "item quantity must be > 0".into(),
            ));
        }
        let mut order = order;
        let now = Utc::now();
        order.id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        order.created_at = now;
        order.updated_at = now;
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: i64) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.get(&id).map(|r| r.clone()))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, RepoError> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|kv| kv.value().user_id == user_id)
            .map(|kv| kv.value().clone())
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        if let Some(mut order) = self.orders.get_mut(&id) {
            order.status = status;
            order.updated_at = Utc::now();
            return Ok(Some(order.clone()));
        }
        Ok(None)
    }
}
