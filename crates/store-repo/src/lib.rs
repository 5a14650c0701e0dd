#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use std::collections::HashMap;

use store_types::domain::order::{Order, OrderStatus};
use store_types::domain::product::Product;
use store_types::ports::order_repository::OrderRepository;
use store_types::ports::product_repository::ProductRepository;
use store_types::ports::RepoError;

pub mod filters;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Feature-selected storage backend serving both repositories over one
/// connection source. When both features are enabled the SQLite adapter
/// wins; the in-memory one stays available for tests via its own type.
#[derive(Clone)]
pub struct Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    memory: memory::MemoryStore,
    #[cfg(feature = "sqlite")]
    sqlite: sqlite::SqliteStore,
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            memory: memory::MemoryStore::new(),
        })
    }

    #[cfg(feature = "sqlite")]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://store.db");
        let sqlite = sqlite::SqliteStore::new(url).await?;
        Ok(Self { sqlite })
    }
}

#[cfg(all(feature = "memory", not(feature = "sqlite")))]
#[async_trait::async_trait]
impl ProductRepository for Repo {
    async fn create(&self, product: Product) -> Result<Product, RepoError> {
        ProductRepository::create(&self.memory, product).await
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, RepoError> {
        ProductRepository::get(&self.memory, id).await
    }

    async fn update(&self, product: Product) -> Result<Option<Product>, RepoError> {
        self.memory.update(product).await
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        self.memory.delete(id).await
    }

    async fn list(
        &self,
        page: u32,
        limit: u32,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Product>, RepoError> {
        self.memory.list(page, limit, filters).await
    }
}

#[cfg(all(feature = "memory", not(feature = "sqlite")))]
#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create(&self, order: Order) -> Result<Order, RepoError> {
        OrderRepository::create(&self.memory, order).await
    }

    async fn get(&self, id: i64) -> Result<Option<Order>, RepoError> {
        OrderRepository::get(&self.memory, id).await
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, RepoError> {
        self.memory.list_by_user(user_id).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        self.memory.update_status(id, status).await
    }
}

#[cfg(feature = "sqlite")]
#[async_trait::async_trait]
impl ProductRepository for Repo {
    async fn create(&self, product: Product) -> Result<Product, RepoError> {
        ProductRepository::create(&self.sqlite, product).await
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, RepoError> {
        ProductRepository::get(&self.sqlite, id).await
    }

    async fn update(&self, product: Product) -> Result<Option<Product>, RepoError> {
        self.sqlite.update(product).await
    }

    async fn delete(&self, id: i64) -> Result<bool, RepoError> {
        self.sqlite.delete(id).await
    }

    async fn list(
        &self,
        page: u32,
        limit: u32,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Product>, RepoError> {
        self.sqlite.list(page, limit, filters).await
    }
}

#[cfg(feature = "sqlite")]
#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create(&self, order: Order) -> Result<Order, RepoError> {
        OrderRepository::create(&self.sqlite, order).await
    }

    async fn get(&self, id: i64) -> Result<Option<Order>, RepoError> {
        OrderRepository::get(&self.sqlite, id).await
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, RepoError> {
        self.sqlite.list_by_user(user_id).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        self.sqlite.update_status(id, status).await
    }
}
