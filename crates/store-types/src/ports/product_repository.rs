use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::product::Product;
use crate::ports::RepoError;

/// Product storage port.
///
/// `list` takes the raw filter set as it arrived from the caller:
/// recognized keys are `category`, `min_price`, `max_price` and `name`;
/// anything else is ignored, and malformed numeric values are treated as
/// absent rather than rejected. `page` and `limit` arrive pre-clamped by
/// the use-case layer.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    async fn create(&self, product: Product) -> Result<Product, RepoError>;
    async fn get(&self, id: i64) -> Result<Option<Product>, RepoError>;
    async fn update(&self, product: Product) -> Result<Option<Product>, RepoError>;
    async fn delete(&self, id: i64) -> Result<bool, RepoError>;
    async fn list(
        &self,
        page: u32,
        limit: u32,
        filters: &HashMap<String, String>,
    ) -> Result<Vec<Product>, RepoError>;
}
