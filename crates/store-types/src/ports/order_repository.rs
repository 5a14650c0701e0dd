use async_trait::async_trait;

use crate::domain::order::{Order, OrderStatus};
use crate::ports::RepoError;

/// Order storage port. `create` must persist the order row and all of
/// its item rows as one atomic unit. `list_by_user` returns orders
/// newest-first.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn create(&self, order: Order) -> Result<Order, RepoError>;
    async fn get(&self, id: i64) -> Result<Option<Order>, RepoError>;
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Order>, RepoError>;
    async fn update_status(&self, id: i64, status: OrderStatus)
        -> Result<Option<Order>, RepoError>;
}
