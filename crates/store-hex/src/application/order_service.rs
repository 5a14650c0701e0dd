use crate::errors::AppError;
use store_types::domain::order::{Order, OrderItem, OrderStatus};
use store_types::ports::order_repository::OrderRepository;

pub struct OrderService<R: OrderRepository> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// The total is taken from the caller as-is; new orders always start
    /// out pending.
    pub async fn create_order(
        &self,
        user_id: i64,
        items: Vec<OrderItem>,
        total: f64,
    ) -> Result<Order, AppError> {
        let order = Order::new(user_id, items, total)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.repo
            .create(order)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub async fn get_order(&self, id: i64) -> Result<Order, AppError> {
        match self
            .repo
            .get(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("order {}", id))),
        }
    }

    pub async fn list_user_orders(&self, user_id: i64) -> Result<Vec<Order>, AppError> {
        self.repo
            .list_by_user(user_id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, AppError> {
        match self
            .repo
            .update_status(id, status)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("order {}", id))),
        }
    }
}
