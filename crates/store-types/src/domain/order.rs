use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// A line captured at order time. Owned by its order, no identity of
/// its own; `price` is the unit price then, not a live product lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The total comes from the caller and is not re-derived here. An
    /// empty item list is allowed. Identity and timestamps are assigned
    /// by the storage adapter on create.
    pub fn new(user_id: i64, items: Vec<OrderItem>, total: f64) -> anyhow::Result<Self> {
        if user_id <= 0 {
            anyhow::bail!("user_id must be > 0");
        }
        if total < 0.0 {
            anyhow::bail!("total must be >= 0");
        }
        for item in &items {
            if item.quantity <= 0 {
                anyhow::bail!("item quantity must be > 0");
            }
        }
        let now = Utc::now();
        Ok(Self {
            id: 0,
            user_id,
            items,
            total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}
