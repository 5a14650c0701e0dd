use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial overwrite for `Product`. Fields left at their zero value
/// (empty string, 0) keep the existing value, so price and stock can
/// never be reset to exactly zero through an update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
}

impl Product {
    /// Identity and timestamps are placeholders here; the storage adapter
    /// assigns both on create.
    pub fn new(
        name: String,
        description: String,
        category: String,
        price: f64,
        stock: i64,
    ) -> anyhow::Result<Self> {
        if name.trim().is_empty() {
            anyhow::bail!("name empty");
        }
        if category.trim().is_empty() {
            anyhow::bail!("category empty");
        }
        if price <= 0.0 {
            anyhow::bail!("price must be > 0");
        }
        if stock < 0 {
            anyhow::bail!("stock must be >= 0");
        }
        let now = Utc::now();
        Ok(Self {
            id: 0,
            name,
            description,
            category,
            price,
            stock,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, update: &ProductUpdate) {
        if !update.name.is_empty() {
            self.name = update.name.clone();
        }
        if !update.description.is_empty() {
            self.description = update.description.clone();
        }
        if !update.category.is_empty() {
            self.category = update.category.clone();
        }
        if update.price > 0.0 {
            self.price = update.price;
        }
        if update.stock > 0 {
            self.stock = update.stock;
        }
        self.updated_at = Utc::now();
    }
}
