use std::collections::HashMap;

use crate::errors::AppError;
use store_types::domain::product::{Product, ProductUpdate};
use store_types::ports::product_repository::ProductRepository;

pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_product(
        &self,
        name: String,
        description: String,
        category: String,
        price: f64,
        stock: i64,
    ) -> Result<Product, AppError> {
        let product = Product::new(name, description, category, price, stock)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        self.repo
            .create(product)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, AppError> {
        match self
            .repo
            .get(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(p) => Ok(p),
            None => Err(AppError::NotFound(format!("product {}", id))),
        }
    }

    /// Partial overwrite: fetch the current row, merge the provided
    /// fields, persist the result.
    pub async fn update_product(
        &self,
        id: i64,
        update: ProductUpdate,
    ) -> Result<Product, AppError> {
        let mut existing = self.get_product(id).await?;
        existing.apply_update(&update);
        match self
            .repo
            .update(existing)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        {
            Some(p) => Ok(p),
            None => Err(AppError::NotFound(format!("product {}", id))),
        }
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("product {}", id)))
        }
    }

    /// Clamps the window before touching storage and echoes the applied
    /// values back so callers can report them: page below 1 becomes 1,
    /// limit outside 1..=100 becomes 10.
    pub async fn list_products(
        &self,
        page: i64,
        limit: i64,
        filters: &HashMap<String, String>,
    ) -> Result<(Vec<Product>, u32, u32), AppError> {
        let page = if page < 1 { 1 } else { page as u32 };
        let limit = if !(1..=100).contains(&limit) {
            10
        } else {
            limit as u32
        };
        let items = self
            .repo
            .list(page, limit, filters)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
        Ok((items, page, limit))
    }
}
