use std::collections::HashMap;

use store_types::domain::product::Product;

/// The recognized product filter set, parsed out of an untyped key/value
/// map. Unrecognized keys are dropped, and so are `min_price`/`max_price`
/// values that fail to parse as numbers: a garbage bound behaves as "not
/// specified", not as a rejected request.
///
/// Both adapters go through this type so SQL predicates and in-memory
/// matching agree on the semantics of each key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub name: Option<String>,
}

impl ProductFilters {
    pub fn parse(raw: &HashMap<String, String>) -> Self {
        Self {
            category: raw.get("category").cloned(),
            min_price: raw.get("min_price").and_then(|v| v.parse::<f64>().ok()),
            max_price: raw.get("max_price").and_then(|v| v.parse::<f64>().ok()),
            name: raw.get("name").cloned(),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !product
                .name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}
