//! # Product Types
//!
//! Catalog records and the inputs used to create and update them.

use crate::error::{ShopError, ShopResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix for generated product ids
pub const PRODUCT_ID_PREFIX: &str = "prod-";

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "prod-1718000000000")
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    pub description: String,

    /// Price, `None` means "price on request"
    #[serde(default)]
    pub price: Option<f64>,

    /// Optional category label
    #[serde(default)]
    pub category: Option<String>,
}

impl Product {
    /// Build the stored record for `input` under `id`
    pub fn from_new(id: impl Into<String>, input: NewProduct) -> Self {
        Self {
            id: id.into(),
            name: input.name,
            description: input.description,
            price: input.price,
            category: input.category,
        }
    }

    /// Merge a partial update onto this record. The id is never touched.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

/// Fields accepted when creating a product
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price: None,
            category: None,
        }
    }

    /// Builder: set price
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Builder: set category (empty clears it)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize_category(category.into());
        self
    }

    /// Both name and description must be non-empty
    pub fn validate(&self) -> ShopResult<()> {
        if self.name.is_empty() || self.description.is_empty() {
            return Err(ShopError::Validation(
                "Name and description are required.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update of a product.
///
/// Every `None` means "field omitted, keep the prior value". For `price`,
/// `Some(None)` is an explicit clear and differs from `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Option<f64>>,
    pub category: Option<Option<String>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
    }

    /// Provided name/description must not be empty
    pub fn validate(&self) -> ShopResult<()> {
        let empty = |field: &Option<String>| field.as_deref().is_some_and(str::is_empty);
        if empty(&self.name) || empty(&self.description) {
            return Err(ShopError::Validation(
                "Name and description cannot be empty.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Empty category strings are stored as `None`
pub fn normalize_category(category: String) -> Option<String> {
    if category.is_empty() {
        None
    } else {
        Some(category)
    }
}

/// Time-based product id (`prod-<unix millis>`) that is not in `taken`,
/// bumping the millisecond component until it is free.
pub fn unique_product_id<'a>(
    at: DateTime<Utc>,
    taken: impl Iterator<Item = &'a str> + Clone,
) -> String {
    let mut millis = at.timestamp_millis();
    loop {
        let candidate = format!("{}{}", PRODUCT_ID_PREFIX, millis);
        if !taken.clone().any(|id| id == candidate) {
            return candidate;
        }
        millis += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn card() -> Product {
        Product::from_new(
            "prod-1",
            NewProduct::new("Birthday Card", "Floral design")
                .with_price(150.0)
                .with_category("birthday"),
        )
    }

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("Card", "Nice").validate().is_ok());
        assert!(matches!(
            NewProduct::new("", "Nice").validate(),
            Err(ShopError::Validation(_))
        ));
        assert!(matches!(
            NewProduct::new("Card", "").validate(),
            Err(ShopError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_patch_keeps_everything() {
        let mut product = card();
        let before = product.clone();
        let patch = ProductPatch::default();
        assert!(patch.is_empty());
        product.apply(patch);
        assert_eq!(product, before);
    }

    #[test]
    fn test_explicit_null_price_clears() {
        let mut product = card();
        product.apply(ProductPatch {
            price: Some(None),
            ..Default::default()
        });
        assert_eq!(product.price, None);
        assert_eq!(product.name, "Birthday Card");
    }

    #[test]
    fn test_patch_rejects_empty_name() {
        let patch = ProductPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(ShopError::Validation(_))));
    }

    #[test]
    fn test_serialized_shape() {
        let product = Product::from_new("prod-7", NewProduct::new("Card", "Plain"));
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "prod-7",
                "name": "Card",
                "description": "Plain",
                "price": null,
                "category": null
            })
        );
    }

    #[test]
    fn test_unique_product_id_bumps_on_collision() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let free = unique_product_id(at, std::iter::empty::<&str>());
        assert_eq!(free, "prod-1700000000000");

        let taken = ["prod-1700000000000", "prod-1700000000001"];
        let id = unique_product_id(at, taken.iter().copied());
        assert_eq!(id, "prod-1700000000002");
    }
}
