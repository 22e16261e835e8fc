//! # Product Store
//!
//! Durable catalog storage behind the `ProductStore` trait.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │           ProductStore (trait)           │
//! │  ├── list()                              │
//! │  ├── create()                            │
//! │  ├── update()                            │
//! │  └── delete()                            │
//! └──────────────────────────────────────────┘
//!                     ▲
//!          ┌──────────┴──────────┐
//!  ┌───────┴───────┐     ┌───────┴───────┐
//!  │ JsonFileStore │     │  MemoryStore  │
//!  └───────────────┘     └───────────────┘
//! ```
//!
//! Listing is fail-open: an unreadable document is an empty catalog.
//! Mutations are not: they re-read the document strictly, and a document
//! that exists but does not parse, or a failed write, is returned as
//! `ShopError::Persistence` with the file left as it was.

use crate::error::{ShopError, ShopResult};
use crate::product::{unique_product_id, NewProduct, Product, ProductPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Catalog storage used by the HTTP handlers.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products in insertion order. Never fails.
    async fn list(&self) -> Vec<Product>;

    /// Validate, assign an id, append and persist.
    async fn create(&self, input: NewProduct) -> ShopResult<Product>;

    /// Merge `patch` onto the product with `id` and persist.
    async fn update(&self, id: &str, patch: ProductPatch) -> ShopResult<Product>;

    /// Remove the product with `id`, persist, and return it.
    async fn delete(&self, id: &str) -> ShopResult<Product>;
}

/// Type alias for a shared store (dynamic dispatch)
pub type SharedProductStore = Arc<dyn ProductStore>;

fn not_found(id: &str) -> ShopError {
    ShopError::NotFound {
        product_id: id.to_string(),
    }
}

fn insert_new(products: &mut Vec<Product>, input: NewProduct) -> ShopResult<Product> {
    input.validate()?;
    let id = unique_product_id(Utc::now(), products.iter().map(|p| p.id.as_str()));
    let product = Product::from_new(id, input);
    products.push(product.clone());
    Ok(product)
}

fn patch_existing(products: &mut [Product], id: &str, patch: ProductPatch) -> ShopResult<Product> {
    let product = products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found(id))?;
    patch.validate()?;
    product.apply(patch);
    Ok(product.clone())
}

fn remove_existing(products: &mut Vec<Product>, id: &str) -> ShopResult<Product> {
    let index = products
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| not_found(id))?;
    Ok(products.remove(index))
}

// =============================================================================
// JSON file store
// =============================================================================

/// Catalog persisted as one pretty-printed JSON array.
///
/// Mutations hold `write_lock` across their whole read-modify-write cycle.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_products(&self) -> Vec<Product> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Could not read {}, returning empty list: {}",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Product>>(&raw) {
            Ok(products) => products,
            Err(e) => {
                warn!(
                    "Could not parse {}, returning empty list: {}",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Strict read for the write path. A missing document is an empty
    /// catalog, anything unreadable is an error so the file is never replaced.
    async fn load_for_write(&self) -> ShopResult<Vec<Product>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str::<Vec<Product>>(&raw).map_err(|e| {
            tracing::error!(
                "Refusing to overwrite {}, document does not parse: {}",
                self.path.display(),
                e
            );
            ShopError::Persistence(format!("{} does not parse: {}", self.path.display(), e))
        })
    }

    async fn write_products(&self, products: &[Product]) -> ShopResult<()> {
        let body = serde_json::to_string_pretty(products)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Wrote {} products to {}", products.len(), self.path.display());
        Ok(())
    }

    async fn mutate<T: Send>(
        &self,
        op: impl FnOnce(&mut Vec<Product>) -> ShopResult<T> + Send,
    ) -> ShopResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load_for_write().await?;
        let out = op(&mut products)?;
        self.write_products(&products).await.map_err(|e| {
            tracing::error!("Failed to write {}: {}", self.path.display(), e);
            e
        })?;
        Ok(out)
    }
}

#[async_trait]
impl ProductStore for JsonFileStore {
    async fn list(&self) -> Vec<Product> {
        self.read_products().await
    }

    async fn create(&self, input: NewProduct) -> ShopResult<Product> {
        self.mutate(|products| insert_new(products, input)).await
    }

    async fn update(&self, id: &str, patch: ProductPatch) -> ShopResult<Product> {
        self.mutate(|products| patch_existing(products, id, patch)).await
    }

    async fn delete(&self, id: &str) -> ShopResult<Product> {
        self.mutate(|products| remove_existing(products, id)).await
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Non-durable store with the same semantics as `JsonFileStore`
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: Mutex<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Vec<Product> {
        self.products.lock().await.clone()
    }

    async fn create(&self, input: NewProduct) -> ShopResult<Product> {
        insert_new(&mut *self.products.lock().await, input)
    }

    async fn update(&self, id: &str, patch: ProductPatch) -> ShopResult<Product> {
        patch_existing(&mut *self.products.lock().await, id, patch)
    }

    async fn delete(&self, id: &str) -> ShopResult<Product> {
        remove_existing(&mut *self.products.lock().await, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_store() -> (TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("products.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_document_lists_empty() {
        let (_dir, store) = file_store();
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_document_lists_empty() {
        let (_dir, store) = file_store();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.list().await.is_empty());

        std::fs::write(store.path(), r#"{"id": "prod-1"}"#).unwrap();
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (_dir, store) = file_store();
        let created = store
            .create(NewProduct::new("Birthday Card", "Floral design"))
            .await
            .unwrap();

        assert!(created.id.starts_with("prod-"));
        assert_eq!(created.price, None);
        assert_eq!(created.category, None);

        let listed = store.list().await;
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields_without_persisting() {
        let (_dir, store) = file_store();
        let result = store.create(NewProduct::new("", "Floral design")).await;
        assert!(matches!(result, Err(ShopError::Validation(_))));
        let result = store.create(NewProduct::new("Card", "")).await;
        assert!(matches!(result, Err(ShopError::Validation(_))));

        assert!(!store.path().exists());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_ids_unique_and_order_preserved() {
        let (_dir, store) = file_store();
        let mut ids = Vec::new();
        for n in 0..5 {
            let p = store
                .create(NewProduct::new(format!("Card {}", n), "Plain"))
                .await
                .unwrap();
            ids.push(p.id);
        }

        let listed: Vec<_> = store.list().await.into_iter().map(|p| p.id).collect();
        assert_eq!(listed, ids);

        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[tokio::test]
    async fn test_update_price_null_and_empty_patch() {
        let (_dir, store) = file_store();
        let created = store
            .create(NewProduct::new("Card", "Plain").with_price(150.0))
            .await
            .unwrap();

        let unchanged = store
            .update(&created.id, ProductPatch::default())
            .await
            .unwrap();
        assert_eq!(unchanged, created);

        let cleared = store
            .update(
                &created.id,
                ProductPatch {
                    price: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.price, None);
        assert_eq!(store.list().await, vec![cleared]);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let (_dir, store) = file_store();
        let result = store.update("prod-404", ProductPatch::default()).await;
        assert!(matches!(result, Err(ShopError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (_dir, store) = file_store();
        let created = store
            .create(NewProduct::new("Card", "Plain"))
            .await
            .unwrap();

        let removed = store.delete(&created.id).await.unwrap();
        assert_eq!(removed.id, created.id);
        assert!(store.list().await.iter().all(|p| p.id != created.id));

        let again = store.delete(&created.id).await;
        assert!(matches!(again, Err(ShopError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_write_failure_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing-dir").join("products.json"));
        let result = store.create(NewProduct::new("Card", "Plain")).await;
        assert!(matches!(result, Err(ShopError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_off_schema_record_blocks_writes_instead_of_erasing() {
        let (_dir, store) = file_store();
        let seeded = r#"[
  {"id": "prod-1", "name": "Keep me", "description": "Valid record"},
  {"id": "prod-2", "name": "Hand edited", "description": "Bad price", "price": "150"}
]"#;
        std::fs::write(store.path(), seeded).unwrap();

        let created = store.create(NewProduct::new("New", "card")).await;
        assert!(matches!(created, Err(ShopError::Persistence(_))));

        let deleted = store.delete("prod-1").await;
        assert!(matches!(deleted, Err(ShopError::Persistence(_))));

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk, seeded);
        let records: Vec<serde_json::Value> = serde_json::from_str(&on_disk).unwrap();
        assert!(records.iter().any(|r| r["name"] == "Keep me"));
        assert!(!records.iter().any(|r| r["name"] == "New"));
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let (_dir, store) = file_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create(NewProduct::new(format!("Card {}", n), "Plain"))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.len(), 8);
    }

    #[tokio::test]
    async fn test_memory_store_matches_file_semantics() {
        let store = MemoryStore::new();
        let created = store
            .create(NewProduct::new("Card", "Plain").with_category("wedding"))
            .await
            .unwrap();

        let updated = store
            .update(
                &created.id,
                ProductPatch {
                    price: Some(Some(20.0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Some(20.0));
        assert_eq!(updated.category.as_deref(), Some("wedding"));

        store.delete(&created.id).await.unwrap();
        assert!(store.list().await.is_empty());
    }
}
