//! # boutique-core
//!
//! Core types and traits for the card-boutique storefront backend.
//!
//! This crate provides:
//! - `Product`, `NewProduct` and `ProductPatch` for the catalog
//! - `ProductStore` trait with `JsonFileStore` and `MemoryStore`
//! - `TokenService` for admin bearer tokens
//! - `OrderRelay` and the `MailTransport` trait for order notifications
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use boutique_core::{JsonFileStore, NewProduct, ProductStore, TokenService};
//!
//! let store = JsonFileStore::new("products.json");
//! let card = store.create(NewProduct::new("Birthday Card", "Floral design")).await?;
//!
//! let tokens = TokenService::new("secret");
//! let token = tokens.issue("admin")?;
//! let claims = tokens.verify(&token)?;
//! ```

pub mod error;
pub mod order;
pub mod product;
pub mod store;
pub mod token;

// Re-exports for convenience
pub use error::{ShopError, ShopResult};
pub use order::{BoxedMailTransport, MailMessage, MailTransport, OrderRelay, OrderRequest};
pub use product::{normalize_category, NewProduct, Product, ProductPatch};
pub use store::{JsonFileStore, MemoryStore, ProductStore, SharedProductStore};
pub use token::{constant_time_eq, AdminClaims, TokenService};
