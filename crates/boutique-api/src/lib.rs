//! # boutique-api
//!
//! HTTP API layer for the card-boutique storefront.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - JSON endpoints for the product catalog and order requests
//! - Bearer-token admin gate for catalog mutations
//! - Static site fallback
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/login` | Admin login, returns a token |
//! | GET | `/api/products` | List products |
//! | POST | `/api/products` | Create product (admin) |
//! | PUT | `/api/products/{id}` | Update product (admin) |
//! | DELETE | `/api/products/{id}` | Delete product (admin) |
//! | POST | `/api/orders` | Submit an order request |
//! | GET | `/*` | Static site / `index.html` |

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiJson, ErrorResponse};
pub use routes::{create_api_router, create_router};
pub use state::{AppConfig, AppState};
