//! # Routes
//!
//! Axum router configuration for the storefront.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Public:
///   - GET  /health - Health check
///   - POST /api/login - Exchange admin credentials for a token
///   - GET  /api/products - List products
///   - POST /api/orders - Submit an order request (relayed by email)
///
/// - Admin (Bearer token required):
///   - POST   /api/products - Create product
///   - PUT    /api/products/{id} - Update product
///   - DELETE /api/products/{id} - Delete product
///
/// - Fallback:
///   - GET * - Static site, unmatched paths get `index.html`
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let index = state.config.static_dir.join("index.html");
    let static_site = ServeDir::new(&state.config.static_dir).fallback(ServeFile::new(index));

    create_api_router(state)
        .fallback_service(static_site)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API routes only, without static files or outer layers
pub fn create_api_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/products", post(handlers::create_product))
        .route(
            "/products/{product_id}",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let public_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/products", get(handlers::list_products))
        .route("/orders", post(handlers::submit_order));

    let api_routes = Router::new().merge(public_routes).merge(admin_routes);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .with_state(state)
}
