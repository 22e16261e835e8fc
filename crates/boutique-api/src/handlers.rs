//! # Request Handlers
//!
//! Axum request handlers for the storefront API.

use crate::auth::AdminIdentity;
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use boutique_core::{
    normalize_category, NewProduct, OrderRequest, Product, ProductPatch, ShopError,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Create product request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Kept only when it is a JSON number
    pub price: Value,
    pub category: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            price: req.price.as_f64(),
            category: req.category.and_then(normalize_category),
        }
    }
}

/// Partial product update.
///
/// `price` distinguishes an absent field from an explicit `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "present")]
    pub price: Option<Value>,
    pub category: Option<String>,
}

/// Deserialize a field that is present (including `null`) as `Some`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        let price = match req.price {
            Some(Value::Null) => Some(None),
            Some(Value::Number(n)) => Some(n.as_f64()),
            _ => None,
        };

        ProductPatch {
            name: req.name,
            description: req.description,
            price,
            category: req.category.map(normalize_category),
        }
    }
}

/// Delete product response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteProductResponse {
    pub success: bool,
    pub removed: Product,
}

/// Public order submission
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "cardType")]
    pub card_type: Option<String>,
    pub quantity: Value,
    pub message: Option<String>,
}

impl From<OrderBody> for OrderRequest {
    fn from(body: OrderBody) -> Self {
        OrderRequest {
            name: body.name.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            phone: body.phone,
            card_type: body.card_type,
            quantity: body.quantity.as_f64(),
            message: body.message.unwrap_or_default(),
        }
    }
}

/// Order response
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "card-boutique",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Exchange admin credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (Some(username), Some(password)) = (
        request.username.filter(|u| !u.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ShopError::Validation("Username and password are required.".to_string()).into());
    };

    if !state.config.admin_credentials_match(&username, &password) {
        warn!("Failed admin login for {:?}", username);
        return Err(ShopError::Unauthorized("Invalid credentials.".to_string()).into());
    }

    let token = state.tokens.issue(&state.config.admin_username)?;
    info!("Admin {} logged in", state.config.admin_username);

    Ok(Json(LoginResponse { token }))
}

/// List all products (public)
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.store.list().await)
}

/// Create a product (admin)
#[instrument(skip(state, admin, request), fields(admin_user = %admin.username))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    ApiJson(request): ApiJson<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.store.create(request.into()).await?;
    info!("Created product {}", product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially update a product (admin)
#[instrument(skip(state, admin, request), fields(admin_user = %admin.username))]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(product_id): Path<String>,
    ApiJson(request): ApiJson<UpdateProductRequest>,
) -> ApiResult<Json<Product>> {
    let product = state.store.update(&product_id, request.into()).await?;
    info!("Updated product {}", product.id);
    Ok(Json(product))
}

/// Delete a product (admin)
#[instrument(skip(state, admin), fields(admin_user = %admin.username))]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<DeleteProductResponse>> {
    let removed = state.store.delete(&product_id).await?;
    info!("Deleted product {}", removed.id);
    Ok(Json(DeleteProductResponse {
        success: true,
        removed,
    }))
}

/// Relay a customer order by email (public)
#[instrument(skip(state, body))]
pub async fn submit_order(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<OrderBody>,
) -> ApiResult<Json<OrderResponse>> {
    let order = OrderRequest::from(body);
    order.validate()?;

    let relay = state.relay.as_ref().ok_or_else(|| {
        ShopError::ServiceUnavailable(
            "Email is not configured on the server. Please contact us directly using the contact details on the website."
                .to_string(),
        )
    })?;

    relay.relay(&order).await?;
    Ok(Json(OrderResponse { success: true }))
}
