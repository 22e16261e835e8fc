//! # Storefront Error Types
//!
//! Typed error handling for the card-boutique backend.
//! Catalog, token and order operations return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Missing or invalid required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, malformed or expired credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced product id is absent from the store
    #[error("Product not found: {product_id}")]
    NotFound { product_id: String },

    /// A dependent capability (mail transport) is missing or failed
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Writing the catalog document failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Invalid process configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ShopError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Validation(_) => 400,
            ShopError::Unauthorized(_) => 401,
            ShopError::NotFound { .. } => 404,
            ShopError::ServiceUnavailable(_) => 500,
            ShopError::Persistence(_) => 500,
            ShopError::Configuration(_) => 500,
        }
    }

    /// Short message that is safe to show to a client.
    ///
    /// Server-side failures never leak their internal detail.
    pub fn public_message(&self) -> String {
        match self {
            ShopError::Validation(msg)
            | ShopError::Unauthorized(msg)
            | ShopError::ServiceUnavailable(msg) => msg.clone(),
            ShopError::NotFound { .. } => "Product not found.".to_string(),
            ShopError::Persistence(_) => "Could not save products. Please try again.".to_string(),
            ShopError::Configuration(_) => "Internal server error.".to_string(),
        }
    }

    /// Returns true for failures caused by the server rather than the request
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<std::io::Error> for ShopError {
    fn from(err: std::io::Error) -> Self {
        ShopError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for ShopError {
    fn from(err: serde_json::Error) -> Self {
        ShopError::Persistence(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
