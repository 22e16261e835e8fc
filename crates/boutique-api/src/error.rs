//! # API Errors
//!
//! Every failure leaves the API as `{ "error": "<message>" }` with the
//! status code of the underlying `ShopError`.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use boutique_core::ShopError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Client-facing message for any body that fails to deserialize
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body.";

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Error returned by handlers and the admin gate
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Shop(#[from] ShopError),

    #[error("invalid JSON body: {0}")]
    Json(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Shop(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Json(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Shop(err) => err.public_message(),
            ApiError::Json(_) => INVALID_JSON_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Json(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text())
            }
            _ if status.is_server_error() => error!("Request failed: {}", self),
            _ => {}
        }
        (status, Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}

/// `Json` extractor whose rejections use the `{error}` body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
