//! Unified error handling for route handlers.
//!
//! Provides a unified `AppError` type mapped onto HTTP status codes with
//! JSON error bodies. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::FactoryError;
use crate::models::cart::CartError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::store::StoreError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Furniture factory rejected the input.
    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout was aborted.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Internal(_)
                | Self::Store(StoreError::Io(_) | StoreError::Corrupt(_))
                | Self::Auth(AuthError::PasswordHash | AuthError::Store(_))
        ) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Factory(_) | Self::Cart(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart | CheckoutError::OutOfStock(_) => StatusCode::BAD_REQUEST,
                CheckoutError::PaymentFailed | CheckoutError::Payment(_) => StatusCode::BAD_GATEWAY,
                CheckoutError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(err) => match err {
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
                StoreError::Io(_) | StoreError::Corrupt(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            match &self {
                Self::Auth(AuthError::InvalidCredentials | AuthError::UserNotFound) => {
                    "Invalid credentials".to_string()
                }
                Self::Auth(AuthError::UserAlreadyExists) => {
                    "An account with this username already exists".to_string()
                }
                Self::Auth(AuthError::InvalidEmail(_)) => "Invalid email address".to_string(),
                Self::Auth(AuthError::WeakPassword(msg)) => msg.clone(),
                Self::Checkout(err) => err.to_string(),
                Self::Factory(err) => err.to_string(),
                Self::Cart(err) => err.to_string(),
                Self::Store(err) => err.to_string(),
                _ => self.to_string(),
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("order".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("login required".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("management only".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::InvalidQuantity)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::PaymentFailed)),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::Conflict("dup".to_string()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = AppError::Internal("connection string leaked".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body is the generic message; details stay in the logs.
    }
}
