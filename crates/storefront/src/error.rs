//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding. All route handlers return `Result<T, AppError>`; the
//! client always gets `{ "success": false, "error": "..." }`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use bihar_bhojan_core::menu::MenuValidationError;
use bihar_bhojan_core::validation::ValidationError;

use crate::services::admin_auth::AdminAuthError;
use crate::services::bookings::BookingError;
use crate::services::menu::MenuError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Form input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Booking operation failed.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// Menu file operation failed.
    #[error(transparent)]
    Menu(#[from] MenuError),

    /// Admin login failed.
    #[error(transparent)]
    AdminAuth(#[from] AdminAuthError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Caller is not an authenticated admin.
    #[error("{0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Booking(err) => match err {
                BookingError::Validation(_) | BookingError::InvalidStatus(_) => {
                    StatusCode::BAD_REQUEST
                }
                BookingError::NotFound => StatusCode::NOT_FOUND,
                BookingError::Create(_) | BookingError::Fetch(_) | BookingError::Update(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Menu(err) => match err {
                MenuError::Invalid(_) => StatusCode::BAD_REQUEST,
                MenuError::NotFound
                | MenuError::InvalidJson(_)
                | MenuError::InvalidStructure
                | MenuError::PermissionDenied
                | MenuError::Read(_)
                | MenuError::Write(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::AdminAuth(err) => match err {
                AdminAuthError::InvalidPassword => StatusCode::UNAUTHORIZED,
                AdminAuthError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                AdminAuthError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the client.
    fn public_message(&self) -> String {
        match self {
            // Don't expose internal error details to clients
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<MenuValidationError> for AppError {
    fn from(err: MenuValidationError) -> Self {
        Self::Menu(MenuError::Invalid(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = json!({
            "success": false,
            "error": self.public_message(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for guest and admin actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "litti-chokha")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request_with_message() {
        let err = AppError::from(ValidationError::new("name", "Name is required"));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Name is required");
    }

    #[tokio::test]
    async fn test_booking_errors() {
        let (status, body) = body_json(BookingError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Booking not found.");

        let store_err = bihar_bhojan_core::booking::StoreError::backend(std::io::Error::other("down"));
        let (status, body) = body_json(BookingError::Fetch(store_err).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch bookings. Please try again.");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let (status, body) = body_json(AppError::Internal("pool exhausted".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Unauthorized("Authentication required".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AdminAuthError::InvalidPassword.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AdminAuthError::NotConfigured.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            get_status(MenuValidationError::DuplicateIds.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(MenuError::NotFound.into()), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
