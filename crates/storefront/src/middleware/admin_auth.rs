//! Admin authentication extractor.
//!
//! Admin routes take [`RequireAdmin`] as an argument; requests without a
//! valid `admin_session` cookie are rejected with 401 before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use chrono::Utc;

use crate::error::AppError;
use crate::services::admin_auth::token_from_cookie_header;
use crate::state::AppState;

/// Proof that the request carries a valid admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_bookings(_admin: RequireAdmin, State(state): State<AppState>) -> Result<...> {
///     ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(token_from_cookie_header);

        match token {
            Some(token) if state.admin_auth().verify(&token, Utc::now()) => Ok(Self),
            _ => Err(AppError::Unauthorized("Authentication required".to_string())),
        }
    }
}

/// Whether the request carries a valid admin session, without rejecting.
#[derive(Debug, Clone, Copy)]
pub struct AdminStatus(pub bool);

impl FromRequestParts<AppState> for AdminStatus {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(
            RequireAdmin::from_request_parts(parts, state).await.is_ok(),
        ))
    }
}
