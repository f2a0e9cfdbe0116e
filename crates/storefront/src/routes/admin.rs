//! Admin API handlers.
//!
//! Login and logout manage the `admin_session` cookie. Every other handler
//! takes [`RequireAdmin`], so an unauthenticated request is rejected with
//! 401 before it reaches the handler body.

use axum::{
    extract::{Path, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bihar_bhojan_core::booking::Booking;
use bihar_bhojan_core::menu::{MenuItem, parse_menu_items};
use bihar_bhojan_core::validation::AdminLoginForm;

use super::ApiResponse;
use crate::error::{Result, add_breadcrumb};
use crate::extract::Json;
use crate::middleware::{AdminStatus, RequireAdmin};
use crate::state::AppState;

/// Whether the caller holds a valid admin session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub authenticated: bool,
}

/// Body for a booking status change.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Log in with the admin password.
///
/// POST /admin/login
///
/// Sets an HttpOnly session cookie valid for 24 hours.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<AdminLoginForm>,
) -> Result<impl IntoResponse> {
    let password = form.validate()?;
    let auth = state.admin_auth();
    let token = auth.authenticate(password, Utc::now())?;
    let cookie = auth.session_cookie(token);

    add_breadcrumb("admin", "Logged in", None);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        ApiResponse::ok(SessionView {
            authenticated: true,
        }),
    ))
}

/// Log out. Always succeeds.
///
/// POST /admin/logout
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = state.admin_auth().removal_cookie();
    tracing::info!("Admin logged out");
    (
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        ApiResponse::ok(()),
    )
}

/// Report whether the caller is logged in.
///
/// GET /admin/session
pub async fn session(AdminStatus(authenticated): AdminStatus) -> ApiResponse<SessionView> {
    ApiResponse::ok(SessionView { authenticated })
}

/// List every booking, newest date first.
///
/// GET /admin/bookings
#[instrument(skip(state))]
pub async fn bookings(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Booking>>> {
    let bookings = state.bookings().list().await?;
    Ok(ApiResponse::ok(bookings))
}

/// Change a booking's status and email the guest.
///
/// POST /admin/bookings/{id}/status
#[instrument(skip(state, body), fields(status = %body.status))]
pub async fn update_booking_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<ApiResponse<Booking>> {
    let booking = state.bookings().update_status(&id, &body.status).await?;
    add_breadcrumb(
        "admin",
        "Booking status changed",
        Some(&[("booking_id", &id), ("status", booking.status.as_str())]),
    );
    Ok(ApiResponse::ok(booking))
}

/// The full menu as stored.
///
/// GET /admin/menu
#[instrument(skip(state))]
pub async fn menu(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<MenuItem>>> {
    let items = state.menu().items().await?;
    Ok(ApiResponse::ok(items.to_vec()))
}

/// Replace the whole menu.
///
/// PUT /admin/menu
///
/// The body is the new list of items. Nothing is written unless every item
/// validates and ids are unique.
#[instrument(skip(state, body))]
pub async fn replace_menu(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<ApiResponse<()>> {
    let items = parse_menu_items(body)?;
    state.menu().replace(items).await?;
    add_breadcrumb("admin", "Menu replaced", None);
    Ok(ApiResponse::ok(()))
}
