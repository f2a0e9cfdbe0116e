//! HTTP route handlers for the storefront.
//!
//! Every endpoint speaks JSON. Successful responses are
//! `{ "success": true, "data": ... }`; failures come from [`AppError`] as
//! `{ "success": false, "error": "..." }`.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Menu
//! GET  /api/menu               - Menu items (?category=&diet=&q=)
//!
//! # Cart (session-backed)
//! GET  /api/cart               - Cart contents and totals
//! POST /api/cart/add           - Add one of a menu item
//! POST /api/cart/update        - Set a line's quantity (<= 0 removes)
//! POST /api/cart/remove        - Remove a line
//! POST /api/cart/clear         - Empty the cart
//!
//! # Orders, bookings, contact
//! POST /api/checkout/whatsapp  - WhatsApp order message and link
//! POST /api/bookings           - Book a table (rate limited)
//! POST /api/contact            - Contact form (rate limited)
//!
//! # Admin
//! POST /admin/login            - Password login (rate limited)
//! POST /admin/logout           - Clear the admin cookie
//! GET  /admin/session          - Whether the caller is logged in
//! GET  /admin/bookings         - All bookings (requires admin)
//! POST /admin/bookings/{id}/status - Change status (requires admin)
//! GET  /admin/menu             - Menu file contents (requires admin)
//! PUT  /admin/menu             - Replace the menu (requires admin)
//! ```
//!
//! [`AppError`]: crate::error::AppError

pub mod admin;
pub mod bookings;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod menu;

use axum::{
    Json, Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::middleware::{auth_rate_limiter, form_rate_limiter};
use crate::state::AppState;

/// Successful API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the public API router.
pub fn api_routes() -> Router<AppState> {
    let forms = Router::new()
        .route("/bookings", post(bookings::create))
        .route("/contact", post(contact::send))
        .layer(form_rate_limiter());

    Router::new()
        .route("/menu", get(menu::index))
        .nest("/cart", cart_routes())
        .route("/checkout/whatsapp", post(checkout::whatsapp))
        .merge(forms)
}

/// Create the admin router.
pub fn admin_routes() -> Router<AppState> {
    let login = Router::new()
        .route("/login", post(admin::login))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(login)
        .route("/logout", post(admin::logout))
        .route("/session", get(admin::session))
        .route("/bookings", get(admin::bookings))
        .route("/bookings/{id}/status", post(admin::update_booking_status))
        .route("/menu", get(admin::menu).put(admin::replace_menu))
}

/// Create all routes for the storefront.
///
/// The session layer is not applied here; the caller adds it with the
/// store of its choice.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .nest("/admin", admin_routes())
}
