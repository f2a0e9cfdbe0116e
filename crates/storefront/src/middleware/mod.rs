//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store, holds the cart)
//! 5. Rate limiting (governor, on form and login routes only)
//!
//! Admin routes are guarded by the [`RequireAdmin`] extractor rather than a
//! layer.

pub mod admin_auth;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use admin_auth::{AdminStatus, RequireAdmin};
pub use rate_limit::{auth_rate_limiter, form_rate_limiter};
pub use request_id::request_id_middleware;
pub use session::{create_session_layer, session_layer};
