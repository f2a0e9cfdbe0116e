//! Request extractors that reject with [`AppError`].
//!
//! Axum's own `Json` and `Query` answer a malformed request with a plain-text
//! body. These wrappers run the same extraction but turn the rejection into
//! a 400 carrying the usual `{ "success": false, "error": "..." }` envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
