//! Contact form submissions.

use axum::extract::State;
use tracing::instrument;

use bihar_bhojan_core::validation::ContactForm;

use super::ApiResponse;
use crate::error::Result;
use crate::extract::Json;
use crate::services::contact;
use crate::state::AppState;

/// Forward a contact message to the restaurant.
///
/// POST /api/contact
///
/// Succeeds once the message validates; delivery is not awaited.
#[instrument(skip(state, form))]
pub async fn send(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<ApiResponse<()>> {
    contact::send(state.notifier(), &form)?;
    Ok(ApiResponse::ok(()))
}
