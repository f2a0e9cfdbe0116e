//! Table booking submissions.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use bihar_bhojan_core::booking::Booking;
use bihar_bhojan_core::validation::BookingForm;

use super::ApiResponse;
use crate::error::{Result, add_breadcrumb};
use crate::extract::Json;
use crate::state::AppState;

/// Book a table.
///
/// POST /api/bookings
///
/// The booking starts as pending; the restaurant is emailed in the
/// background.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<BookingForm>,
) -> Result<(StatusCode, ApiResponse<Booking>)> {
    let booking = state.bookings().create(&form, state.today()).await?;
    add_breadcrumb(
        "booking",
        "Booking created",
        Some(&[("booking_id", &booking.id.to_string())]),
    );
    Ok((StatusCode::CREATED, ApiResponse::ok(booking)))
}
