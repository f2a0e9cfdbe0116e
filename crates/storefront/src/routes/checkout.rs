//! WhatsApp checkout.
//!
//! Orders are not stored. Checkout turns the cart into a WhatsApp message
//! addressed to the restaurant and hands the client a `wa.me` link; the
//! conversation there is the order.

use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use bihar_bhojan_core::order::CheckoutLink;
use bihar_bhojan_core::validation::CustomerInfoForm;

use super::ApiResponse;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::Json;
use crate::services::cart;
use crate::state::AppState;

/// Build the order message and empty the cart.
///
/// POST /api/checkout/whatsapp
#[instrument(skip(state, session, form))]
pub async fn whatsapp(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CustomerInfoForm>,
) -> Result<ApiResponse<CheckoutLink>> {
    let mut cart = cart::load(&session).await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".to_string()));
    }

    let customer = form.validate()?;
    let link = CheckoutLink::build(cart.items(), &customer, &state.config().restaurant.whatsapp);

    tracing::info!(
        items = cart.items().len(),
        total = %cart.totals().total,
        "WhatsApp checkout"
    );
    add_breadcrumb("checkout", "WhatsApp order built", None);

    cart.clear();
    cart::save(&session, cart).await?;

    Ok(ApiResponse::ok(link))
}
