//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Every handler answers with the
//! full cart so clients can re-render from one response.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use bihar_bhojan_core::{Money, ProductId};
use bihar_bhojan_core::cart::LineItem;

use super::ApiResponse;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::Json;
use crate::services::cart::{self, SessionCart};
use crate::state::AppState;

/// Cart contents and derived totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub item_count: u64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl From<&SessionCart> for CartView {
    fn from(cart: &SessionCart) -> Self {
        let totals = cart.totals();
        Self {
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
        }
    }
}

/// Body naming one cart line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub product_id: ProductId,
}

/// Body for a quantity change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantity {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Save the cart and render it.
async fn respond(session: &Session, cart: SessionCart) -> Result<ApiResponse<CartView>> {
    let view = CartView::from(&cart);
    cart::save(session, cart).await?;
    Ok(ApiResponse::ok(view))
}

/// Show the cart.
///
/// GET /api/cart
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<ApiResponse<CartView>> {
    let cart = cart::load(&session).await?;
    Ok(ApiResponse::ok(CartView::from(&cart)))
}

/// Add one of a menu item.
///
/// POST /api/cart/add
///
/// Name and price come from the menu, never from the request.
#[instrument(skip(state, session), fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ProductRef>,
) -> Result<ApiResponse<CartView>> {
    let item = state
        .menu()
        .find(&body.product_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Menu item not found".to_string()))?;

    if !item.is_available {
        return Err(AppError::BadRequest(
            "This item is currently unavailable".to_string(),
        ));
    }

    add_breadcrumb("cart", "Added item", Some(&[("product_id", item.id.as_str())]));

    let mut cart = cart::load(&session).await?;
    cart.add(item.to_line_item());
    respond(&session, cart).await
}

/// Set the quantity of a line. Zero or less removes it.
///
/// POST /api/cart/update
#[instrument(skip(session), fields(product_id = %body.product_id, quantity = body.quantity))]
pub async fn update(
    session: Session,
    Json(body): Json<UpdateQuantity>,
) -> Result<ApiResponse<CartView>> {
    add_breadcrumb(
        "cart",
        "Updated quantity",
        Some(&[("product_id", body.product_id.as_str())]),
    );

    let mut cart = cart::load(&session).await?;
    cart.set_quantity(&body.product_id, body.quantity);
    respond(&session, cart).await
}

/// Remove a line.
///
/// POST /api/cart/remove
#[instrument(skip(session), fields(product_id = %body.product_id))]
pub async fn remove(session: Session, Json(body): Json<ProductRef>) -> Result<ApiResponse<CartView>> {
    add_breadcrumb(
        "cart",
        "Removed item",
        Some(&[("product_id", body.product_id.as_str())]),
    );

    let mut cart = cart::load(&session).await?;
    cart.remove(&body.product_id);
    respond(&session, cart).await
}

/// Empty the cart.
///
/// POST /api/cart/clear
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<ApiResponse<CartView>> {
    add_breadcrumb("cart", "Cleared cart", None);

    let mut cart = cart::load(&session).await?;
    cart.clear();
    respond(&session, cart).await
}
