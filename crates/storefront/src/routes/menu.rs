//! Public menu listing.

use axum::extract::State;
use tracing::instrument;

use bihar_bhojan_core::menu::{MenuFilter, MenuItem};

use super::ApiResponse;
use crate::error::Result;
use crate::extract::Query;
use crate::state::AppState;

/// List menu items.
///
/// GET /api/menu?category=&diet=&q=
///
/// Unavailable dishes are included; clients show them greyed out.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<MenuFilter>,
) -> Result<ApiResponse<Vec<MenuItem>>> {
    let items = state.menu().items().await?;
    let matching = filter.apply(&items).into_iter().cloned().collect();
    Ok(ApiResponse::ok(matching))
}
