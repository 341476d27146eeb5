//! Cart handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use lookbook_core::ItemId;
use serde::Deserialize;

use crate::error::StudioError;
use crate::state::AppState;
use crate::store::{CartView, StoreError};

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub item_id: ItemId,
}

/// GET /api/cart
pub async fn show(State(state): State<AppState>) -> Result<Json<CartView>, StudioError> {
    let store = state.store().read().await;
    Ok(Json(store.cart().view().map_err(StoreError::from)?))
}

/// POST /api/cart
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCart>,
) -> Result<Json<CartView>, StudioError> {
    let mut store = state.store().write().await;
    Ok(Json(store.add_to_cart(request.item_id)?))
}

/// DELETE /api/cart/{index}
pub async fn remove(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<CartView>, StudioError> {
    let mut store = state.store().write().await;
    Ok(Json(store.remove_from_cart(index)?))
}
