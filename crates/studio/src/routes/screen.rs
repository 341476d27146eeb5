//! Navigation handlers.

use axum::{Json, extract::State};

use crate::error::StudioError;
use crate::navigation::{NavEvent, Screen};
use crate::state::AppState;

/// GET /api/screen
pub async fn show(State(state): State<AppState>) -> Json<Screen> {
    Json(state.store().read().await.screen().clone())
}

/// POST /api/screen
pub async fn dispatch(
    State(state): State<AppState>,
    Json(event): Json<NavEvent>,
) -> Result<Json<Screen>, StudioError> {
    let mut store = state.store().write().await;
    Ok(Json(store.navigate(&event)?.clone()))
}
