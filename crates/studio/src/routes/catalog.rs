//! Catalog browsing handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use lookbook_core::{Item, ItemId};
use serde::Deserialize;

use crate::error::StudioError;
use crate::state::AppState;

/// Catalog filter.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub category: Option<String>,
}

/// GET /api/catalog
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<Item>> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    Json(state.store().read().await.browse(category))
}

/// GET /api/categories
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    let store = state.store().read().await;
    Json(store.categories().into_iter().map(String::from).collect())
}

/// GET /api/items/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<Item>, StudioError> {
    Ok(Json(state.store().read().await.find_item(id)?.clone()))
}
