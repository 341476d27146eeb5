//! Vendor storefront handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use lookbook_core::{Folder, FolderId, ItemId, Product};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StudioError;
use crate::state::AppState;
use crate::store::{NewFolder, NewProduct};

/// Product listing filter.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Folder to list; absent lists uncategorised products.
    #[serde(default)]
    pub folder_id: Option<FolderId>,
}

/// Folder deletion outcome.
#[derive(Debug, Serialize)]
pub struct FolderDeleted {
    pub moved_products: usize,
}

/// GET /api/folders
pub async fn folders(State(state): State<AppState>) -> Result<Json<Vec<Folder>>, StudioError> {
    Ok(Json(state.store().read().await.vendor_folders()?))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    Json(request): Json<NewFolder>,
) -> Result<(StatusCode, Json<Folder>), StudioError> {
    let folder = state.store().write().await.create_folder(request)?;
    info!(folder_id = %folder.id, "Folder created");
    Ok((StatusCode::CREATED, Json(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<FolderId>,
) -> Result<Json<FolderDeleted>, StudioError> {
    let moved_products = state.store().write().await.delete_folder(id)?;
    info!(folder_id = %id, moved_products, "Folder deleted");
    Ok(Json(FolderDeleted { moved_products }))
}

/// GET /api/products
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, StudioError> {
    Ok(Json(
        state.store().read().await.vendor_products(query.folder_id)?,
    ))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), StudioError> {
    let product = state.store().write().await.create_product(request)?;
    info!(product_id = %product.id(), "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// DELETE /api/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<StatusCode, StudioError> {
    state.store().write().await.delete_product(id)?;
    Ok(StatusCode::NO_CONTENT)
}
