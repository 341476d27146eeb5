//! Feed handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use lookbook_core::{Post, PostId};
use serde::Deserialize;

use crate::error::StudioError;
use crate::state::AppState;

/// New comment.
#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub text: String,
}

/// GET /api/feed
pub async fn index(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.store().read().await.feed().to_vec())
}

/// POST /api/feed/{id}/like
pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
) -> Result<Json<Post>, StudioError> {
    Ok(Json(state.store().write().await.toggle_like(id)?))
}

/// POST /api/feed/{id}/comments
pub async fn comment(
    State(state): State<AppState>,
    Path(id): Path<PostId>,
    Json(request): Json<NewComment>,
) -> Result<Json<Post>, StudioError> {
    Ok(Json(
        state.store().write().await.comment(id, &request.text)?,
    ))
}
