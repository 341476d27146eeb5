//! Try-on and result session handlers.
//!
//! Rendering runs without holding the store lock: the store moves to the
//! `Generating` screen first, which rejects concurrent try-ons, and the
//! outcome is recorded under a second lock. Renders and animations run in
//! spawned tasks so the busy screen is always left, even when the client
//! disconnects mid-request.

use axum::{Json, extract::State, http::StatusCode};
use lookbook_core::{Item, ItemId, Post, Price};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info, instrument, warn};

use crate::error::StudioError;
use crate::gemini::GenerationError;
use crate::media::{DataUrl, prepare_photo};
use crate::navigation::Screen;
use crate::state::AppState;
use crate::store::{CartView, PendingTryOn, SavedLook, StoreError};
use crate::tryon::{TryOnView, build_animation_prompt};

/// Try-on request.
///
/// `photo` starts a new look; without it the item is stacked onto the
/// current result.
#[derive(Debug, Deserialize)]
pub struct TryOnRequest {
    pub item_id: ItemId,
    #[serde(default)]
    pub photo: Option<DataUrl>,
}

/// Result session plus where the user ended up.
#[derive(Debug, Serialize)]
pub struct TryOnResponse {
    pub image: DataUrl,
    pub items: Vec<Item>,
    pub total: Price,
    pub screen: Screen,
    /// `live` or `demo`.
    pub engine: &'static str,
}

impl TryOnResponse {
    fn new(view: TryOnView, screen: Screen, state: &AppState) -> Self {
        Self {
            image: view.image,
            items: view.items,
            total: view.total,
            screen,
            engine: state.capabilities().try_on,
        }
    }
}

/// Generated animation.
#[derive(Debug, Serialize)]
pub struct AnimationResponse {
    pub model: String,
    pub video: DataUrl,
}

/// Decode, square and downscale an uploaded photo off the async runtime.
async fn prepare(photo: DataUrl) -> Result<DataUrl, StudioError> {
    tokio::task::spawn_blocking(move || prepare_photo(&photo))
        .await
        .map_err(|e| StudioError::Internal(format!("photo preparation panicked: {e}")))?
        .map_err(StudioError::from)
}

/// GET /api/try-on
pub async fn show(State(state): State<AppState>) -> Result<Json<TryOnResponse>, StudioError> {
    let store = state.store().read().await;
    let view = store
        .session_view()?
        .ok_or(StoreError::NoActiveSession)?;
    Ok(Json(TryOnResponse::new(view, store.screen().clone(), &state)))
}

/// POST /api/try-on
#[instrument(skip(state, request), fields(item_id = %request.item_id, new_photo = request.photo.is_some()))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<TryOnRequest>,
) -> Result<Json<TryOnResponse>, StudioError> {
    let photo = match request.photo {
        Some(photo) => Some(prepare(photo).await?),
        None => None,
    };

    let pending = state
        .store()
        .write()
        .await
        .begin_try_on(request.item_id, photo)?;

    let task = tokio::spawn(render_try_on(state.clone(), pending).in_current_span());
    match task.await {
        Ok(outcome) => outcome.map(Json),
        Err(e) => {
            release_busy_screen(&state).await;
            Err(StudioError::Internal(format!("try-on task failed: {e}")))
        }
    }
}

/// Render and record the outcome. Runs detached from the request so a
/// dropped connection still leaves the generating screen.
async fn render_try_on(
    state: AppState,
    pending: PendingTryOn,
) -> Result<TryOnResponse, StudioError> {
    let rendered = state
        .try_on()
        .render(&pending.person, &pending.item, &pending.worn)
        .await;

    let mut store = state.store().write().await;
    let completed = rendered
        .map_err(StudioError::from)
        .and_then(|image| {
            store
                .complete_try_on(pending, image)
                .map_err(StudioError::from)
        });
    match completed {
        Ok(view) => {
            info!(items = view.items.len(), total = %view.total, "Try-on rendered");
            Ok(TryOnResponse::new(view, store.screen().clone(), &state))
        }
        Err(e) => {
            if store.screen().is_busy() {
                if let Err(nav) = store.abort_generation() {
                    warn!(error = %nav, "Failed to leave generating screen");
                }
            }
            Err(e)
        }
    }
}

async fn release_busy_screen(state: &AppState) {
    let mut store = state.store().write().await;
    let screen = store.screen().clone();
    let result = match screen {
        Screen::Generating { .. } => store.abort_generation(),
        Screen::Animating => store.finish_animation(),
        _ => return,
    };
    if let Err(nav) = result {
        warn!(error = %nav, "Failed to leave busy screen");
    }
}

/// POST /api/try-on/undo
pub async fn undo(State(state): State<AppState>) -> Result<Json<TryOnResponse>, StudioError> {
    let mut store = state.store().write().await;
    let view = store.undo_try_on()?;
    Ok(Json(TryOnResponse::new(view, store.screen().clone(), &state)))
}

/// POST /api/try-on/buy
pub async fn buy(State(state): State<AppState>) -> Result<Json<CartView>, StudioError> {
    Ok(Json(state.store().write().await.buy_look()?))
}

/// POST /api/try-on/save
pub async fn save(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SavedLook>), StudioError> {
    let look = state.store().write().await.save_look()?;
    Ok((StatusCode::CREATED, Json(look)))
}

/// GET /api/looks
pub async fn looks(State(state): State<AppState>) -> Json<Vec<SavedLook>> {
    Json(state.store().read().await.saved_looks().to_vec())
}

/// POST /api/try-on/publish
pub async fn publish(State(state): State<AppState>) -> Result<(StatusCode, Json<Post>), StudioError> {
    let post = state.store().write().await.publish_look()?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/try-on/animate
#[instrument(skip(state))]
pub async fn animate(State(state): State<AppState>) -> Result<Json<AnimationResponse>, StudioError> {
    let generator = state.video().cloned().ok_or_else(|| {
        GenerationError::ConfigMissing("animation requires GEMINI_API_KEY".to_string())
    })?;

    let pending = state.store().write().await.begin_animation()?;
    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let prompt = build_animation_prompt(&pending.items);
        let result = generator
            .animate(pending.image.data(), pending.image.mime_type(), &prompt)
            .await;
        if let Err(nav) = task_state.store().write().await.finish_animation() {
            warn!(error = %nav, "Failed to leave animating screen");
        }
        result
    }
    .in_current_span());

    let video = match task.await {
        Ok(result) => result?,
        Err(e) => {
            release_busy_screen(&state).await;
            return Err(StudioError::Internal(format!("animation task failed: {e}")));
        }
    };
    Ok(Json(AnimationResponse {
        video: DataUrl::from_bytes(video.mime_type, &video.bytes),
        model: video.model,
    }))
}
