//! Login, logout and profile handlers.

use axum::{Json, extract::State, http::StatusCode};
use lookbook_core::{AccountType, Profile, ProfileId, ProfileUpdate};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::capabilities::CapabilityReport;
use crate::error::{StudioError, clear_sentry_user, set_sentry_user};
use crate::navigation::Screen;
use crate::state::AppState;
use crate::store::StoreError;

/// Login request.
///
/// With `profile_id`, the profile is loaded from the hosted backend;
/// otherwise a fresh profile is created from `display_name`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
}

/// Account setup request.
#[derive(Debug, Deserialize)]
pub struct AccountTypeRequest {
    pub account_type: AccountType,
}

/// Current profile and screen.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub profile: Option<Profile>,
    pub screen: Screen,
}

/// GET /api/session
pub async fn show(State(state): State<AppState>) -> Json<SessionView> {
    let store = state.store().read().await;
    Json(SessionView {
        profile: store.profile().cloned(),
        screen: store.screen().clone(),
    })
}

/// POST /api/session
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<SessionView>), StudioError> {
    let profile = match request.profile_id {
        Some(id) => {
            let client = state.backend().client().ok_or_else(|| {
                StudioError::BadRequest("profile_id requires a hosted backend".to_string())
            })?;
            client
                .fetch_profile(id)
                .await?
                .ok_or_else(|| StoreError::NotFound {
                    entity: "profile",
                    id: id.to_string(),
                })?
        }
        None => {
            let name = request
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| StudioError::BadRequest("display_name is required".to_string()))?;
            Profile::new(name, request.account_type)
        }
    };

    let mut store = state.store().write().await;
    let profile = store.login(profile)?.clone();
    set_sentry_user(&profile.id.to_string(), &profile.display_name);

    Ok((
        StatusCode::CREATED,
        Json(SessionView {
            profile: Some(profile),
            screen: store.screen().clone(),
        }),
    ))
}

/// DELETE /api/session
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, StudioError> {
    state.store().write().await.logout()?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, StudioError> {
    let mut store = state.store().write().await;
    Ok(Json(store.update_profile(update)?.clone()))
}

/// POST /api/profile/account-type
pub async fn choose_account_type(
    State(state): State<AppState>,
    Json(request): Json<AccountTypeRequest>,
) -> Result<Json<SessionView>, StudioError> {
    let mut store = state.store().write().await;
    let profile = store.choose_account_type(request.account_type)?.clone();
    Ok(Json(SessionView {
        profile: Some(profile),
        screen: store.screen().clone(),
    }))
}

/// GET /api/capabilities
pub async fn capabilities(State(state): State<AppState>) -> Json<CapabilityReport> {
    Json(state.capabilities().clone())
}
