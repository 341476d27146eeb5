//! Unified error handling for the studio API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;
use crate::gemini::{ErrorKind, GenerationError};
use crate::media::MediaError;
use crate::store::StoreError;
use crate::tryon::TryOnError;

/// Application-level error type for the studio.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Image error: {0}")]
    Media(#[from] MediaError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TryOnError> for StudioError {
    fn from(err: TryOnError) -> Self {
        match err {
            TryOnError::Media(e) => Self::Media(e),
            TryOnError::Generation(e) => Self::Generation(e),
            e @ (TryOnError::NotTryOnable(_) | TryOnError::NotAnImage(_)) => {
                Self::BadRequest(e.to_string())
            }
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
}

impl StudioError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(e) => match e {
                StoreError::NotLoggedIn => StatusCode::UNAUTHORIZED,
                StoreError::NotFound { .. } | StoreError::IndexOutOfRange { .. } => {
                    StatusCode::NOT_FOUND
                }
                StoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                StoreError::NoActiveSession | StoreError::Busy | StoreError::Navigation(_) => {
                    StatusCode::CONFLICT
                }
                StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
                StoreError::Price(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::Generation(e) => match e.kind() {
                ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                ErrorKind::ContentBlocked => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ErrorKind::ConfigMissing => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::NetworkFailure | ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
            },
            Self::Media(e) => match e {
                MediaError::InvalidDataUrl(_) | MediaError::Decode(_) => StatusCode::BAD_REQUEST,
                MediaError::Fetch { .. } | MediaError::FetchStatus { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                MediaError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Failure class of generation errors.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Generation(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl IntoResponse for StudioError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                status = status.as_u16(),
                sentry_event_id = %event_id,
                "Studio request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let error = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Backend(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            error,
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// Set the Sentry user context from a profile.
pub fn set_sentry_user(profile_id: &str, display_name: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(profile_id.to_string()),
            username: Some(display_name.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::navigation::NavigationError;
    use lookbook_core::ItemId;

    fn status(err: impl Into<StudioError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_generation_status_codes() {
        assert_eq!(
            status(GenerationError::RateLimited(30)),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status(GenerationError::ContentBlocked {
                reason: "SAFETY".to_string()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(GenerationError::Timeout(Duration::from_secs(120))),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status(GenerationError::EmptyResponse),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(GenerationError::ConfigMissing("GEMINI_API_KEY".to_string())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_store_status_codes() {
        assert_eq!(status(StoreError::NotLoggedIn), StatusCode::UNAUTHORIZED);
        assert_eq!(status(StoreError::Busy), StatusCode::CONFLICT);
        assert_eq!(
            status(StoreError::IndexOutOfRange { index: 3, len: 1 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(StoreError::Navigation(NavigationError::InvalidTransition {
                from: "login",
                event: "open_cart"
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(StoreError::Invalid("x".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_try_on_errors_unwrap() {
        assert_eq!(
            status(TryOnError::NotTryOnable(ItemId::new(3))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(TryOnError::Media(MediaError::FetchStatus {
                url: "https://img".to_string(),
                status: 404
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(TryOnError::Generation(GenerationError::RateLimited(1))),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_kind_only_for_generation() {
        assert_eq!(
            StudioError::from(GenerationError::RateLimited(1)).kind(),
            Some(ErrorKind::RateLimited)
        );
        assert_eq!(StudioError::BadRequest("x".to_string()).kind(), None);
    }

    #[test]
    fn test_display_messages_are_distinct() {
        let blocked = StudioError::from(GenerationError::ContentBlocked {
            reason: "SAFETY".to_string(),
        });
        let empty = StudioError::from(GenerationError::EmptyResponse);
        assert_ne!(blocked.to_string(), empty.to_string());
        assert_eq!(
            empty.to_string(),
            "Generation failed: model returned an empty response"
        );
    }
}
