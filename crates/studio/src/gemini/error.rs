//! Error types for the generative API client.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Machine-readable failure class, for callers that branch on the cause
/// rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    RateLimited,
    ContentBlocked,
    NetworkFailure,
    ConfigMissing,
    Timeout,
    Upstream,
}

/// Errors that can occur when interacting with the generative API.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP request failed before a response arrived.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Rate limited or quota exhausted.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The prompt or output was rejected by safety filters.
    #[error("content blocked: {reason}")]
    ContentBlocked {
        /// Block reason reported by the API.
        reason: String,
    },

    /// Candidates came back but none carried an image.
    #[error("model returned no image (finish reason: {})", .finish_reason.as_deref().unwrap_or("unspecified"))]
    NoImage {
        /// Finish reason of the first candidate.
        finish_reason: Option<String>,
    },

    /// No candidates and no block reason.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// A finished video operation carried no video.
    #[error("video generation finished without a video")]
    NoVideo,

    /// The requested model does not exist or is not enabled for the key.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The API key was rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request or the polling loop ran out of time.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// A required setting is missing.
    #[error("missing configuration: {0}")]
    ConfigMissing(String),

    /// Any other API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status or API status string.
        status: String,
        /// Error message.
        message: String,
    },

    /// Failed to parse a response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl GenerationError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::ContentBlocked { .. } => ErrorKind::ContentBlocked,
            Self::Network(_) => ErrorKind::NetworkFailure,
            Self::ConfigMissing(_) | Self::Unauthorized(_) => ErrorKind::ConfigMissing,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::NoImage { .. }
            | Self::EmptyResponse
            | Self::NoVideo
            | Self::ModelUnavailable(_)
            | Self::Api { .. }
            | Self::Parse(_) => ErrorKind::Upstream,
        }
    }

    /// Whether trying another model could succeed.
    #[must_use]
    pub const fn allows_fallback(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::ModelUnavailable(_) | Self::NoVideo | Self::Timeout(_)
        )
    }

    /// Map a transport error, separating timeouts from other failures.
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err)
        }
    }
}

/// Error envelope returned by the API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    /// Canonical status, e.g. `RESOURCE_EXHAUSTED`.
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GenerationError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");

        let err = GenerationError::Timeout(Duration::from_secs(300));
        assert_eq!(err.to_string(), "timed out after 300s");
    }

    #[test]
    fn test_block_and_empty_messages_differ() {
        let blocked = GenerationError::ContentBlocked {
            reason: "SAFETY".to_string(),
        };
        let empty = GenerationError::EmptyResponse;
        assert_ne!(blocked.to_string(), empty.to_string());
        assert_ne!(blocked.kind(), empty.kind());
    }

    #[test]
    fn test_no_image_without_reason() {
        let err = GenerationError::NoImage {
            finish_reason: None,
        };
        assert_eq!(
            err.to_string(),
            "model returned no image (finish reason: unspecified)"
        );
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(GenerationError::RateLimited(1).kind(), ErrorKind::RateLimited);
        assert_eq!(
            GenerationError::ConfigMissing("GEMINI_API_KEY".to_string()).kind(),
            ErrorKind::ConfigMissing
        );
        assert_eq!(GenerationError::NoVideo.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_fallback_policy() {
        assert!(GenerationError::RateLimited(5).allows_fallback());
        assert!(GenerationError::ModelUnavailable("veo".to_string()).allows_fallback());
        assert!(!GenerationError::ContentBlocked {
            reason: "SAFETY".to_string()
        }
        .allows_fallback());
        assert!(!GenerationError::Unauthorized("bad key".to_string()).allows_fallback());
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        }"#;
        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.code, 429);
        assert_eq!(response.error.status, "RESOURCE_EXHAUSTED");
    }
}
