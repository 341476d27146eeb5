//! Backend client errors.

use thiserror::Error;

/// Why the hosted backend is not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BackendUnavailable {
    #[error("BACKEND_URL and BACKEND_ANON_KEY are not both set")]
    NotConfigured,

    #[error("BACKEND_URL must use https")]
    InsecureUrl,

    #[error("BACKEND_ANON_KEY is too short to be a real key")]
    KeyTooShort,
}

/// Errors talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}
