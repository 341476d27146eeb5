//! Optional hosted backend.
//!
//! The backend is only used when its settings pass [`BackendCapability::detect`];
//! otherwise the studio runs on the in-memory store alone.

pub mod client;
pub mod error;

use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::config::BackendSettings;

pub use client::BackendClient;
pub use error::{BackendError, BackendUnavailable};

/// Shortest anon key accepted as real.
const MIN_KEY_LEN: usize = 21;

/// Whether a backend client can be used.
#[derive(Debug, Clone)]
pub enum BackendCapability {
    Available(BackendClient),
    Unavailable(BackendUnavailable),
}

impl BackendCapability {
    /// Validate settings and build a client if they describe a real backend.
    ///
    /// Requires both values, an `https://` URL and a key longer than 20
    /// characters.
    #[must_use]
    pub fn detect(settings: &BackendSettings) -> Self {
        match Self::validate(settings) {
            Ok(client) => {
                info!("Hosted backend enabled");
                Self::Available(client)
            }
            Err(reason) => {
                if reason != BackendUnavailable::NotConfigured {
                    warn!(%reason, "Hosted backend disabled");
                }
                Self::Unavailable(reason)
            }
        }
    }

    fn validate(settings: &BackendSettings) -> Result<BackendClient, BackendUnavailable> {
        let (Some(url), Some(key)) = (settings.url.as_deref(), settings.anon_key.as_ref()) else {
            return Err(BackendUnavailable::NotConfigured);
        };
        if !url.starts_with("https://") {
            return Err(BackendUnavailable::InsecureUrl);
        }
        if key.expose_secret().len() < MIN_KEY_LEN {
            return Err(BackendUnavailable::KeyTooShort);
        }
        BackendClient::new(url, key.clone()).map_err(|_| BackendUnavailable::InsecureUrl)
    }

    #[must_use]
    pub const fn client(&self) -> Option<&BackendClient> {
        match self {
            Self::Available(client) => Some(client),
            Self::Unavailable(_) => None,
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn settings(url: Option<&str>, key: Option<&str>) -> BackendSettings {
        BackendSettings {
            url: url.map(String::from),
            anon_key: key.map(SecretString::from),
        }
    }

    fn reason(settings: &BackendSettings) -> Option<BackendUnavailable> {
        match BackendCapability::detect(settings) {
            BackendCapability::Available(_) => None,
            BackendCapability::Unavailable(reason) => Some(reason),
        }
    }

    #[test]
    fn test_detect_requires_both_values() {
        assert_eq!(
            reason(&settings(None, Some("k".repeat(30).as_str()))),
            Some(BackendUnavailable::NotConfigured)
        );
        assert_eq!(
            reason(&settings(Some("https://db.example.com"), None)),
            Some(BackendUnavailable::NotConfigured)
        );
    }

    #[test]
    fn test_detect_requires_https() {
        assert_eq!(
            reason(&settings(
                Some("http://db.example.com"),
                Some("k".repeat(30).as_str())
            )),
            Some(BackendUnavailable::InsecureUrl)
        );
    }

    #[test]
    fn test_detect_key_length_boundary() {
        let url = Some("https://db.example.com");
        assert_eq!(
            reason(&settings(url, Some("k".repeat(20).as_str()))),
            Some(BackendUnavailable::KeyTooShort)
        );
        assert_eq!(reason(&settings(url, Some("k".repeat(21).as_str()))), None);
    }

    #[test]
    fn test_client_accessor() {
        let capability = BackendCapability::detect(&settings(
            Some("https://db.example.com"),
            Some("k".repeat(40).as_str()),
        ));
        assert!(capability.is_available());
        assert!(capability.client().is_some());
    }
}
