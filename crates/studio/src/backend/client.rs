//! PostgREST-style profile lookups.

use lookbook_core::{Profile, ProfileId};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::error::BackendError;

/// Client for the hosted backend's REST interface.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    anon_key: SecretString,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .field("anon_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client for `base_url`.
    ///
    /// Prefer [`BackendCapability::detect`](super::BackendCapability::detect),
    /// which validates the settings first.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Url` if `base_url` does not parse.
    pub fn new(base_url: &str, anon_key: SecretString) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            anon_key,
        })
    }

    /// Fetch a profile row by ID.
    ///
    /// Returns `Ok(None)` if no row matches.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failures or error statuses.
    #[instrument(skip(self), fields(profile_id = %id))]
    pub async fn fetch_profile(&self, id: ProfileId) -> Result<Option<Profile>, BackendError> {
        let mut url = self.base_url.join("rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("select", "*");

        let key = self.anon_key.expose_secret();
        let response = self
            .client
            .get(url)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<Profile> = response.json().await?;
        debug!(rows = rows.len(), "Profile lookup finished");
        Ok(rows.into_iter().next())
    }
}
