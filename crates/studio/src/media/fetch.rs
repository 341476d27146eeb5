//! Remote item image fetching.
//!
//! Item images live on third-party CDNs. They are fetched once, optionally
//! through a relay prefix, and kept as data URLs in a small TTL cache since
//! the same catalog images are tried on over and over.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, instrument};

use super::{DataUrl, MediaError};

const CACHE_CAPACITY: u64 = 256;
const CACHE_TTL: Duration = Duration::from_secs(600);
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const FALLBACK_MIME: &str = "image/jpeg";

/// Fetches remote images as data URLs.
#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
    proxy: Option<Arc<str>>,
    cache: Cache<String, DataUrl>,
}

impl std::fmt::Debug for ImageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFetcher")
            .field("proxy", &self.proxy)
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl ImageFetcher {
    /// Create a fetcher, optionally routing requests through a relay prefix.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Fetch` if the HTTP client cannot be built.
    pub fn new(proxy: Option<String>) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| MediaError::Fetch {
                url: String::new(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            proxy: proxy.map(Arc::from),
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        })
    }

    /// The URL actually requested for `url`.
    #[must_use]
    pub fn request_url(&self, url: &str) -> String {
        self.proxy.as_deref().map_or_else(
            || url.to_string(),
            |proxy| format!("{proxy}{}", urlencoding::encode(url)),
        )
    }

    /// Fetch an image as a data URL.
    ///
    /// Inline `data:` URLs are parsed without a request.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Fetch`/`FetchStatus` if the request fails and
    /// `MediaError::InvalidDataUrl` for malformed inline images.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<DataUrl, MediaError> {
        if url.starts_with("data:") {
            return DataUrl::parse(url);
        }

        self.cache
            .try_get_with(url.to_string(), self.fetch_uncached(url))
            .await
            .map_err(|e: Arc<MediaError>| (*e).clone())
    }

    async fn fetch_uncached(&self, url: &str) -> Result<DataUrl, MediaError> {
        let fetch_error = |e: reqwest::Error| MediaError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(self.request_url(url))
            .send()
            .await
            .map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| v.starts_with("image/"));

        let bytes = response.bytes().await.map_err(fetch_error)?;
        let mime_type = declared.unwrap_or_else(|| sniff_mime(&bytes).to_string());

        debug!(%mime_type, bytes = bytes.len(), "Fetched item image");
        Ok(DataUrl::from_bytes(mime_type, &bytes))
    }
}

/// Guess an image MIME type from magic bytes, falling back to JPEG.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes).map_or(FALLBACK_MIME, |format| format.to_mime_type())
}
