//! Generative API client.
//!
//! Provides image composition (`generateContent`) and the primitives of
//! long-running video generation (start, poll, download).

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GenerationError};
use super::types::{
    Blob, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Modality,
    Operation, Part, PredictVideoRequest,
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Generative API client.
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    base_url: String,
    image_model: String,
    video_models: Vec<String>,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.inner.base_url)
            .field("image_model", &self.inner.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` if the API key is empty or not a valid header
    /// value, and `Network` if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let api_key = config.api_key.expose_secret();
        if api_key.trim().is_empty() {
            return Err(GenerationError::ConfigMissing("GEMINI_API_KEY".to_string()));
        }

        let mut key_header = HeaderValue::from_str(api_key).map_err(|_| {
            GenerationError::ConfigMissing("GEMINI_API_KEY is not a valid header value".to_string())
        })?;
        key_header.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, key_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                image_model: config.image_model.clone(),
                video_models: config.video_models.clone(),
                timeout: config.timeout,
            }),
        })
    }

    /// Video models in fallback order.
    #[must_use]
    pub fn video_models(&self) -> &[String] {
        &self.inner.video_models
    }

    /// Image model used for composition.
    #[must_use]
    pub fn image_model(&self) -> &str {
        &self.inner.image_model
    }

    /// Send parts to the image model and return the first generated image.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API reports an error, or
    /// the response carries no image (see
    /// [`GenerateContentResponse::into_first_image`]).
    #[instrument(skip(self, parts), fields(model = %self.inner.image_model, parts = parts.len()))]
    pub async fn generate_image(&self, parts: Vec<Part>) -> Result<Blob, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![Modality::Image, Modality::Text],
            }),
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.inner.base_url, self.inner.image_model
        );
        let response: GenerateContentResponse =
            self.post_json(&url, &self.inner.image_model, &request).await?;

        let blob = response.into_first_image()?;
        debug!(mime_type = %blob.mime_type, bytes = blob.data.len(), "Image generated");
        Ok(blob)
    }

    /// Start a long-running video generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip(self, request), fields(model = %model))]
    pub async fn start_video(
        &self,
        model: &str,
        request: &PredictVideoRequest,
    ) -> Result<Operation, GenerationError> {
        let url = format!("{}/models/{model}:predictLongRunning", self.inner.base_url);
        self.post_json(&url, model, request).await
    }

    /// Fetch the current state of an operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip(self))]
    pub async fn get_operation(&self, name: &str) -> Result<Operation, GenerationError> {
        let url = format!("{}/{}", self.inner.base_url, name.trim_start_matches('/'));
        let response = self
            .inner
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GenerationError::from_transport(e, self.inner.timeout))?;
        self.handle_response(response, name).await
    }

    /// Download a generated file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns a non-success status.
    #[instrument(skip(self))]
    pub async fn download(&self, uri: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self
            .inner
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| GenerationError::from_transport(e, self.inner.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_status(status, response, uri).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::from_transport(e, self.inner.timeout))?;
        Ok(bytes.to_vec())
    }

    async fn post_json<B, R>(&self, url: &str, model: &str, body: &B) -> Result<R, GenerationError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::from_transport(e, self.inner.timeout))?;
        self.handle_response(response, model).await
    }

    /// Parse a successful response or convert the error status.
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        model: &str,
    ) -> Result<R, GenerationError> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| GenerationError::from_transport(e, self.inner.timeout))?;
            serde_json::from_str(&body)
                .map_err(|e| GenerationError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response, model).await)
        }
    }

    /// Map an error status to a typed error.
    async fn handle_error_status(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        model: &str,
    ) -> GenerationError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return GenerationError::RateLimited(retry_after);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return GenerationError::Unauthorized("API key rejected".to_string());
        }

        if status == StatusCode::NOT_FOUND {
            return GenerationError::ModelUnavailable(model.to_string());
        }

        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) if api_error.error.status == "RESOURCE_EXHAUSTED" => {
                    GenerationError::RateLimited(DEFAULT_RETRY_AFTER_SECS)
                }
                Ok(api_error) => GenerationError::Api {
                    status: if api_error.error.status.is_empty() {
                        status.as_u16().to_string()
                    } else {
                        api_error.error.status
                    },
                    message: api_error.error.message,
                },
                Err(_) => GenerationError::Api {
                    status: status.as_u16().to_string(),
                    message: body,
                },
            },
            Err(e) => GenerationError::from_transport(e, self.inner.timeout),
        }
    }
}
