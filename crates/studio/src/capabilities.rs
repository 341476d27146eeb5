//! Startup capability detection.
//!
//! Optional integrations are resolved once from configuration into concrete
//! values. Handlers never check for missing keys; a missing API key means the
//! demo engine was chosen here.

use serde::Serialize;
use tracing::{info, warn};

use crate::backend::BackendCapability;
use crate::config::StudioConfig;
use crate::gemini::{GeminiClient, GenerationError, VideoGenerator};
use crate::tryon::{EchoEngine, TryOnEngine};

/// Resolved integrations.
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub engine: TryOnEngine,
    pub video: Option<VideoGenerator>,
    pub backend: BackendCapability,
}

/// What the running studio can do, for `/api/capabilities`.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    /// `live` or `demo`.
    pub try_on: &'static str,
    pub image_model: Option<String>,
    pub animation: bool,
    pub video_models: Vec<String>,
    pub backend: bool,
    pub backend_reason: Option<String>,
}

impl Capabilities {
    /// Resolve integrations from `config`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if an API key is configured but the client
    /// cannot be built from it.
    pub fn detect(config: &StudioConfig) -> Result<Self, GenerationError> {
        let backend = BackendCapability::detect(&config.backend);

        let Some(gemini) = config.gemini() else {
            warn!(
                delay_ms = config.demo_delay.as_millis(),
                "GEMINI_API_KEY not set, try-on runs in demo mode"
            );
            return Ok(Self {
                engine: TryOnEngine::Echo(EchoEngine::new(config.demo_delay)),
                video: None,
                backend,
            });
        };

        let client = GeminiClient::new(gemini)?;
        info!(
            image_model = %client.image_model(),
            video_models = client.video_models().len(),
            "Generative API enabled"
        );
        Ok(Self {
            engine: TryOnEngine::Gemini(client.clone()),
            video: Some(VideoGenerator::new(client)),
            backend,
        })
    }

    #[must_use]
    pub fn report(&self) -> CapabilityReport {
        let image_model = match &self.engine {
            TryOnEngine::Gemini(client) => Some(client.image_model().to_string()),
            TryOnEngine::Echo(_) => None,
        };
        CapabilityReport {
            try_on: if self.engine.is_live() { "live" } else { "demo" },
            image_model,
            animation: self.video.is_some(),
            video_models: self
                .video
                .as_ref()
                .map(|v| v.models().to_vec())
                .unwrap_or_default(),
            backend: self.backend.is_available(),
            backend_reason: match &self.backend {
                BackendCapability::Available(_) => None,
                BackendCapability::Unavailable(reason) => Some(reason.to_string()),
            },
        }
    }
}
