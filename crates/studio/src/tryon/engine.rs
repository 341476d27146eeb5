//! Composition engines.
//!
//! Which engine runs is decided once at startup from configuration; the
//! rest of the studio only sees [`TryOnEngine`].

use std::time::Duration;

use tracing::warn;

use crate::gemini::{GeminiClient, GenerationError, Part};
use crate::media::DataUrl;

/// Produces a composite of a person photo and an item image.
#[derive(Debug, Clone)]
pub enum TryOnEngine {
    /// Hosted generative model.
    Gemini(GeminiClient),
    /// Demo mode: returns the person photo unchanged after a delay.
    Echo(EchoEngine),
}

/// Stand-in engine used when no API key is configured.
#[derive(Debug, Clone, Copy)]
pub struct EchoEngine {
    delay: Duration,
}

impl EchoEngine {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl TryOnEngine {
    /// Whether results come from a real model.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Gemini(_))
    }

    /// Compose `garment` onto `person` following `prompt`.
    ///
    /// # Errors
    ///
    /// Returns the client's `GenerationError`; the echo engine never fails.
    pub async fn compose(
        &self,
        person: &DataUrl,
        garment: &DataUrl,
        prompt: &str,
    ) -> Result<DataUrl, GenerationError> {
        match self {
            Self::Gemini(client) => {
                let parts = vec![
                    Part::inline(person.mime_type(), person.data()),
                    Part::inline(garment.mime_type(), garment.data()),
                    Part::text(prompt),
                ];
                let blob = client.generate_image(parts).await?;
                Ok(DataUrl::new(blob.mime_type, blob.data))
            }
            Self::Echo(echo) => {
                warn!("No generative API key configured, returning the photo unchanged");
                tokio::time::sleep(echo.delay).await;
                Ok(person.clone())
            }
        }
    }
}
