//! Virtual try-on orchestration.
//!
//! A render takes the person image (the original photo, or the latest
//! composite when stacking items), fetches the item's image, builds the
//! instruction text and hands both images to the configured engine.

pub mod engine;
pub mod prompt;
pub mod session;

use lookbook_core::{Item, ItemId};
use thiserror::Error;
use tracing::{info, instrument};

use crate::gemini::GenerationError;
use crate::media::{DataUrl, ImageFetcher, MediaError};

pub use engine::{EchoEngine, TryOnEngine};
pub use prompt::{build_animation_prompt, build_try_on_prompt, is_beauty};
pub use session::{TryOnSession, TryOnView};

/// Errors from a try-on render.
#[derive(Debug, Error)]
pub enum TryOnError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The item is not flagged for try-on.
    #[error("item {0} cannot be tried on")]
    NotTryOnable(ItemId),

    /// The person image is not an image.
    #[error("expected an image, got {0}")]
    NotAnImage(String),
}

/// Runs single try-on renders.
#[derive(Debug, Clone)]
pub struct TryOnService {
    engine: TryOnEngine,
    fetcher: ImageFetcher,
}

impl TryOnService {
    #[must_use]
    pub const fn new(engine: TryOnEngine, fetcher: ImageFetcher) -> Self {
        Self { engine, fetcher }
    }

    #[must_use]
    pub const fn engine(&self) -> &TryOnEngine {
        &self.engine
    }

    /// Put `item` on the person in `person`.
    ///
    /// `worn` lists the items already visible in `person`.
    ///
    /// # Errors
    ///
    /// Returns `TryOnError` if the item cannot be tried on, its image cannot
    /// be fetched, or the engine fails.
    #[instrument(skip(self, person, worn), fields(item_id = %item.id, worn = worn.len()))]
    pub async fn render(
        &self,
        person: &DataUrl,
        item: &Item,
        worn: &[Item],
    ) -> Result<DataUrl, TryOnError> {
        if !item.try_on {
            return Err(TryOnError::NotTryOnable(item.id));
        }
        if !person.is_image() {
            return Err(TryOnError::NotAnImage(person.mime_type().to_string()));
        }

        let garment = self.fetcher.fetch(&item.image_url).await?;
        let prompt = build_try_on_prompt(item, worn);
        let composite = self.engine.compose(person, &garment, &prompt).await?;

        info!(live = self.engine.is_live(), "Try-on rendered");
        Ok(composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookbook_core::Price;
    use std::time::Duration;

    fn service() -> TryOnService {
        TryOnService::new(
            TryOnEngine::Echo(EchoEngine::new(Duration::ZERO)),
            ImageFetcher::new(None).expect("fetcher"),
        )
    }

    fn item(try_on: bool) -> Item {
        Item {
            id: ItemId::new(9),
            name: "Lenço".to_string(),
            price: Price::whole(300),
            image_url: "data:image/jpeg;base64,/9j/".to_string(),
            category: "accessories".to_string(),
            try_on,
        }
    }

    #[tokio::test]
    async fn test_render_in_demo_mode_echoes_person() {
        let person = DataUrl::new("image/png", "AAAA");
        let out = service().render(&person, &item(true), &[]).await.expect("render");
        assert_eq!(out, person);
    }

    #[tokio::test]
    async fn test_render_rejects_non_try_on_item() {
        let person = DataUrl::new("image/png", "AAAA");
        let err = service().render(&person, &item(false), &[]).await.unwrap_err();
        assert!(matches!(err, TryOnError::NotTryOnable(id) if id == ItemId::new(9)));
    }

    #[tokio::test]
    async fn test_render_rejects_non_image_person() {
        let person = DataUrl::new("video/mp4", "AAAA");
        let err = service().render(&person, &item(true), &[]).await.unwrap_err();
        assert!(matches!(err, TryOnError::NotAnImage(_)));
    }
}
