//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::backend::BackendCapability;
use crate::capabilities::{Capabilities, CapabilityReport};
use crate::config::StudioConfig;
use crate::gemini::{GenerationError, VideoGenerator};
use crate::media::{ImageFetcher, MediaError};
use crate::store::{Catalog, CatalogError, Store};
use crate::tryon::TryOnService;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("generative API: {0}")]
    Generation(#[from] GenerationError),
    #[error("image fetcher: {0}")]
    Media(#[from] MediaError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. All mutable data lives in the
/// single [`Store`] behind `store()`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StudioConfig,
    store: RwLock<Store>,
    try_on: TryOnService,
    video: Option<VideoGenerator>,
    backend: BackendCapability,
    report: CapabilityReport,
}

impl AppState {
    /// Build state from configuration: load the catalog and detect
    /// integrations.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the catalog cannot be loaded or a configured
    /// client cannot be built.
    pub fn new(config: StudioConfig) -> Result<Self, StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::seed()?,
        };
        let capabilities = Capabilities::detect(&config)?;
        let fetcher = ImageFetcher::new(config.image_proxy.clone())?;
        Ok(Self::from_parts(config, catalog, capabilities, fetcher))
    }

    /// Assemble state from already-resolved parts.
    #[must_use]
    pub fn from_parts(
        config: StudioConfig,
        catalog: Catalog,
        capabilities: Capabilities,
        fetcher: ImageFetcher,
    ) -> Self {
        let report = capabilities.report();
        let Capabilities {
            engine,
            video,
            backend,
        } = capabilities;

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store: RwLock::new(Store::new(catalog)),
                try_on: TryOnService::new(engine, fetcher),
                video,
                backend,
                report,
            }),
        }
    }

    /// Get a reference to the studio configuration.
    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.inner.config
    }

    /// The lock-guarded store.
    #[must_use]
    pub fn store(&self) -> &RwLock<Store> {
        &self.inner.store
    }

    #[must_use]
    pub fn try_on(&self) -> &TryOnService {
        &self.inner.try_on
    }

    /// The animation generator, when an API key is configured.
    #[must_use]
    pub fn video(&self) -> Option<&VideoGenerator> {
        self.inner.video.as_ref()
    }

    #[must_use]
    pub fn backend(&self) -> &BackendCapability {
        &self.inner.backend
    }

    #[must_use]
    pub fn capabilities(&self) -> &CapabilityReport {
        &self.inner.report
    }
}
