//! The result of a try-on run: a photo with a stack of applied items.

use lookbook_core::{CurrencyCode, Item, Price, PriceError};
use serde::Serialize;

use crate::media::DataUrl;

/// One applied item and the composite produced for it.
#[derive(Debug, Clone)]
struct Layer {
    item: Item,
    image: DataUrl,
}

/// Applied items on top of the original photo, with undo.
#[derive(Debug, Clone)]
pub struct TryOnSession {
    original: DataUrl,
    layers: Vec<Layer>,
}

impl TryOnSession {
    /// Start a session from the user's (prepared) photo.
    #[must_use]
    pub const fn new(original: DataUrl) -> Self {
        Self {
            original,
            layers: Vec::new(),
        }
    }

    /// The photo the session started from.
    #[must_use]
    pub const fn original(&self) -> &DataUrl {
        &self.original
    }

    /// The latest composite, or the original photo if nothing is applied.
    #[must_use]
    pub fn current_image(&self) -> &DataUrl {
        self.layers.last().map_or(&self.original, |layer| &layer.image)
    }

    /// Applied items, oldest first.
    #[must_use]
    pub fn applied_items(&self) -> Vec<Item> {
        self.layers.iter().map(|layer| layer.item.clone()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Record a new composite for `item`.
    pub fn apply(&mut self, item: Item, image: DataUrl) {
        self.layers.push(Layer { item, image });
    }

    /// Remove the last applied item. Undo on an empty session is a no-op.
    pub fn undo(&mut self) -> Option<Item> {
        self.layers.pop().map(|layer| layer.item)
    }

    /// Sum of the applied items' prices.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if applied items mix currencies.
    pub fn total(&self) -> Result<Price, PriceError> {
        let currency = self
            .layers
            .first()
            .map_or_else(CurrencyCode::default, |layer| layer.item.price.currency_code);
        Price::sum(currency, self.layers.iter().map(|layer| layer.item.price))
    }

    /// Snapshot for API responses.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the total cannot be computed.
    pub fn view(&self) -> Result<TryOnView, PriceError> {
        Ok(TryOnView {
            image: self.current_image().clone(),
            items: self.applied_items(),
            total: self.total()?,
        })
    }
}

/// Serializable snapshot of a session.
#[derive(Debug, Clone, Serialize)]
pub struct TryOnView {
    pub image: DataUrl,
    pub items: Vec<Item>,
    pub total: Price,
}
