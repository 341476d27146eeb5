//! Image acquisition: data URLs, remote fetches and canvas-style transforms.

pub mod data_url;
pub mod fetch;
pub mod normalize;

use thiserror::Error;

pub use data_url::DataUrl;
pub use fetch::{ImageFetcher, sniff_mime};
pub use normalize::{downscale_to_fit, normalize_aspect_ratio, prepare_photo};

/// Errors from image handling.
///
/// Clone so fetch failures can be shared by the item image cache.
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    /// The string is not a `data:<mime>;base64,<payload>` URL.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// The remote image could not be fetched.
    #[error("failed to fetch image {url}: {message}")]
    Fetch { url: String, message: String },

    /// The remote image answered with an error status.
    #[error("image {url} returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    /// The bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Re-encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(String),
}
