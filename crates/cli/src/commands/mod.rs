//! CLI command implementations.

pub mod animate;
pub mod normalize;
pub mod try_on;

use std::path::{Path, PathBuf};

use lookbook_studio::config::ConfigError;
use lookbook_studio::gemini::GenerationError;
use lookbook_studio::media::{DataUrl, MediaError, sniff_mime};
use lookbook_studio::tryon::TryOnError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    TryOn(#[from] TryOnError),
}

/// Read an image file into a data URL, sniffing its type.
pub async fn read_image(path: &Path) -> Result<DataUrl, CommandError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(DataUrl::from_bytes(sniff_mime(&bytes), &bytes))
}

/// Write bytes, creating or truncating `path`.
pub async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CommandError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| CommandError::Write {
            path: path.to_path_buf(),
            source,
        })
}
