//! `data:` URL encoding and decoding.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::MediaError;

const PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// A base64 payload with its MIME type.
///
/// Serializes as the full `data:<mime>;base64,<payload>` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataUrl {
    mime_type: String,
    data: String,
}

impl DataUrl {
    /// Wrap an already base64-encoded payload.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Encode raw bytes.
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    /// Split a data URL into MIME type and base64 payload.
    ///
    /// MIME parameters other than `base64` are dropped.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidDataUrl` if the prefix, the base64 marker,
    /// the MIME type or the payload is missing.
    pub fn parse(s: &str) -> Result<Self, MediaError> {
        let rest = s
            .trim()
            .strip_prefix(PREFIX)
            .ok_or_else(|| MediaError::InvalidDataUrl("missing data: prefix".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| MediaError::InvalidDataUrl("missing ',' separator".to_string()))?;
        if !header.ends_with(BASE64_MARKER) {
            return Err(MediaError::InvalidDataUrl(
                "only base64 payloads are supported".to_string(),
            ));
        }
        let mime_type = header.split(';').next().unwrap_or_default().trim();
        if mime_type.is_empty() {
            return Err(MediaError::InvalidDataUrl("missing MIME type".to_string()));
        }
        if payload.is_empty() {
            return Err(MediaError::InvalidDataUrl("empty payload".to_string()));
        }
        Ok(Self::new(mime_type, payload))
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Decode the payload.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidDataUrl` if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| MediaError::InvalidDataUrl(e.to_string()))
    }

    /// Whether the payload is an image.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}{BASE64_MARKER},{}", self.mime_type, self.data)
    }
}

impl FromStr for DataUrl {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DataUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
