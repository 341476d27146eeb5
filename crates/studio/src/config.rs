//! Studio configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STUDIO_HOST` - Bind address (default: 127.0.0.1)
//! - `STUDIO_PORT` - Listen port (default: 3002)
//! - `GEMINI_API_KEY` - Generative API key. When unset the studio runs in demo mode
//!   and try-on echoes the submitted photo.
//! - `GEMINI_API_BASE` - API base URL (default: <https://generativelanguage.googleapis.com/v1beta>)
//! - `GEMINI_IMAGE_MODEL` - Image model (default: gemini-2.5-flash-image)
//! - `GEMINI_VIDEO_MODELS` - Comma-separated video models, tried in order
//! - `GEMINI_TIMEOUT_SECS` - Per-request timeout (default: 120)
//! - `DEMO_DELAY_MS` - Artificial latency of demo try-ons (default: 1500)
//! - `IMAGE_PROXY_URL` - Relay prefix for fetching item images
//! - `CATALOG_PATH` - JSON file replacing the built-in catalog
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE` - Sentry
//!   tuning; rates must lie in 0.0..=1.0
//!
//! ## Optional (hosted backend - enables profile lookup at login)
//! - `BACKEND_URL` - Backend project URL (must be `https://`)
//! - `BACKEND_ANON_KEY` - Backend anonymous key

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_VIDEO_MODELS: &[&str] = &[
    "veo-3.0-fast-generate-001",
    "veo-3.0-generate-001",
    "veo-2.0-generate-001",
];
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_DEMO_DELAY_MS: u64 = 1500;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Studio application configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Generative API configuration (`None` runs in demo mode)
    pub gemini: Option<GeminiConfig>,
    /// Latency of demo-mode try-ons
    pub demo_delay: Duration,
    /// Relay prefix for item image fetches
    pub image_proxy: Option<String>,
    /// Catalog file replacing the built-in seed catalog
    pub catalog_path: Option<PathBuf>,
    /// Hosted backend settings, validated at startup
    pub backend: BackendSettings,
    /// Error tracking
    pub sentry: SentrySettings,
}

impl Default for StudioConfig {
    /// Local demo configuration: no API keys, no backend, no artificial delay.
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3002,
            gemini: None,
            demo_delay: Duration::ZERO,
            image_proxy: None,
            catalog_path: None,
            backend: BackendSettings::default(),
            sentry: SentrySettings::default(),
        }
    }
}

/// Generative API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: SecretString,
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Model used for try-on image composition
    pub image_model: String,
    /// Video models in fallback order
    pub video_models: Vec<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("video_models", &self.video_models)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Configuration with default models for the given key.
    #[must_use]
    pub fn with_api_key(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_GEMINI_API_BASE.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            video_models: DEFAULT_VIDEO_MODELS.iter().map(ToString::to_string).collect(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load from environment.
    ///
    /// Returns `None` if `GEMINI_API_KEY` is not set (demo mode).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if optional tuning variables are malformed.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(key) = get_optional_env("GEMINI_API_KEY") else {
            return Ok(None);
        };
        if let Err(e) = validate_secret_strength(&key, "GEMINI_API_KEY") {
            tracing::warn!("GEMINI_API_KEY validation warning: {e}");
        }

        let mut config = Self::with_api_key(SecretString::from(key));
        config.base_url = get_env_or_default("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE)
            .trim_end_matches('/')
            .to_string();
        config.image_model = get_env_or_default("GEMINI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL);
        if let Some(models) = get_optional_env("GEMINI_VIDEO_MODELS") {
            config.video_models = parse_model_list(&models)
                .ok_or_else(|| invalid("GEMINI_VIDEO_MODELS", "must name at least one model"))?;
        }
        config.timeout = Duration::from_secs(parse_env_or(
            "GEMINI_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);
        Ok(Some(config))
    }

    /// Load from environment, requiring an API key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `GEMINI_API_KEY` is not set.
    pub fn require_from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_env()?.ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))
    }
}

/// Raw hosted backend settings.
///
/// Whether these describe a usable backend is decided by
/// [`BackendCapability::detect`](crate::backend::BackendCapability::detect).
#[derive(Clone, Default)]
pub struct BackendSettings {
    pub url: Option<String>,
    pub anon_key: Option<SecretString>,
}

impl std::fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSettings")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl BackendSettings {
    fn from_env() -> Self {
        Self {
            url: get_optional_env("BACKEND_URL"),
            anon_key: get_optional_env("BACKEND_ANON_KEY").map(SecretString::from),
        }
    }
}

/// Error tracking settings. Sentry stays off without a DSN.
#[derive(Debug, Clone, PartialEq)]
pub struct SentrySettings {
    pub dsn: Option<String>,
    /// e.g. "development", "production"
    pub environment: Option<String>,
    /// Share of errors reported, 0.0 to 1.0
    pub sample_rate: f32,
    /// Share of requests traced, 0.0 to 1.0
    pub traces_sample_rate: f32,
}

impl Default for SentrySettings {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 1.0,
        }
    }
}

impl SentrySettings {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sample_rate: parse_rate("SENTRY_SAMPLE_RATE")?,
            traces_sample_rate: parse_rate("SENTRY_TRACES_SAMPLE_RATE")?,
        })
    }
}

impl StudioConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STUDIO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("STUDIO_HOST", e))?;
        let port = parse_env_or("STUDIO_PORT", 3002_u16)?;
        let gemini = GeminiConfig::from_env()?;
        let demo_delay =
            Duration::from_millis(parse_env_or("DEMO_DELAY_MS", DEFAULT_DEMO_DELAY_MS)?);
        let image_proxy = get_optional_env("IMAGE_PROXY_URL");
        let catalog_path = get_optional_env("CATALOG_PATH").map(PathBuf::from);

        Ok(Self {
            host,
            port,
            gemini,
            demo_delay,
            image_proxy,
            catalog_path,
            backend: BackendSettings::from_env(),
            sentry: SentrySettings::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns a reference to the generative API configuration, if any.
    #[must_use]
    pub const fn gemini(&self) -> Option<&GeminiConfig> {
        self.gemini.as_ref()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim().parse::<T>().map_err(|e| invalid(key, e))
    })
}

/// Parse a sample rate, defaulting to 1.0.
fn parse_rate(key: &str) -> Result<f32, ConfigError> {
    let rate = parse_env_or(key, 1.0_f32)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(invalid(key, format!("{rate} is outside 0.0..=1.0")))
    }
}

/// Split a comma-separated model list, dropping blanks.
fn parse_model_list(raw: &str) -> Option<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
        .collect();
    (!models.is_empty()).then_some(models)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}
