//! Integration test harness for the Lookbook studio.
//!
//! [`TestServer`] runs the real router on a random local port so tests talk
//! to it over HTTP, the same way the browser client does.
//!
//! ```bash
//! cargo test -p lookbook-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::time::Duration;

use image::{DynamicImage, Rgb, RgbImage};
use lookbook_studio::backend::{BackendCapability, BackendUnavailable};
use lookbook_studio::capabilities::Capabilities;
use lookbook_studio::config::{GeminiConfig, StudioConfig};
use lookbook_studio::media::normalize::encode_png;
use lookbook_studio::media::{DataUrl, ImageFetcher};
use lookbook_studio::state::AppState;
use lookbook_studio::store::Catalog;
use lookbook_studio::tryon::{EchoEngine, TryOnEngine};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running studio bound to `127.0.0.1`.
pub struct TestServer {
    addr: SocketAddr,
    client: reqwest::Client,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a studio in demo mode over `catalog`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn demo(catalog: Catalog) -> Self {
        Self::demo_with_delay(catalog, Duration::ZERO).await
    }

    /// Demo mode where every try-on takes `delay`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn demo_with_delay(catalog: Catalog, delay: Duration) -> Self {
        let capabilities = Capabilities {
            engine: TryOnEngine::Echo(EchoEngine::new(delay)),
            video: None,
            backend: BackendCapability::Unavailable(BackendUnavailable::NotConfigured),
        };
        Self::start(StudioConfig::default(), catalog, capabilities).await
    }

    /// Start a studio whose generative API lives at `api_base`.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built or the listener cannot be bound.
    pub async fn live(catalog: Catalog, api_base: &str) -> Self {
        let mut gemini = GeminiConfig::with_api_key(SecretString::from("AIzaSy-integration-7d2e91"));
        gemini.base_url = api_base.trim_end_matches('/').to_string();
        gemini.timeout = Duration::from_secs(5);
        let config = StudioConfig {
            gemini: Some(gemini),
            ..StudioConfig::default()
        };
        let capabilities = Capabilities::detect(&config).expect("capabilities");
        Self::start(config, catalog, capabilities).await
    }

    async fn start(config: StudioConfig, catalog: Catalog, capabilities: Capabilities) -> Self {
        let fetcher = ImageFetcher::new(None).expect("fetcher");
        let state = AppState::from_parts(config, catalog, capabilities, fetcher);
        let app = lookbook_studio::app(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("failed to bind");
        let addr = listener.local_addr().expect("failed to get local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        Self {
            addr,
            client: reqwest::Client::new(),
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `GET` a path, returning the status and JSON body (`Null` if empty).
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> (u16, Value) {
        let response = self.client.get(self.url(path)).send().await.expect("send");
        read(response).await
    }

    /// `POST` a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("send");
        read(response).await
    }

    /// `DELETE` a path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn delete(&self, path: &str) -> (u16, Value) {
        let response = self.client.delete(self.url(path)).send().await.expect("send");
        read(response).await
    }

    /// Log in with the given account type.
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn login(&self, name: &str, account_type: &str) {
        let (status, body) = self
            .post(
                "/api/session",
                json!({"display_name": name, "account_type": account_type}),
            )
            .await;
        assert_eq!(status, 201, "login failed: {body}");
    }

    /// Stop the server and wait for it to drain.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

async fn read(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let value = response.json().await.unwrap_or(Value::Null);
    (status, value)
}

/// A solid-colour PNG.
///
/// # Panics
///
/// Panics if encoding fails.
#[must_use]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 90, 160])));
    encode_png(&img).expect("encode")
}

/// [`png_bytes`] as a data URL.
#[must_use]
pub fn png_data_url(width: u32, height: u32) -> DataUrl {
    DataUrl::from_bytes("image/png", &png_bytes(width, height))
}

/// A small catalog whose item images all resolve to `image_url`.
///
/// Items: 1 dress (15000), 2 blazer (7500), 3 lipstick (120), 4 perfume
/// (300, not try-on-able).
///
/// # Panics
///
/// Panics if the fixture fails to parse.
#[must_use]
pub fn catalog(image_url: &str) -> Catalog {
    Catalog::from_json(
        &json!([
            {"id": 1, "name": "Vestido de Gala LV", "price": {"amount": "15000"},
             "image_url": image_url, "category": "dresses"},
            {"id": 2, "name": "Blazer Alfaiataria Off-White", "price": {"amount": "7500"},
             "image_url": image_url, "category": "tops"},
            {"id": 3, "name": "Batom Vermelho", "price": {"amount": "120"},
             "image_url": image_url, "category": "makeup"},
            {"id": 4, "name": "Perfume", "price": {"amount": "300"},
             "image_url": image_url, "category": "fragrance", "try_on": false}
        ])
        .to_string(),
    )
    .expect("catalog")
}
