//! Lookbook Studio library.
//!
//! Virtual try-on orchestration, look animation, the screen navigator and
//! the in-memory store behind the studio API. The `lookbook-studio` binary
//! serves [`app`]; the `lookbook` CLI uses the try-on pieces directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod gemini;
pub mod media;
pub mod navigation;
pub mod routes;
pub mod state;
pub mod store;
pub mod tryon;

use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Largest accepted request body; photos travel as data URLs.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Build the studio router with tracing, CORS and body limits.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
