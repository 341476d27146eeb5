//! Lookbook Studio - virtual try-on API.
//!
//! Serves the studio JSON API (port 3002 by default). Without
//! `GEMINI_API_KEY` try-ons run on the demo engine; without a backend
//! configuration logins create local profiles only.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;

use lookbook_studio::config::{SentrySettings, StudioConfig};
use lookbook_studio::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing::{Level, Metadata, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "lookbook_studio=info,tower_http=debug";

/// Start Sentry when a DSN is configured. The guard flushes on drop.
fn init_sentry(settings: &SentrySettings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.dsn.as_deref()?;
    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: settings.environment.clone().map(Cow::Owned),
            sample_rate: settings.sample_rate,
            traces_sample_rate: settings.traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// Warnings and errors become Sentry events, info and debug breadcrumbs.
fn sentry_event_filter(metadata: &Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        Level::ERROR | Level::WARN => sentry_tracing::EventFilter::Event,
        Level::INFO | Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

/// JSON logs on Fly.io, human-readable text elsewhere.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let structured = std::env::var_os("FLY_APP_NAME").is_some();
    let json = structured.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text = (!structured).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = StudioConfig::from_env().expect("Failed to load configuration");

    // Sentry has to exist before the tracing layer that feeds it.
    let _sentry = init_sentry(&config.sentry);
    init_tracing();
    if config.sentry.dsn.is_some() {
        info!(environment = ?config.sentry.environment, "Sentry initialized");
    }

    let addr = config.socket_addr();
    let state = AppState::new(config).expect("Failed to create application state");
    let report = state.capabilities();
    info!(
        try_on = report.try_on,
        image_model = ?report.image_model,
        animation = report.animation,
        backend = report.backend,
        backend_reason = ?report.backend_reason,
        "Capabilities resolved"
    );

    let app = lookbook_studio::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    info!(%addr, "Lookbook studio listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
