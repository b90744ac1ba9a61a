//! # camrelay: image relay to Telegram
//!
//! `camrelay` is a small HTTP relay. It accepts a base64-encoded camera image and a
//! destination chat identifier on `POST /api/send-image`, writes the image to a uniquely
//! named scratch file, forwards it to the Telegram Bot API as a photo attachment with a
//! timestamped caption, and reports the outcome as a JSON envelope
//! (`{"success": bool, ...}`). The scratch file is removed on every exit path.
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum); the embedded
//! capture page is served from [`static_assets`] for any unmatched path, and
//! `GET /api/health` answers liveness checks.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use camrelay::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = camrelay::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize structured logging
//!     camrelay::telemetry::init_telemetry()?;
//!
//!     // Create and start the application
//!     let app = Application::new(config).await?;
//!
//!     // Run with graceful shutdown on Ctrl+C
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options. The Telegram bot token is the
//! only value without a usable default; set it via `TELEGRAM_BOT_TOKEN`.

pub mod api;
pub mod config;
pub mod errors;
mod scratch;
mod static_assets;
pub mod telegram;
pub mod telemetry;

#[cfg(test)]
pub mod test_utils;

use axum::{
    Json, Router, http,
    http::HeaderValue,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};

pub use config::Config;
use config::CorsOrigin;
use telegram::TelegramClient;

/// Application state shared across all request handlers.
///
/// Provider configuration lives here as an explicit, startup-constructed object -
/// there is no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub telegram: TelegramClient,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    // A wildcard cannot be mixed into an origin list; it switches the whole
    // layer to allow-any. Config validation already forbids wildcard with
    // credentials.
    let has_wildcard = config
        .cors
        .allowed_origins
        .iter()
        .any(|origin| matches!(origin, CorsOrigin::Wildcard));

    let allow_origin = if has_wildcard {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &config.cors.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.as_str().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(config.cors.allow_credentials)
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([http::header::CONTENT_TYPE]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// - `POST /api/send-image`: the relay endpoint
/// - `GET /api/health`: liveness check
/// - fallback: embedded capture page
/// - CORS from config, plus tracing middleware
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/api/health", get(|| async { Json(serde_json::json!({"status": "healthy"})) }))
        .route("/api/send-image", post(api::handlers::images::send_image))
        .with_state(state)
        .fallback(get(api::handlers::static_assets::serve_embedded_asset))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns all resources and lifecycle.
///
/// 1. **Create**: [`Application::new`] validates resources, ensures the scratch
///    directory exists, and builds the router.
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles requests
///    until the shutdown future resolves.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting image relay with configuration: {:#?}", config);

        // Scratch directory for per-request image files, like the static
        // directory, must exist before the first request
        tokio::fs::create_dir_all(&config.storage.temp_dir).await?;

        let telegram = TelegramClient::new(&config.telegram)?;
        let state = AppState {
            config: config.clone(),
            telegram,
        };

        let router = build_router(state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Image relay listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
