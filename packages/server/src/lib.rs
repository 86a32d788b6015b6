#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web webhook receiver for the dispatch map connector.
//!
//! Accepts pushed dispatch notifications at `POST /{webhook_id}` and
//! acknowledges them. Payloads are logged, never turned into features;
//! the polling pipeline remains the only producer of map features.

mod handlers;

use actix_web::{App, HttpServer, middleware, web};

/// Default address the server binds to when `BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port the server listens on when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    /// Log every webhook payload at `info` level.
    pub debug: bool,
}

/// Registers the server's routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/{webhook_id}", web::post().to(handlers::webhook));
}

/// Reads the bind address and port from `BIND_ADDR` and `PORT`.
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    (bind_addr, port)
}

/// Starts the webhook server.
///
/// The caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`) and for initializing logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server(debug: bool) -> std::io::Result<()> {
    let state = web::Data::new(AppState { debug });
    let (bind_addr, port) = bind_from_env();

    log::info!("Starting webhook server on {bind_addr}:{port} (debug={debug})");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
