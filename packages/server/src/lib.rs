#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the engagement map dashboard.
//!
//! Serves filter options, filtered activity listings, the marker layer as
//! `GeoJSON`, and per-region counts for choropleth colouring. Every request
//! is evaluated against a single dataset snapshot; `POST /api/reload`
//! swaps in a freshly loaded table without interrupting readers.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use engagement_map_dashboard::Dashboard;

/// Shared application state.
pub struct AppState {
    /// The dashboard session every handler evaluates against.
    pub dashboard: Arc<Dashboard>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/activities", web::get().to(handlers::activities))
            .route(
                "/activities.geojson",
                web::get().to(handlers::activities_geojson),
            )
            .route("/regions", web::get().to(handlers::regions))
            .route("/reload", web::post().to(handlers::reload)),
    );
}

/// Starts the API server on the address given by `BIND_ADDR` and `PORT`
/// (default `127.0.0.1:8080`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(dashboard: Arc<Dashboard>) -> std::io::Result<()> {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    run_server_at(dashboard, bind_addr, port).await
}

/// Starts the API server on `bind_addr:port`.
///
/// This is a regular async function; the caller provides the runtime.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server_at(
    dashboard: Arc<Dashboard>,
    bind_addr: String,
    port: u16,
) -> std::io::Result<()> {
    let state = web::Data::new(AppState { dashboard });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
