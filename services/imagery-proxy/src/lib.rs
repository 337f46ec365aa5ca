//! Imagery Proxy Service Library
//!
//! HTTP front for the imagery provider: resolves field geometries and scene
//! identifiers into render requests, forwards them with the server-side API
//! key, and exposes a pure resolution endpoint for clients that only need
//! the computed tile and path.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod state;
pub mod upstream;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the service router with its middleware stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Scene imagery
        .route(
            "/api/satellite/natural/:scene_id",
            get(handlers::satellite::natural_handler),
        )
        .route(
            "/api/satellite/ndvi/:scene_id",
            get(handlers::satellite::ndvi_handler),
        )
        .route(
            "/api/satellite/search",
            post(handlers::satellite::search_handler),
        )
        // Terrain
        .route(
            "/api/terrain/point/:lat/:lng",
            get(handlers::terrain::point_elevation_handler),
        )
        .route(
            "/api/terrain/:z/:x/:y",
            get(handlers::terrain::terrain_tile_handler),
        )
        // Pure resolution
        .route(
            "/api/imagery/resolve",
            post(handlers::pipeline::resolve_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
