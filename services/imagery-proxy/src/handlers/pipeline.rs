//! Field-to-tile resolution without provider I/O.
//!
//! Runs geometry reduction, tile resolution and scene path resolution in one
//! call so clients can build tile URLs themselves or debug a field.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use imagery_common::{
    build_imagery_request, geo_point_to_tile, GeoPoint, Geometry, ImageryConfig,
    ImageryProduct, ImageryResult, NdviParameters, Polygon, TileCoord,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::metrics::record_pipeline_resolution;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRequest {
    /// Field boundary; missing or invalid geometries use the fallback center.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    pub scene_id: String,
    #[serde(default = "default_product")]
    pub product: ImageryProduct,
    /// Defaults to the configured zoom.
    pub zoom: Option<u32>,
    pub threshold: Option<f64>,
}

fn default_product() -> ImageryProduct {
    ImageryProduct::Natural
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
    pub center: GeoPoint,
    pub used_fallback: bool,
    /// `[minLng, minLat, maxLng, maxLat]`, absent for invalid geometries.
    pub bbox: Option<[f64; 4]>,
    pub area_hectares: f64,
    pub tile: TileCoord,
    pub path: String,
    pub is_sentinel: bool,
    pub query: Vec<(String, String)>,
}

/// Reduce the field, pick its tile, and build the render request.
pub fn resolve_field_imagery(
    config: &ImageryConfig,
    request: &ResolveRequest,
) -> ImageryResult<ResolveResponse> {
    let polygon = request
        .geometry
        .as_ref()
        .and_then(|g| Polygon::try_from(g).ok());
    let used_fallback = polygon.is_none();
    let center = polygon
        .as_ref()
        .map_or(config.fallback_center, Polygon::center);
    let area_hectares = polygon.as_ref().map_or(0.0, Polygon::area_hectares);
    let bbox = polygon.as_ref().map(|p| p.bbox().to_array());

    let zoom = request.zoom.unwrap_or(config.default_zoom);
    let tile = geo_point_to_tile(center, zoom)?;

    let ndvi = NdviParameters {
        threshold: request.threshold,
    };
    let render = build_imagery_request(
        &request.scene_id,
        request.product,
        &tile,
        &config.ndvi,
        Some(&ndvi),
    )?;

    Ok(ResolveResponse {
        center,
        used_fallback,
        bbox,
        area_hectares,
        tile,
        is_sentinel: render.is_sentinel(),
        path: render.path,
        query: render.query,
    })
}

/// POST /api/imagery/resolve
pub async fn resolve_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let response = resolve_field_imagery(&state.config.imagery, &request)?;
    record_pipeline_resolution();

    tracing::debug!(
        scene_id = %request.scene_id,
        tile = %response.tile.path_segment(),
        used_fallback = response.used_fallback,
        "Resolved field imagery"
    );

    Ok(Json(response))
}
