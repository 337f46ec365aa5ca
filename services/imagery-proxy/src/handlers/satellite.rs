//! Scene imagery and scene search handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query},
    response::Response,
    Json,
};
use chrono::NaiveDate;
use imagery_common::{
    build_imagery_request, ImageryProduct, NdviParameters, Polygon, SceneSearchRequest,
    TileCoord,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::image_response;
use crate::error::ApiError;
use crate::metrics::{record_imagery_request, record_scene_search};
use crate::state::AppState;

/// Tile address for scene imagery. Missing values fall back to `10/0/0`.
///
/// The scene endpoints address tiles directly, so the configured field zoom
/// (`IMAGERY_DEFAULT_ZOOM`) only applies to `/api/imagery/resolve`.
#[derive(Debug, Deserialize)]
pub struct SceneTileQuery {
    #[serde(default = "default_scene_zoom")]
    pub z: u32,
    #[serde(default)]
    pub x: u32,
    #[serde(default)]
    pub y: u32,
    /// NDVI only.
    pub threshold: Option<f64>,
}

fn default_scene_zoom() -> u32 {
    10
}

/// GET /api/satellite/natural/:scene_id
pub async fn natural_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(scene_id): Path<String>,
    query: Result<Query<SceneTileQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    scene_image(state, scene_id, ImageryProduct::Natural, query).await
}

/// GET /api/satellite/ndvi/:scene_id
pub async fn ndvi_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(scene_id): Path<String>,
    query: Result<Query<SceneTileQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    scene_image(state, scene_id, ImageryProduct::Ndvi, query).await
}

async fn scene_image(
    state: Arc<AppState>,
    scene_id: String,
    product: ImageryProduct,
    query: Result<Query<SceneTileQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    record_imagery_request(product);
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let tile = TileCoord::new(params.z, params.x, params.y);
    let ndvi = NdviParameters {
        threshold: params.threshold,
    };
    let request = build_imagery_request(
        &scene_id,
        product,
        &tile,
        &state.config.imagery.ndvi,
        Some(&ndvi),
    )?;

    info!(
        scene_id = %scene_id,
        product = product.as_str(),
        url = %request.relative_url(),
        "Fetching scene imagery"
    );

    let image = state.upstream.fetch_image(&request).await?;
    Ok(image_response(image))
}

/// Body of a scene search.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    /// Polygon rings of GeoJSON positions (`[lng, lat]`, optional altitude).
    pub coordinates: Vec<Vec<Vec<f64>>>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl SearchBody {
    pub fn to_request(&self) -> Result<SceneSearchRequest, ApiError> {
        let polygon = Polygon::from_positions(self.coordinates.clone())?;
        Ok(SceneSearchRequest::for_polygon(
            &polygon,
            self.date_from,
            self.date_to,
            self.page,
            self.limit,
        )?)
    }
}

/// POST /api/satellite/search
pub async fn search_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    record_scene_search();
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = body.to_request()?;

    info!(
        date_from = %body.date_from,
        date_to = %body.date_to,
        page = body.page,
        "Searching scenes"
    );

    let results = state.upstream.search(&request).await?;
    Ok(Json(results))
}
