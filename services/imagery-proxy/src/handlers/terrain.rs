//! Terrain tile and point elevation handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, rejection::QueryRejection, Extension, Path, Query},
    response::Response,
    Json,
};
use imagery_common::{
    build_point_elevation_request, build_terrain_request, AnalysisParameters, GeoPoint,
    HillshadeParameters, ImageryError, SlopeParameters, TileCoord,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::image_response;
use crate::error::ApiError;
use crate::metrics::record_terrain_request;
use crate::state::AppState;

/// Terrain render options. Unset values take the analysis defaults.
#[derive(Debug, Default, Deserialize)]
pub struct TerrainQuery {
    /// `hillshade` (default) or `slope`.
    pub format: Option<String>,
    pub azimuth: Option<f64>,
    pub altitude: Option<f64>,
    pub colormap: Option<String>,
    pub slope_min: Option<f64>,
    pub slope_max: Option<f64>,
}

impl TerrainQuery {
    pub fn to_parameters(&self) -> Result<AnalysisParameters, ImageryError> {
        match self.format.as_deref().unwrap_or("hillshade") {
            "hillshade" => {
                let defaults = HillshadeParameters::default();
                Ok(AnalysisParameters::Hillshade(HillshadeParameters {
                    azimuth: self.azimuth.unwrap_or(defaults.azimuth),
                    altitude: self.altitude.unwrap_or(defaults.altitude),
                }))
            }
            "slope" => {
                let defaults = SlopeParameters::default();
                Ok(AnalysisParameters::Slope(SlopeParameters {
                    min_degrees: self.slope_min.unwrap_or(defaults.min_degrees),
                    max_degrees: self.slope_max.unwrap_or(defaults.max_degrees),
                    colormap: self.colormap.clone().unwrap_or(defaults.colormap),
                }))
            }
            other => Err(ImageryError::UnsupportedAnalysis(format!(
                "unknown terrain format '{}'",
                other
            ))),
        }
    }
}

/// GET /api/terrain/:z/:x/:y
pub async fn terrain_tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    path: Result<Path<(u32, u32, u32)>, PathRejection>,
    query: Result<Query<TerrainQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Path((z, x, y)) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let params = query.to_parameters()?;
    record_terrain_request(params.kind());

    let tile = TileCoord::new(z, x, y);
    let request = build_terrain_request(&tile, &params)?;

    info!(
        tile = %tile.path_segment(),
        format = params.kind().as_str(),
        url = %request.relative_url(),
        "Fetching terrain tile"
    );

    let image = state.upstream.fetch_image(&request).await?;
    Ok(image_response(image))
}

#[derive(Debug, Serialize)]
pub struct PointElevation {
    pub lat: f64,
    pub lng: f64,
    /// Meters above sea level.
    pub elevation: f64,
}

/// GET /api/terrain/point/:lat/:lng
pub async fn point_elevation_handler(
    Extension(state): Extension<Arc<AppState>>,
    path: Result<Path<(f64, f64)>, PathRejection>,
) -> Result<Json<PointElevation>, ApiError> {
    let Path((lat, lng)) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = build_point_elevation_request(GeoPoint::new(lat, lng))?;

    let elevation = state.upstream.point_elevation(&request).await?;
    Ok(Json(PointElevation {
        lat,
        lng,
        elevation,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagery_common::AnalysisKind;

    #[test]
    fn test_default_query_is_hillshade() {
        let params = TerrainQuery::default().to_parameters().unwrap();
        assert_eq!(params, AnalysisParameters::default_for(AnalysisKind::Hillshade));
    }

    #[test]
    fn test_slope_query_overrides() {
        let query = TerrainQuery {
            format: Some("slope".to_string()),
            slope_max: Some(30.0),
            colormap: Some("viridis".to_string()),
            ..Default::default()
        };
        let params = query.to_parameters().unwrap();
        assert_eq!(
            params,
            AnalysisParameters::Slope(SlopeParameters {
                min_degrees: 0.0,
                max_degrees: 30.0,
                colormap: "viridis".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_format_rejected() {
        let query = TerrainQuery {
            format: Some("aspect".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.to_parameters(),
            Err(ImageryError::UnsupportedAnalysis(_))
        ));
    }
}
