//! Render request assembly for scene imagery and terrain.
//!
//! Everything here produces paths relative to the provider's render base
//! URL; the HTTP layer adds the base and credentials.

use serde::{Deserialize, Serialize};

use crate::{
    AnalysisParameters, GeoPoint, ImageryConfig, ImageryError, ImageryResult, LandsatFamily,
    NdviParameters, NdviRenderOptions, SceneId, TileCoord,
};

const NATURAL_BANDS: &str = "B04,B03,B02";
const NDVI_BANDS: &str = "NDVI";

/// Imagery product rendered for a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageryProduct {
    /// True colour (red, green, blue).
    Natural,
    Ndvi,
}

impl ImageryProduct {
    pub fn band_set(&self) -> &'static str {
        match self {
            ImageryProduct::Natural => NATURAL_BANDS,
            ImageryProduct::Ndvi => NDVI_BANDS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageryProduct::Natural => "natural",
            ImageryProduct::Ndvi => "ndvi",
        }
    }
}

/// Resolved path for one scene tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageryPath {
    pub path: String,
    pub is_sentinel: bool,
}

impl SceneId {
    /// Provider path for `product` at `tile`.
    ///
    /// Natural-colour Landsat always uses the `L8` token; NDVI distinguishes
    /// Landsat 8 from 9.
    pub fn imagery_path(&self, product: ImageryProduct, tile: &TileCoord) -> String {
        let prefix = match (self, product) {
            (SceneId::Sentinel2(s2), _) => s2.path_prefix(),
            (SceneId::Landsat(l), ImageryProduct::Natural) => {
                format!("{}/{}", LandsatFamily::Landsat8.token(), l.as_str())
            }
            (SceneId::Landsat(l), ImageryProduct::Ndvi) => {
                format!("{}/{}", l.family.token(), l.as_str())
            }
        };

        format!("{}/{}/{}", prefix, product.band_set(), tile.path_segment())
    }
}

/// Parse `scene_id` and build its imagery path.
pub fn resolve_imagery_path(
    scene_id: &str,
    product: ImageryProduct,
    tile: &TileCoord,
) -> ImageryResult<ImageryPath> {
    let scene = SceneId::parse(scene_id)?;
    Ok(ImageryPath {
        path: scene.imagery_path(product, tile),
        is_sentinel: scene.is_sentinel(),
    })
}

/// Where a render request is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestSource {
    Sentinel2,
    Landsat(LandsatFamily),
    Terrain,
}

/// A render request relative to the provider base URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageryRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub source: RequestSource,
}

impl ImageryRequest {
    pub fn is_sentinel(&self) -> bool {
        self.source == RequestSource::Sentinel2
    }

    /// `path?key=value&...`
    ///
    /// Query values are restricted to URL-safe characters by the builders,
    /// so no escaping is applied.
    pub fn relative_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    /// Absolute URL under the configured render base. Credentials are not included.
    pub fn url(&self, config: &ImageryConfig) -> String {
        format!("{}/{}", config.render_base(), self.relative_url())
    }
}

/// Build the full render request for a scene tile.
///
/// NDVI requests carry the calibration and clustering options plus the
/// caller's threshold when one is given. Natural-colour requests carry no
/// query parameters.
pub fn build_imagery_request(
    scene_id: &str,
    product: ImageryProduct,
    tile: &TileCoord,
    options: &NdviRenderOptions,
    ndvi: Option<&NdviParameters>,
) -> ImageryResult<ImageryRequest> {
    let scene = SceneId::parse(scene_id)?;
    tile.validate()?;

    let query = match product {
        ImageryProduct::Natural => Vec::new(),
        ImageryProduct::Ndvi => {
            let mut query = options.query_pairs();
            if let Some(params) = ndvi {
                let params = AnalysisParameters::Ndvi(params.clone());
                params.validate()?;
                query.extend(params.query_pairs());
            }
            query
        }
    };

    let source = match &scene {
        SceneId::Sentinel2(_) => RequestSource::Sentinel2,
        SceneId::Landsat(l) => RequestSource::Landsat(l.family),
    };

    Ok(ImageryRequest {
        path: scene.imagery_path(product, tile),
        query,
        source,
    })
}

/// Build a terrain render request (`terrain/{z}/{x}/{y}`).
pub fn build_terrain_request(
    tile: &TileCoord,
    params: &AnalysisParameters,
) -> ImageryResult<ImageryRequest> {
    if let AnalysisParameters::Ndvi(_) = params {
        return Err(ImageryError::UnsupportedAnalysis(
            "ndvi is not a terrain format".to_string(),
        ));
    }
    params.validate()?;
    tile.validate()?;

    Ok(ImageryRequest {
        path: format!("terrain/{}", tile.path_segment()),
        query: params.query_pairs(),
        source: RequestSource::Terrain,
    })
}

/// Build a point elevation request (`terrain/point/{lat}/{lng}`).
pub fn build_point_elevation_request(point: GeoPoint) -> ImageryResult<ImageryRequest> {
    if !point.lat.is_finite() || point.lat.abs() > 90.0 {
        return Err(ImageryError::OutOfRangeLatitude(point.lat));
    }
    if !point.lng.is_finite() || point.lng.abs() > 180.0 {
        return Err(ImageryError::InvalidLongitude(point.lng));
    }

    Ok(ImageryRequest {
        path: format!("terrain/point/{}/{}", point.lat, point.lng),
        query: Vec::new(),
        source: RequestSource::Terrain,
    })
}
