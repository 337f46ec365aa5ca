//! Scene search request and response bodies for the imagery provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ImageryError, ImageryResult, Polygon, SceneId};

/// Largest page the provider accepts.
pub const MAX_SEARCH_LIMIT: u32 = 100;

const SEARCH_FIELDS: [&str; 5] = [
    "cloudCoverage",
    "sceneID",
    "date",
    "productID",
    "dataCoveragePercentage",
];
const SEARCH_SATELLITES: [&str; 3] = ["landsat9", "landsat8", "sentinel2l2a"];
const MAX_CLOUD_COVERAGE: u32 = 50;

/// Search body posted to the provider's scene search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSearchRequest {
    pub fields: Vec<String>,
    pub on_amazon: bool,
    pub page: u32,
    pub limit: u32,
    pub search: SearchCriteria,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub satellites: Vec<String>,
    pub date: SearchRange<NaiveDate>,
    pub cloud_coverage: SearchRange<u32>,
    pub shape: SearchShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRange<T> {
    pub from: T,
    pub to: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchShape {
    #[serde(rename = "type")]
    pub shape_type: &'static str,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl SceneSearchRequest {
    /// Scenes over the polygon's outer ring captured between `from` and `to`
    /// (inclusive) with at most 50% cloud cover.
    pub fn for_polygon(
        polygon: &Polygon,
        from: NaiveDate,
        to: NaiveDate,
        page: u32,
        limit: u32,
    ) -> ImageryResult<Self> {
        if from > to {
            return Err(ImageryError::InvalidSearch(format!(
                "date range starts after it ends ({} > {})",
                from, to
            )));
        }
        if page == 0 {
            return Err(ImageryError::InvalidSearch("page numbers start at 1".to_string()));
        }
        if limit == 0 || limit > MAX_SEARCH_LIMIT {
            return Err(ImageryError::InvalidSearch(format!(
                "limit must be between 1 and {}",
                MAX_SEARCH_LIMIT
            )));
        }

        Ok(Self {
            fields: SEARCH_FIELDS.iter().map(|f| f.to_string()).collect(),
            on_amazon: true,
            page,
            limit,
            search: SearchCriteria {
                satellites: SEARCH_SATELLITES.iter().map(|s| s.to_string()).collect(),
                date: SearchRange { from, to },
                cloud_coverage: SearchRange {
                    from: 0,
                    to: MAX_CLOUD_COVERAGE,
                },
                shape: SearchShape {
                    shape_type: "Polygon",
                    coordinates: vec![polygon.outer_ring().to_vec()],
                },
            },
        })
    }
}

/// Provider search response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneSearchResponse {
    pub meta: SearchMeta,
    #[serde(default)]
    pub results: Vec<SatelliteImage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchMeta {
    pub found: u64,
    #[serde(default)]
    pub name: String,
    pub page: u32,
    pub limit: u32,
}

/// One scene from a search response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteImage {
    pub date: String,
    #[serde(rename = "sceneID")]
    pub scene_id: String,
    #[serde(default)]
    pub cloud_coverage: f64,
    #[serde(default)]
    pub satellite: Option<String>,
    #[serde(default)]
    pub data_coverage_percentage: Option<f64>,
}

impl SatelliteImage {
    pub fn scene(&self) -> ImageryResult<SceneId> {
        SceneId::parse(&self.scene_id)
    }
}
