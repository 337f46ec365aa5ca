//! Common types and utilities for field imagery resolution.
//!
//! A field polygon is reduced to a center point, the point is mapped to a
//! Web Mercator tile, and a scene identifier plus product is turned into a
//! provider render path for that tile.

pub mod analysis;
pub mod bbox;
pub mod config;
pub mod error;
pub mod geometry;
pub mod request;
pub mod scene;
pub mod search;
pub mod tile;

pub use analysis::{
    AnalysisKind, AnalysisParameters, Clustering, HillshadeParameters, NdviParameters,
    NdviRenderOptions, SlopeParameters,
};
pub use bbox::BoundingBox;
pub use config::ImageryConfig;
pub use error::{ImageryError, ImageryResult};
pub use geometry::{
    calculate_area_in_hectares, calculate_polygon_center, validate_polygon, GeoPoint, Geometry,
    Polygon,
};
pub use request::{
    build_imagery_request, build_point_elevation_request, build_terrain_request,
    resolve_imagery_path, ImageryPath, ImageryProduct, ImageryRequest, RequestSource,
};
pub use scene::{LandsatFamily, LandsatSceneId, SceneId, SentinelSceneId};
pub use search::{SatelliteImage, SceneSearchRequest, SceneSearchResponse};
pub use tile::{geo_point_to_tile, point_to_tile, TileCoord};
