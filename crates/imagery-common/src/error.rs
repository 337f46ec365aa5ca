//! Error types for the imagery resolution pipeline.

use thiserror::Error;

/// Result type alias using ImageryError.
pub type ImageryResult<T> = Result<T, ImageryError>;

/// Primary error type for geometry, tile, and scene resolution.
///
/// Every variant describes bad caller input. None of them is retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageryError {
    // === Geometry Errors ===
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    // === Tile Errors ===
    #[error("Latitude {0} is outside the Web Mercator range")]
    OutOfRangeLatitude(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("Zoom level {0} is not supported")]
    InvalidZoom(u32),

    #[error("Tile {z}/{x}/{y} is outside the tile matrix")]
    InvalidTile { z: u32, x: u32, y: u32 },

    // === Scene Errors ===
    #[error("Malformed scene identifier '{scene_id}': {reason}")]
    MalformedSceneIdentifier { scene_id: String, reason: String },

    // === Analysis Errors ===
    #[error("Invalid analysis parameter '{param}': {message}")]
    InvalidAnalysisParameter { param: String, message: String },

    #[error("Unsupported analysis: {0}")]
    UnsupportedAnalysis(String),

    // === Search Errors ===
    #[error("Invalid scene search: {0}")]
    InvalidSearch(String),
}

impl ImageryError {
    pub(crate) fn malformed_scene(scene_id: &str, reason: impl Into<String>) -> Self {
        ImageryError::MalformedSceneIdentifier {
            scene_id: scene_id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_param(param: &str, message: impl Into<String>) -> Self {
        ImageryError::InvalidAnalysisParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ImageryError::InvalidGeometry(_) => "InvalidGeometry",
            ImageryError::OutOfRangeLatitude(_) => "OutOfRangeLatitude",
            ImageryError::InvalidLongitude(_) => "InvalidLongitude",
            ImageryError::InvalidZoom(_) => "InvalidZoom",
            ImageryError::InvalidTile { .. } => "InvalidTile",
            ImageryError::MalformedSceneIdentifier { .. } => "MalformedSceneIdentifier",
            ImageryError::InvalidAnalysisParameter { .. } => "InvalidAnalysisParameter",
            ImageryError::UnsupportedAnalysis(_) => "UnsupportedAnalysis",
            ImageryError::InvalidSearch(_) => "InvalidSearch",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        // All variants are input errors.
        400
    }
}
