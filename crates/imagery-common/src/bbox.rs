//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// `x` is longitude and `y` is latitude. Serialises to the GeoJSON
/// `[minLng, minLat, maxLng, maxLat]` ordering via [`BoundingBox::to_array`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every `[lng, lat]` pair, or `None` for an empty slice.
    pub fn from_positions(positions: &[[f64; 2]]) -> Option<Self> {
        let first = positions.first()?;
        let init = BoundingBox::new(first[0], first[1], first[0], first[1]);

        Some(positions.iter().skip(1).fold(init, |bbox, p| BoundingBox {
            min_x: bbox.min_x.min(p[0]),
            min_y: bbox.min_y.min(p[1]),
            max_x: bbox.max_x.max(p[0]),
            max_y: bbox.max_y.max(p[1]),
        }))
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bbox (edges inclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// `[minLng, minLat, maxLng, maxLat]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_x, self.min_y, self.max_x, self.max_y]
    }
}
