//! Web Mercator slippy-map tile addressing.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, GeoPoint, ImageryError, ImageryResult};

/// Latitude limit of the square Web Mercator world.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Deepest zoom level the resolver will address.
pub const MAX_ZOOM: u32 = 24;

/// A tile coordinate (z/x/y), top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Check that the zoom is supported and the indices fall inside its matrix.
    pub fn validate(&self) -> ImageryResult<()> {
        if self.z > MAX_ZOOM {
            return Err(ImageryError::InvalidZoom(self.z));
        }
        if self.x >= self.matrix_size() || self.y >= self.matrix_size() {
            return Err(ImageryError::InvalidTile {
                z: self.z,
                x: self.x,
                y: self.y,
            });
        }
        Ok(())
    }

    /// `z/x/y` path segment used by tile services.
    pub fn path_segment(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }

    /// Number of tiles along one axis at this zoom.
    pub fn matrix_size(&self) -> u32 {
        1u32 << self.z
    }

    /// Get the parent tile (zoom - 1).
    pub fn parent(&self) -> Option<TileCoord> {
        if self.z == 0 {
            return None;
        }
        Some(TileCoord {
            z: self.z - 1,
            x: self.x / 2,
            y: self.y / 2,
        })
    }

    /// Get the four children tiles (zoom + 1).
    pub fn children(&self) -> [TileCoord; 4] {
        let x = self.x * 2;
        let y = self.y * 2;
        let z = self.z + 1;
        [
            TileCoord { z, x, y },
            TileCoord { z, x: x + 1, y },
            TileCoord { z, x, y: y + 1 },
            TileCoord {
                z,
                x: x + 1,
                y: y + 1,
            },
        ]
    }

    /// Geographic extent of this tile.
    pub fn bounds(&self) -> BoundingBox {
        let n = self.matrix_size() as f64;

        let lon_min = self.x as f64 / n * 360.0 - 180.0;
        let lon_max = (self.x + 1) as f64 / n * 360.0 - 180.0;

        let lat_max = (PI * (1.0 - 2.0 * self.y as f64 / n)).sinh().atan().to_degrees();
        let lat_min = (PI * (1.0 - 2.0 * (self.y + 1) as f64 / n))
            .sinh()
            .atan()
            .to_degrees();

        BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
    }
}

/// Convert a WGS84 point to the Web Mercator tile containing it.
///
/// Latitudes beyond [`MAX_MERCATOR_LATITUDE`] are rejected rather than
/// producing NaN rows. Indices are clamped into `[0, 2^zoom - 1]`, which also
/// maps `lng = 180` onto the last column.
pub fn point_to_tile(lat: f64, lng: f64, zoom: u32) -> ImageryResult<TileCoord> {
    if !lat.is_finite() || lat.abs() > MAX_MERCATOR_LATITUDE {
        return Err(ImageryError::OutOfRangeLatitude(lat));
    }
    if !lng.is_finite() || lng.abs() > 180.0 {
        return Err(ImageryError::InvalidLongitude(lng));
    }
    if zoom > MAX_ZOOM {
        return Err(ImageryError::InvalidZoom(zoom));
    }

    let n = (1u64 << zoom) as f64;
    let lat_rad = lat.to_radians();

    let x = ((lng + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();

    Ok(TileCoord {
        z: zoom,
        x: clamp_index(x, n),
        y: clamp_index(y, n),
    })
}

/// [`point_to_tile`] for a [`GeoPoint`].
pub fn geo_point_to_tile(point: GeoPoint, zoom: u32) -> ImageryResult<TileCoord> {
    point_to_tile(point.lat, point.lng, zoom)
}

fn clamp_index(value: f64, n: f64) -> u32 {
    value.clamp(0.0, n - 1.0) as u32
}
