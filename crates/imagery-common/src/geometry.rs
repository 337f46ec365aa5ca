//! Field geometry reduction: validation, centroid, bounding box, and area.
//!
//! Field boundaries arrive as GeoJSON-shaped data from form state or the
//! backend. [`Geometry`] mirrors that shape loosely; [`Polygon`] is the typed
//! form obtained after the shallow structural check.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, ImageryError, ImageryResult};

/// Approximate meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Untyped GeoJSON geometry as supplied by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl Geometry {
    /// Build a `"Polygon"` geometry from rings of `[lng, lat]` pairs.
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            geometry_type: "Polygon".to_string(),
            coordinates: serde_json::json!(rings),
        }
    }
}

/// A polygon whose outer ring is known to be non-empty.
///
/// Rings are sequences of `[lng, lat]` pairs. The outer ring is normally
/// closed (first position repeated at the end) but closure is only enforced
/// by [`Polygon::is_simple`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    rings: Vec<Vec<[f64; 2]>>,
}

impl Polygon {
    pub fn new(rings: Vec<Vec<[f64; 2]>>) -> ImageryResult<Self> {
        let outer = rings
            .first()
            .ok_or_else(|| ImageryError::InvalidGeometry("polygon has no rings".to_string()))?;

        if outer.is_empty() {
            return Err(ImageryError::InvalidGeometry(
                "outer ring is empty".to_string(),
            ));
        }

        if rings
            .iter()
            .flatten()
            .any(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(ImageryError::InvalidGeometry(
                "coordinates must be finite numbers".to_string(),
            ));
        }

        Ok(Self { rings })
    }

    /// Build from GeoJSON positions of any arity.
    ///
    /// Each position needs at least `[lng, lat]`; altitude and further
    /// values are dropped.
    pub fn from_positions(rings: Vec<Vec<Vec<f64>>>) -> ImageryResult<Self> {
        let rings = rings
            .into_iter()
            .map(|ring| {
                ring.into_iter()
                    .map(|position| match position.as_slice() {
                        [lng, lat, ..] => Ok([*lng, *lat]),
                        _ => Err(ImageryError::InvalidGeometry(format!(
                            "position needs at least 2 values, found {}",
                            position.len()
                        ))),
                    })
                    .collect::<ImageryResult<Vec<_>>>()
            })
            .collect::<ImageryResult<Vec<_>>>()?;

        Polygon::new(rings)
    }

    pub fn outer_ring(&self) -> &[[f64; 2]] {
        &self.rings[0]
    }

    pub fn rings(&self) -> &[Vec<[f64; 2]>] {
        &self.rings
    }

    /// Arithmetic mean of every outer-ring entry.
    ///
    /// The closing position is counted like any other entry, so the first
    /// vertex of a closed ring carries double weight.
    pub fn center(&self) -> GeoPoint {
        let ring = self.outer_ring();
        let (sum_lng, sum_lat) = ring
            .iter()
            .fold((0.0, 0.0), |(lng, lat), p| (lng + p[0], lat + p[1]));
        let n = ring.len() as f64;

        GeoPoint::new(sum_lat / n, sum_lng / n)
    }

    pub fn bbox(&self) -> BoundingBox {
        // Outer ring is non-empty by construction.
        BoundingBox::from_positions(self.outer_ring())
            .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Planar shoelace area of the outer ring in square degrees.
    pub fn shoelace_area(&self) -> f64 {
        let ring = self.outer_ring();
        let n = ring.len();

        let twice_area: f64 = (0..n)
            .map(|i| {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                a[0] * b[1] - b[0] * a[1]
            })
            .sum();

        twice_area.abs() / 2.0
    }

    /// Approximate area in hectares.
    ///
    /// Equirectangular approximation around the centroid latitude. Only
    /// meaningful for field-sized polygons away from the poles.
    pub fn area_hectares(&self) -> f64 {
        let lat_factor = METERS_PER_DEGREE;
        let lng_factor = METERS_PER_DEGREE * self.center().lat.to_radians().cos();

        self.shoelace_area() * lat_factor * lng_factor / SQUARE_METERS_PER_HECTARE
    }

    /// Strict ring check: closed, at least four positions, and no two
    /// non-adjacent edges intersect.
    pub fn is_simple(&self) -> bool {
        let ring = self.outer_ring();
        if ring.len() < 4 || ring.first() != ring.last() {
            return false;
        }

        let edges = ring.len() - 1;
        for i in 0..edges {
            for j in (i + 2)..edges {
                // First and last edge share the closing vertex.
                if i == 0 && j == edges - 1 {
                    continue;
                }
                if segments_intersect(ring[i], ring[i + 1], ring[j], ring[j + 1]) {
                    return false;
                }
            }
        }
        true
    }
}

impl TryFrom<&Geometry> for Polygon {
    type Error = ImageryError;

    fn try_from(geometry: &Geometry) -> ImageryResult<Self> {
        if geometry.geometry_type != "Polygon" {
            return Err(ImageryError::InvalidGeometry(format!(
                "expected Polygon, found {}",
                geometry.geometry_type
            )));
        }

        let rings: Vec<Vec<Vec<f64>>> = serde_json::from_value(geometry.coordinates.clone())
            .map_err(|e| ImageryError::InvalidGeometry(format!("bad coordinates: {}", e)))?;

        Polygon::from_positions(rings)
    }
}

fn orientation(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn on_segment(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> bool {
    p[0] >= a[0].min(b[0])
        && p[0] <= a[0].max(b[0])
        && p[1] >= a[1].min(b[1])
        && p[1] <= a[1].max(b[1])
}

fn segments_intersect(p1: [f64; 2], p2: [f64; 2], p3: [f64; 2], p4: [f64; 2]) -> bool {
    let d1 = orientation(p3, p4, p1);
    let d2 = orientation(p3, p4, p2);
    let d3 = orientation(p1, p2, p3);
    let d4 = orientation(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    // Collinear touching counts as an intersection.
    (d1 == 0.0 && on_segment(p3, p4, p1))
        || (d2 == 0.0 && on_segment(p3, p4, p2))
        || (d3 == 0.0 && on_segment(p1, p2, p3))
        || (d4 == 0.0 && on_segment(p1, p2, p4))
}

/// Shallow structural check: present, tagged `"Polygon"`, non-empty outer ring.
///
/// Ring closure and vertex count are not checked; see [`Polygon::is_simple`].
pub fn validate_polygon(geometry: Option<&Geometry>) -> bool {
    geometry.map_or(false, |g| Polygon::try_from(g).is_ok())
}

/// Centroid of a field geometry, or `fallback` when the geometry is invalid.
///
/// The fallback is a sentinel, not a location derived from the input.
pub fn calculate_polygon_center(geometry: Option<&Geometry>, fallback: GeoPoint) -> GeoPoint {
    geometry
        .and_then(|g| Polygon::try_from(g).ok())
        .map_or(fallback, |polygon| polygon.center())
}

/// Approximate area in hectares, `0.0` for invalid geometries.
pub fn calculate_area_in_hectares(geometry: Option<&Geometry>) -> f64 {
    geometry
        .and_then(|g| Polygon::try_from(g).ok())
        .map_or(0.0, |polygon| polygon.area_hectares())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]
    }

    #[test]
    fn test_validate_polygon_rejects_non_polygons() {
        assert!(!validate_polygon(None));

        let point = Geometry {
            geometry_type: "Point".to_string(),
            coordinates: serde_json::json!([-79.67, -2.06]),
        };
        assert!(!validate_polygon(Some(&point)));

        let empty = Geometry::polygon(vec![]);
        assert!(!validate_polygon(Some(&empty)));

        let empty_ring = Geometry::polygon(vec![vec![]]);
        assert!(!validate_polygon(Some(&empty_ring)));
    }

    #[test]
    fn test_validate_polygon_is_shallow() {
        // Two positions, unclosed: still passes the structural check.
        let degenerate = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 1.0]]]);
        assert!(validate_polygon(Some(&degenerate)));
    }

    #[test]
    fn test_center_counts_closing_vertex() {
        let polygon = Polygon::new(vec![unit_square()]).unwrap();
        let center = polygon.center();
        // (0+1+1+0+0)/5 and (0+0+1+1+0)/5
        assert_eq!(center.lng, 0.4);
        assert_eq!(center.lat, 0.4);
    }

    #[test]
    fn test_center_fallback() {
        let fallback = GeoPoint::new(-2.063534, -79.671282);
        assert_eq!(calculate_polygon_center(None, fallback), fallback);
    }

    #[test]
    fn test_shoelace_area_unit_square() {
        let polygon = Polygon::new(vec![unit_square()]).unwrap();
        assert!((polygon.shoelace_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_area_invalid_is_zero() {
        assert_eq!(calculate_area_in_hectares(None), 0.0);
        let line = Geometry {
            geometry_type: "LineString".to_string(),
            coordinates: serde_json::json!([[0.0, 0.0], [1.0, 1.0]]),
        };
        assert_eq!(calculate_area_in_hectares(Some(&line)), 0.0);
    }

    #[test]
    fn test_is_simple() {
        assert!(Polygon::new(vec![unit_square()]).unwrap().is_simple());

        let bowtie = vec![[0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        assert!(!Polygon::new(vec![bowtie]).unwrap().is_simple());

        let open = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert!(!Polygon::new(vec![open]).unwrap().is_simple());

        let too_short = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]];
        assert!(!Polygon::new(vec![too_short]).unwrap().is_simple());
    }

    #[test]
    fn test_non_finite_rejected() {
        let ring = vec![[f64::NAN, 0.0], [1.0, 0.0], [1.0, 1.0], [f64::NAN, 0.0]];
        assert!(matches!(
            Polygon::new(vec![ring]),
            Err(ImageryError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_geometry_deserialization() {
        let json = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();
        let polygon = Polygon::try_from(&geometry).unwrap();
        assert_eq!(polygon.outer_ring().len(), 4);
    }
}
