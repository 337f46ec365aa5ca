//! Common fixtures for field imagery tests.
//!
//! Rings are `[lng, lat]` pairs, closed (first position repeated last).

/// Field polygons.
pub mod fields {
    /// Demo banana field near Milagro, Ecuador.
    pub const DEMO_FIELD: [[f64; 2]; 5] = [
        [-79.671282, -2.063534],
        [-79.6682, -2.063898],
        [-79.670403, -2.06597],
        [-79.671424, -2.065951],
        [-79.671282, -2.063534],
    ];

    /// Bounding box of [`DEMO_FIELD`] as `[minLng, minLat, maxLng, maxLat]`.
    pub const DEMO_FIELD_BBOX: [f64; 4] = [-79.671424, -2.06597, -79.6682, -2.063534];

    /// 1° x 1° square centered on (0, 0).
    pub const EQUATOR_SQUARE: [[f64; 2]; 5] = [
        [-0.5, -0.5],
        [0.5, -0.5],
        [0.5, 0.5],
        [-0.5, 0.5],
        [-0.5, -0.5],
    ];

    /// Self-intersecting "bowtie" ring.
    pub const BOWTIE: [[f64; 2]; 5] = [
        [0.0, 0.0],
        [1.0, 1.0],
        [1.0, 0.0],
        [0.0, 1.0],
        [0.0, 0.0],
    ];

    /// Roughly 1 ha square field in the Netherlands (~100m sides).
    pub const SMALL_FIELD_NL: [[f64; 2]; 5] = [
        [5.0, 52.0],
        [5.00146, 52.0],
        [5.00146, 52.0009],
        [5.0, 52.0009],
        [5.0, 52.0],
    ];

    /// Fallback center used when a field geometry is missing, `(lat, lng)`.
    pub const FALLBACK_CENTER: (f64, f64) = (-2.063534, -79.671282);

    /// Owned copy of a fixture ring.
    pub fn ring(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
        points.to_vec()
    }
}

/// Scene identifiers as issued by the search service.
pub mod scenes {
    pub const SENTINEL_2C: &str = "S2C_tile_20250204_17MPT_0";
    pub const SENTINEL_2A_PADDED_ZONE: &str = "S2A_tile_20231130_07VCG_1";
    pub const LANDSAT_9: &str = "LC09_L2SP_001001_20240101";
    pub const LANDSAT_8: &str = "LC08_L1TP_042034_20240115";

    /// Identifiers that must be rejected.
    pub const MALFORMED: [&str; 6] = [
        "S2C_badformat",
        "S2C_tile_2025020X_17MPT_0",
        "S2C_tile_20250204_17MP_0",
        "S2C_tile_20250231_17MPT_0",
        "S2C_tile_20250204_17MPT_0_extra",
        "",
    ];
}

/// Tile addresses.
pub mod tiles {
    /// Zoom used by the field analysis screens.
    pub const FIELD_ZOOM: u32 = 15;

    /// Tile containing the demo field centroid at [`FIELD_ZOOM`], `(z, x, y)`.
    pub const DEMO_FIELD_TILE: (u32, u32, u32) = (15, 9132, 16571);
}
