//! End-to-end tests for the geometry → tile → scene path pipeline.

use imagery_common::{
    build_imagery_request, calculate_area_in_hectares, calculate_polygon_center,
    geo_point_to_tile, point_to_tile, resolve_imagery_path, validate_polygon, GeoPoint, Geometry,
    ImageryError, ImageryProduct, NdviParameters, NdviRenderOptions, Polygon, TileCoord,
};
use test_utils::fixtures::{fields, scenes, tiles};
use test_utils::{assert_approx_eq, assert_coords_approx_eq};

fn fallback() -> GeoPoint {
    let (lat, lng) = fields::FALLBACK_CENTER;
    GeoPoint::new(lat, lng)
}

fn polygon_geometry(ring: &[[f64; 2]]) -> Geometry {
    Geometry::polygon(vec![fields::ring(ring)])
}

// ============================================================================
// Geometry Reducer
// ============================================================================

#[test]
fn test_validate_polygon_null_and_point() {
    assert!(!validate_polygon(None));

    let point: Geometry =
        serde_json::from_str(r#"{"type":"Point","coordinates":[-79.67,-2.06]}"#).unwrap();
    assert!(!validate_polygon(Some(&point)));

    assert!(validate_polygon(Some(&polygon_geometry(&fields::DEMO_FIELD))));
}

#[test]
fn test_center_within_bbox() {
    for ring in [
        &fields::DEMO_FIELD[..],
        &fields::EQUATOR_SQUARE[..],
        &fields::SMALL_FIELD_NL[..],
        &fields::BOWTIE[..],
    ] {
        let polygon = Polygon::new(vec![ring.to_vec()]).unwrap();
        let center = polygon.center();
        assert!(
            polygon.bbox().contains_point(center.lng, center.lat),
            "center {:?} outside bbox {:?}",
            center,
            polygon.bbox()
        );
    }
}

#[test]
fn test_demo_field_center_and_bbox() {
    let geometry = polygon_geometry(&fields::DEMO_FIELD);
    let center = calculate_polygon_center(Some(&geometry), fallback());
    assert_coords_approx_eq!((center.lng, center.lat), (-79.6705182, -2.0645774), 1e-7);

    let polygon = Polygon::try_from(&geometry).unwrap();
    assert_eq!(polygon.bbox().to_array(), fields::DEMO_FIELD_BBOX);
    assert!(polygon.is_simple());
}

#[test]
fn test_center_fallback_is_sentinel() {
    let line: Geometry =
        serde_json::from_str(r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#).unwrap();
    assert_eq!(calculate_polygon_center(Some(&line), fallback()), fallback());
    assert_eq!(calculate_polygon_center(None, fallback()), fallback());
}

#[test]
fn test_equator_square_area() {
    let area = calculate_area_in_hectares(Some(&polygon_geometry(&fields::EQUATOR_SQUARE)));
    // 111320 * 111320 / 10000, scaled by cos of the centroid latitude (-0.1°).
    assert_approx_eq!(area, 1_239_212.35, 1.0);
    assert_approx_eq!(area, 1_240_000.0, 1_240.0);
}

#[test]
fn test_small_field_area() {
    let area = calculate_area_in_hectares(Some(&polygon_geometry(&fields::SMALL_FIELD_NL)));
    assert_approx_eq!(area, 1.0, 0.01);

    let demo = calculate_area_in_hectares(Some(&polygon_geometry(&fields::DEMO_FIELD)));
    assert_approx_eq!(demo, 5.98, 0.01);
}

#[test]
fn test_area_invalid_geometry_is_zero() {
    assert_eq!(calculate_area_in_hectares(None), 0.0);
    assert_eq!(calculate_area_in_hectares(Some(&Geometry::polygon(vec![]))), 0.0);
}

#[test]
fn test_positions_with_altitude_are_accepted() {
    let geometry: Geometry = serde_json::from_str(
        r#"{"type":"Polygon","coordinates":[[[0,0,5],[1,0,5],[1,1,5],[0,1,5],[0,0,5]]]}"#,
    )
    .unwrap();
    let flat = polygon_geometry(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]);

    assert!(validate_polygon(Some(&geometry)));
    assert_eq!(
        calculate_polygon_center(Some(&geometry), fallback()),
        calculate_polygon_center(Some(&flat), fallback())
    );
    assert_approx_eq!(
        calculate_area_in_hectares(Some(&geometry)),
        calculate_area_in_hectares(Some(&flat)),
        1e-9
    );
}

#[test]
fn test_positions_need_two_values() {
    let geometry: Geometry =
        serde_json::from_str(r#"{"type":"Polygon","coordinates":[[[0],[1,0],[1,1],[0]]]}"#)
            .unwrap();
    assert!(!validate_polygon(Some(&geometry)));
    assert!(matches!(
        Polygon::try_from(&geometry),
        Err(ImageryError::InvalidGeometry(_))
    ));
}

// ============================================================================
// Tile Resolver
// ============================================================================

#[test]
fn test_origin_tile_is_matrix_midpoint() {
    for zoom in 1..=20 {
        let tile = point_to_tile(0.0, 0.0, zoom).unwrap();
        assert_eq!(tile.x, 1 << (zoom - 1));
        assert_eq!(tile.y, 1 << (zoom - 1));
    }
}

#[test]
fn test_zoom_monotonic() {
    let points = [(-2.0645774, -79.6705182), (52.0, 5.0), (40.7128, -74.006), (-33.9, 151.2)];
    for (lat, lng) in points {
        for zoom in 0..20 {
            let a = point_to_tile(lat, lng, zoom).unwrap();
            let b = point_to_tile(lat, lng, zoom + 1).unwrap();
            assert!(b.x == a.x * 2 || b.x == a.x * 2 + 1, "x at zoom {}", zoom);
            assert!(b.y == a.y * 2 || b.y == a.y * 2 + 1, "y at zoom {}", zoom);
            assert_eq!(b.parent(), Some(a));
        }
    }
}

#[test]
fn test_tiles_stay_in_range() {
    for zoom in [0, 1, 5, 15, 24] {
        let max = (1u64 << zoom) as u32 - 1;
        for (lat, lng) in [(85.05, 180.0), (-85.05, -180.0), (85.05, -180.0), (-85.05, 180.0)] {
            let tile = point_to_tile(lat, lng, zoom).unwrap();
            assert!(tile.x <= max && tile.y <= max, "{:?}", tile);
        }
    }
}

#[test]
fn test_out_of_range_latitude() {
    assert!(matches!(
        point_to_tile(90.0, 0.0, 10),
        Err(ImageryError::OutOfRangeLatitude(_))
    ));
    assert!(matches!(
        point_to_tile(-85.1, 0.0, 10),
        Err(ImageryError::OutOfRangeLatitude(_))
    ));
}

#[test]
fn test_demo_field_tile() {
    let geometry = polygon_geometry(&fields::DEMO_FIELD);
    let center = calculate_polygon_center(Some(&geometry), fallback());
    let tile = geo_point_to_tile(center, tiles::FIELD_ZOOM).unwrap();

    let (z, x, y) = tiles::DEMO_FIELD_TILE;
    assert_eq!(tile, TileCoord::new(z, x, y));
}

// ============================================================================
// Scene Path Resolver
// ============================================================================

#[test]
fn test_sentinel_round_trip() {
    let tile = TileCoord::new(15, 9132, 16571);

    let natural = resolve_imagery_path(scenes::SENTINEL_2C, ImageryProduct::Natural, &tile).unwrap();
    assert_eq!(natural.path, "S2/17/M/PT/2025/2/4/0/B04,B03,B02/15/9132/16571");
    assert!(natural.is_sentinel);

    let ndvi = build_imagery_request(
        scenes::SENTINEL_2C,
        ImageryProduct::Ndvi,
        &tile,
        &NdviRenderOptions::default(),
        None,
    )
    .unwrap();
    let url = ndvi.relative_url();
    assert!(url.starts_with("S2/17/M/PT/2025/2/4/0/NDVI/15/9132/16571?"));
    assert!(url.contains("&CLUSTERS_NO=5"));
    assert!(url.contains("CALIBRATE=1"));
    assert!(url.contains("CLUSTERING=kmeans"));
    assert!(url.contains("MIN_AREA=2000"));
}

#[test]
fn test_sentinel_zone_padding_preserved() {
    let tile = TileCoord::new(3, 1, 2);
    let path =
        resolve_imagery_path(scenes::SENTINEL_2A_PADDED_ZONE, ImageryProduct::Ndvi, &tile).unwrap();
    assert_eq!(path.path, "S2/07/V/CG/2023/11/30/1/NDVI/3/1/2");
}

#[test]
fn test_landsat_satellite_token() {
    let tile = TileCoord::new(12, 100, 200);

    let l9 = resolve_imagery_path(scenes::LANDSAT_9, ImageryProduct::Ndvi, &tile).unwrap();
    assert!(l9.path.starts_with("L9/"));
    assert!(!l9.is_sentinel);

    let l8 = resolve_imagery_path(scenes::LANDSAT_8, ImageryProduct::Ndvi, &tile).unwrap();
    assert!(l8.path.starts_with("L8/"));

    // Natural colour always uses the Landsat 8 token.
    let natural = resolve_imagery_path(scenes::LANDSAT_9, ImageryProduct::Natural, &tile).unwrap();
    assert_eq!(
        natural.path,
        "L8/LC09_L2SP_001001_20240101/B04,B03,B02/12/100/200"
    );
}

#[test]
fn test_malformed_identifiers_rejected() {
    let tile = TileCoord::new(10, 0, 0);
    for scene_id in scenes::MALFORMED {
        for product in [ImageryProduct::Natural, ImageryProduct::Ndvi] {
            let result = resolve_imagery_path(scene_id, product, &tile);
            assert!(
                matches!(result, Err(ImageryError::MalformedSceneIdentifier { .. })),
                "{:?} should be rejected, got {:?}",
                scene_id,
                result
            );
        }
    }
}

#[test]
fn test_threshold_appended_last() {
    let tile = TileCoord::new(15, 9132, 16571);
    let request = build_imagery_request(
        scenes::LANDSAT_8,
        ImageryProduct::Ndvi,
        &tile,
        &NdviRenderOptions::default(),
        Some(&NdviParameters {
            threshold: Some(-0.25),
        }),
    )
    .unwrap();
    assert_eq!(
        request.query.last(),
        Some(&("threshold".to_string(), "-0.25".to_string()))
    );
}
