// tests/serde_tests.rs

#![cfg(feature = "serde")]

use hexgrid::*;

#[test]
fn test_cell_index_serde() {
  // CellIndex is transparent over u64, so it serializes as the bare value.
  let h = CellIndex(0x8928308280fffff);
  let serialized = serde_json::to_string(&h).unwrap();
  assert_eq!(serialized, "617700169958293503");
  let deserialized: CellIndex = serde_json::from_str(&serialized).unwrap();
  assert_eq!(h, deserialized);

  assert_eq!(serde_json::to_string(&NULL_INDEX).unwrap(), "0");
}

#[test]
fn test_lat_lng_serde() {
  let ll = LatLng { lat: 0.5, lng: -1.2 };
  let serialized = serde_json::to_string(&ll).unwrap();
  assert_eq!(serialized, r#"{"lat":0.5,"lng":-1.2}"#);
  let deserialized: LatLng = serde_json::from_str(&serialized).unwrap();
  assert_eq!(ll, deserialized);
}

#[test]
fn test_error_serde() {
  // Errors serialize as their numeric codes.
  let err = HexGridError::CellInvalid;
  let serialized = serde_json::to_string(&err).unwrap();
  assert_eq!(serialized, "5");
  let deserialized: HexGridError = serde_json::from_str(&serialized).unwrap();
  assert_eq!(err, deserialized);

  assert_eq!(serde_json::to_string(&HexGridError::Pentagon).unwrap(), "9");
}

#[test]
fn test_geo_polygon_serde() {
  let polygon = GeoPolygon {
    geoloop: GeoLoop::from_verts(vec![
      LatLng { lat: 1.0, lng: 1.0 },
      LatLng { lat: 2.0, lng: 2.0 },
      LatLng { lat: 2.0, lng: 1.0 },
    ]),
    num_holes: 1,
    holes: vec![GeoLoop::from_verts(vec![LatLng { lat: 1.5, lng: 1.2 }])],
  };

  let serialized = serde_json::to_string(&polygon).unwrap();
  let deserialized: GeoPolygon = serde_json::from_str(&serialized).unwrap();
  assert_eq!(polygon, deserialized);
}

#[test]
fn test_cell_boundary_serde() {
  let cell = CellIndex(0x85283473fffffff);
  let boundary = cell_to_boundary(cell).unwrap();
  let serialized = serde_json::to_string(&boundary).unwrap();
  let deserialized: CellBoundary = serde_json::from_str(&serialized).unwrap();
  assert_eq!(boundary, deserialized);
}

#[test]
fn test_multi_polygon_serde() {
  let cell = CellIndex(0x85283473fffffff);
  let multi = cells_to_multi_polygon(&[cell]).unwrap();
  let serialized = serde_json::to_string(&multi).unwrap();
  let deserialized: MultiPolygon = serde_json::from_str(&serialized).unwrap();
  assert_eq!(multi, deserialized);
}
