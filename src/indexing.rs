//! Point-to-cell and cell-to-point conversions.

use crate::constants::{EPSILON_RAD, MAX_RES, M_PI_2, NUM_HEX_VERTS, NUM_PENT_VERTS};
use crate::error::HexGridError;
use crate::face::{
  FaceIJK, _face_ijk_pent_to_cell_boundary, _face_ijk_to_cell_boundary, _face_ijk_to_geo,
  _geo_to_face_ijk,
};
use crate::geo::{CellBoundary, LatLng};
use crate::index::{
  CellIndex, NULL_INDEX, _cell_to_face_ijk, _face_ijk_to_cell, get_resolution, is_pentagon,
  is_valid_cell,
};

/// Finds the cell containing the given point at the given resolution.
/// Coordinates are in radians; longitude may be unnormalized.
pub fn lat_lng_to_cell(geo: &LatLng, res: i32) -> Result<CellIndex, HexGridError> {
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  if !geo.lat.is_finite() || !geo.lng.is_finite() || geo.lat.abs() > M_PI_2 + EPSILON_RAD {
    return Err(HexGridError::LatLngDomain);
  }

  let mut fijk = FaceIJK::default();
  _geo_to_face_ijk(geo, res, &mut fijk);

  let h = _face_ijk_to_cell(&fijk, res);
  if h == NULL_INDEX {
    return Err(HexGridError::Failed);
  }
  Ok(h)
}

/// Center point of a cell, in radians.
pub fn cell_to_lat_lng(cell: CellIndex) -> Result<LatLng, HexGridError> {
  if !is_valid_cell(cell) {
    return Err(HexGridError::CellInvalid);
  }

  let mut fijk = FaceIJK::default();
  _cell_to_face_ijk(cell, &mut fijk)?;

  let mut geo = LatLng::default();
  _face_ijk_to_geo(&fijk, get_resolution(cell), &mut geo);
  Ok(geo)
}

/// Boundary vertices of a cell, in ccw order.
pub fn cell_to_boundary(cell: CellIndex) -> Result<CellBoundary, HexGridError> {
  if !is_valid_cell(cell) {
    return Err(HexGridError::CellInvalid);
  }

  let mut fijk = FaceIJK::default();
  _cell_to_face_ijk(cell, &mut fijk)?;

  let mut boundary = CellBoundary::default();
  let res = get_resolution(cell);
  if is_pentagon(cell) {
    _face_ijk_pent_to_cell_boundary(&fijk, res, 0, NUM_PENT_VERTS as i32, &mut boundary);
  } else {
    _face_ijk_to_cell_boundary(&fijk, res, 0, NUM_HEX_VERTS as i32, &mut boundary);
  }
  Ok(boundary)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::{DIRECTED_EDGE_MODE, MAX_CELL_BNDRY_VERTS};
  use crate::geo::_set_geo_degs;
  use crate::index::set_mode;

  #[test]
  fn test_lat_lng_to_cell_res_domain() {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.77, -122.4);
    assert_eq!(lat_lng_to_cell(&geo, -1), Err(HexGridError::ResDomain));
    assert_eq!(lat_lng_to_cell(&geo, 16), Err(HexGridError::ResDomain));
  }

  #[test]
  fn test_lat_lng_to_cell_coord_domain() {
    let mut bad_lat = LatLng::default();
    _set_geo_degs(&mut bad_lat, 100.0, -122.4);
    assert_eq!(lat_lng_to_cell(&bad_lat, 5), Err(HexGridError::LatLngDomain));

    let nan_lng = LatLng {
      lat: 0.0,
      lng: f64::NAN,
    };
    assert_eq!(lat_lng_to_cell(&nan_lng, 5), Err(HexGridError::LatLngDomain));

    let inf_lat = LatLng {
      lat: f64::INFINITY,
      lng: 0.0,
    };
    assert_eq!(lat_lng_to_cell(&inf_lat, 5), Err(HexGridError::LatLngDomain));
  }

  #[test]
  fn test_lat_lng_to_cell_known_values() {
    // San Francisco City Hall.
    let mut sf = LatLng::default();
    _set_geo_degs(&mut sf, 37.779_265, -122.419_277);

    let h5 = lat_lng_to_cell(&sf, 5).unwrap();
    assert_eq!(h5.0, 0x85283083fffffff, "SF City Hall res 5");

    let h10 = lat_lng_to_cell(&sf, 10).unwrap();
    assert_eq!(h10.0, 0x8a2830828767fff, "SF City Hall res 10");

    let mut north_pole = LatLng::default();
    _set_geo_degs(&mut north_pole, 90.0, 0.0);
    assert_eq!(
      lat_lng_to_cell(&north_pole, 3).unwrap().0,
      0x830326fffffffff,
      "north pole res 3"
    );

    let mut south_pole = LatLng::default();
    _set_geo_degs(&mut south_pole, -90.0, 0.0);
    assert_eq!(
      lat_lng_to_cell(&south_pole, 4).unwrap().0,
      0x84f2939ffffffff,
      "south pole res 4"
    );
  }

  #[test]
  fn test_invalid_cell_inputs() {
    assert_eq!(cell_to_lat_lng(NULL_INDEX), Err(HexGridError::CellInvalid));
    assert!(cell_to_boundary(NULL_INDEX).is_err());

    let mut edge_mode = CellIndex(0x85283473fffffff);
    set_mode(&mut edge_mode, DIRECTED_EDGE_MODE);
    assert_eq!(cell_to_lat_lng(edge_mode), Err(HexGridError::CellInvalid));
    assert!(cell_to_boundary(edge_mode).is_err());
  }

  #[test]
  fn test_center_and_boundary_round_trip() {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.779, -122.419);

    for res in 0..=10 {
      let cell = lat_lng_to_cell(&geo, res).unwrap();
      assert!(is_valid_cell(cell));

      // The cell center re-indexes to the same cell.
      let center = cell_to_lat_lng(cell).unwrap();
      assert_eq!(lat_lng_to_cell(&center, res).unwrap(), cell, "res {res}");

      let boundary = cell_to_boundary(cell).unwrap();
      let min_verts = if is_pentagon(cell) {
        NUM_PENT_VERTS
      } else {
        NUM_HEX_VERTS
      };
      assert!(
        (min_verts..=MAX_CELL_BNDRY_VERTS).contains(&boundary.num_verts),
        "vertex count at res {res}: {}",
        boundary.num_verts
      );
      for v in &boundary.verts[..boundary.num_verts] {
        assert!(v.lat.is_finite() && v.lng.is_finite());
        assert!(v.lat.abs() <= M_PI_2 + EPSILON_RAD);
      }
    }
  }

  #[test]
  fn test_round_trip_exact_at_res9() {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.77, -122.41);
    let cell = lat_lng_to_cell(&geo, 9).unwrap();
    let center = cell_to_lat_lng(cell).unwrap();
    assert_eq!(lat_lng_to_cell(&center, 9).unwrap(), cell);
  }
}
