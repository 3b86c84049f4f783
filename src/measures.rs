//! Exact areas and lengths of individual cells and edges, as opposed to
//! the per-resolution averages in [`crate::geo`].

use crate::constants::EARTH_RADIUS_KM;
use crate::error::HexGridError;
use crate::edge::directed_edge_to_boundary;
use crate::geo::great_circle_distance_rads;
use crate::index::{CellIndex, is_valid_cell};
use crate::indexing::cell_to_boundary;
use crate::polygon::sphere_area_rads2;

/// Area of the cell in square radians.
pub fn cell_area_rads2(cell: CellIndex) -> Result<f64, HexGridError> {
  if !is_valid_cell(cell) {
    return Err(HexGridError::CellInvalid);
  }
  let boundary = cell_to_boundary(cell)?;
  Ok(sphere_area_rads2(&boundary.verts[..boundary.num_verts]))
}

/// Area of the cell in square kilometers.
pub fn cell_area_km2(cell: CellIndex) -> Result<f64, HexGridError> {
  Ok(cell_area_rads2(cell)? * EARTH_RADIUS_KM * EARTH_RADIUS_KM)
}

/// Area of the cell in square meters.
pub fn cell_area_m2(cell: CellIndex) -> Result<f64, HexGridError> {
  Ok(cell_area_km2(cell)? * 1_000_000.0)
}

/// Length of a directed edge in radians, summed over the great-circle arcs
/// of its boundary.
pub fn exact_edge_length_rads(edge: CellIndex) -> Result<f64, HexGridError> {
  let boundary = directed_edge_to_boundary(edge)?;

  let mut length = 0.0;
  for window in boundary.verts[..boundary.num_verts].windows(2) {
    length += great_circle_distance_rads(&window[0], &window[1]);
  }
  Ok(length)
}

/// Length of a directed edge in kilometers.
pub fn exact_edge_length_km(edge: CellIndex) -> Result<f64, HexGridError> {
  Ok(exact_edge_length_rads(edge)? * EARTH_RADIUS_KM)
}

/// Length of a directed edge in meters.
pub fn exact_edge_length_m(edge: CellIndex) -> Result<f64, HexGridError> {
  Ok(exact_edge_length_km(edge)? * 1000.0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::edge::origin_to_directed_edges;
  use crate::geo::{LatLng, _set_geo_degs, get_hexagon_area_avg_km2, get_hexagon_edge_length_avg_km};
  use crate::index::{CellIndex, NULL_INDEX};
  use crate::indexing::lat_lng_to_cell;

  #[test]
  fn test_cell_area_known_cell() {
    let cell = CellIndex(0x85283473fffffff);
    let area = cell_area_rads2(cell).unwrap();
    assert!((area - 0.0000065310).abs() < 0.0000065310 * 0.01, "got {area}");

    let km2 = cell_area_km2(cell).unwrap();
    assert!((km2 - 265.0925581283).abs() < 265.0925581283 * 0.01, "got {km2}");

    assert!((cell_area_m2(cell).unwrap() / km2 - 1_000_000.0).abs() < 1e-3);
  }

  #[test]
  fn test_cell_area_near_average() {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.779, -122.419);
    for res in [3, 6, 9] {
      let cell = lat_lng_to_cell(&geo, res).unwrap();
      let area = cell_area_km2(cell).unwrap();
      let avg = get_hexagon_area_avg_km2(res).unwrap();
      // Individual hexagons vary around the per-resolution average but
      // stay the same order of magnitude.
      assert!(area > avg * 0.4 && area < avg * 2.5, "res {res}: {area} vs {avg}");
    }
  }

  #[test]
  fn test_cell_area_invalid() {
    assert_eq!(cell_area_rads2(NULL_INDEX), Err(HexGridError::CellInvalid));
  }

  #[test]
  fn test_edge_length_near_average() {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.779, -122.419);
    for res in [2, 5, 8] {
      let cell = lat_lng_to_cell(&geo, res).unwrap();
      let avg = get_hexagon_edge_length_avg_km(res).unwrap();
      for edge in origin_to_directed_edges(cell).unwrap() {
        let length = exact_edge_length_km(edge).unwrap();
        assert!(
          length > avg * 0.4 && length < avg * 2.5,
          "res {res}: {length} vs {avg}"
        );
      }
    }
  }

  #[test]
  fn test_edge_length_rejects_cells() {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.779, -122.419);
    let cell = lat_lng_to_cell(&geo, 5).unwrap();
    assert_eq!(
      exact_edge_length_rads(cell),
      Err(HexGridError::DirEdgeInvalid)
    );
  }
}
