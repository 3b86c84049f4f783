//! Grid distance between two cells of equal resolution.

use crate::error::HexGridError;
use crate::ijk::{CoordIJK, ijk_distance};
use crate::index::CellIndex;
use crate::localij::cell_to_local_ijk;

/// Number of grid steps between the two cells.
///
/// Both cells are mapped into the local frame of `origin`; the distance is
/// the cube distance there. Fails when the cells differ in resolution or
/// when pentagon distortion makes the local frame unreachable, a documented
/// limitation for some pentagon-adjacent pairs.
pub fn grid_distance(origin: CellIndex, destination: CellIndex) -> Result<i64, HexGridError> {
  let mut origin_ijk = CoordIJK::default();
  cell_to_local_ijk(origin, origin, &mut origin_ijk)?;

  let mut destination_ijk = CoordIJK::default();
  cell_to_local_ijk(origin, destination, &mut destination_ijk)?;

  Ok(i64::from(ijk_distance(&origin_ijk, &destination_ijk)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::{LatLng, _set_geo_degs};
  use crate::index::NULL_INDEX;
  use crate::indexing::lat_lng_to_cell;
  use crate::traversal::disk::grid_disk_distances;

  fn sf_cell(res: i32) -> CellIndex {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.779, -122.419);
    lat_lng_to_cell(&geo, res).unwrap()
  }

  #[test]
  fn test_grid_distance_identity() {
    let h = sf_cell(5);
    assert_eq!(grid_distance(h, h), Ok(0));
  }

  #[test]
  fn test_grid_distance_matches_disk_distances() {
    let origin = sf_cell(9);
    for (cell, bfs_distance) in grid_disk_distances(origin, 3).unwrap() {
      assert_eq!(
        grid_distance(origin, cell),
        Ok(i64::from(bfs_distance)),
        "distance to {cell}"
      );
    }
  }

  #[test]
  fn test_grid_distance_res_mismatch() {
    assert_eq!(
      grid_distance(sf_cell(5), sf_cell(6)),
      Err(HexGridError::ResMismatch)
    );
  }

  #[test]
  fn test_grid_distance_invalid_input() {
    let h = sf_cell(5);
    assert_eq!(grid_distance(NULL_INDEX, h), Err(HexGridError::CellInvalid));
    // The null index parses as resolution 0, so it trips the resolution
    // check first.
    assert_eq!(grid_distance(h, NULL_INDEX), Err(HexGridError::ResMismatch));
  }
}
