//! Drawing the line of cells between two endpoints, by linear interpolation
//! in the origin's local frame.

use crate::error::HexGridError;
use crate::ijk::{CoordIJK, cube_to_ijk, ijk_to_cube};
use crate::index::{CellIndex, NULL_INDEX};
use crate::localij::{cell_to_local_ijk, local_ijk_to_cell};
use crate::traversal::distance::grid_distance;

/// Number of cells in the path from `start` to `end`, inclusive.
pub fn grid_path_cells_size(start: CellIndex, end: CellIndex) -> Result<i64, HexGridError> {
  Ok(grid_distance(start, end)? + 1)
}

/// Rounds half away from zero, like C99 `lround`. `f64::round` agrees for
/// every value this module produces, but the tie behavior is part of the
/// path's shape, so it is pinned down explicitly.
fn _lround(v: f64) -> f64 {
  if v > 0.0 {
    (v + 0.5).floor()
  } else if v < 0.0 {
    (v - 0.5).ceil()
  } else {
    0.0
  }
}

/// Rounds fractional cube coordinates to the nearest cell center, keeping
/// the i + j + k = 0 cube invariant by re-deriving the component that
/// rounded worst.
fn _cube_round(i: f64, j: f64, k: f64, out: &mut CoordIJK) {
  let mut ri = _lround(i);
  let mut rj = _lround(j);
  let mut rk = _lround(k);

  let i_diff = (ri - i).abs();
  let j_diff = (rj - j).abs();
  let k_diff = (rk - k).abs();

  if i_diff > j_diff && i_diff > k_diff {
    ri = -rj - rk;
  } else if j_diff > k_diff {
    rj = -ri - rk;
  } else {
    rk = -ri - rj;
  }

  out.i = ri as i32;
  out.j = rj as i32;
  out.k = rk as i32;
}

/// The line of cells from `start` to `end`, inclusive of both.
///
/// The line is drawn in grid space and may not follow a great arc. The only
/// stable guarantees are the length and that consecutive cells are
/// neighbors; fails in the same cases as [`grid_distance`].
pub fn grid_path_cells(start: CellIndex, end: CellIndex) -> Result<Vec<CellIndex>, HexGridError> {
  let distance = grid_distance(start, end)?;

  let mut start_ijk = CoordIJK::default();
  cell_to_local_ijk(start, start, &mut start_ijk)?;
  let mut end_ijk = CoordIJK::default();
  cell_to_local_ijk(start, end, &mut end_ijk)?;

  // Cube coordinates interpolate linearly.
  ijk_to_cube(&mut start_ijk);
  ijk_to_cube(&mut end_ijk);

  let (i_step, j_step, k_step) = if distance == 0 {
    (0.0, 0.0, 0.0)
  } else {
    let d = distance as f64;
    (
      f64::from(end_ijk.i - start_ijk.i) / d,
      f64::from(end_ijk.j - start_ijk.j) / d,
      f64::from(end_ijk.k - start_ijk.k) / d,
    )
  };

  let mut out = Vec::with_capacity((distance + 1) as usize);
  let mut current = CoordIJK::default();
  for n in 0..=distance {
    let t = n as f64;
    _cube_round(
      f64::from(start_ijk.i) + i_step * t,
      f64::from(start_ijk.j) + j_step * t,
      f64::from(start_ijk.k) + k_step * t,
      &mut current,
    );
    cube_to_ijk(&mut current);

    let mut cell = NULL_INDEX;
    local_ijk_to_cell(start, &current, &mut cell)?;
    out.push(cell);
  }
  Ok(out)
}
