//! Stepping to an adjacent cell across one of the six hex directions.

use crate::basecells::{
  BASE_CELL_DATA, BASE_CELL_NEIGHBORS, BASE_CELL_NEIGHBOR_60CCW_ROTS, INVALID_BASE_CELL,
  _base_cell_is_cw_offset, _is_base_cell_pentagon, _is_base_cell_polar_pentagon,
};
use crate::constants::{CELL_MODE, NUM_BASE_CELLS};
use crate::error::HexGridError;
use crate::ijk::{Direction, _rotate60_ccw};
use crate::index::{
  CellIndex, NULL_INDEX, _cell_rotate60_ccw, _cell_rotate60_cw, _cell_rotate_pent60_ccw,
  _leading_non_zero_digit, get_base_cell, get_index_digit, get_mode, get_resolution, is_pentagon,
  is_res_class_iii, is_valid_cell, set_base_cell, set_index_digit,
};

/// New digit when traversing along class II grids.
///
/// Rows are the old digit, columns are the direction of traversal.
#[rustfmt::skip]
static NEW_DIGIT_II: [[Direction; 7]; 7] = {
  use Direction::*;
  [
    [Center, KAxes, JAxes, JkAxes, IAxes, IkAxes, IjAxes],
    [KAxes, IAxes, JkAxes, IjAxes, IkAxes, JAxes, Center],
    [JAxes, JkAxes, KAxes, IAxes, IjAxes, Center, IkAxes],
    [JkAxes, IjAxes, IAxes, IkAxes, Center, KAxes, JAxes],
    [IAxes, IkAxes, IjAxes, Center, JAxes, JkAxes, KAxes],
    [IkAxes, JAxes, Center, KAxes, JkAxes, IjAxes, IAxes],
    [IjAxes, Center, IkAxes, JAxes, KAxes, IAxes, JkAxes],
  ]
};

/// New traversal direction when traversing along class II grids.
///
/// Rows are the old digit, columns are the direction of traversal.
#[rustfmt::skip]
static NEW_ADJUSTMENT_II: [[Direction; 7]; 7] = {
  use Direction::*;
  [
    [Center, Center, Center, Center, Center, Center, Center],
    [Center, KAxes, Center, KAxes, Center, IkAxes, Center],
    [Center, Center, JAxes, JkAxes, Center, Center, JAxes],
    [Center, KAxes, JkAxes, JkAxes, Center, Center, Center],
    [Center, Center, Center, Center, IAxes, IAxes, IjAxes],
    [Center, IkAxes, Center, Center, IAxes, IkAxes, Center],
    [Center, Center, JAxes, Center, IjAxes, Center, IjAxes],
  ]
};

/// New digit when traversing along class III grids.
///
/// Rows are the old digit, columns are the direction of traversal.
#[rustfmt::skip]
static NEW_DIGIT_III: [[Direction; 7]; 7] = {
  use Direction::*;
  [
    [Center, KAxes, JAxes, JkAxes, IAxes, IkAxes, IjAxes],
    [KAxes, JAxes, JkAxes, IAxes, IkAxes, IjAxes, Center],
    [JAxes, JkAxes, IAxes, IkAxes, IjAxes, Center, KAxes],
    [JkAxes, IAxes, IkAxes, IjAxes, Center, KAxes, JAxes],
    [IAxes, IkAxes, IjAxes, Center, KAxes, JAxes, JkAxes],
    [IkAxes, IjAxes, Center, KAxes, JAxes, JkAxes, IAxes],
    [IjAxes, Center, KAxes, JAxes, JkAxes, IAxes, IkAxes],
  ]
};

/// New traversal direction when traversing along class III grids.
///
/// Rows are the old digit, columns are the direction of traversal.
#[rustfmt::skip]
static NEW_ADJUSTMENT_III: [[Direction; 7]; 7] = {
  use Direction::*;
  [
    [Center, Center, Center, Center, Center, Center, Center],
    [Center, KAxes, Center, JkAxes, Center, KAxes, Center],
    [Center, Center, JAxes, JAxes, Center, Center, IjAxes],
    [Center, JkAxes, JAxes, JkAxes, Center, Center, Center],
    [Center, Center, Center, Center, IAxes, IkAxes, IAxes],
    [Center, KAxes, Center, Center, IkAxes, IkAxes, Center],
    [Center, Center, IjAxes, Center, IAxes, Center, IjAxes],
  ]
};

/// Returns the hexagon index neighboring the origin, in the direction `dir`.
///
/// `rotations` carries the number of ccw rotations the traversal direction
/// has accumulated so far (from crossing icosahedron edges); it is updated
/// in place so repeated stepping stays correctly oriented.
///
/// Fails with [`HexGridError::Pentagon`] when the step would cross a
/// pentagon's deleted k-axes subsequence, meaning there is no neighbor in
/// that direction.
pub fn neighbor_rotations(
  origin: CellIndex,
  mut dir: Direction,
  rotations: &mut i32,
  out: &mut CellIndex,
) -> Result<(), HexGridError> {
  let mut current = origin;

  if dir == Direction::Center || dir == Direction::InvalidDigit {
    return Err(HexGridError::Failed);
  }

  // Keep rotations within [0, 6) before any possible addition, to protect
  // against overflow.
  *rotations %= 6;
  if *rotations < 0 {
    *rotations += 6;
  }
  for _ in 0..*rotations {
    dir = _rotate60_ccw(dir);
  }

  let mut new_rotations = 0;
  let old_base_cell = get_base_cell(current);
  if !(0..NUM_BASE_CELLS).contains(&old_base_cell) {
    return Err(HexGridError::CellInvalid);
  }
  let old_leading_digit = _leading_non_zero_digit(current);

  // Adjust the indexing digits and, if needed, the base cell.
  let mut r = get_resolution(current) - 1;
  loop {
    if r == -1 {
      if _is_base_cell_pentagon(old_base_cell) && dir == Direction::KAxes {
        // The origin is a pentagon and the k direction is deleted.
        return Err(HexGridError::Pentagon);
      }

      set_base_cell(
        &mut current,
        BASE_CELL_NEIGHBORS[old_base_cell as usize][dir as usize],
      );
      new_rotations = BASE_CELL_NEIGHBOR_60CCW_ROTS[old_base_cell as usize][dir as usize];

      if get_base_cell(current) == INVALID_BASE_CELL {
        // Adjust for the deleted k vertex at the base cell level. This
        // edge actually borders a different neighbor.
        set_base_cell(
          &mut current,
          BASE_CELL_NEIGHBORS[old_base_cell as usize][Direction::IkAxes as usize],
        );
        new_rotations =
          BASE_CELL_NEIGHBOR_60CCW_ROTS[old_base_cell as usize][Direction::IkAxes as usize];

        current = _cell_rotate60_ccw(current);
        *rotations = (*rotations + 1) % 6;
      }
      break;
    }

    let old_digit = get_index_digit(current, r + 1);
    if old_digit == Direction::InvalidDigit {
      // Only possible on invalid input.
      return Err(HexGridError::CellInvalid);
    }

    let next_dir;
    if is_res_class_iii(r + 1) {
      set_index_digit(
        &mut current,
        r + 1,
        NEW_DIGIT_II[old_digit as usize][dir as usize],
      );
      next_dir = NEW_ADJUSTMENT_II[old_digit as usize][dir as usize];
    } else {
      set_index_digit(
        &mut current,
        r + 1,
        NEW_DIGIT_III[old_digit as usize][dir as usize],
      );
      next_dir = NEW_ADJUSTMENT_III[old_digit as usize][dir as usize];
    }

    if next_dir != Direction::Center {
      dir = next_dir;
      r -= 1;
    } else {
      // No more adjustment to perform.
      break;
    }
  }

  let new_base_cell = get_base_cell(current);
  if _is_base_cell_pentagon(new_base_cell) {
    let mut already_adjusted_k_subsequence = false;

    // Force rotation out of the missing k-axes subsequence.
    if _leading_non_zero_digit(current) == Direction::KAxes {
      if old_base_cell != new_base_cell {
        // The traversal entered the deleted k subsequence of a pentagon
        // base cell from a different base cell; rotate out depending on
        // the pentagon's orientation offset on the face crossed.
        if _base_cell_is_cw_offset(
          new_base_cell,
          BASE_CELL_DATA[old_base_cell as usize].home_fijk.face,
        ) {
          current = _cell_rotate60_cw(current);
        } else {
          current = _cell_rotate60_ccw(current);
        }
        already_adjusted_k_subsequence = true;
      } else {
        // Entered the deleted k subsequence from within the same pentagon
        // base cell.
        match old_leading_digit {
          Direction::Center => {
            // The k direction is deleted from here.
            return Err(HexGridError::Pentagon);
          }
          Direction::JkAxes => {
            current = _cell_rotate60_ccw(current);
            *rotations = (*rotations + 1) % 6;
          }
          Direction::IkAxes => {
            current = _cell_rotate60_cw(current);
            *rotations = (*rotations + 5) % 6;
          }
          _ => return Err(HexGridError::Failed),
        }
      }
    }

    for _ in 0..new_rotations {
      current = _cell_rotate_pent60_ccw(current);
    }

    // Account for differing orientation of the base cells.
    if old_base_cell != new_base_cell {
      if _is_base_cell_polar_pentagon(new_base_cell) {
        // Polar base cells behave differently because they have all i
        // neighbors.
        if old_base_cell != 118
          && old_base_cell != 8
          && _leading_non_zero_digit(current) != Direction::JkAxes
        {
          *rotations = (*rotations + 1) % 6;
        }
      } else if _leading_non_zero_digit(current) == Direction::IkAxes
        && !already_adjusted_k_subsequence
      {
        // Distortion introduced to the 5 neighbor by the deleted k
        // subsequence.
        *rotations = (*rotations + 1) % 6;
      }
    }
  } else {
    for _ in 0..new_rotations {
      current = _cell_rotate60_ccw(current);
    }
  }

  *rotations = (*rotations + new_rotations) % 6;
  *out = current;
  Ok(())
}

/// The direction from the origin to its immediate neighbor `destination`,
/// or `InvalidDigit` if the cells are not neighbors.
pub(crate) fn direction_for_neighbor(origin: CellIndex, destination: CellIndex) -> Direction {
  if origin == destination {
    return Direction::Center;
  }

  // Check each neighbor, in order. Skips the center and, for pentagons,
  // the deleted k subsequence.
  let start = if is_pentagon(origin) {
    Direction::JAxes
  } else {
    Direction::KAxes
  };
  for d in (start as u64)..=(Direction::IjAxes as u64) {
    let dir = Direction::from_u64(d);
    let mut rotations = 0;
    let mut neighbor = NULL_INDEX;
    if neighbor_rotations(origin, dir, &mut rotations, &mut neighbor).is_ok()
      && neighbor == destination
    {
      return dir;
    }
  }
  Direction::InvalidDigit
}

/// Whether the two cells share an edge.
pub fn are_neighbor_cells(
  origin: CellIndex,
  destination: CellIndex,
) -> Result<bool, HexGridError> {
  if get_mode(origin) != CELL_MODE || get_mode(destination) != CELL_MODE {
    return Err(HexGridError::CellInvalid);
  }

  // A cell is not a neighbor of itself.
  if origin == destination {
    return Ok(false);
  }
  if get_resolution(origin) != get_resolution(destination) {
    return Err(HexGridError::ResMismatch);
  }
  if !is_valid_cell(origin) || !is_valid_cell(destination) {
    return Err(HexGridError::CellInvalid);
  }

  Ok(direction_for_neighbor(origin, destination) != Direction::InvalidDigit)
}
