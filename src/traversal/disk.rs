//! Filled disks (k-rings) and hollow rings around an origin cell.

use std::collections::{HashMap, VecDeque};

use crate::constants::MAX_RES;
use crate::error::HexGridError;
use crate::ijk::Direction;
use crate::index::{CellIndex, NULL_INDEX, get_num_cells, is_pentagon, is_valid_cell};
use crate::traversal::neighbors::neighbor_rotations;

/// A disk of this radius covers every cell at the finest resolution, so the
/// usual size formula is capped there.
const K_ALL_CELLS_AT_MAX_RES: i32 = 13_780_510;

/// Spiral traversal visits the six sides of each ring in this order.
const DIRECTIONS: [Direction; 6] = [
  Direction::JAxes,
  Direction::JkAxes,
  Direction::KAxes,
  Direction::IkAxes,
  Direction::IAxes,
  Direction::IjAxes,
];

/// Direction used to move from one ring to the next.
const NEXT_RING_DIRECTION: Direction = Direction::IAxes;

/// Maximum number of cells in a disk of radius `k`.
pub fn max_grid_disk_size(k: i32) -> Result<i64, HexGridError> {
  if k < 0 {
    return Err(HexGridError::Domain);
  }
  if k >= K_ALL_CELLS_AT_MAX_RES {
    // A disk of this radius cannot fit on the planet; it must contain
    // every cell.
    return get_num_cells(MAX_RES);
  }
  let k = i64::from(k);
  Ok(3 * k * (k + 1) + 1)
}

/// Cells within grid distance `k` of the origin, paired with their distance.
///
/// Breadth-first expansion, so it handles pentagon distortion: a deleted
/// pentagon direction just contributes no neighbor. Output is ordered by
/// nondecreasing distance, origin first.
pub fn grid_disk_distances(
  origin: CellIndex,
  k: i32,
) -> Result<Vec<(CellIndex, i32)>, HexGridError> {
  if k < 0 {
    return Err(HexGridError::Domain);
  }
  if !is_valid_cell(origin) {
    return Err(HexGridError::CellInvalid);
  }

  let mut out = Vec::new();
  let mut seen: HashMap<CellIndex, i32> = HashMap::new();
  let mut queue: VecDeque<(CellIndex, i32)> = VecDeque::new();

  seen.insert(origin, 0);
  queue.push_back((origin, 0));

  while let Some((cell, distance)) = queue.pop_front() {
    out.push((cell, distance));
    if distance >= k {
      continue;
    }

    for dir in DIRECTIONS {
      let mut rotations = 0;
      let mut neighbor = NULL_INDEX;
      match neighbor_rotations(cell, dir, &mut rotations, &mut neighbor) {
        Ok(()) => {
          if !seen.contains_key(&neighbor) {
            seen.insert(neighbor, distance + 1);
            queue.push_back((neighbor, distance + 1));
          }
        }
        // No neighbor across a pentagon's deleted subsequence.
        Err(HexGridError::Pentagon) => continue,
        Err(e) => return Err(e),
      }
    }
  }
  Ok(out)
}

/// Cells within grid distance `k` of the origin.
pub fn grid_disk(origin: CellIndex, k: i32) -> Result<Vec<CellIndex>, HexGridError> {
  Ok(
    grid_disk_distances(origin, k)?
      .into_iter()
      .map(|(cell, _)| cell)
      .collect(),
  )
}

/// Spiral-ordered disk of radius `k`, each cell paired with its ring number.
///
/// Cells come out in order of increasing ring, each ring traversed in a
/// fixed spiral. Fails with [`HexGridError::Pentagon`] whenever the spiral
/// touches a pentagon, since the fixed-order guarantee cannot then be met.
pub fn grid_disk_distances_unsafe(
  origin: CellIndex,
  k: i32,
) -> Result<Vec<(CellIndex, i32)>, HexGridError> {
  if k < 0 {
    return Err(HexGridError::Domain);
  }

  let mut out = Vec::with_capacity(max_grid_disk_size(k)? as usize);
  let mut current = origin;
  out.push((current, 0));

  if is_pentagon(current) {
    return Err(HexGridError::Pentagon);
  }

  // Current ring, current side of the ring, and position along that side.
  let mut ring = 1;
  let mut direction = 0;
  let mut i = 0;
  // Accumulated ccw rotations from crossed icosahedron edges.
  let mut rotations = 0;

  while ring <= k {
    if direction == 0 && i == 0 {
      // Step out to the start of the next ring.
      let mut next = NULL_INDEX;
      neighbor_rotations(current, NEXT_RING_DIRECTION, &mut rotations, &mut next)?;
      current = next;

      if is_pentagon(current) {
        return Err(HexGridError::Pentagon);
      }
    }

    let mut next = NULL_INDEX;
    neighbor_rotations(current, DIRECTIONS[direction], &mut rotations, &mut next)?;
    current = next;
    out.push((current, ring));

    i += 1;
    if i == ring {
      // End of this side of the ring.
      i = 0;
      direction += 1;
      if direction == 6 {
        direction = 0;
        ring += 1;
      }
    }

    if is_pentagon(current) {
      return Err(HexGridError::Pentagon);
    }
  }
  Ok(out)
}

/// Spiral-ordered disk of radius `k`; see [`grid_disk_distances_unsafe`].
pub fn grid_disk_unsafe(origin: CellIndex, k: i32) -> Result<Vec<CellIndex>, HexGridError> {
  Ok(
    grid_disk_distances_unsafe(origin, k)?
      .into_iter()
      .map(|(cell, _)| cell)
      .collect(),
  )
}

/// The hollow ring of cells at exactly grid distance `k` from the origin:
/// `6 * k` cells, or just the origin for `k == 0`.
///
/// Fails with [`HexGridError::Pentagon`] if the ring touches a pentagon.
pub fn grid_ring_unsafe(origin: CellIndex, k: i32) -> Result<Vec<CellIndex>, HexGridError> {
  if k < 0 {
    return Err(HexGridError::Domain);
  }
  if k == 0 {
    return Ok(vec![origin]);
  }

  let mut out = Vec::with_capacity(6 * k as usize);
  let mut rotations = 0;
  let mut current = origin;

  if is_pentagon(current) {
    return Err(HexGridError::Pentagon);
  }

  for _ in 0..k {
    let mut next = NULL_INDEX;
    neighbor_rotations(current, NEXT_RING_DIRECTION, &mut rotations, &mut next)?;
    current = next;
    if is_pentagon(current) {
      return Err(HexGridError::Pentagon);
    }
  }

  let first = current;
  out.push(current);

  for direction in 0..6 {
    for pos in 0..k {
      let mut next = NULL_INDEX;
      neighbor_rotations(current, DIRECTIONS[direction], &mut rotations, &mut next)?;
      current = next;

      // The very last step returns to the start of the ring. Traverse it
      // anyway for the distortion check below, but do not emit it twice.
      if pos != k - 1 || direction != 5 {
        out.push(current);
        if is_pentagon(current) {
          return Err(HexGridError::Pentagon);
        }
      }
    }
  }

  // If the walk did not close, pentagon distortion pulled it off course.
  if current != first {
    return Err(HexGridError::Pentagon);
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::NUM_CELLS_MAX_RES;
  use crate::geo::{LatLng, _set_geo_degs};
  use crate::hierarchy::cell_to_center_child;
  use crate::index::base_cell_number_to_cell;
  use crate::indexing::lat_lng_to_cell;
  use std::collections::HashSet;

  fn sf_cell(res: i32) -> CellIndex {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.779, -122.419);
    lat_lng_to_cell(&geo, res).unwrap()
  }

  fn pentagon_cell(res: i32) -> CellIndex {
    cell_to_center_child(base_cell_number_to_cell(4), res).unwrap()
  }

  #[test]
  fn test_max_grid_disk_size() {
    assert_eq!(max_grid_disk_size(0), Ok(1));
    assert_eq!(max_grid_disk_size(1), Ok(7));
    assert_eq!(max_grid_disk_size(2), Ok(19));
    assert_eq!(max_grid_disk_size(-1), Err(HexGridError::Domain));
    assert_eq!(
      max_grid_disk_size(K_ALL_CELLS_AT_MAX_RES),
      Ok(NUM_CELLS_MAX_RES)
    );
  }

  #[test]
  fn test_grid_disk_k0() {
    let origin = sf_cell(5);
    assert_eq!(grid_disk(origin, 0), Ok(vec![origin]));
    assert_eq!(grid_disk_distances(origin, 0), Ok(vec![(origin, 0)]));
  }

  #[test]
  fn test_grid_disk_k1_hexagon() {
    let origin = sf_cell(5);
    let disk = grid_disk_distances(origin, 1).unwrap();
    assert_eq!(disk.len(), 7);
    assert_eq!(disk[0], (origin, 0));

    let unique: HashSet<_> = disk.iter().map(|&(cell, _)| cell).collect();
    assert_eq!(unique.len(), 7);
    for &(cell, distance) in &disk[1..] {
      assert!(is_valid_cell(cell));
      assert_eq!(distance, 1);
    }
  }

  #[test]
  fn test_grid_disk_k2_counts() {
    let origin = sf_cell(9);
    let disk = grid_disk_distances(origin, 2).unwrap();
    assert_eq!(disk.len(), 19);
    assert_eq!(disk.iter().filter(|&&(_, d)| d == 0).count(), 1);
    assert_eq!(disk.iter().filter(|&&(_, d)| d == 1).count(), 6);
    assert_eq!(disk.iter().filter(|&&(_, d)| d == 2).count(), 12);
  }

  #[test]
  fn test_grid_disk_pentagon_origin() {
    // A pentagon has only 5 neighbors, so the k=1 disk has 6 cells.
    let pentagon = pentagon_cell(1);
    assert!(is_pentagon(pentagon));

    let disk = grid_disk_distances(pentagon, 1).unwrap();
    assert_eq!(disk.len(), 6);
    assert_eq!(disk[0], (pentagon, 0));
    for &(cell, distance) in &disk[1..] {
      assert_eq!(distance, 1);
      assert!(is_valid_cell(cell));
      assert!(!is_pentagon(cell));
    }
  }

  #[test]
  fn test_grid_disk_errors() {
    assert_eq!(grid_disk(sf_cell(5), -1), Err(HexGridError::Domain));
    assert_eq!(grid_disk(NULL_INDEX, 1), Err(HexGridError::CellInvalid));
  }

  #[test]
  fn test_grid_disk_unsafe_matches_safe_away_from_pentagons() {
    let origin = sf_cell(5);
    for k in 0..=3 {
      let spiral = grid_disk_distances_unsafe(origin, k).unwrap();
      assert_eq!(spiral.len(), max_grid_disk_size(k).unwrap() as usize);
      assert_eq!(spiral[0], (origin, 0));

      let safe: HashSet<_> = grid_disk(origin, k).unwrap().into_iter().collect();
      let unsafe_set: HashSet<_> = spiral.iter().map(|&(cell, _)| cell).collect();
      assert_eq!(safe, unsafe_set, "k {k}");

      // Spiral distances are the ring number, which equals grid distance
      // away from pentagons.
      for window in spiral.windows(2) {
        assert!(window[0].1 <= window[1].1);
      }
    }
  }

  #[test]
  fn test_grid_disk_unsafe_pentagon_origin_fails() {
    let pentagon = pentagon_cell(1);
    assert_eq!(
      grid_disk_unsafe(pentagon, 1),
      Err(HexGridError::Pentagon)
    );
    // Even k=0 reports the pentagon, matching the strict contract.
    assert_eq!(
      grid_disk_unsafe(pentagon, 0),
      Err(HexGridError::Pentagon)
    );
  }

  #[test]
  fn test_grid_disk_unsafe_near_pentagon_fails() {
    let pentagon = pentagon_cell(1);
    let neighbor = grid_disk(pentagon, 1)
      .unwrap()
      .into_iter()
      .find(|&cell| cell != pentagon)
      .unwrap();
    assert!(!is_pentagon(neighbor));

    // The k=1 spiral around a pentagon neighbor includes the pentagon.
    assert_eq!(
      grid_disk_unsafe(neighbor, 1),
      Err(HexGridError::Pentagon)
    );
  }

  #[test]
  fn test_grid_ring_unsafe_k0() {
    let origin = sf_cell(9);
    assert_eq!(grid_ring_unsafe(origin, 0), Ok(vec![origin]));
  }

  #[test]
  fn test_grid_ring_unsafe_matches_disk_shell() {
    let origin = sf_cell(9);
    for k in 1..=3 {
      let ring = grid_ring_unsafe(origin, k).unwrap();
      assert_eq!(ring.len(), 6 * k as usize);

      let unique: HashSet<_> = ring.iter().copied().collect();
      assert_eq!(unique.len(), ring.len(), "k {k} cells unique");
      assert!(!unique.contains(&origin));

      let shell: HashSet<_> = grid_disk_distances(origin, k)
        .unwrap()
        .into_iter()
        .filter(|&(_, d)| d == k)
        .map(|(cell, _)| cell)
        .collect();
      assert_eq!(unique, shell, "k {k} matches BFS shell");
    }
  }

  #[test]
  fn test_grid_ring_unsafe_pentagon_failures() {
    let pentagon = pentagon_cell(1);
    assert_eq!(grid_ring_unsafe(pentagon, 1), Err(HexGridError::Pentagon));

    let neighbor = grid_disk(pentagon, 1)
      .unwrap()
      .into_iter()
      .find(|&cell| cell != pentagon)
      .unwrap();
    assert_eq!(grid_ring_unsafe(neighbor, 1), Err(HexGridError::Pentagon));
  }

  #[test]
  fn test_grid_ring_unsafe_invalid_k() {
    assert_eq!(grid_ring_unsafe(sf_cell(5), -1), Err(HexGridError::Domain));
  }
}
