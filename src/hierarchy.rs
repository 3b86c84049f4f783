//! Parent/child hierarchy: truncation to parents, enumeration of children,
//! child positions, and compaction of cell sets.

use std::collections::HashMap;

use crate::constants::{MAX_RES, NUM_BASE_CELLS};
use crate::error::HexGridError;
use crate::ijk::Direction;
use crate::index::{
  CellIndex, NULL_INDEX, base_cell_number_to_cell, get_index_digit, get_resolution, is_pentagon,
  is_valid_cell, set_index_digit, set_resolution,
};
use crate::math::_ipow;

/// Sets the digits for resolutions `start..=end` to center.
pub(crate) fn _zero_index_digits(mut h: CellIndex, start: i32, end: i32) -> CellIndex {
  for r in start..=end {
    set_index_digit(&mut h, r, Direction::Center);
  }
  h
}

fn _has_child_at_res(parent: CellIndex, child_res: i32) -> bool {
  let parent_res = get_resolution(parent);
  (parent_res..=MAX_RES).contains(&child_res)
}

/// The parent of a cell at a coarser (or equal) resolution.
pub fn cell_to_parent(h: CellIndex, parent_res: i32) -> Result<CellIndex, HexGridError> {
  if !is_valid_cell(h) {
    return Err(HexGridError::CellInvalid);
  }
  let child_res = get_resolution(h);
  if parent_res < 0 || parent_res > child_res {
    return Err(HexGridError::ResDomain);
  }
  if parent_res == child_res {
    return Ok(h);
  }

  let mut parent = h;
  set_resolution(&mut parent, parent_res);
  for r in (parent_res + 1)..=child_res {
    set_index_digit(&mut parent, r, Direction::InvalidDigit);
  }
  Ok(parent)
}

/// Exact number of children of a cell at a finer (or equal) resolution.
pub fn cell_to_children_size(h: CellIndex, child_res: i32) -> Result<i64, HexGridError> {
  if !is_valid_cell(h) {
    return Err(HexGridError::CellInvalid);
  }
  if !_has_child_at_res(h, child_res) {
    return Err(HexGridError::ResDomain);
  }

  let n = i64::from(child_res - get_resolution(h));
  if is_pentagon(h) {
    // Center child stays pentagonal; the other five positions spawn full
    // hexagon subtrees.
    Ok(1 + 5 * (_ipow(7, n) - 1) / 6)
  } else {
    Ok(_ipow(7, n))
  }
}

/// The child of a cell at `child_res` that contains the cell's center.
pub fn cell_to_center_child(h: CellIndex, child_res: i32) -> Result<CellIndex, HexGridError> {
  if !is_valid_cell(h) {
    return Err(HexGridError::CellInvalid);
  }
  if !_has_child_at_res(h, child_res) {
    return Err(HexGridError::ResDomain);
  }

  let parent_res = get_resolution(h);
  let mut child = h;
  set_resolution(&mut child, child_res);
  Ok(_zero_index_digits(child, parent_res + 1, child_res))
}

/// All children of a cell at `child_res`, in index order.
pub fn cell_to_children(h: CellIndex, child_res: i32) -> Result<Vec<CellIndex>, HexGridError> {
  let size = cell_to_children_size(h, child_res)?;
  let mut children = Vec::with_capacity(size as usize);
  children.extend(ChildrenIter::new(h, child_res));
  Ok(children)
}

/// Position of a cell within the ordered list of all descendants of its
/// ancestor at `parent_res`.
pub fn cell_to_child_pos(child: CellIndex, parent_res: i32) -> Result<i64, HexGridError> {
  if !is_valid_cell(child) {
    return Err(HexGridError::CellInvalid);
  }
  let child_res = get_resolution(child);
  if parent_res < 0 || parent_res > child_res {
    return Err(HexGridError::ResDomain);
  }

  let mut pos: i64 = 0;
  for r in (parent_res + 1)..=child_res {
    let digit = get_index_digit(child, r);
    let parent_of_digit = cell_to_parent(child, r - 1)?;
    let parent_is_pentagon = is_pentagon(parent_of_digit);
    let per_slot = _ipow(7, i64::from(child_res - r));

    let mut slot = digit as i64;
    if parent_is_pentagon {
      if digit == Direction::KAxes {
        return Err(HexGridError::CellInvalid);
      }
      if digit > Direction::KAxes {
        slot -= 1;
      }
    }

    if slot > 0 {
      // Descendants in the center slot, then in the slots before this one.
      pos += if parent_is_pentagon {
        1 + 5 * (per_slot - 1) / 6
      } else {
        per_slot
      };
      pos += (slot - 1) * per_slot;
    }
  }
  Ok(pos)
}

/// The child at position `child_pos` within the ordered list of all
/// descendants of `parent` at `child_res`. Inverse of [`cell_to_child_pos`].
pub fn child_pos_to_cell(
  child_pos: i64,
  parent: CellIndex,
  child_res: i32,
) -> Result<CellIndex, HexGridError> {
  if !is_valid_cell(parent) {
    return Err(HexGridError::CellInvalid);
  }
  if !(0..=MAX_RES).contains(&child_res) {
    return Err(HexGridError::ResDomain);
  }
  let parent_res = get_resolution(parent);
  if child_res < parent_res {
    return Err(HexGridError::ResMismatch);
  }
  let max_pos = cell_to_children_size(parent, child_res)?;
  if child_pos < 0 || child_pos >= max_pos {
    return Err(HexGridError::Domain);
  }

  let mut child = parent;
  set_resolution(&mut child, child_res);
  let mut remaining = child_pos;
  let mut on_pentagon_path = is_pentagon(parent);

  for r in (parent_res + 1)..=child_res {
    let per_slot = _ipow(7, i64::from(child_res - r));
    if on_pentagon_path {
      let center_descendants = 1 + 5 * (per_slot - 1) / 6;
      if remaining < center_descendants {
        set_index_digit(&mut child, r, Direction::Center);
      } else {
        remaining -= center_descendants;
        // Slots after center skip the k axes digit.
        let digit = remaining / per_slot + 2;
        set_index_digit(&mut child, r, Direction::from_u64(digit as u64));
        on_pentagon_path = false;
      }
    } else {
      let digit = remaining / per_slot;
      set_index_digit(&mut child, r, Direction::from_u64(digit as u64));
    }
    remaining %= per_slot;
  }

  Ok(child)
}

/// Iterator over the children of a cell at a fixed finer resolution, in
/// index order. Walks digit counters directly rather than materializing the
/// set.
#[derive(Debug, Clone, Copy)]
pub struct ChildrenIter {
  next: CellIndex,
  parent_res: i32,
  // Resolution whose digit must currently skip the deleted k axes; moves
  // coarser as the iteration proceeds. -1 on hexagon paths.
  skip_digit_res: i32,
}

impl ChildrenIter {
  pub fn new(parent: CellIndex, child_res: i32) -> Self {
    let parent_res = get_resolution(parent);
    if child_res < parent_res || child_res > MAX_RES || !is_valid_cell(parent) {
      return Self::exhausted();
    }

    let mut first = parent;
    set_resolution(&mut first, child_res);
    first = _zero_index_digits(first, parent_res + 1, child_res);

    Self {
      next: first,
      parent_res,
      skip_digit_res: if is_pentagon(parent) { child_res } else { -1 },
    }
  }

  fn exhausted() -> Self {
    Self {
      next: NULL_INDEX,
      parent_res: -1,
      skip_digit_res: -1,
    }
  }

  /// Increments the digit at `res`, cascading rollovers toward the parent.
  /// Returns false when the counter rolls past the parent.
  fn increment_from(&mut self, res: i32) -> bool {
    let mut r = res;
    loop {
      if r < self.parent_res + 1 {
        return false;
      }
      let digit = get_index_digit(self.next, r) as u64 + 1;
      if digit >= Direction::InvalidDigit as u64 {
        set_index_digit(&mut self.next, r, Direction::Center);
        if r == self.parent_res + 1 {
          return false;
        }
        r -= 1;
      } else {
        set_index_digit(&mut self.next, r, Direction::from_u64(digit));
        return true;
      }
    }
  }

  fn step(&mut self) {
    let child_res = get_resolution(self.next);
    if !self.increment_from(child_res) {
      *self = Self::exhausted();
      return;
    }

    if self.skip_digit_res >= self.parent_res + 1
      && get_index_digit(self.next, self.skip_digit_res) == Direction::KAxes
    {
      if !self.increment_from(self.skip_digit_res) {
        *self = Self::exhausted();
        return;
      }
      self.skip_digit_res -= 1;
    }
  }
}

impl Iterator for ChildrenIter {
  type Item = CellIndex;

  fn next(&mut self) -> Option<CellIndex> {
    if self.next == NULL_INDEX {
      return None;
    }
    let current = self.next;
    self.step();
    Some(current)
  }
}

/// Iterator over every cell at a resolution, base cell by base cell.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionIter {
  base_cell: i32,
  res: i32,
  children: ChildrenIter,
}

/// All cells at the given resolution, in base cell then index order.
pub fn cells_at_resolution(res: i32) -> ResolutionIter {
  if !(0..=MAX_RES).contains(&res) {
    return ResolutionIter {
      base_cell: NUM_BASE_CELLS,
      res,
      children: ChildrenIter::exhausted(),
    };
  }
  ResolutionIter {
    base_cell: 0,
    res,
    children: ChildrenIter::new(base_cell_number_to_cell(0), res),
  }
}

impl Iterator for ResolutionIter {
  type Item = CellIndex;

  fn next(&mut self) -> Option<CellIndex> {
    loop {
      if let Some(cell) = self.children.next() {
        return Some(cell);
      }
      self.base_cell += 1;
      if self.base_cell >= NUM_BASE_CELLS {
        return None;
      }
      self.children = ChildrenIter::new(base_cell_number_to_cell(self.base_cell), self.res);
    }
  }
}

/// Number of cells produced by uncompacting a set to resolution `res`.
pub fn uncompact_cells_size(compacted: &[CellIndex], res: i32) -> Result<i64, HexGridError> {
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }

  let mut count: i64 = 0;
  for &cell in compacted {
    if cell == NULL_INDEX {
      continue;
    }
    if !is_valid_cell(cell) {
      return Err(HexGridError::CellInvalid);
    }
    if get_resolution(cell) > res {
      return Err(HexGridError::ResMismatch);
    }
    count = count.saturating_add(cell_to_children_size(cell, res)?);
  }
  Ok(count)
}

/// Expands a compacted set to the uniform resolution `res`.
pub fn uncompact_cells(compacted: &[CellIndex], res: i32) -> Result<Vec<CellIndex>, HexGridError> {
  let size = uncompact_cells_size(compacted, res)?;
  let mut out = Vec::with_capacity(size as usize);
  for &cell in compacted {
    if cell == NULL_INDEX {
      continue;
    }
    out.extend(ChildrenIter::new(cell, res));
  }
  Ok(out)
}

/// Compacts a set of same-resolution cells into the smallest set of
/// ancestors covering exactly the same area.
pub fn compact_cells(cells: &[CellIndex]) -> Result<Vec<CellIndex>, HexGridError> {
  let mut current: Vec<CellIndex> = cells.iter().copied().filter(|&h| h != NULL_INDEX).collect();
  if current.is_empty() {
    return Ok(Vec::new());
  }

  current.sort_unstable();
  let res = get_resolution(current[0]);
  for (i, &cell) in current.iter().enumerate() {
    if !is_valid_cell(cell) {
      return Err(HexGridError::CellInvalid);
    }
    if get_resolution(cell) != res {
      return Err(HexGridError::ResMismatch);
    }
    if i > 0 && cell == current[i - 1] {
      return Err(HexGridError::DuplicateInput);
    }
  }

  let mut out = Vec::new();
  while !current.is_empty() {
    let current_res = get_resolution(current[0]);
    if current_res == 0 {
      out.append(&mut current);
      break;
    }

    // Group by parent; a parent whose whole brood is present replaces it.
    let parent_res = current_res - 1;
    let mut by_parent: HashMap<CellIndex, Vec<CellIndex>> = HashMap::new();
    for &cell in &current {
      let parent = cell_to_parent(cell, parent_res)?;
      by_parent.entry(parent).or_default().push(cell);
    }

    let mut next = Vec::new();
    for (parent, group) in by_parent {
      let children_needed = if is_pentagon(parent) { 6 } else { 7 };
      if group.len() == children_needed {
        next.push(parent);
      } else {
        out.extend(group);
      }
    }

    next.sort_unstable();
    current = next;
  }

  out.sort_unstable();
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::geo::{LatLng, _set_geo_degs};
  use crate::index::{_set_cell_index, get_base_cell};
  use crate::indexing::lat_lng_to_cell;

  fn sf_cell(res: i32) -> CellIndex {
    let mut geo = LatLng::default();
    _set_geo_degs(&mut geo, 37.779, -122.419);
    lat_lng_to_cell(&geo, res).unwrap()
  }

  fn pentagon(res: i32) -> CellIndex {
    let mut h = CellIndex::default();
    _set_cell_index(&mut h, res, 4, Direction::Center);
    h
  }

  #[test]
  fn test_cell_to_parent() {
    let child = sf_cell(10);

    let parent9 = cell_to_parent(child, 9).unwrap();
    assert_eq!(get_resolution(parent9), 9);
    assert_eq!(parent9.0, 0x89283082877ffff);

    let parent5 = cell_to_parent(child, 5).unwrap();
    assert_eq!(parent5.0, 0x85283083fffffff);

    assert_eq!(cell_to_parent(child, 10), Ok(child));
    assert_eq!(cell_to_parent(child, 11), Err(HexGridError::ResDomain));
    assert_eq!(cell_to_parent(child, -1), Err(HexGridError::ResDomain));
    assert_eq!(cell_to_parent(NULL_INDEX, 5), Err(HexGridError::CellInvalid));
  }

  #[test]
  fn test_cell_to_children_size() {
    let mut hex = CellIndex::default();
    _set_cell_index(&mut hex, 5, 10, Direction::Center);
    assert_eq!(cell_to_children_size(hex, 5), Ok(1));
    assert_eq!(cell_to_children_size(hex, 6), Ok(7));
    assert_eq!(cell_to_children_size(hex, 7), Ok(49));
    assert_eq!(cell_to_children_size(hex, 4), Err(HexGridError::ResDomain));

    let pent = pentagon(5);
    assert!(is_pentagon(pent));
    assert_eq!(cell_to_children_size(pent, 5), Ok(1));
    assert_eq!(cell_to_children_size(pent, 6), Ok(6));
    assert_eq!(cell_to_children_size(pent, 7), Ok(41));
  }

  #[test]
  fn test_cell_to_center_child() {
    let mut hex = CellIndex::default();
    _set_cell_index(&mut hex, 5, 10, Direction::IjAxes);

    assert_eq!(cell_to_center_child(hex, 5), Ok(hex));

    let center6 = cell_to_center_child(hex, 6).unwrap();
    assert_eq!(get_resolution(center6), 6);
    assert_eq!(get_index_digit(center6, 6), Direction::Center);
    for r in 1..=5 {
      assert_eq!(get_index_digit(center6, r), get_index_digit(hex, r));
    }

    let pent_center = cell_to_center_child(pentagon(2), 4).unwrap();
    assert!(is_pentagon(pent_center));
    assert_eq!(get_base_cell(pent_center), 4);
  }

  #[test]
  fn test_children_iter_hexagon() {
    let parent = CellIndex(0x85283473fffffff);
    let children = cell_to_children(parent, 7).unwrap();
    assert_eq!(children.len(), 49);
    let mut prev = NULL_INDEX;
    for &child in &children {
      assert!(is_valid_cell(child));
      assert_eq!(get_resolution(child), 7);
      assert_eq!(cell_to_parent(child, 5).unwrap(), parent);
      assert!(child.0 > prev.0, "children in index order");
      prev = child;
    }
  }

  #[test]
  fn test_children_iter_pentagon() {
    let parent = base_cell_number_to_cell(4);
    assert!(is_pentagon(parent));
    let children = cell_to_children(parent, 2).unwrap();
    assert_eq!(children.len(), 41);
    let pentagons = children.iter().filter(|&&c| is_pentagon(c)).count();
    assert_eq!(pentagons, 1, "exactly one pentagonal descendant");
    for &child in &children {
      assert!(is_valid_cell(child));
      assert_eq!(cell_to_parent(child, 0).unwrap(), parent);
    }
  }

  #[test]
  fn test_children_iter_invalid() {
    let parent = CellIndex(0x85283473fffffff);
    assert_eq!(ChildrenIter::new(parent, 4).count(), 0);
    assert_eq!(ChildrenIter::new(parent, MAX_RES + 1).count(), 0);
    assert_eq!(ChildrenIter::new(NULL_INDEX, 5).count(), 0);
  }

  #[test]
  fn test_cells_at_resolution() {
    for res in 0..=2 {
      let expected = crate::index::get_num_cells(res).unwrap();
      let mut count = 0i64;
      let mut prev = NULL_INDEX;
      for cell in cells_at_resolution(res) {
        assert_eq!(get_resolution(cell), res);
        assert!(is_valid_cell(cell));
        assert!(prev == NULL_INDEX || cell.0 > prev.0);
        prev = cell;
        count += 1;
      }
      assert_eq!(count, expected, "res {res}");
    }
    assert_eq!(cells_at_resolution(-1).count(), 0);
  }

  #[test]
  fn test_child_pos_round_trip() {
    let mut parent = CellIndex::default();
    _set_cell_index(&mut parent, 2, 10, Direction::Center);

    let children = cell_to_children(parent, 4).unwrap();
    for (expected_pos, &child) in children.iter().enumerate() {
      let pos = cell_to_child_pos(child, 2).unwrap();
      assert_eq!(pos, expected_pos as i64, "pos of {child}");
      assert_eq!(child_pos_to_cell(pos, parent, 4).unwrap(), child);
    }
  }

  #[test]
  fn test_child_pos_round_trip_pentagon() {
    let parent = pentagon(1);
    let children = cell_to_children(parent, 3).unwrap();
    for (expected_pos, &child) in children.iter().enumerate() {
      let pos = cell_to_child_pos(child, 1).unwrap();
      assert_eq!(pos, expected_pos as i64, "pos of pentagon child {child}");
      assert_eq!(child_pos_to_cell(pos, parent, 3).unwrap(), child);
    }
  }

  #[test]
  fn test_child_pos_errors() {
    let child = sf_cell(8);
    assert_eq!(cell_to_child_pos(child, -1), Err(HexGridError::ResDomain));
    assert_eq!(cell_to_child_pos(child, 9), Err(HexGridError::ResDomain));

    let parent = sf_cell(5);
    assert_eq!(child_pos_to_cell(0, parent, 4), Err(HexGridError::ResMismatch));
    assert_eq!(child_pos_to_cell(0, parent, 16), Err(HexGridError::ResDomain));
    assert_eq!(child_pos_to_cell(-1, parent, 6), Err(HexGridError::Domain));
    assert_eq!(child_pos_to_cell(100, parent, 6), Err(HexGridError::Domain));
  }

  #[test]
  fn test_uncompact_cells_size() {
    let compacted = [CellIndex(0x85283473fffffff)];
    assert_eq!(uncompact_cells_size(&compacted, 5), Ok(1));
    assert_eq!(uncompact_cells_size(&compacted, 6), Ok(7));
    assert_eq!(uncompact_cells_size(&compacted, 7), Ok(49));
    assert_eq!(uncompact_cells_size(&compacted, 4), Err(HexGridError::ResMismatch));
    assert_eq!(uncompact_cells_size(&[NULL_INDEX], 5), Ok(0));

    let pent = [base_cell_number_to_cell(4)];
    assert_eq!(uncompact_cells_size(&pent, 1), Ok(6));
    assert_eq!(uncompact_cells_size(&pent, 2), Ok(41));
  }

  #[test]
  fn test_uncompact_cells() {
    let compacted = [CellIndex(0x85283473fffffff)];

    let same = uncompact_cells(&compacted, 5).unwrap();
    assert_eq!(same, vec![compacted[0]]);

    let finer = uncompact_cells(&compacted, 6).unwrap();
    let children = cell_to_children(compacted[0], 6).unwrap();
    assert_eq!(finer, children);
  }

  #[test]
  fn test_compact_round_trip() {
    let parent = CellIndex(0x85283473fffffff);
    let children = cell_to_children(parent, 6).unwrap();
    assert_eq!(compact_cells(&children), Ok(vec![parent]));

    // Remove one child; nothing compacts.
    let partial = &children[1..];
    let mut expected = partial.to_vec();
    expected.sort_unstable();
    assert_eq!(compact_cells(partial), Ok(expected));
  }

  #[test]
  fn test_compact_multi_level() {
    // All res 2 descendants of a res 0 cell compact back to the base cell.
    let base = base_cell_number_to_cell(10);
    let cells = cell_to_children(base, 2).unwrap();
    assert_eq!(compact_cells(&cells), Ok(vec![base]));
  }

  #[test]
  fn test_compact_pentagon_children() {
    let pent = base_cell_number_to_cell(4);
    let children = cell_to_children(pent, 1).unwrap();
    assert_eq!(children.len(), 6);
    assert_eq!(compact_cells(&children), Ok(vec![pent]));
  }

  #[test]
  fn test_compact_errors() {
    let dupes = [CellIndex(0x86283470fffffff), CellIndex(0x86283470fffffff)];
    assert_eq!(compact_cells(&dupes), Err(HexGridError::DuplicateInput));

    let mixed = [CellIndex(0x85283473fffffff), CellIndex(0x86283470fffffff)];
    assert_eq!(compact_cells(&mixed), Err(HexGridError::ResMismatch));

    assert_eq!(compact_cells(&[]), Ok(Vec::new()));
  }
}
