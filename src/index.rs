//! The 64-bit cell index: bit layout accessors, validation, inspection, and
//! the conversions between indexes and face IJK+ coordinates.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::basecells::{
  BASE_CELL_DATA, INVALID_BASE_CELL, INVALID_ROTATIONS, MAX_FACE_COORD, _base_cell_is_cw_offset,
  _face_ijk_to_base_cell, _face_ijk_to_base_cell_ccwrot60, _is_base_cell_pentagon,
};
use crate::constants::{
  BASE_CELL_MASK, BASE_CELL_MASK_NEGATIVE, BASE_CELL_OFFSET, CELL_MODE, DIGIT_MASK,
  HIGH_BIT_MASK, HIGH_BIT_MASK_NEGATIVE, INDEX_INIT, INVALID_FACE, MAX_RES, MODE_MASK,
  MODE_MASK_NEGATIVE, MODE_OFFSET, NUM_BASE_CELLS, NUM_HEX_VERTS, NUM_PENTAGONS, NUM_PENT_VERTS,
  PER_DIGIT_OFFSET, RESERVED_MASK, RESERVED_MASK_NEGATIVE, RESERVED_OFFSET, RES_MASK,
  RES_MASK_NEGATIVE, RES_OFFSET,
};
use crate::error::HexGridError;
use crate::face::{
  FaceIJK, Overage, _adjust_overage_class_ii, _adjust_pent_vert_overage, _face_ijk_pent_to_verts,
  _face_ijk_to_verts,
};
use crate::ijk::{
  CoordIJK, Direction, _down_ap7, _down_ap7r, _ijk_normalize, _ijk_sub, _neighbor, _rotate60_ccw,
  _rotate60_cw, _unit_ijk_to_digit, _up_ap7, _up_ap7r,
};
use crate::math::_ipow;

/// A cell (or directed edge) in the grid, packed into 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct CellIndex(pub u64);

/// The null index, returned by operations that cannot produce a cell.
pub const NULL_INDEX: CellIndex = CellIndex(0);

impl fmt::Display for CellIndex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:x}", self.0)
  }
}

impl fmt::LowerHex for CellIndex {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::LowerHex::fmt(&self.0, f)
  }
}

impl FromStr for CellIndex {
  type Err = HexGridError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.is_empty() {
      return Err(HexGridError::Failed);
    }
    u64::from_str_radix(s, 16)
      .map(CellIndex)
      .map_err(|_| HexGridError::Failed)
  }
}

/// Lowercase hex form of the index, without prefix.
pub fn index_to_string(h: CellIndex) -> String {
  format!("{h:x}")
}

/// Parses the form produced by [`index_to_string`].
pub fn string_to_index(s: &str) -> Result<CellIndex, HexGridError> {
  s.parse()
}

// Bit layout accessors.

/// Gets the mode of the index.
#[inline(always)]
#[must_use]
pub const fn get_mode(h: CellIndex) -> u8 {
  ((h.0 & MODE_MASK) >> MODE_OFFSET) as u8
}

/// Sets the mode of the index.
#[inline(always)]
pub fn set_mode(h: &mut CellIndex, mode: u8) {
  h.0 = (h.0 & MODE_MASK_NEGATIVE) | ((mode as u64) << MODE_OFFSET);
}

/// Gets the resolution of the index.
#[inline(always)]
#[must_use]
pub const fn get_resolution(h: CellIndex) -> i32 {
  ((h.0 & RES_MASK) >> RES_OFFSET) as i32
}

/// Sets the resolution of the index.
#[inline(always)]
pub fn set_resolution(h: &mut CellIndex, res: i32) {
  h.0 = (h.0 & RES_MASK_NEGATIVE) | ((res as u64) << RES_OFFSET);
}

/// Gets the base cell of the index.
#[inline(always)]
#[must_use]
pub const fn get_base_cell(h: CellIndex) -> i32 {
  ((h.0 & BASE_CELL_MASK) >> BASE_CELL_OFFSET) as i32
}

/// Sets the base cell of the index.
#[inline(always)]
pub fn set_base_cell(h: &mut CellIndex, bc: i32) {
  h.0 = (h.0 & BASE_CELL_MASK_NEGATIVE) | ((bc as u64) << BASE_CELL_OFFSET);
}

/// Gets the indexing digit for resolution `res`, which must be between 1 and
/// the index's own resolution.
#[inline(always)]
#[must_use]
pub fn get_index_digit(h: CellIndex, res: i32) -> Direction {
  let val = (h.0 >> ((MAX_RES - res) * i32::from(PER_DIGIT_OFFSET))) & DIGIT_MASK;
  Direction::from_u64(val)
}

/// Sets the indexing digit for resolution `res`.
#[inline(always)]
pub fn set_index_digit(h: &mut CellIndex, res: i32, digit: Direction) {
  let offset = (MAX_RES - res) * i32::from(PER_DIGIT_OFFSET);
  h.0 = (h.0 & !(DIGIT_MASK << offset)) | (u64::from(digit) << offset);
}

/// Gets the reserved bits; 0 for valid cell indexes, the edge direction for
/// directed edge indexes.
#[inline(always)]
#[must_use]
pub const fn get_reserved_bits(h: CellIndex) -> u8 {
  ((h.0 & RESERVED_MASK) >> RESERVED_OFFSET) as u8
}

/// Sets the reserved bits.
#[inline(always)]
pub fn set_reserved_bits(h: &mut CellIndex, v: u8) {
  h.0 = (h.0 & RESERVED_MASK_NEGATIVE) | ((v as u64) << RESERVED_OFFSET);
}

/// Gets the high bit, which must be 0 for any valid index.
#[inline(always)]
#[must_use]
pub const fn get_high_bit(h: CellIndex) -> u8 {
  ((h.0 & HIGH_BIT_MASK) >> 63) as u8
}

/// Sets the high bit.
#[inline(always)]
pub fn set_high_bit(h: &mut CellIndex, v: u8) {
  h.0 = (h.0 & HIGH_BIT_MASK_NEGATIVE) | ((v as u64) << 63);
}

/// Initializes a cell index with the given resolution and base cell, with
/// every digit up to `res` set to `init_digit` and the rest left blank.
pub(crate) fn _set_cell_index(h: &mut CellIndex, res: i32, base_cell: i32, init_digit: Direction) {
  h.0 = INDEX_INIT;
  set_mode(h, CELL_MODE);
  set_resolution(h, res);
  set_base_cell(h, base_cell);
  for r in 1..=res {
    set_index_digit(h, r, init_digit);
  }
}

/// Whether a resolution is Class III. Odd resolutions are Class III, even
/// are Class II.
#[inline]
#[must_use]
pub(crate) const fn is_res_class_iii(res: i32) -> bool {
  res % 2 == 1
}

/// Whether the cell's resolution has Class III orientation.
#[inline]
#[must_use]
pub fn is_class_iii(h: CellIndex) -> bool {
  is_res_class_iii(get_resolution(h))
}

/// The coarsest non-center digit in the index, or `Center` if all digits
/// are center.
#[inline]
#[must_use]
pub(crate) fn _leading_non_zero_digit(h: CellIndex) -> Direction {
  let res = get_resolution(h);
  for r in 1..=res {
    let digit = get_index_digit(h, r);
    if digit != Direction::Center {
      return digit;
    }
  }
  Direction::Center
}

/// Rotates an index 60 degrees counter-clockwise.
pub(crate) fn _cell_rotate60_ccw(mut h: CellIndex) -> CellIndex {
  let res = get_resolution(h);
  for r in 1..=res {
    let digit = get_index_digit(h, r);
    set_index_digit(&mut h, r, _rotate60_ccw(digit));
  }
  h
}

/// Rotates an index 60 degrees clockwise.
pub(crate) fn _cell_rotate60_cw(mut h: CellIndex) -> CellIndex {
  let res = get_resolution(h);
  for r in 1..=res {
    let digit = get_index_digit(h, r);
    set_index_digit(&mut h, r, _rotate60_cw(digit));
  }
  h
}

/// Rotates an index 60 degrees counter-clockwise about a pentagonal center,
/// skipping the deleted k-axes subsequence.
pub(crate) fn _cell_rotate_pent60_ccw(mut h: CellIndex) -> CellIndex {
  let res = get_resolution(h);
  let mut found_first_non_zero = false;
  for r in 1..=res {
    let digit = get_index_digit(h, r);
    set_index_digit(&mut h, r, _rotate60_ccw(digit));

    if !found_first_non_zero && get_index_digit(h, r) != Direction::Center {
      found_first_non_zero = true;
      if _leading_non_zero_digit(h) == Direction::KAxes {
        h = _cell_rotate_pent60_ccw(h);
      }
    }
  }
  h
}

/// Rotates an index 60 degrees clockwise about a pentagonal center.
pub(crate) fn _cell_rotate_pent60_cw(mut h: CellIndex) -> CellIndex {
  let res = get_resolution(h);
  let mut found_first_non_zero = false;
  for r in 1..=res {
    let digit = get_index_digit(h, r);
    set_index_digit(&mut h, r, _rotate60_cw(digit));

    if !found_first_non_zero && get_index_digit(h, r) != Direction::Center {
      found_first_non_zero = true;
      if _leading_non_zero_digit(h) == Direction::KAxes {
        h = _cell_rotate_pent60_cw(h);
      }
    }
  }
  h
}

/// Encodes a face IJK+ address at the given resolution as a cell index, or
/// [`NULL_INDEX`] if the address is out of range.
pub(crate) fn _face_ijk_to_cell(fijk: &FaceIJK, res: i32) -> CellIndex {
  let mut h = CellIndex(INDEX_INIT);
  set_mode(&mut h, CELL_MODE);
  set_resolution(&mut h, res);

  if res == 0 {
    if fijk.coord.i > MAX_FACE_COORD || fijk.coord.j > MAX_FACE_COORD || fijk.coord.k > MAX_FACE_COORD
    {
      return NULL_INDEX;
    }
    let base_cell = _face_ijk_to_base_cell(fijk);
    if base_cell == INVALID_BASE_CELL {
      return NULL_INDEX;
    }
    set_base_cell(&mut h, base_cell);
    return h;
  }

  // Build the index digits from finest to coarsest: at each step the digit
  // is the offset of the current cell from the center child of its parent.
  let mut fijk_bc = *fijk;
  for r in (1..=res).rev() {
    let last_ijk = fijk_bc.coord;
    let mut last_center: CoordIJK;
    if is_res_class_iii(r) {
      _up_ap7(&mut fijk_bc.coord);
      last_center = fijk_bc.coord;
      _down_ap7(&mut last_center);
    } else {
      _up_ap7r(&mut fijk_bc.coord);
      last_center = fijk_bc.coord;
      _down_ap7r(&mut last_center);
    }

    let mut diff = CoordIJK::default();
    _ijk_sub(&last_ijk, &last_center, &mut diff);
    _ijk_normalize(&mut diff);

    let digit = _unit_ijk_to_digit(&diff);
    if digit == Direction::InvalidDigit {
      return NULL_INDEX;
    }
    set_index_digit(&mut h, r, digit);
  }

  if fijk_bc.coord.i > MAX_FACE_COORD
    || fijk_bc.coord.j > MAX_FACE_COORD
    || fijk_bc.coord.k > MAX_FACE_COORD
  {
    return NULL_INDEX;
  }

  let base_cell = _face_ijk_to_base_cell(&fijk_bc);
  if base_cell == INVALID_BASE_CELL {
    return NULL_INDEX;
  }
  set_base_cell(&mut h, base_cell);

  let num_rots = _face_ijk_to_base_cell_ccwrot60(&fijk_bc);
  if num_rots == INVALID_ROTATIONS {
    return NULL_INDEX;
  }

  if _is_base_cell_pentagon(base_cell) {
    // The deleted k-axes subsequence shows up here as a leading digit 1;
    // rotate it out, in the direction matching the base cell's orientation
    // on this face.
    if _leading_non_zero_digit(h) == Direction::KAxes {
      if _base_cell_is_cw_offset(base_cell, fijk_bc.face) {
        h = _cell_rotate60_cw(h);
      } else {
        h = _cell_rotate60_ccw(h);
      }
    }
    for _ in 0..num_rots {
      h = _cell_rotate_pent60_ccw(h);
    }
  } else {
    for _ in 0..num_rots {
      h = _cell_rotate60_ccw(h);
    }
  }
  h
}

/// Applies the index's digits to its base cell's home coordinates, leaving
/// `fijk` at the cell's position on the home face's grid. Returns whether
/// the result may lie past the face's bounds.
pub(crate) fn _cell_to_face_ijk_with_initialized_fijk(h: CellIndex, fijk: &mut FaceIJK) -> bool {
  let res = get_resolution(h);
  let base_cell = get_base_cell(h);

  let mut possible_overage = true;
  if !_is_base_cell_pentagon(base_cell)
    && (res == 0 || (fijk.coord.i == 0 && fijk.coord.j == 0 && fijk.coord.k == 0))
  {
    possible_overage = false;
  }

  for r in 1..=res {
    if is_res_class_iii(r) {
      _down_ap7(&mut fijk.coord);
    } else {
      _down_ap7r(&mut fijk.coord);
    }
    _neighbor(&mut fijk.coord, get_index_digit(h, r));
  }

  possible_overage
}

/// Decodes a cell index to its canonical face IJK+ address.
pub(crate) fn _cell_to_face_ijk(h: CellIndex, fijk: &mut FaceIJK) -> Result<(), HexGridError> {
  let base_cell = get_base_cell(h);
  if base_cell < 0 || base_cell >= NUM_BASE_CELLS {
    *fijk = FaceIJK::default();
    return Err(HexGridError::CellInvalid);
  }

  // A pentagon with a leading digit 5 must be rotated out of the deleted
  // k-axes subsequence before its digits are applied.
  let mut h_digits = h;
  if _is_base_cell_pentagon(base_cell) && _leading_non_zero_digit(h_digits) == Direction::IkAxes {
    h_digits = _cell_rotate60_cw(h_digits);
  }

  *fijk = BASE_CELL_DATA[base_cell as usize].home_fijk;
  if !_cell_to_face_ijk_with_initialized_fijk(h_digits, fijk) {
    return Ok(());
  }

  let orig_ijk = fijk.coord;

  // Overage adjustment always operates on a Class II grid.
  let res = get_resolution(h);
  let mut res_adj = res;
  if is_res_class_iii(res) {
    _down_ap7r(&mut fijk.coord);
    res_adj += 1;
  }

  let pent_leading_4 =
    _is_base_cell_pentagon(base_cell) && _leading_non_zero_digit(h_digits) == Direction::IAxes;

  let mut overage = _adjust_overage_class_ii(fijk, res_adj, pent_leading_4, false);
  if overage != Overage::NoOverage {
    if _is_base_cell_pentagon(base_cell) {
      while overage == Overage::NewFace {
        overage = _adjust_overage_class_ii(fijk, res_adj, false, false);
      }
    }
    if res_adj != res {
      _up_ap7r(&mut fijk.coord);
    }
  } else if res_adj != res {
    fijk.coord = orig_ijk;
  }

  Ok(())
}

// Validation and inspection.

fn _has_any_invalid_digit_up_to_res(h: CellIndex, res: i32) -> bool {
  for r in 1..=res {
    if get_index_digit(h, r) == Direction::InvalidDigit {
      return true;
    }
  }
  false
}

fn _has_all_blank_digits_after_res(h: CellIndex, res: i32) -> bool {
  if res < MAX_RES {
    let unused_bits = (MAX_RES - res) * i32::from(PER_DIGIT_OFFSET);
    let unused_mask = (1u64 << unused_bits) - 1;
    return h.0 & unused_mask == unused_mask;
  }
  true
}

fn _has_deleted_subsequence(h: CellIndex, base_cell: i32) -> bool {
  _is_base_cell_pentagon(base_cell) && _leading_non_zero_digit(h) == Direction::KAxes
}

/// Whether the index is a valid cell index.
#[must_use]
pub fn is_valid_cell(h: CellIndex) -> bool {
  if get_high_bit(h) != 0 || get_mode(h) != CELL_MODE || get_reserved_bits(h) != 0 {
    return false;
  }

  let res = get_resolution(h);
  if !(0..=MAX_RES).contains(&res) {
    return false;
  }
  let base_cell = get_base_cell(h);
  if !(0..NUM_BASE_CELLS).contains(&base_cell) {
    return false;
  }

  !_has_any_invalid_digit_up_to_res(h, res)
    && _has_all_blank_digits_after_res(h, res)
    && !_has_deleted_subsequence(h, base_cell)
}

/// Whether the cell is one of the twelve pentagons at its resolution.
#[must_use]
pub fn is_pentagon(h: CellIndex) -> bool {
  if get_mode(h) != CELL_MODE || !is_valid_cell(h) {
    return false;
  }
  _is_base_cell_pentagon(get_base_cell(h)) && _leading_non_zero_digit(h) == Direction::Center
}

/// The base cell number (0-121) of a cell index.
#[must_use]
pub fn get_base_cell_number(h: CellIndex) -> i32 {
  get_base_cell(h)
}

/// The resolution 0 cell index for a base cell number, or [`NULL_INDEX`]
/// for an out-of-range number.
#[must_use]
pub fn base_cell_number_to_cell(base_cell: i32) -> CellIndex {
  if !(0..NUM_BASE_CELLS).contains(&base_cell) {
    return NULL_INDEX;
  }
  let mut h = CellIndex::default();
  _set_cell_index(&mut h, 0, base_cell, Direction::Center);
  h
}

/// Number of unique cells at the given resolution.
pub fn get_num_cells(res: i32) -> Result<i64, HexGridError> {
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  Ok(2 + 120 * _ipow(7, i64::from(res)))
}

/// Number of pentagons per resolution.
#[must_use]
pub const fn pentagon_count() -> i32 {
  NUM_PENTAGONS
}

/// All twelve pentagon cells at the given resolution.
pub fn get_pentagons(
  res: i32,
  out: &mut [CellIndex; NUM_PENTAGONS as usize],
) -> Result<(), HexGridError> {
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  let mut idx = 0;
  for bc in 0..NUM_BASE_CELLS {
    if _is_base_cell_pentagon(bc) {
      out[idx] = crate::hierarchy::cell_to_center_child(base_cell_number_to_cell(bc), res)?;
      idx += 1;
    }
  }
  Ok(())
}

/// Upper bound on how many icosahedron faces the cell's boundary can cross:
/// five for a pentagon, two for a hexagon.
pub fn max_face_count(h: CellIndex) -> Result<usize, HexGridError> {
  if !is_valid_cell(h) {
    return Err(HexGridError::CellInvalid);
  }
  Ok(if is_pentagon(h) { 5 } else { 2 })
}

/// The icosahedron faces intersected by the cell, written to the front of
/// `out`; unused slots are set to [`INVALID_FACE`]. `out` must hold at least
/// [`max_face_count`] entries.
pub fn get_icosahedron_faces(h: CellIndex, out: &mut [i32]) -> Result<(), HexGridError> {
  let face_count = max_face_count(h)?;
  if out.len() < face_count {
    return Err(HexGridError::MemoryBounds);
  }

  let mut res = get_resolution(h);
  let pentagon = is_pentagon(h);

  // A Class II pentagon's vertices sit exactly on icosahedron edges, where
  // the overage fold cannot decide a face. Its Class III center child covers
  // the same faces, so recurse on that instead.
  if pentagon && !is_res_class_iii(res) {
    let child = crate::hierarchy::cell_to_center_child(h, res + 1)?;
    return get_icosahedron_faces(child, out);
  }

  let mut fijk = FaceIJK::default();
  _cell_to_face_ijk(h, &mut fijk)?;

  // Vertices on the substrate grid; the overage fold reveals which face
  // each one lands on.
  let mut fijk_verts = [FaceIJK::default(); NUM_HEX_VERTS];
  let vertex_count = if pentagon {
    let mut pent_verts = [FaceIJK::default(); NUM_PENT_VERTS];
    _face_ijk_pent_to_verts(&mut fijk, &mut res, &mut pent_verts);
    fijk_verts[..NUM_PENT_VERTS].copy_from_slice(&pent_verts);
    NUM_PENT_VERTS
  } else {
    _face_ijk_to_verts(&mut fijk, &mut res, &mut fijk_verts);
    NUM_HEX_VERTS
  };

  out[..face_count].fill(INVALID_FACE);

  // The output doubles as a tiny hash set keyed by face number.
  for vert in &mut fijk_verts[..vertex_count] {
    if pentagon {
      _adjust_pent_vert_overage(vert, res);
    } else {
      _adjust_overage_class_ii(vert, res, false, true);
    }

    let mut pos = 0;
    while out[pos] != INVALID_FACE && out[pos] != vert.face {
      pos += 1;
      if pos >= face_count {
        return Err(HexGridError::Failed);
      }
    }
    out[pos] = vert.face;
  }
  Ok(())
}

/// All 122 resolution 0 cells.
pub fn get_res0_cells(out: &mut [CellIndex; NUM_BASE_CELLS as usize]) {
  for (bc, cell) in out.iter_mut().enumerate() {
    *cell = base_cell_number_to_cell(bc as i32);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ijk::_ijk_matches;

  #[test]
  fn test_get_set_fields() {
    let mut h = CellIndex(0);
    for mode in 0..=15u8 {
      set_mode(&mut h, mode);
      assert_eq!(get_mode(h), mode);
    }
    for res in 0..=MAX_RES {
      set_resolution(&mut h, res);
      assert_eq!(get_resolution(h), res);
    }
    for bc in 0..NUM_BASE_CELLS {
      set_base_cell(&mut h, bc);
      assert_eq!(get_base_cell(h), bc);
    }
    for v in 0..=0b111u8 {
      set_reserved_bits(&mut h, v);
      assert_eq!(get_reserved_bits(h), v);
    }
    set_high_bit(&mut h, 1);
    assert_eq!(get_high_bit(h), 1);
    set_high_bit(&mut h, 0);
    assert_eq!(get_high_bit(h), 0);
  }

  #[test]
  fn test_get_set_index_digit() {
    let mut h = CellIndex(0);
    set_resolution(&mut h, MAX_RES);
    for res in 1..=MAX_RES {
      for digit in 0..=6u64 {
        let d = Direction::from_u64(digit);
        set_index_digit(&mut h, res, d);
        assert_eq!(get_index_digit(h, res), d, "digit at res {res}");
      }
    }
  }

  #[test]
  fn test_set_cell_index() {
    let mut h = CellIndex::default();
    _set_cell_index(&mut h, 5, 12, Direction::KAxes);
    assert_eq!(get_resolution(h), 5);
    assert_eq!(get_base_cell(h), 12);
    assert_eq!(get_mode(h), CELL_MODE);
    for r in 1..=5 {
      assert_eq!(get_index_digit(h, r), Direction::KAxes);
    }
    for r in 6..=MAX_RES {
      assert_eq!(get_index_digit(h, r), Direction::InvalidDigit);
    }
    assert_eq!(h.0, 0x85184927fffffff);
  }

  #[test]
  fn test_is_res_class_iii() {
    assert!(!is_res_class_iii(0));
    assert!(is_res_class_iii(1));
    assert!(!is_res_class_iii(2));
    assert!(is_res_class_iii(15));
  }

  #[test]
  fn test_leading_non_zero_digit() {
    let mut h = CellIndex::default();
    _set_cell_index(&mut h, 5, 0, Direction::Center);
    assert_eq!(_leading_non_zero_digit(h), Direction::Center);

    set_index_digit(&mut h, 3, Direction::JAxes);
    assert_eq!(_leading_non_zero_digit(h), Direction::JAxes);

    set_index_digit(&mut h, 1, Direction::KAxes);
    assert_eq!(_leading_non_zero_digit(h), Direction::KAxes);
  }

  #[test]
  fn test_cell_rotations() {
    let make = |digit| {
      let mut h = CellIndex::default();
      _set_cell_index(&mut h, 1, 0, digit);
      h
    };
    let h_i = make(Direction::IAxes);
    let h_ij = make(Direction::IjAxes);
    let h_ik = make(Direction::IkAxes);

    assert_eq!(_cell_rotate60_ccw(h_i), h_ij);
    assert_eq!(_cell_rotate60_cw(h_i), h_ik);
    assert_eq!(_cell_rotate_pent60_ccw(h_i), h_ij);
    assert_eq!(_cell_rotate_pent60_cw(h_i), h_ik);

    // A pentagon rotation landing on the deleted k subsequence rotates again.
    let h_ik_pent = {
      let mut h = CellIndex::default();
      _set_cell_index(&mut h, 1, 14, Direction::IkAxes);
      h
    };
    assert_ne!(
      _leading_non_zero_digit(_cell_rotate_pent60_cw(h_ik_pent)),
      Direction::KAxes
    );
  }

  #[test]
  fn test_face_ijk_to_cell_res0() {
    let fijk = FaceIJK {
      face: 0,
      coord: CoordIJK { i: 0, j: 0, k: 0 },
    };
    let h = _face_ijk_to_cell(&fijk, 0);
    assert_ne!(h, NULL_INDEX);
    assert_eq!(get_base_cell(h), 16);

    // Base cell 4 (pentagon) home.
    let fijk_pent = FaceIJK {
      face: 0,
      coord: CoordIJK { i: 2, j: 0, k: 0 },
    };
    let h_pent = _face_ijk_to_cell(&fijk_pent, 0);
    assert_ne!(h_pent, NULL_INDEX);
    assert_eq!(get_base_cell(h_pent), 4);

    let mut round = FaceIJK::default();
    assert!(_cell_to_face_ijk(h_pent, &mut round).is_ok());
    assert_eq!(round.face, 0);
    assert!(_ijk_matches(&round.coord, &fijk_pent.coord));
  }

  #[test]
  fn test_face_ijk_cell_round_trip_res0() {
    for face in 0..crate::constants::NUM_ICOSA_FACES {
      for i in 0..=MAX_FACE_COORD {
        for j in 0..=MAX_FACE_COORD {
          for k in 0..=MAX_FACE_COORD {
            let fijk = FaceIJK {
              face,
              coord: CoordIJK { i, j, k },
            };
            if _face_ijk_to_base_cell(&fijk) == INVALID_BASE_CELL {
              continue;
            }

            let h = _face_ijk_to_cell(&fijk, 0);
            assert_ne!(h, NULL_INDEX, "valid fijk {fijk:?} encodes");
            let bc = get_base_cell(h);

            let mut round = FaceIJK::default();
            assert!(_cell_to_face_ijk(h, &mut round).is_ok());
            let home = BASE_CELL_DATA[bc as usize].home_fijk;
            assert_eq!(round.face, home.face, "canonical face for {fijk:?}");
            assert!(
              _ijk_matches(&round.coord, &home.coord),
              "canonical coord for {fijk:?}"
            );
          }
        }
      }
    }
  }

  #[test]
  fn test_cell_face_ijk_round_trip_finer() {
    // A hexagon base cell, a pentagon, and a non-central base cell, through
    // all their res 1 and 2 descendants.
    for (face, coord) in [
      (1, CoordIJK { i: 1, j: 0, k: 0 }),
      (0, CoordIJK { i: 2, j: 0, k: 0 }),
      (4, CoordIJK { i: 1, j: 0, k: 0 }),
    ] {
      let bc_cell = _face_ijk_to_cell(&FaceIJK { face, coord }, 0);
      assert_ne!(bc_cell, NULL_INDEX);
      for res in 1..=2 {
        for child in crate::hierarchy::cell_to_children(bc_cell, res).unwrap() {
          let mut fijk = FaceIJK::default();
          assert!(_cell_to_face_ijk(child, &mut fijk).is_ok());
          let round = _face_ijk_to_cell(&fijk, res);
          assert_eq!(round, child, "round trip {child} via {fijk:?}");
        }
      }
    }
  }

  #[test]
  fn test_is_valid_cell() {
    for res in 0..=MAX_RES {
      let mut h = CellIndex::default();
      _set_cell_index(&mut h, res, 0, Direction::Center);
      assert!(is_valid_cell(h), "res {res}");
    }
    for bc in 0..NUM_BASE_CELLS {
      let mut h = CellIndex::default();
      _set_cell_index(&mut h, 0, bc, Direction::Center);
      assert!(is_valid_cell(h), "base cell {bc}");
    }

    // Out-of-range base cell.
    let mut h = CellIndex::default();
    _set_cell_index(&mut h, 0, NUM_BASE_CELLS, Direction::Center);
    assert!(!is_valid_cell(h));

    // Used digit 7.
    let mut h = CellIndex::default();
    _set_cell_index(&mut h, 1, 0, Direction::Center);
    set_index_digit(&mut h, 1, Direction::InvalidDigit);
    assert!(!is_valid_cell(h));

    // Unused digit not blanked.
    assert!(!is_valid_cell(CellIndex(0x8100700000000000)));

    // Wrong mode, reserved bits, high bit.
    let mut h = CellIndex::default();
    _set_cell_index(&mut h, 0, 0, Direction::Center);
    let mut bad_mode = h;
    set_mode(&mut bad_mode, 3);
    assert!(!is_valid_cell(bad_mode));
    let mut bad_reserved = h;
    set_reserved_bits(&mut bad_reserved, 1);
    assert!(!is_valid_cell(bad_reserved));
    let mut bad_high = h;
    set_high_bit(&mut bad_high, 1);
    assert!(!is_valid_cell(bad_high));

    // Deleted k subsequence on a pentagon.
    let mut pent_k = CellIndex::default();
    _set_cell_index(&mut pent_k, 1, 4, Direction::KAxes);
    assert!(!is_valid_cell(pent_k));
    let mut pent_j = CellIndex::default();
    _set_cell_index(&mut pent_j, 1, 4, Direction::JAxes);
    assert!(is_valid_cell(pent_j));
  }

  #[test]
  fn test_is_pentagon() {
    let mut pent = CellIndex::default();
    _set_cell_index(&mut pent, 0, 4, Direction::Center);
    assert!(is_pentagon(pent));

    let mut pent_child = CellIndex::default();
    _set_cell_index(&mut pent_child, 1, 4, Direction::Center);
    assert!(is_pentagon(pent_child));

    let mut hex_child = CellIndex::default();
    _set_cell_index(&mut hex_child, 1, 4, Direction::JAxes);
    assert!(!is_pentagon(hex_child));

    let mut hex = CellIndex::default();
    _set_cell_index(&mut hex, 2, 0, Direction::Center);
    assert!(!is_pentagon(hex));

    assert!(!is_pentagon(NULL_INDEX));
  }

  #[test]
  fn test_get_num_cells() {
    assert_eq!(get_num_cells(0), Ok(122));
    assert_eq!(get_num_cells(1), Ok(842));
    assert_eq!(get_num_cells(15), Ok(crate::constants::NUM_CELLS_MAX_RES));
    assert_eq!(get_num_cells(-1), Err(HexGridError::ResDomain));
    assert_eq!(get_num_cells(16), Err(HexGridError::ResDomain));
  }

  #[test]
  fn test_get_res0_cells() {
    let mut cells = [NULL_INDEX; NUM_BASE_CELLS as usize];
    get_res0_cells(&mut cells);
    for (bc, &cell) in cells.iter().enumerate() {
      assert_ne!(cell, NULL_INDEX);
      assert_eq!(get_resolution(cell), 0);
      assert_eq!(get_base_cell(cell), bc as i32);
      assert!(is_valid_cell(cell));
    }
  }

  #[test]
  fn test_get_pentagons() {
    let mut pentagons = [NULL_INDEX; NUM_PENTAGONS as usize];
    assert!(get_pentagons(5, &mut pentagons).is_ok());
    for &p in &pentagons {
      assert!(is_pentagon(p), "{p} is a pentagon");
      assert_eq!(get_resolution(p), 5);
    }
    assert!(get_pentagons(16, &mut pentagons).is_err());
  }

  #[test]
  fn test_get_icosahedron_faces() {
    // A hexagon well inside a face touches exactly one.
    let hex = CellIndex(0x85283473fffffff);
    assert_eq!(max_face_count(hex), Ok(2));
    let mut faces = [0i32; 2];
    get_icosahedron_faces(hex, &mut faces).unwrap();
    let valid = faces.iter().filter(|&&f| f != INVALID_FACE).count();
    assert!(valid >= 1 && valid <= 2);
    for &f in &faces {
      assert!(f == INVALID_FACE || (0..crate::constants::NUM_ICOSA_FACES).contains(&f));
    }

    // A pentagon always touches five distinct faces, at Class II
    // resolutions (via the center-child detour) and Class III alike.
    for res in [2, 3] {
      let mut pentagons = [NULL_INDEX; NUM_PENTAGONS as usize];
      get_pentagons(res, &mut pentagons).unwrap();
      for &p in &pentagons {
        assert_eq!(max_face_count(p), Ok(5));
        let mut faces = [0i32; 5];
        get_icosahedron_faces(p, &mut faces).unwrap();
        assert!(faces.iter().all(|&f| f != INVALID_FACE));
        let mut sorted = faces.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 5, "res {res} pentagon {p}");
      }
    }

    // Output slice too small.
    assert_eq!(
      get_icosahedron_faces(hex, &mut [0i32; 1]),
      Err(HexGridError::MemoryBounds)
    );
    assert_eq!(max_face_count(NULL_INDEX), Err(HexGridError::CellInvalid));
  }

  #[test]
  fn test_string_round_trip() {
    let h: CellIndex = "8928308280fffff".parse().unwrap();
    assert_eq!(h, CellIndex(0x8928308280fffff));
    assert_eq!(h.to_string(), "8928308280fffff");

    assert!("".parse::<CellIndex>().is_err());
    assert!("not hex".parse::<CellIndex>().is_err());
    assert!("10000000000000000".parse::<CellIndex>().is_err());
  }
}
