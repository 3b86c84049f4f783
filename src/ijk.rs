//! IJK+ hexagonal lattice coordinates and the aperture-3 / aperture-7
//! operations that move between grid resolutions.
//!
//! Cells on a single icosahedron face are addressed with three non-negative
//! axis counts `i`, `j`, `k`, normalized so at least one component is zero.
//! Each finer resolution rotates the axes, so separate "counterclockwise"
//! (`ap7`) and "clockwise" (`ap7r`) substitutions are needed.

use crate::constants::M_SQRT3_2;
use crate::error::HexGridError;
use crate::math::Vec2d;

/// Cell digits and neighbor directions on the hexagonal lattice. The numeric
/// values are the 3-bit digits stored in a cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Direction {
  /// The center of the parent cell.
  Center = 0,
  /// The `k` axis.
  KAxes = 1,
  /// The `j` axis.
  JAxes = 2,
  /// `j + k`.
  JkAxes = 3,
  /// The `i` axis.
  IAxes = 4,
  /// `i + k`.
  IkAxes = 5,
  /// `i + j`.
  IjAxes = 6,
  /// Out-of-range digit, also the unset digit value in an index.
  InvalidDigit = 7,
}

/// One past the largest valid direction, for iteration bounds.
pub const NUM_DIGITS: u8 = 7;
impl Direction {
  /// The direction for a raw 3-bit digit value. Values above 7 map to
  /// [`Direction::InvalidDigit`].
  #[inline]
  #[must_use]
  pub const fn from_u64(value: u64) -> Self {
    match value {
      0 => Direction::Center,
      1 => Direction::KAxes,
      2 => Direction::JAxes,
      3 => Direction::JkAxes,
      4 => Direction::IAxes,
      5 => Direction::IkAxes,
      6 => Direction::IjAxes,
      _ => Direction::InvalidDigit,
    }
  }
}

impl From<Direction> for u64 {
  #[inline]
  fn from(digit: Direction) -> Self {
    digit as u64
  }
}

/// IJK+ hexagonal lattice coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CoordIJK {
  pub i: i32,
  pub j: i32,
  pub k: i32,
}

/// Two-axis IJ coordinates relative to a caller-chosen origin cell. Unlike
/// [`CoordIJK`], components may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordIJ {
  pub i: i32,
  pub j: i32,
}

/// Unit vectors for each direction, indexed by digit value.
pub(crate) const UNIT_VECS: [CoordIJK; 7] = [
  CoordIJK { i: 0, j: 0, k: 0 }, // Center
  CoordIJK { i: 0, j: 0, k: 1 }, // K
  CoordIJK { i: 0, j: 1, k: 0 }, // J
  CoordIJK { i: 0, j: 1, k: 1 }, // JK
  CoordIJK { i: 1, j: 0, k: 0 }, // I
  CoordIJK { i: 1, j: 0, k: 1 }, // IK
  CoordIJK { i: 1, j: 1, k: 0 }, // IJ
];

/// Sets the components of an IJK coordinate.
#[inline]
pub(crate) fn _set_ijk(ijk: &mut CoordIJK, i: i32, j: i32, k: i32) {
  ijk.i = i;
  ijk.j = j;
  ijk.k = k;
}

/// Whether two IJK coordinates have identical components.
#[inline]
#[must_use]
pub(crate) fn _ijk_matches(c1: &CoordIJK, c2: &CoordIJK) -> bool {
  c1.i == c2.i && c1.j == c2.j && c1.k == c2.k
}

/// Component-wise sum, saturating on overflow.
#[inline]
pub(crate) fn _ijk_add(h1: &CoordIJK, h2: &CoordIJK, sum: &mut CoordIJK) {
  sum.i = h1.i.saturating_add(h2.i);
  sum.j = h1.j.saturating_add(h2.j);
  sum.k = h1.k.saturating_add(h2.k);
}

/// Component-wise difference, saturating on overflow.
#[inline]
pub(crate) fn _ijk_sub(h1: &CoordIJK, h2: &CoordIJK, diff: &mut CoordIJK) {
  diff.i = h1.i.saturating_sub(h2.i);
  diff.j = h1.j.saturating_sub(h2.j);
  diff.k = h1.k.saturating_sub(h2.k);
}

/// Uniform scale in place, saturating on overflow.
#[inline]
pub(crate) fn _ijk_scale(c: &mut CoordIJK, factor: i32) {
  c.i = c.i.saturating_mul(factor);
  c.j = c.j.saturating_mul(factor);
  c.k = c.k.saturating_mul(factor);
}

#[inline]
fn _add_i32s_overflows(a: i32, b: i32) -> bool {
  a.checked_add(b).is_none()
}

#[inline]
fn _sub_i32s_overflows(a: i32, b: i32) -> bool {
  a.checked_sub(b).is_none()
}

/// Whether normalizing the coordinate would overflow 32-bit arithmetic.
/// Callers that accept untrusted IJ input check this before normalizing.
#[must_use]
pub(crate) fn _ijk_normalize_could_overflow(ijk: &CoordIJK) -> bool {
  // Pre-normalization math only touches two of the three components at a
  // time, so it suffices to bound the pairwise differences.
  let max_dim = ijk.i.max(ijk.j);
  let min_dim = ijk.i.min(ijk.j);

  if ijk.i < 0 && _sub_i32s_overflows(ijk.j, ijk.i) {
    return true;
  }
  if ijk.j < 0 && _sub_i32s_overflows(ijk.i, ijk.j) {
    return true;
  }
  if min_dim < 0 {
    if _add_i32s_overflows(max_dim, min_dim) {
      return true;
    }
    if _sub_i32s_overflows(0, min_dim) {
      return true;
    }
    if _sub_i32s_overflows(max_dim, min_dim) {
      return true;
    }
  }

  false
}

/// Normalizes an IJK coordinate so all components are non-negative and at
/// least one is zero. Uses saturating arithmetic so extreme inputs clamp
/// instead of wrapping.
pub(crate) fn _ijk_normalize(c: &mut CoordIJK) {
  if c.i < 0 {
    c.j = c.j.saturating_sub(c.i);
    c.k = c.k.saturating_sub(c.i);
    c.i = 0;
  }
  if c.j < 0 {
    c.i = c.i.saturating_sub(c.j);
    c.k = c.k.saturating_sub(c.j);
    c.j = 0;
  }
  if c.k < 0 {
    c.i = c.i.saturating_sub(c.k);
    c.j = c.j.saturating_sub(c.k);
    c.k = 0;
  }

  let min_val = c.i.min(c.j).min(c.k);
  if min_val > 0 {
    c.i -= min_val;
    c.j -= min_val;
    c.k -= min_val;
  }
}

/// The digit for a unit IJK coordinate, or [`Direction::InvalidDigit`] if the
/// (normalized) coordinate is not a unit vector.
#[must_use]
pub(crate) fn _unit_ijk_to_digit(ijk: &CoordIJK) -> Direction {
  let mut c = *ijk;
  _ijk_normalize(&mut c);

  for (digit, unit) in UNIT_VECS.iter().enumerate() {
    if _ijk_matches(&c, unit) {
      return Direction::from_u64(digit as u64);
    }
  }
  Direction::InvalidDigit
}

/// Moves the coordinate to its neighbor in the given direction. Center and
/// invalid directions leave the coordinate unchanged.
pub(crate) fn _neighbor(ijk: &mut CoordIJK, digit: Direction) {
  if digit > Direction::Center && digit < Direction::InvalidDigit {
    let mut sum = CoordIJK::default();
    _ijk_add(ijk, &UNIT_VECS[digit as usize], &mut sum);
    *ijk = sum;
    _ijk_normalize(ijk);
  }
}

/// Quantizes a 2D Cartesian point (in hex2d space, where cell centers are
/// unit distance apart) to the containing cell's IJK coordinate.
pub(crate) fn _hex2d_to_coord_ijk(v: &Vec2d, h: &mut CoordIJK) {
  h.k = 0;

  let a1 = v.x.abs();
  let a2 = v.y.abs();

  // First do a reverse conversion to fractional axis counts.
  let x2 = a2 / M_SQRT3_2;
  let x1 = a1 + x2 / 2.0;

  let m1 = x1 as i32;
  let m2 = x2 as i32;

  let r1 = x1 - f64::from(m1);
  let r2 = x2 - f64::from(m2);

  // Quantize the fractional remainder to the nearest cell center.
  if r1 < 0.5 {
    if r1 < 1.0 / 3.0 {
      if r2 < (1.0 + r1) / 2.0 {
        h.i = m1;
        h.j = m2;
      } else {
        h.i = m1;
        h.j = m2 + 1;
      }
    } else {
      h.j = if r2 < (1.0 - r1) { m2 } else { m2 + 1 };
      h.i = if (1.0 - r1) <= r2 && r2 < (2.0 * r1) {
        m1 + 1
      } else {
        m1
      };
    }
  } else if r1 < 2.0 / 3.0 {
    h.j = if r2 < (1.0 - r1) { m2 } else { m2 + 1 };
    h.i = if (2.0 * r1 - 1.0) < r2 && r2 < (1.0 - r1) {
      m1
    } else {
      m1 + 1
    };
  } else if r2 < (r1 / 2.0) {
    h.i = m1 + 1;
    h.j = m2;
  } else {
    h.i = m1 + 1;
    h.j = m2 + 1;
  }

  // Fold across the axes for negative quadrants.
  if v.x < 0.0 {
    if h.j % 2 == 0 {
      let axis_i = i64::from(h.j) / 2;
      let diff = i64::from(h.i) - axis_i;
      h.i = (i64::from(h.i) - 2 * diff) as i32;
    } else {
      let axis_i = (i64::from(h.j) + 1) / 2;
      let diff = i64::from(h.i) - axis_i;
      h.i = (i64::from(h.i) - (2 * diff + 1)) as i32;
    }
  }

  if v.y < 0.0 {
    h.i -= (2 * h.j + 1) / 2;
    h.j = -h.j;
  }

  _ijk_normalize(h);
}

/// The hex2d center point of a cell given by IJK coordinates.
pub(crate) fn _ijk_to_hex2d(h: &CoordIJK, v: &mut Vec2d) {
  let i = h.i - h.k;
  let j = h.j - h.k;

  v.x = f64::from(i) - 0.5 * f64::from(j);
  v.y = f64::from(j) * M_SQRT3_2;
}

/// Replaces the coordinate with its aperture-7 counterclockwise parent.
pub(crate) fn _up_ap7(ijk: &mut CoordIJK) {
  let i = f64::from(ijk.i - ijk.k);
  let j = f64::from(ijk.j - ijk.k);

  ijk.i = ((3.0 * i - j) / 7.0).round() as i32;
  ijk.j = ((i + 2.0 * j) / 7.0).round() as i32;
  ijk.k = 0;
  _ijk_normalize(ijk);
}

/// Replaces the coordinate with its aperture-7 clockwise parent.
pub(crate) fn _up_ap7r(ijk: &mut CoordIJK) {
  let i = f64::from(ijk.i - ijk.k);
  let j = f64::from(ijk.j - ijk.k);

  ijk.i = ((2.0 * i + j) / 7.0).round() as i32;
  ijk.j = ((3.0 * j - i) / 7.0).round() as i32;
  ijk.k = 0;
  _ijk_normalize(ijk);
}

/// Applies an integer change-of-basis in place: each axis count is replaced
/// by the corresponding basis vector scaled by that count.
fn _ijk_transform(ijk: &mut CoordIJK, i_vec: CoordIJK, j_vec: CoordIJK, k_vec: CoordIJK) {
  let mut i_scaled = i_vec;
  let mut j_scaled = j_vec;
  let mut k_scaled = k_vec;

  _ijk_scale(&mut i_scaled, ijk.i);
  _ijk_scale(&mut j_scaled, ijk.j);
  _ijk_scale(&mut k_scaled, ijk.k);

  let mut sum = CoordIJK::default();
  _ijk_add(&i_scaled, &j_scaled, &mut sum);
  let mut total = CoordIJK::default();
  _ijk_add(&sum, &k_scaled, &mut total);

  *ijk = total;
  _ijk_normalize(ijk);
}

/// Replaces the coordinate with its center child at the next finer
/// aperture-7 counterclockwise resolution.
pub(crate) fn _down_ap7(ijk: &mut CoordIJK) {
  _ijk_transform(
    ijk,
    CoordIJK { i: 3, j: 0, k: 1 },
    CoordIJK { i: 1, j: 3, k: 0 },
    CoordIJK { i: 0, j: 1, k: 3 },
  );
}

/// Replaces the coordinate with its center child at the next finer
/// aperture-7 clockwise resolution.
pub(crate) fn _down_ap7r(ijk: &mut CoordIJK) {
  _ijk_transform(
    ijk,
    CoordIJK { i: 3, j: 1, k: 0 },
    CoordIJK { i: 0, j: 3, k: 1 },
    CoordIJK { i: 1, j: 0, k: 3 },
  );
}

/// Replaces the coordinate with its center child at the next finer
/// aperture-3 counterclockwise resolution.
pub(crate) fn _down_ap3(ijk: &mut CoordIJK) {
  _ijk_transform(
    ijk,
    CoordIJK { i: 2, j: 0, k: 1 },
    CoordIJK { i: 1, j: 2, k: 0 },
    CoordIJK { i: 0, j: 1, k: 2 },
  );
}

/// Replaces the coordinate with its center child at the next finer
/// aperture-3 clockwise resolution.
pub(crate) fn _down_ap3r(ijk: &mut CoordIJK) {
  _ijk_transform(
    ijk,
    CoordIJK { i: 2, j: 1, k: 0 },
    CoordIJK { i: 0, j: 2, k: 1 },
    CoordIJK { i: 1, j: 0, k: 2 },
  );
}

/// Rotates the coordinate 60 degrees counterclockwise about the origin.
pub(crate) fn _ijk_rotate60_ccw(ijk: &mut CoordIJK) {
  _ijk_transform(
    ijk,
    CoordIJK { i: 1, j: 1, k: 0 },
    CoordIJK { i: 0, j: 1, k: 1 },
    CoordIJK { i: 1, j: 0, k: 1 },
  );
}

/// Rotates the coordinate 60 degrees clockwise about the origin.
pub(crate) fn _ijk_rotate60_cw(ijk: &mut CoordIJK) {
  _ijk_transform(
    ijk,
    CoordIJK { i: 1, j: 0, k: 1 },
    CoordIJK { i: 1, j: 1, k: 0 },
    CoordIJK { i: 0, j: 1, k: 1 },
  );
}

/// Rotates a digit 60 degrees counterclockwise.
#[inline]
#[must_use]
pub(crate) fn _rotate60_ccw(digit: Direction) -> Direction {
  use Direction::*;
  match digit {
    KAxes => IkAxes,
    IkAxes => IAxes,
    IAxes => IjAxes,
    IjAxes => JAxes,
    JAxes => JkAxes,
    JkAxes => KAxes,
    _ => digit,
  }
}

/// Rotates a digit 60 degrees clockwise.
#[inline]
#[must_use]
pub(crate) fn _rotate60_cw(digit: Direction) -> Direction {
  use Direction::*;
  match digit {
    KAxes => JkAxes,
    JkAxes => JAxes,
    JAxes => IjAxes,
    IjAxes => IAxes,
    IAxes => IkAxes,
    IkAxes => KAxes,
    _ => digit,
  }
}

/// Grid distance between two IJK coordinates: the maximum component of the
/// normalized difference.
#[inline]
#[must_use]
pub(crate) fn ijk_distance(c1: &CoordIJK, c2: &CoordIJK) -> i32 {
  let mut diff = CoordIJK::default();
  _ijk_sub(c1, c2, &mut diff);
  _ijk_normalize(&mut diff);

  diff.i.abs().max(diff.j.abs()).max(diff.k.abs())
}

/// Converts IJK+ coordinates to two-axis IJ coordinates.
#[inline]
pub(crate) fn ijk_to_ij(ijk: &CoordIJK, ij: &mut CoordIJ) {
  ij.i = ijk.i - ijk.k;
  ij.j = ijk.j - ijk.k;
}

/// Converts two-axis IJ coordinates back to normalized IJK+ coordinates.
/// Fails when the components are large enough that normalization would
/// overflow, which cannot happen for coordinates of real cells.
pub(crate) fn ij_to_ijk(ij: &CoordIJ, ijk: &mut CoordIJK) -> Result<(), HexGridError> {
  ijk.i = ij.i;
  ijk.j = ij.j;
  ijk.k = 0;

  if _ijk_normalize_could_overflow(ijk) {
    return Err(HexGridError::Failed);
  }

  _ijk_normalize(ijk);
  Ok(())
}

/// Converts IJK+ coordinates to cube coordinates (where `i + j + k == 0`),
/// in place.
#[inline]
pub(crate) fn ijk_to_cube(ijk: &mut CoordIJK) {
  ijk.i = -ijk.i + ijk.k;
  ijk.j -= ijk.k;
  ijk.k = -ijk.i - ijk.j;
}

/// Converts cube coordinates back to normalized IJK+ coordinates, in place.
#[inline]
pub(crate) fn cube_to_ijk(ijk: &mut CoordIJK) {
  ijk.i = ijk.i.saturating_neg();
  ijk.k = 0;
  _ijk_normalize(ijk);
}
