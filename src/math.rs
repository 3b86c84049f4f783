//! Small vector and integer math helpers.

use crate::geo::LatLng;

/// 2D Cartesian vector.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Vec2d {
  pub x: f64,
  pub y: f64,
}

/// 3D Cartesian vector.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Vec3d {
  pub x: f64,
  pub y: f64,
  pub z: f64,
}

/// Magnitude of a 2D vector.
#[inline]
#[must_use]
pub(crate) fn _v2d_mag(v: &Vec2d) -> f64 {
  (v.x * v.x + v.y * v.y).sqrt()
}

/// Intersection of the line through `p0`, `p1` with the line through `p2`,
/// `p3`. The caller guarantees the lines are not parallel and the
/// intersection is not at an endpoint.
#[inline]
pub(crate) fn _v2d_intersect(p0: &Vec2d, p1: &Vec2d, p2: &Vec2d, p3: &Vec2d, inter: &mut Vec2d) {
  let s1x = p1.x - p0.x;
  let s1y = p1.y - p0.y;
  let s2x = p3.x - p2.x;
  let s2y = p3.y - p2.y;

  let t = (s2x * (p0.y - p2.y) - s2y * (p0.x - p2.x)) / (-s2x * s1y + s1x * s2y);

  inter.x = p0.x + t * s1x;
  inter.y = p0.y + t * s1y;
}

/// Whether two 2D vectors are equal within machine epsilon.
#[inline]
#[must_use]
pub(crate) fn _v2d_almost_equals(v1: &Vec2d, v2: &Vec2d) -> bool {
  (v1.x - v2.x).abs() < f64::EPSILON && (v1.y - v2.y).abs() < f64::EPSILON
}

#[inline]
fn _square(x: f64) -> f64 {
  x * x
}

/// Squared Euclidean distance between two 3D points.
#[inline]
#[must_use]
pub(crate) fn _point_square_dist(v1: &Vec3d, v2: &Vec3d) -> f64 {
  _square(v1.x - v2.x) + _square(v1.y - v2.y) + _square(v1.z - v2.z)
}

/// Unit-sphere 3D coordinate for a spherical point.
#[inline]
pub(crate) fn _geo_to_vec3d(geo: &LatLng, point: &mut Vec3d) {
  let r = geo.lat.cos();

  point.z = geo.lat.sin();
  point.x = geo.lng.cos() * r;
  point.y = geo.lng.sin() * r;
}

/// Cross product of two 3D vectors.
#[inline]
pub(crate) fn _v3d_cross(v1: &Vec3d, v2: &Vec3d, out: &mut Vec3d) {
  out.x = v1.y * v2.z - v1.z * v2.y;
  out.y = v1.z * v2.x - v1.x * v2.z;
  out.z = v1.x * v2.y - v1.y * v2.x;
}

/// Dot product of two 3D vectors.
#[inline]
#[must_use]
pub(crate) fn _v3d_dot(v1: &Vec3d, v2: &Vec3d) -> f64 {
  v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

/// Integer exponentiation by squaring, wrapping on overflow. Negative
/// exponents follow the usual integer conventions (0 except for base +/-1).
#[inline]
pub(crate) fn _ipow(mut base: i64, mut exp: i64) -> i64 {
  if exp < 0 {
    return match base {
      1 => 1,
      -1 => {
        if exp % 2 == 0 {
          1
        } else {
          -1
        }
      }
      _ => 0,
    };
  }

  let mut result: i64 = 1;
  loop {
    if exp & 1 != 0 {
      result = result.wrapping_mul(base);
    }
    exp >>= 1;
    if exp == 0 {
      break;
    }
    base = base.wrapping_mul(base);
  }
  result
}
