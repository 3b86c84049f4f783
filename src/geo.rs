//! Spherical coordinates and the trigonometry built on them.

use crate::constants::{
  EARTH_RADIUS_KM, EPSILON_RAD, MAX_CELL_BNDRY_VERTS, MAX_RES, M_180_PI, M_2PI, M_PI, M_PI_180, M_PI_2,
};
use crate::error::HexGridError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in radians.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatLng {
  /// Latitude in radians.
  pub lat: f64,
  /// Longitude in radians.
  pub lng: f64,
}

/// Vertices of a cell boundary, in counter-clockwise order. Unused trailing
/// slots are not significant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellBoundary {
  /// Number of meaningful vertices.
  pub num_verts: usize,
  /// Vertex storage; at most [`MAX_CELL_BNDRY_VERTS`] are used.
  pub verts: [LatLng; MAX_CELL_BNDRY_VERTS],
}

impl Default for CellBoundary {
  fn default() -> Self {
    Self {
      num_verts: 0,
      verts: [LatLng::default(); MAX_CELL_BNDRY_VERTS],
    }
  }
}

/// Normalizes radians to `[0, 2*pi)`.
#[inline]
#[must_use]
pub(crate) fn _pos_angle_rads(rads: f64) -> f64 {
  let mut tmp = if rads < 0.0 { rads + M_2PI } else { rads };
  while tmp >= M_2PI {
    tmp -= M_2PI;
  }
  tmp
}

/// Whether the components of two spherical coordinates are within `threshold`
/// of each other.
#[inline]
#[must_use]
pub(crate) fn geo_almost_equal_threshold(p1: &LatLng, p2: &LatLng, threshold: f64) -> bool {
  (p1.lat - p2.lat).abs() < threshold && (p1.lng - p2.lng).abs() < threshold
}

/// Whether two spherical coordinates are within the standard epsilon of each
/// other.
#[inline]
#[must_use]
pub(crate) fn geo_almost_equal(p1: &LatLng, p2: &LatLng) -> bool {
  geo_almost_equal_threshold(p1, p2, EPSILON_RAD)
}

/// Sets spherical coordinates from decimal degrees.
#[inline]
pub(crate) fn _set_geo_degs(p: &mut LatLng, lat_degs: f64, lng_degs: f64) {
  p.lat = lat_degs.to_radians();
  p.lng = lng_degs.to_radians();
}

/// Constrains longitude to `[-pi, pi]` by wrap-around.
#[inline]
#[must_use]
pub(crate) fn constrain_lng(mut lng: f64) -> f64 {
  while lng > M_PI {
    lng -= M_2PI;
  }
  while lng < -M_PI {
    lng += M_2PI;
  }
  lng
}

/// Azimuth from `p1` to `p2` in radians.
#[inline]
#[must_use]
pub(crate) fn _geo_azimuth_rads(p1: &LatLng, p2: &LatLng) -> f64 {
  (p2.lat.cos() * (p2.lng - p1.lng).sin())
    .atan2(p1.lat.cos() * p2.lat.sin() - p1.lat.sin() * p2.lat.cos() * (p2.lng - p1.lng).cos())
}

/// The point at the given azimuth and great-circle distance (radians) from
/// `p1`. Poles collapse longitude to 0 by convention.
pub(crate) fn _geo_az_distance_rads(p1: &LatLng, az: f64, distance: f64, p2: &mut LatLng) {
  if distance < EPSILON_RAD {
    *p2 = *p1;
    return;
  }

  let az_norm = _pos_angle_rads(az);

  if az_norm < EPSILON_RAD || (az_norm - M_PI).abs() < EPSILON_RAD {
    // due north or south
    if az_norm < EPSILON_RAD {
      p2.lat = p1.lat + distance;
    } else {
      p2.lat = p1.lat - distance;
    }

    if (p2.lat - M_PI_2).abs() < EPSILON_RAD {
      p2.lat = M_PI_2;
      p2.lng = 0.0;
    } else if (p2.lat + M_PI_2).abs() < EPSILON_RAD {
      p2.lat = -M_PI_2;
      p2.lng = 0.0;
    } else {
      p2.lng = constrain_lng(p1.lng);
    }
  } else {
    let sin_lat = (p1.lat.sin() * distance.cos() + p1.lat.cos() * distance.sin() * az_norm.cos()).clamp(-1.0, 1.0);
    p2.lat = sin_lat.asin();

    if (p2.lat - M_PI_2).abs() < EPSILON_RAD {
      p2.lat = M_PI_2;
      p2.lng = 0.0;
    } else if (p2.lat + M_PI_2).abs() < EPSILON_RAD {
      p2.lat = -M_PI_2;
      p2.lng = 0.0;
    } else {
      let cos_p1_lat = p1.lat.cos();
      if cos_p1_lat.abs() < EPSILON_RAD {
        // starting at a pole without a due-north/south azimuth
        p2.lng = constrain_lng(az_norm);
      } else {
        let inv_cos_p2_lat = 1.0 / p2.lat.cos();
        let sin_lng = (az_norm.sin() * distance.sin() * inv_cos_p2_lat).clamp(-1.0, 1.0);
        let cos_lng = ((distance.cos() - p1.lat.sin() * p2.lat.sin()) / cos_p1_lat * inv_cos_p2_lat).clamp(-1.0, 1.0);

        p2.lng = constrain_lng(p1.lng + sin_lng.atan2(cos_lng));
      }
    }
  }
}

/// Great circle distance in radians between two spherical coordinates, by the
/// Haversine formula.
#[must_use]
pub fn great_circle_distance_rads(a: &LatLng, b: &LatLng) -> f64 {
  let sin_lat_half = ((b.lat - a.lat) * 0.5).sin();
  let sin_lng_half = ((b.lng - a.lng) * 0.5).sin();
  let h = (sin_lat_half * sin_lat_half + a.lat.cos() * b.lat.cos() * sin_lng_half * sin_lng_half).clamp(0.0, 1.0);
  2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Great circle distance in kilometers.
#[must_use]
pub fn great_circle_distance_km(a: &LatLng, b: &LatLng) -> f64 {
  great_circle_distance_rads(a, b) * EARTH_RADIUS_KM
}

/// Great circle distance in meters.
#[must_use]
pub fn great_circle_distance_m(a: &LatLng, b: &LatLng) -> f64 {
  great_circle_distance_km(a, b) * 1000.0
}

/// Converts degrees to radians.
#[must_use]
pub fn degs_to_rads(degrees: f64) -> f64 {
  degrees * M_PI_180
}

/// Converts radians to degrees.
#[must_use]
pub fn rads_to_degs(radians: f64) -> f64 {
  radians * M_180_PI
}

/// Average hexagon area in square kilometers at the given resolution
/// (pentagons excluded).
pub fn get_hexagon_area_avg_km2(res: i32) -> Result<f64, HexGridError> {
  #[rustfmt::skip]
  const AREAS_KM2: [f64; (MAX_RES + 1) as usize] = [
    4.357_449_416_078_383e+06, 6.097_884_417_941_332e+05, 8.680_178_039_899_720e+04,
    1.239_343_465_508_816e+04, 1.770_347_654_491_307e+03, 2.529_038_581_819_449e+02,
    3.612_906_216_441_245e+01, 5.161_293_359_717_191e+00, 7.373_275_975_944_177e-01,
    1.053_325_134_272_067e-01, 1.504_750_190_766_435e-02, 2.149_643_129_451_879e-03,
    3.070_918_756_316_060e-04, 4.387_026_794_728_296e-05, 6.267_181_135_324_313e-06,
    8.953_115_907_605_790e-07,
  ];
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  Ok(AREAS_KM2[res as usize])
}

/// Average hexagon area in square meters at the given resolution (pentagons
/// excluded).
pub fn get_hexagon_area_avg_m2(res: i32) -> Result<f64, HexGridError> {
  #[rustfmt::skip]
  const AREAS_M2: [f64; (MAX_RES + 1) as usize] = [
    4.357_449_416_078_390e+12, 6.097_884_417_941_339e+11, 8.680_178_039_899_731e+10,
    1.239_343_465_508_818e+10, 1.770_347_654_491_309e+09, 2.529_038_581_819_452e+08,
    3.612_906_216_441_250e+07, 5.161_293_359_717_198e+06, 7.373_275_975_944_188e+05,
    1.053_325_134_272_069e+05, 1.504_750_190_766_437e+04, 2.149_643_129_451_882e+03,
    3.070_918_756_316_063e+02, 4.387_026_794_728_301e+01, 6.267_181_135_324_322,
    8.953_115_907_605_802e-01,
  ];
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  Ok(AREAS_M2[res as usize])
}

/// Average hexagon edge length in kilometers at the given resolution
/// (pentagons excluded).
pub fn get_hexagon_edge_length_avg_km(res: i32) -> Result<f64, HexGridError> {
  #[rustfmt::skip]
  const LENS_KM: [f64; (MAX_RES + 1) as usize] = [
    1281.256011, 483.0568391, 182.5129565, 68.97922179,
    26.07175968, 9.854090990, 3.724532667, 1.406475763,
    0.531414010, 0.200786148, 0.075863783, 0.028663897,
    0.010830188, 0.004092010, 0.001546100, 0.000584169,
  ];
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  Ok(LENS_KM[res as usize])
}

/// Average hexagon edge length in meters at the given resolution (pentagons
/// excluded).
pub fn get_hexagon_edge_length_avg_m(res: i32) -> Result<f64, HexGridError> {
  #[rustfmt::skip]
  const LENS_M: [f64; (MAX_RES + 1) as usize] = [
    1_281_256.011, 483_056.8391, 182_512.9565, 68_979.22179,
    26_071.75968, 9854.090990, 3724.532667, 1406.475763,
    531.4140101, 200.7861476, 75.86378287, 28.66389748,
    10.83018784, 4.092010473, 1.546099657, 0.584168630,
  ];
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  Ok(LENS_M[res as usize])
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::EPSILON_DEG;

  #[test]
  fn test_pos_angle_rads() {
    assert!((_pos_angle_rads(0.0)).abs() < f64::EPSILON);
    assert!((_pos_angle_rads(M_PI) - M_PI).abs() < f64::EPSILON);
    assert!((_pos_angle_rads(M_2PI)).abs() < f64::EPSILON);
    assert!((_pos_angle_rads(-M_PI_2) - M_PI * 1.5).abs() < f64::EPSILON);
    assert!((_pos_angle_rads(M_PI * 2.5) - M_PI * 0.5).abs() < f64::EPSILON);
    assert!((_pos_angle_rads(-M_PI) - M_PI).abs() < f64::EPSILON);
  }

  #[test]
  fn test_geo_almost_equal_threshold() {
    let a = LatLng {
      lat: 15.0 * M_PI_180,
      lng: 10.0 * M_PI_180,
    };
    let mut b = a;
    assert!(geo_almost_equal_threshold(&a, &b, EPSILON_RAD / 2.0));

    b.lat = (15.0 + EPSILON_DEG * 2.0) * M_PI_180;
    assert!(!geo_almost_equal_threshold(&a, &b, EPSILON_RAD));
    assert!(geo_almost_equal_threshold(&a, &b, EPSILON_RAD * 3.0));
  }

  #[test]
  fn test_constrain_lng() {
    assert_eq!(constrain_lng(0.0), 0.0);
    assert_eq!(constrain_lng(1.0), 1.0);
    assert_eq!(constrain_lng(M_PI), M_PI);
    assert_eq!(constrain_lng(M_2PI), 0.0);
    assert_eq!(constrain_lng(M_PI * 3.0), M_PI);
    assert_eq!(constrain_lng(-M_2PI), 0.0);
  }

  #[test]
  fn test_geo_az_distance_rads_zero_distance() {
    let start = LatLng {
      lat: 15.0_f64.to_radians(),
      lng: 10.0_f64.to_radians(),
    };
    let mut out = LatLng::default();
    _geo_az_distance_rads(&start, 0.0, 0.0, &mut out);
    assert!(geo_almost_equal(&start, &out));
  }

  #[test]
  fn test_geo_az_distance_rads_due_north_south() {
    let mut start = LatLng::default();
    let mut out = LatLng::default();
    let mut expected = LatLng::default();

    // due north to the north pole
    _set_geo_degs(&mut start, 45.0, 1.0);
    _set_geo_degs(&mut expected, 90.0, 0.0);
    _geo_az_distance_rads(&start, 0.0, 45.0_f64.to_radians(), &mut out);
    assert!(geo_almost_equal(&expected, &out), "got {out:?}");

    // due south to the south pole
    _set_geo_degs(&mut start, -45.0, 2.0);
    _set_geo_degs(&mut expected, -90.0, 0.0);
    _geo_az_distance_rads(&start, 180.0_f64.to_radians(), 45.0_f64.to_radians(), &mut out);
    assert!(geo_almost_equal(&expected, &out), "got {out:?}");

    // due north short of the pole
    _set_geo_degs(&mut start, -45.0, 10.0);
    _set_geo_degs(&mut expected, -10.0, 10.0);
    _geo_az_distance_rads(&start, 0.0, 35.0_f64.to_radians(), &mut out);
    assert!(geo_almost_equal(&expected, &out), "got {out:?}");
  }

  #[test]
  fn test_geo_az_distance_rads_pole_to_pole() {
    let mut start = LatLng::default();
    let mut out = LatLng::default();
    let mut expected = LatLng::default();

    _set_geo_degs(&mut start, 90.0, 0.0);
    _set_geo_degs(&mut expected, -90.0, 0.0);
    _geo_az_distance_rads(&start, 12.0_f64.to_radians(), 180.0_f64.to_radians(), &mut out);
    assert!(geo_almost_equal(&expected, &out));
  }

  #[test]
  fn test_great_circle_distance() {
    let a = LatLng { lat: 0.0, lng: 0.0 };
    let b = LatLng { lat: 0.0, lng: M_PI_2 };
    assert!((great_circle_distance_rads(&a, &b) - M_PI_2).abs() < 1e-12);
    assert!((great_circle_distance_rads(&a, &a)).abs() < f64::EPSILON);
  }

  #[test]
  fn test_avg_stat_tables_reject_bad_res() {
    assert_eq!(get_hexagon_area_avg_km2(-1), Err(HexGridError::ResDomain));
    assert_eq!(get_hexagon_area_avg_m2(16), Err(HexGridError::ResDomain));
    assert_eq!(get_hexagon_edge_length_avg_km(16), Err(HexGridError::ResDomain));
    assert_eq!(get_hexagon_edge_length_avg_m(-2), Err(HexGridError::ResDomain));
  }
}
