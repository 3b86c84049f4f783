//! Geographic bounding boxes with transmeridian handling.

use crate::constants::{EPSILON_RAD, M_2PI, M_PI, M_PI_2};
use crate::geo::{CellBoundary, LatLng, constrain_lng};
use crate::polygon::{GeoLoop, GeoPolygon};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Latitude/longitude box, edges in radians. A box whose east edge is west
/// of its west edge spans the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BBox {
  /// North latitude in radians.
  pub north: f64,
  /// South latitude in radians.
  pub south: f64,
  /// East longitude in radians.
  pub east: f64,
  /// West longitude in radians.
  pub west: f64,
}

/// Scheme for bringing longitudes from two boxes into a comparable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LongitudeNormalization {
  None,
  /// Shift negative longitudes east by 2*pi.
  East,
  /// Shift positive longitudes west by 2*pi.
  West,
}

pub(crate) fn bbox_is_transmeridian(bbox: &BBox) -> bool {
  bbox.east < bbox.west
}

pub(crate) fn bbox_width_rads(bbox: &BBox) -> f64 {
  if bbox_is_transmeridian(bbox) {
    bbox.east - bbox.west + M_2PI
  } else {
    bbox.east - bbox.west
  }
}

pub(crate) fn bbox_height_rads(bbox: &BBox) -> f64 {
  bbox.north - bbox.south
}

pub(crate) fn bbox_contains_point(bbox: &BBox, point: &LatLng) -> bool {
  if point.lat < bbox.south - EPSILON_RAD || point.lat > bbox.north + EPSILON_RAD {
    return false;
  }
  if bbox_is_transmeridian(bbox) {
    point.lng >= bbox.west - EPSILON_RAD || point.lng <= bbox.east + EPSILON_RAD
  } else {
    point.lng >= bbox.west - EPSILON_RAD && point.lng <= bbox.east + EPSILON_RAD
  }
}

/// Applies one of the two 2*pi shifts, leaving the other hemisphere alone.
pub(crate) fn normalize_lng(lng: f64, normalization: LongitudeNormalization) -> f64 {
  match normalization {
    LongitudeNormalization::None => lng,
    LongitudeNormalization::East => {
      if lng < 0.0 {
        lng + M_2PI
      } else {
        lng
      }
    }
    LongitudeNormalization::West => {
      if lng > 0.0 {
        lng - M_2PI
      } else {
        lng
      }
    }
  }
}

/// Picks longitude normalizations that put `a` and `b` on a shared range.
/// Only transmeridian boxes need shifting; when just one side crosses, the
/// shift direction follows whichever gap between the boxes is shorter.
pub(crate) fn bbox_normalization(
  a: &BBox,
  b: &BBox,
  a_normalization: &mut LongitudeNormalization,
  b_normalization: &mut LongitudeNormalization,
) {
  let a_is_transmeridian = bbox_is_transmeridian(a);
  let b_is_transmeridian = bbox_is_transmeridian(b);
  let a_to_b_trends_east = (a.west - b.east).abs() < (b.west - a.east).abs();

  *a_normalization = if !a_is_transmeridian {
    LongitudeNormalization::None
  } else if b_is_transmeridian || a_to_b_trends_east {
    LongitudeNormalization::East
  } else {
    LongitudeNormalization::West
  };

  *b_normalization = if !b_is_transmeridian {
    LongitudeNormalization::None
  } else if a_is_transmeridian {
    LongitudeNormalization::East
  } else if a_to_b_trends_east {
    LongitudeNormalization::West
  } else {
    LongitudeNormalization::East
  };
}

pub(crate) fn bbox_contains_bbox(a: &BBox, b: &BBox) -> bool {
  if a.north < b.north || a.south > b.south {
    return false;
  }

  let mut a_norm = LongitudeNormalization::None;
  let mut b_norm = LongitudeNormalization::None;
  bbox_normalization(a, b, &mut a_norm, &mut b_norm);

  normalize_lng(a.west, a_norm) <= normalize_lng(b.west, b_norm)
    && normalize_lng(a.east, a_norm) >= normalize_lng(b.east, b_norm)
}

pub(crate) fn bbox_overlaps_bbox(a: &BBox, b: &BBox) -> bool {
  if a.north < b.south || a.south > b.north {
    return false;
  }

  let mut a_norm = LongitudeNormalization::None;
  let mut b_norm = LongitudeNormalization::None;
  bbox_normalization(a, b, &mut a_norm, &mut b_norm);

  if normalize_lng(a.east, a_norm) < normalize_lng(b.west, b_norm)
    || normalize_lng(a.west, a_norm) > normalize_lng(b.east, b_norm)
  {
    return false;
  }
  true
}

/// The four corners of the box as a boundary, counter-clockwise from the
/// southwest corner.
pub(crate) fn bbox_to_cell_boundary(bbox: &BBox) -> CellBoundary {
  let mut boundary = CellBoundary::default();
  boundary.num_verts = 4;
  boundary.verts[0] = LatLng {
    lat: bbox.south,
    lng: bbox.west,
  };
  boundary.verts[1] = LatLng {
    lat: bbox.south,
    lng: bbox.east,
  };
  boundary.verts[2] = LatLng {
    lat: bbox.north,
    lng: bbox.east,
  };
  boundary.verts[3] = LatLng {
    lat: bbox.north,
    lng: bbox.west,
  };
  boundary
}

/// Tight bounding box around a closed ring of vertices.
///
/// When any edge of the ring spans more than pi radians of longitude the
/// ring is taken to cross the antimeridian, and the box wraps: west becomes
/// the smallest positive longitude and east the largest negative one.
pub(crate) fn bbox_from_verts(verts: &[LatLng], bbox: &mut BBox) {
  if verts.is_empty() {
    *bbox = BBox::default();
    return;
  }

  bbox.south = f64::MAX;
  bbox.north = -f64::MAX;
  let mut min_lng = f64::MAX;
  let mut max_lng = -f64::MAX;
  let mut is_transmeridian = false;

  for (i, p) in verts.iter().enumerate() {
    if p.lat < bbox.south {
      bbox.south = p.lat;
    }
    if p.lat > bbox.north {
      bbox.north = p.lat;
    }
    if p.lng < min_lng {
      min_lng = p.lng;
    }
    if p.lng > max_lng {
      max_lng = p.lng;
    }
    let next = verts[(i + 1) % verts.len()];
    if (p.lng - next.lng).abs() > M_PI {
      is_transmeridian = true;
    }
  }

  if is_transmeridian {
    let mut west = f64::MAX;
    let mut east = -f64::MAX;
    let mut has_east = false;
    let mut has_west = false;
    for p in verts {
      if p.lng > 0.0 {
        if p.lng < west {
          west = p.lng;
        }
        has_west = true;
      }
      if p.lng < 0.0 {
        if p.lng > east {
          east = p.lng;
        }
        has_east = true;
      }
    }
    // A ring that crosses but sits entirely in one hemisphere degenerates
    // to a zero-width wrap.
    bbox.west = if has_west { west } else { east };
    bbox.east = if has_east { east } else { west };
  } else {
    bbox.west = min_lng;
    bbox.east = max_lng;
  }
}

pub(crate) fn bbox_from_geoloop(geoloop: &GeoLoop, bbox: &mut BBox) {
  bbox_from_verts(&geoloop.verts[..geoloop.num_verts.min(geoloop.verts.len())], bbox);
}

pub(crate) fn bbox_from_cell_boundary(boundary: &CellBoundary, bbox: &mut BBox) {
  bbox_from_verts(&boundary.verts[..boundary.num_verts], bbox);
}

/// Grows (or shrinks) the box about its center by `scale`, clamping
/// latitudes at the poles and wrapping longitudes.
pub(crate) fn scale_bbox(bbox: &mut BBox, scale: f64) {
  let width = bbox_width_rads(bbox);
  let height = bbox_height_rads(bbox);
  let width_buffer = (width * scale - width) * 0.5;
  let height_buffer = (height * scale - height) * 0.5;

  bbox.north += height_buffer;
  if bbox.north > M_PI_2 {
    bbox.north = M_PI_2;
  }
  bbox.south -= height_buffer;
  if bbox.south < -M_PI_2 {
    bbox.south = -M_PI_2;
  }

  bbox.east = constrain_lng(bbox.east + width_buffer);
  bbox.west = constrain_lng(bbox.west - width_buffer);
}

/// One box per loop of the polygon: the outer loop first, then each hole.
pub(crate) fn bboxes_from_geo_polygon(polygon: &GeoPolygon) -> Vec<BBox> {
  let mut bboxes = Vec::with_capacity(1 + polygon.num_holes);
  let mut outer = BBox::default();
  bbox_from_geoloop(&polygon.geoloop, &mut outer);
  bboxes.push(outer);
  for hole in polygon.holes.iter().take(polygon.num_holes) {
    let mut hole_bbox = BBox::default();
    bbox_from_geoloop(hole, &mut hole_bbox);
    bboxes.push(hole_bbox);
  }
  bboxes
}

#[cfg(test)]
mod tests {
  use super::*;

  fn loop_from(raw: &[[f64; 2]]) -> GeoLoop {
    let verts: Vec<LatLng> = raw.iter().map(|p| LatLng { lat: p[0], lng: p[1] }).collect();
    GeoLoop {
      num_verts: verts.len(),
      verts,
    }
  }

  #[test]
  fn test_width_and_height() {
    let bbox = BBox {
      north: 0.8,
      south: 0.4,
      east: 1.0,
      west: 0.7,
    };
    assert!((bbox_width_rads(&bbox) - 0.3).abs() < EPSILON_RAD);
    assert!((bbox_height_rads(&bbox) - 0.4).abs() < EPSILON_RAD);

    let wrapped = BBox {
      north: 0.1,
      south: -0.1,
      east: -M_PI + 0.2,
      west: M_PI - 0.2,
    };
    assert!(bbox_is_transmeridian(&wrapped));
    assert!((bbox_width_rads(&wrapped) - 0.4).abs() < EPSILON_RAD);
  }

  #[test]
  fn test_contains_point() {
    let bbox = BBox {
      north: 0.1,
      south: -0.1,
      east: 0.2,
      west: -0.2,
    };
    assert!(bbox_contains_point(&bbox, &LatLng { lat: 0.0, lng: 0.0 }));
    assert!(!bbox_contains_point(&bbox, &LatLng { lat: 0.5, lng: 0.0 }));
    assert!(!bbox_contains_point(&bbox, &LatLng { lat: 0.0, lng: 0.5 }));

    let wrapped = BBox {
      north: 0.1,
      south: -0.1,
      east: -M_PI + 0.1,
      west: M_PI - 0.1,
    };
    assert!(bbox_contains_point(
      &wrapped,
      &LatLng {
        lat: 0.0,
        lng: -M_PI + 0.05
      }
    ));
    assert!(bbox_contains_point(
      &wrapped,
      &LatLng {
        lat: 0.0,
        lng: M_PI - 0.05
      }
    ));
    assert!(!bbox_contains_point(&wrapped, &LatLng { lat: 0.0, lng: 0.0 }));
  }

  #[test]
  fn test_from_geoloop_simple() {
    let geoloop = loop_from(&[[0.1, 0.1], [0.3, 0.2], [0.2, -0.1]]);
    let mut bbox = BBox::default();
    bbox_from_geoloop(&geoloop, &mut bbox);
    assert_eq!(
      bbox,
      BBox {
        north: 0.3,
        south: 0.1,
        east: 0.2,
        west: -0.1
      }
    );
    assert!(!bbox_is_transmeridian(&bbox));
  }

  #[test]
  fn test_from_geoloop_transmeridian() {
    let geoloop = loop_from(&[
      [0.1, -M_PI + 0.1],
      [0.1, M_PI - 0.1],
      [-0.1, M_PI - 0.1],
      [-0.1, -M_PI + 0.1],
    ]);
    let mut bbox = BBox::default();
    bbox_from_geoloop(&geoloop, &mut bbox);
    assert!(bbox_is_transmeridian(&bbox));
    assert!((bbox.west - (M_PI - 0.1)).abs() < EPSILON_RAD);
    assert!((bbox.east - (-M_PI + 0.1)).abs() < EPSILON_RAD);
    assert!((bbox_width_rads(&bbox) - 0.2).abs() < EPSILON_RAD);
  }

  #[test]
  fn test_contains_and_overlaps_bbox() {
    let outer = BBox {
      north: 0.4,
      south: -0.4,
      east: 0.4,
      west: -0.4,
    };
    let inner = BBox {
      north: 0.1,
      south: -0.1,
      east: 0.1,
      west: -0.1,
    };
    let disjoint = BBox {
      north: 0.9,
      south: 0.6,
      east: 0.9,
      west: 0.6,
    };
    assert!(bbox_contains_bbox(&outer, &inner));
    assert!(!bbox_contains_bbox(&inner, &outer));
    assert!(bbox_overlaps_bbox(&outer, &inner));
    assert!(!bbox_overlaps_bbox(&outer, &disjoint));

    // Overlap across the antimeridian.
    let wrapped = BBox {
      north: 0.1,
      south: -0.1,
      east: -M_PI + 0.2,
      west: M_PI - 0.2,
    };
    let east_side = BBox {
      north: 0.1,
      south: -0.1,
      east: -M_PI + 0.3,
      west: -M_PI + 0.1,
    };
    assert!(bbox_overlaps_bbox(&wrapped, &east_side));
    assert!(bbox_overlaps_bbox(&east_side, &wrapped));
    assert!(!bbox_overlaps_bbox(&wrapped, &inner));
  }

  #[test]
  fn test_scale_clamps_at_poles() {
    let mut bbox = BBox {
      north: M_PI_2 - 0.01,
      south: M_PI_2 - 0.2,
      east: 0.2,
      west: -0.2,
    };
    scale_bbox(&mut bbox, 2.0);
    assert_eq!(bbox.north, M_PI_2);
    assert!(bbox.south < M_PI_2 - 0.2);
    assert!(bbox.east > 0.2 && bbox.west < -0.2);
  }

  #[test]
  fn test_bboxes_from_geo_polygon() {
    let polygon = GeoPolygon {
      geoloop: loop_from(&[[0.0, 0.0], [0.4, 0.0], [0.4, 0.4], [0.0, 0.4]]),
      num_holes: 1,
      holes: vec![loop_from(&[[0.1, 0.1], [0.2, 0.1], [0.2, 0.2], [0.1, 0.2]])],
    };
    let bboxes = bboxes_from_geo_polygon(&polygon);
    assert_eq!(bboxes.len(), 2);
    assert!(bbox_contains_bbox(&bboxes[0], &bboxes[1]));
  }
}
