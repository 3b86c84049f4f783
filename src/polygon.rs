//! Polygon predicates: point-in-loop ray casting, winding order, segment
//! crossing, and spherical area. All longitudes are handled through the
//! bounding-box normalization rules so loops spanning the antimeridian
//! behave like any other loop.

use crate::bbox::{
  BBox, LongitudeNormalization, bbox_contains_point, bbox_is_transmeridian, bbox_normalization,
  bbox_overlaps_bbox, normalize_lng,
};
use crate::constants::M_PI;
use crate::geo::{CellBoundary, LatLng};
use crate::math::{Vec3d, _geo_to_vec3d, _v3d_cross, _v3d_dot};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed ring of geographic vertices. The last vertex connects back to
/// the first implicitly.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoLoop {
  /// Number of meaningful vertices.
  pub num_verts: usize,
  /// The vertices, in ring order.
  pub verts: Vec<LatLng>,
}

impl GeoLoop {
  /// Ring from a vertex list.
  pub fn from_verts(verts: Vec<LatLng>) -> Self {
    Self {
      num_verts: verts.len(),
      verts,
    }
  }
}

/// An outer ring plus zero or more hole rings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPolygon {
  /// The outer ring.
  pub geoloop: GeoLoop,
  /// Number of meaningful holes.
  pub num_holes: usize,
  /// The hole rings.
  pub holes: Vec<GeoLoop>,
}

/// Longitude as used by the ray-casting walk: loops that wrap the
/// antimeridian are compared on the east-shifted range.
fn cast_lng(lng: f64, is_transmeridian: bool) -> f64 {
  if is_transmeridian {
    normalize_lng(lng, LongitudeNormalization::East)
  } else {
    lng
  }
}

/// Ray-casting point-in-ring test.
///
/// Casts westward at the point's latitude and counts edge crossings. Points
/// whose latitude or longitude exactly matches a vertex are nudged north
/// and west so the ray cannot pass through a vertex twice.
pub(crate) fn point_inside_verts(verts: &[LatLng], bbox: &BBox, coord: &LatLng) -> bool {
  if verts.is_empty() || !bbox_contains_point(bbox, coord) {
    return false;
  }

  let is_transmeridian = bbox_is_transmeridian(bbox);
  let mut contains = false;
  let mut lat = coord.lat;
  let mut lng = cast_lng(coord.lng, is_transmeridian);

  for i in 0..verts.len() {
    let mut a = verts[i];
    let mut b = verts[(i + 1) % verts.len()];
    // The walk needs b to be the northern endpoint.
    if a.lat > b.lat {
      std::mem::swap(&mut a, &mut b);
    }

    if lat == a.lat || lat == b.lat {
      lat += f64::EPSILON;
    }
    if lat < a.lat || lat > b.lat {
      continue;
    }

    let a_lng = cast_lng(a.lng, is_transmeridian);
    let b_lng = cast_lng(b.lng, is_transmeridian);
    if a_lng == lng || b_lng == lng {
      lng -= f64::EPSILON;
    }

    let ratio = (lat - a.lat) / (b.lat - a.lat);
    let test_lng = cast_lng(a_lng + (b_lng - a_lng) * ratio, is_transmeridian);
    if test_lng < lng {
      contains = !contains;
    }
  }
  contains
}

/// Whether the ring contains the coordinate. `bbox` must be the ring's
/// bounding box.
pub(crate) fn point_inside_geoloop(geoloop: &GeoLoop, bbox: &BBox, coord: &LatLng) -> bool {
  point_inside_verts(&geoloop.verts[..geoloop.num_verts], bbox, coord)
}

/// Whether the polygon contains the coordinate: inside the outer ring and
/// outside every hole. `bboxes` holds the outer box first, then one per
/// hole.
pub(crate) fn point_inside_polygon(polygon: &GeoPolygon, bboxes: &[BBox], coord: &LatLng) -> bool {
  if !point_inside_geoloop(&polygon.geoloop, &bboxes[0], coord) {
    return false;
  }
  for i in 0..polygon.num_holes {
    if polygon.holes[i].num_verts > 0 && point_inside_geoloop(&polygon.holes[i], &bboxes[i + 1], coord) {
      return false;
    }
  }
  true
}

/// Whether a cell boundary, treated as a ring, contains the coordinate.
/// `bbox` must be the boundary's bounding box.
pub(crate) fn point_inside_cell_boundary(boundary: &CellBoundary, bbox: &BBox, coord: &LatLng) -> bool {
  point_inside_verts(&boundary.verts[..boundary.num_verts], bbox, coord)
}

/// Signed-area winding test over the ring. Restarts in transmeridian mode
/// when an edge spans more than pi radians of longitude.
pub(crate) fn is_clockwise_verts(verts: &[LatLng], is_transmeridian: bool) -> bool {
  let mut sum = 0.0;
  for i in 0..verts.len() {
    let a = verts[i];
    let b = verts[(i + 1) % verts.len()];
    if !is_transmeridian && (a.lng - b.lng).abs() > M_PI {
      return is_clockwise_verts(verts, true);
    }
    sum += (cast_lng(b.lng, is_transmeridian) - cast_lng(a.lng, is_transmeridian)) * (b.lat + a.lat);
  }
  sum > 0.0
}

/// Whether two planar segments intersect.
pub(crate) fn line_crosses_line(a1: &LatLng, a2: &LatLng, b1: &LatLng, b2: &LatLng) -> bool {
  let denom = (b2.lng - b1.lng) * (a2.lat - a1.lat) - (b2.lat - b1.lat) * (a2.lng - a1.lng);
  if denom.abs() < f64::EPSILON {
    // Parallel or degenerate.
    return false;
  }

  let ua = ((b2.lat - b1.lat) * (a1.lng - b1.lng) - (b2.lng - b1.lng) * (a1.lat - b1.lat)) / denom;
  let ub = ((a2.lat - a1.lat) * (a1.lng - b1.lng) - (a2.lng - a1.lng) * (a1.lat - b1.lat)) / denom;
  (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// Whether any segment of the cell boundary crosses any segment of the
/// ring. Containment without edge contact is not a crossing.
pub(crate) fn cell_boundary_crosses_geoloop(
  geoloop: &GeoLoop,
  loop_bbox: &BBox,
  boundary: &CellBoundary,
  boundary_bbox: &BBox,
) -> bool {
  if geoloop.num_verts == 0 || boundary.num_verts == 0 {
    return false;
  }
  if !bbox_overlaps_bbox(loop_bbox, boundary_bbox) {
    return false;
  }

  let mut loop_norm = LongitudeNormalization::None;
  let mut boundary_norm = LongitudeNormalization::None;
  bbox_normalization(loop_bbox, boundary_bbox, &mut loop_norm, &mut boundary_norm);

  for i in 0..geoloop.num_verts {
    let mut a1 = geoloop.verts[i];
    let mut a2 = geoloop.verts[(i + 1) % geoloop.num_verts];
    a1.lng = normalize_lng(a1.lng, loop_norm);
    a2.lng = normalize_lng(a2.lng, loop_norm);

    for j in 0..boundary.num_verts {
      let mut b1 = boundary.verts[j];
      let mut b2 = boundary.verts[(j + 1) % boundary.num_verts];
      b1.lng = normalize_lng(b1.lng, boundary_norm);
      b2.lng = normalize_lng(b2.lng, boundary_norm);

      if line_crosses_line(&a1, &a2, &b1, &b2) {
        return true;
      }
    }
  }
  false
}

/// Whether any segment of the cell boundary crosses the outer ring or any
/// hole of the polygon.
pub(crate) fn cell_boundary_crosses_polygon(
  polygon: &GeoPolygon,
  bboxes: &[BBox],
  boundary: &CellBoundary,
  boundary_bbox: &BBox,
) -> bool {
  if cell_boundary_crosses_geoloop(&polygon.geoloop, &bboxes[0], boundary, boundary_bbox) {
    return true;
  }
  for i in 0..polygon.num_holes {
    if cell_boundary_crosses_geoloop(&polygon.holes[i], &bboxes[i + 1], boundary, boundary_bbox) {
      return true;
    }
  }
  false
}

/// Whether the cell boundary sits entirely inside the polygon: every vertex
/// inside the outer ring, no edge contact with the outer ring, and no hole
/// inside or crossing the boundary.
pub(crate) fn cell_boundary_inside_polygon(
  polygon: &GeoPolygon,
  bboxes: &[BBox],
  boundary: &CellBoundary,
  boundary_bbox: &BBox,
) -> bool {
  if boundary.num_verts == 0 {
    return false;
  }

  for i in 0..boundary.num_verts {
    if !point_inside_geoloop(&polygon.geoloop, &bboxes[0], &boundary.verts[i]) {
      return false;
    }
  }
  if cell_boundary_crosses_geoloop(&polygon.geoloop, &bboxes[0], boundary, boundary_bbox) {
    return false;
  }

  for i in 0..polygon.num_holes {
    let hole = &polygon.holes[i];
    if hole.num_verts == 0 {
      continue;
    }
    // A hole vertex inside the boundary means the hole punches into the
    // cell.
    if point_inside_verts(&boundary.verts[..boundary.num_verts], boundary_bbox, &hole.verts[0]) {
      return false;
    }
    if cell_boundary_crosses_geoloop(hole, &bboxes[i + 1], boundary, boundary_bbox) {
      return false;
    }
  }
  true
}

/// Area of a spherical polygon in square radians, by summing the signed
/// excess of the triangle fan anchored at the first vertex.
pub(crate) fn sphere_area_rads2(verts: &[LatLng]) -> f64 {
  if verts.len() < 3 {
    return 0.0;
  }

  let mut anchor = Vec3d::default();
  _geo_to_vec3d(&verts[0], &mut anchor);

  let mut total = 0.0;
  for i in 1..verts.len() - 1 {
    let mut v1 = Vec3d::default();
    _geo_to_vec3d(&verts[i], &mut v1);
    let mut v2 = Vec3d::default();
    _geo_to_vec3d(&verts[i + 1], &mut v2);

    let mut cross = Vec3d::default();
    _v3d_cross(&anchor, &v1, &mut cross);
    let v = _v3d_dot(&cross, &v2);
    let s = 1.0 + _v3d_dot(&anchor, &v1) + _v3d_dot(&v1, &v2) + _v3d_dot(&v2, &anchor);

    total += v.atan2(s);
  }
  (total * 2.0).abs()
}
