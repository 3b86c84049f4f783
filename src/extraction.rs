//! Turning a set of cells back into polygons. The cell boundaries feed a
//! vertex graph in which an edge and its reverse cancel, leaving only the
//! outline of the set; tracing the remaining edges yields loops, and
//! normalization sorts those loops into outer rings and the holes they
//! contain.

use std::collections::HashSet;

use crate::bbox::{BBox, bbox_from_verts, bbox_height_rads, bbox_width_rads};
use crate::error::HexGridError;
use crate::geo::{LatLng, geo_almost_equal};
use crate::index::{CellIndex, get_resolution, is_valid_cell};
use crate::indexing::cell_to_boundary;
use crate::polygon::{is_clockwise_verts, point_inside_verts};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One ring with its holes, vertices in radians. Outer rings wind
/// counter-clockwise, holes clockwise.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
  /// The outer ring.
  pub outer: Vec<LatLng>,
  /// Hole rings contained by the outer ring.
  pub holes: Vec<Vec<LatLng>>,
}

/// The normalized output of polygon extraction.
pub type MultiPolygon = Vec<Polygon>;

const INVALID_NODE: i32 = -1;

#[derive(Debug, Clone, Copy)]
struct VertexNode {
  from: LatLng,
  to: LatLng,
  /// Arena index of the next node in the same bucket.
  next: i32,
}

/// Hash-bucketed arena of directed edges, keyed by origin vertex. Removed
/// slots go on a free list so the arena never reallocates during
/// cancellation.
pub(crate) struct VertexGraph {
  buckets: Vec<i32>,
  nodes: Vec<VertexNode>,
  free_slots: Vec<u32>,
  size: usize,
  res: i32,
}

impl VertexGraph {
  fn new(num_buckets: usize, res: i32) -> Self {
    Self {
      buckets: vec![INVALID_NODE; num_buckets.max(1)],
      nodes: Vec::new(),
      free_slots: Vec::new(),
      size: 0,
      res,
    }
  }

  pub(crate) fn size(&self) -> usize {
    self.size
  }

  /// Bucket for a vertex. Quantizes so representations of the same vertex
  /// that differ below the comparison tolerance land together.
  fn bucket(&self, vertex: &LatLng) -> usize {
    let scaled = ((vertex.lat + vertex.lng) * (self.res as f64 + 1.0) * 1e6).abs();
    (scaled as u64 % self.buckets.len() as u64) as usize
  }

  fn add_edge(&mut self, from: LatLng, to: LatLng) {
    if self.find_edge(&from, &to).is_some() {
      return;
    }
    let bucket = self.bucket(&from);
    let node = VertexNode {
      from,
      to,
      next: self.buckets[bucket],
    };
    let slot = match self.free_slots.pop() {
      Some(slot) => {
        self.nodes[slot as usize] = node;
        slot
      }
      None => {
        self.nodes.push(node);
        (self.nodes.len() - 1) as u32
      }
    };
    self.buckets[bucket] = slot as i32;
    self.size += 1;
  }

  fn find_edge(&self, from: &LatLng, to: &LatLng) -> Option<u32> {
    let mut slot = self.buckets[self.bucket(from)];
    while slot != INVALID_NODE {
      let node = &self.nodes[slot as usize];
      if geo_almost_equal(&node.from, from) && geo_almost_equal(&node.to, to) {
        return Some(slot as u32);
      }
      slot = node.next;
    }
    None
  }

  fn find_edge_from(&self, from: &LatLng) -> Option<u32> {
    let mut slot = self.buckets[self.bucket(from)];
    while slot != INVALID_NODE {
      let node = &self.nodes[slot as usize];
      if geo_almost_equal(&node.from, from) {
        return Some(slot as u32);
      }
      slot = node.next;
    }
    None
  }

  fn remove(&mut self, slot: u32) {
    let bucket = self.bucket(&self.nodes[slot as usize].from);
    let mut current = self.buckets[bucket];
    if current == slot as i32 {
      self.buckets[bucket] = self.nodes[slot as usize].next;
    } else {
      while current != INVALID_NODE {
        let next = self.nodes[current as usize].next;
        if next == slot as i32 {
          self.nodes[current as usize].next = self.nodes[slot as usize].next;
          break;
        }
        current = next;
      }
    }
    self.free_slots.push(slot);
    self.size -= 1;
  }

  /// Any remaining node, or `None` once the graph is drained.
  fn first(&self) -> Option<u32> {
    for &head in &self.buckets {
      if head != INVALID_NODE {
        return Some(head as u32);
      }
    }
    None
  }
}

/// Builds the boundary graph of the cell set: each cell contributes its
/// boundary edges, and an edge cancels against its reverse, so interior
/// edges vanish and only the outline survives.
pub(crate) fn cells_to_vertex_graph(cells: &[CellIndex]) -> Result<VertexGraph, HexGridError> {
  if cells.is_empty() {
    return Ok(VertexGraph::new(1, 0));
  }

  let res = get_resolution(cells[0]);
  let mut seen = HashSet::with_capacity(cells.len());
  let mut graph = VertexGraph::new(cells.len() * 6, res);

  for &cell in cells {
    if !is_valid_cell(cell) {
      return Err(HexGridError::CellInvalid);
    }
    if get_resolution(cell) != res {
      return Err(HexGridError::ResMismatch);
    }
    if !seen.insert(cell) {
      return Err(HexGridError::DuplicateInput);
    }

    let boundary = cell_to_boundary(cell)?;
    for j in 0..boundary.num_verts {
      let from = boundary.verts[j];
      let to = boundary.verts[(j + 1) % boundary.num_verts];
      match graph.find_edge(&to, &from) {
        Some(reverse) => graph.remove(reverse),
        None => graph.add_edge(from, to),
      }
    }
  }
  Ok(graph)
}

/// Traces the graph's edges into closed loops, consuming the graph. Every
/// edge belongs to exactly one loop, so the graph is empty afterwards.
fn vertex_graph_to_loops(graph: &mut VertexGraph) -> Vec<Vec<LatLng>> {
  let mut loops = Vec::new();
  while let Some(start) = graph.first() {
    let mut verts = Vec::new();
    let mut slot = start;
    loop {
      let node = graph.nodes[slot as usize];
      verts.push(node.from);
      graph.remove(slot);
      match graph.find_edge_from(&node.to) {
        Some(next) => slot = next,
        None => break,
      }
    }
    loops.push(verts);
  }
  loops
}

/// Sorts the loops of a single raw polygon into outer rings and holes.
///
/// The input must hold exactly one polygon, with every traced loop piled
/// into it (first loop as `outer`, the rest as `holes`); an input that is
/// already split into multiple polygons is rejected. On success the vector
/// holds one polygon per counter-clockwise loop, each owning the clockwise
/// loops it contains. A hole contained by no outer ring fails.
pub(crate) fn normalize_multi_polygon(multi: &mut MultiPolygon) -> Result<(), HexGridError> {
  if multi.len() > 1 {
    return Err(HexGridError::Failed);
  }
  let Some(raw) = multi.pop() else {
    return Ok(());
  };

  let mut outers: Vec<Vec<LatLng>> = Vec::new();
  let mut holes: Vec<Vec<LatLng>> = Vec::new();
  let mut push_loop = |verts: Vec<LatLng>| {
    if verts.is_empty() {
      return;
    }
    if is_clockwise_verts(&verts, false) {
      holes.push(verts);
    } else {
      outers.push(verts);
    }
  };
  push_loop(raw.outer);
  for hole in raw.holes {
    push_loop(hole);
  }

  let mut outer_bboxes = Vec::with_capacity(outers.len());
  for outer in &outers {
    let mut bbox = BBox::default();
    bbox_from_verts(outer, &mut bbox);
    outer_bboxes.push(bbox);
  }
  for outer in outers {
    multi.push(Polygon {
      outer,
      holes: Vec::new(),
    });
  }

  // Nested outer rings can all contain the same hole; the hole belongs to
  // the innermost one, approximated by the tightest bounding box.
  let bbox_area = |i: usize| bbox_width_rads(&outer_bboxes[i]) * bbox_height_rads(&outer_bboxes[i]);
  for hole in holes {
    let probe = hole[0];
    let mut container: Option<usize> = None;
    for i in 0..multi.len() {
      if !point_inside_verts(&multi[i].outer, &outer_bboxes[i], &probe) {
        continue;
      }
      if container.map_or(true, |best| bbox_area(i) < bbox_area(best)) {
        container = Some(i);
      }
    }
    match container {
      Some(i) => multi[i].holes.push(hole),
      None => {
        multi.clear();
        return Err(HexGridError::Failed);
      }
    }
  }
  Ok(())
}

/// The outline of a set of same-resolution cells as normalized polygons.
///
/// Cells must be unique and share a resolution; the set does not need to
/// be contiguous, each connected component produces its own polygon.
pub fn cells_to_multi_polygon(cells: &[CellIndex]) -> Result<MultiPolygon, HexGridError> {
  let mut graph = cells_to_vertex_graph(cells)?;
  let loops = vertex_graph_to_loops(&mut graph);
  // Tracing consumes every surviving edge.
  debug_assert_eq!(graph.size(), 0);
  let mut loops = loops.into_iter();

  let mut multi = match loops.next() {
    Some(first) => vec![Polygon {
      outer: first,
      holes: loops.collect(),
    }],
    None => Vec::new(),
  };
  normalize_multi_polygon(&mut multi)?;
  Ok(multi)
}
