//! Directed edges between neighboring cells. An edge index reuses the cell
//! bit layout with the edge mode and the origin's direction toward the
//! destination stored in the reserved bits, so the origin cell is
//! recoverable by masking alone.

use crate::constants::{CELL_MODE, DIRECTED_EDGE_MODE};
use crate::error::HexGridError;
use crate::geo::{CellBoundary, geo_almost_equal};
use crate::ijk::Direction;
use crate::index::{
  CellIndex, NULL_INDEX, get_mode, get_reserved_bits, is_pentagon, is_valid_cell, set_mode,
  set_reserved_bits,
};
use crate::indexing::cell_to_boundary;
use crate::traversal::neighbors::{are_neighbor_cells, direction_for_neighbor, neighbor_rotations};

/// Direction stored in an edge's reserved bits, validated to be a real
/// neighbor direction.
fn edge_direction(edge: CellIndex) -> Result<Direction, HexGridError> {
  if get_mode(edge) != DIRECTED_EDGE_MODE {
    return Err(HexGridError::DirEdgeInvalid);
  }
  let direction = Direction::from_u64(u64::from(get_reserved_bits(edge)));
  if direction == Direction::Center || direction == Direction::InvalidDigit {
    return Err(HexGridError::DirEdgeInvalid);
  }
  Ok(direction)
}

/// The edge from `origin` to the neighboring cell `destination`.
pub fn cells_to_directed_edge(origin: CellIndex, destination: CellIndex) -> Result<CellIndex, HexGridError> {
  if !are_neighbor_cells(origin, destination)? {
    return Err(HexGridError::NotNeighbors);
  }

  let direction = direction_for_neighbor(origin, destination);
  if direction == Direction::InvalidDigit {
    return Err(HexGridError::NotNeighbors);
  }

  let mut edge = origin;
  set_mode(&mut edge, DIRECTED_EDGE_MODE);
  set_reserved_bits(&mut edge, direction as u8);
  Ok(edge)
}

/// Whether the index is a well-formed directed edge: edge mode, a real
/// direction that exists on the origin, and a valid origin cell.
pub fn is_valid_directed_edge(edge: CellIndex) -> bool {
  let Ok(direction) = edge_direction(edge) else {
    return false;
  };
  let Ok(origin) = get_directed_edge_origin(edge) else {
    return false;
  };
  if is_pentagon(origin) && direction == Direction::KAxes {
    return false;
  }
  is_valid_cell(origin)
}

/// The cell the edge leaves.
pub fn get_directed_edge_origin(edge: CellIndex) -> Result<CellIndex, HexGridError> {
  if get_mode(edge) != DIRECTED_EDGE_MODE {
    return Err(HexGridError::DirEdgeInvalid);
  }
  let mut origin = edge;
  set_mode(&mut origin, CELL_MODE);
  set_reserved_bits(&mut origin, 0);
  Ok(origin)
}

/// The cell the edge enters.
pub fn get_directed_edge_destination(edge: CellIndex) -> Result<CellIndex, HexGridError> {
  let direction = edge_direction(edge)?;
  let origin = get_directed_edge_origin(edge)?;

  let mut rotations = 0;
  let mut destination = NULL_INDEX;
  neighbor_rotations(origin, direction, &mut rotations, &mut destination)?;
  Ok(destination)
}

/// Origin and destination, in that order.
pub fn directed_edge_to_cells(edge: CellIndex) -> Result<[CellIndex; 2], HexGridError> {
  if !is_valid_directed_edge(edge) {
    return Err(HexGridError::DirEdgeInvalid);
  }
  Ok([get_directed_edge_origin(edge)?, get_directed_edge_destination(edge)?])
}

/// All edges leaving the cell: six for a hexagon, five for a pentagon
/// (the deleted K direction has no edge).
pub fn origin_to_directed_edges(origin: CellIndex) -> Result<Vec<CellIndex>, HexGridError> {
  if !is_valid_cell(origin) {
    return Err(HexGridError::CellInvalid);
  }

  let pentagon = is_pentagon(origin);
  let mut edges = Vec::with_capacity(6);
  for d in Direction::KAxes as u64..=Direction::IjAxes as u64 {
    let direction = Direction::from_u64(d);
    if pentagon && direction == Direction::KAxes {
      continue;
    }
    let mut edge = origin;
    set_mode(&mut edge, DIRECTED_EDGE_MODE);
    set_reserved_bits(&mut edge, direction as u8);
    edges.push(edge);
  }
  Ok(edges)
}

/// The geographic span of the edge: the run of boundary vertices the
/// origin shares with the destination. Two vertices on undistorted edges,
/// three when a Class III distortion vertex sits on the shared edge.
pub fn directed_edge_to_boundary(edge: CellIndex) -> Result<CellBoundary, HexGridError> {
  if !is_valid_directed_edge(edge) {
    return Err(HexGridError::DirEdgeInvalid);
  }
  let origin = get_directed_edge_origin(edge)?;
  let destination = get_directed_edge_destination(edge)?;

  let origin_boundary = cell_to_boundary(origin)?;
  let destination_boundary = cell_to_boundary(destination)?;

  let n = origin_boundary.num_verts;
  let mut shared = [false; crate::constants::MAX_CELL_BNDRY_VERTS];
  for i in 0..n {
    shared[i] = destination_boundary.verts[..destination_boundary.num_verts]
      .iter()
      .any(|v| geo_almost_equal(v, &origin_boundary.verts[i]));
  }

  // The shared vertices form one contiguous cyclic run of the origin
  // boundary; emit it in the origin's winding order.
  let start = (0..n).find(|&i| shared[i] && !shared[(i + n - 1) % n]);
  let Some(start) = start else {
    return Err(HexGridError::Failed);
  };

  let mut out = CellBoundary::default();
  let mut i = start;
  while shared[i] && out.num_verts < n {
    out.verts[out.num_verts] = origin_boundary.verts[i];
    out.num_verts += 1;
    i = (i + 1) % n;
  }
  Ok(out)
}
