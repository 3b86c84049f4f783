#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::similar_names)]
#![allow(clippy::needless_range_loop)]

//! `hexgrid` is a hierarchical hexagonal grid over the sphere.
//!
//! The globe is projected onto an icosahedron and each face is tiled with
//! hexagons (plus twelve pentagons at the icosahedron vertices) at sixteen
//! nested resolutions. Every cell gets a 64-bit index, and the library
//! provides conversions between geographic coordinates and cells, grid
//! traversal and distances, hierarchy operations (parents, children,
//! compaction), polygon fill, polygon extraction from cell sets, directed
//! edges, and exact cell and edge measures.
//!
//! ```
//! use hexgrid::{LatLng, cell_to_lat_lng, degs_to_rads, lat_lng_to_cell};
//!
//! let geo = LatLng {
//!   lat: degs_to_rads(37.7792),
//!   lng: degs_to_rads(-122.4192),
//! };
//! let cell = lat_lng_to_cell(&geo, 9).unwrap();
//! let center = cell_to_lat_lng(cell).unwrap();
//! # let _ = center;
//! ```

pub mod bbox;
pub mod constants;
pub mod edge;
pub mod error;
pub mod extraction;
pub mod fill;
pub mod geo;
pub mod hierarchy;
pub mod ijk;
pub mod index;
pub mod indexing;
pub mod localij;
pub mod measures;
pub mod polygon;
pub mod traversal;

mod basecells;
mod face;
mod math;

pub use bbox::BBox;
pub use constants::{INVALID_FACE, MAX_CELL_BNDRY_VERTS, MAX_RES, NUM_BASE_CELLS};
pub use edge::{
  cells_to_directed_edge, directed_edge_to_boundary, directed_edge_to_cells,
  get_directed_edge_destination, get_directed_edge_origin, is_valid_directed_edge,
  origin_to_directed_edges,
};
pub use error::HexGridError;
pub use extraction::{MultiPolygon, Polygon, cells_to_multi_polygon};
pub use fill::{ContainmentMode, max_polygon_to_cells_size, polygon_to_cells};
pub use geo::{
  CellBoundary, LatLng, degs_to_rads, get_hexagon_area_avg_km2, get_hexagon_area_avg_m2,
  get_hexagon_edge_length_avg_km, get_hexagon_edge_length_avg_m, great_circle_distance_km,
  great_circle_distance_m, great_circle_distance_rads, rads_to_degs,
};
pub use hierarchy::{
  ChildrenIter, ResolutionIter, cell_to_center_child, cell_to_child_pos, cell_to_children,
  cell_to_children_size, cell_to_parent, cells_at_resolution, child_pos_to_cell, compact_cells,
  uncompact_cells, uncompact_cells_size,
};
pub use ijk::{CoordIJ, CoordIJK, Direction};
pub use index::{
  CellIndex, NULL_INDEX, base_cell_number_to_cell, get_base_cell_number, get_icosahedron_faces,
  get_num_cells, get_pentagons, get_res0_cells, get_resolution, index_to_string, is_class_iii,
  is_pentagon, is_valid_cell, max_face_count, pentagon_count, string_to_index,
};
pub use indexing::{cell_to_boundary, cell_to_lat_lng, lat_lng_to_cell};
pub use localij::{cell_to_local_ij, local_ij_to_cell};
pub use measures::{
  cell_area_km2, cell_area_m2, cell_area_rads2, exact_edge_length_km, exact_edge_length_m,
  exact_edge_length_rads,
};
pub use polygon::{GeoLoop, GeoPolygon};
pub use traversal::{
  are_neighbor_cells, grid_disk, grid_disk_distances, grid_disk_distances_unsafe, grid_disk_unsafe,
  grid_distance, grid_path_cells, grid_path_cells_size, grid_ring_unsafe, max_grid_disk_size,
  neighbor_rotations,
};
