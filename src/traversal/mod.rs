//! Moving across the grid: neighbors, disks, rings, distances, and paths.

pub mod disk;
pub mod distance;
pub mod neighbors;
pub mod path;

pub use disk::{
  grid_disk, grid_disk_distances, grid_disk_distances_unsafe, grid_disk_unsafe, grid_ring_unsafe,
  max_grid_disk_size,
};
pub use distance::grid_distance;
pub use neighbors::{are_neighbor_cells, neighbor_rotations};
pub use path::{grid_path_cells, grid_path_cells_size};
