//! Error codes shared by every fallible grid operation.

#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;

/// Status codes for grid operations. The numeric values mirror the reference
/// grid's status codes so they survive round-trips through FFI or storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[repr(u32)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
pub enum HexGridError {
  /// No error. Present so the numeric code space is complete; never returned
  /// inside an `Err`.
  #[error("success")]
  Success = 0,
  /// The operation failed without a more specific cause.
  #[error("operation failed")]
  Failed = 1,
  /// An argument was outside its acceptable range.
  #[error("argument outside acceptable range")]
  Domain = 2,
  /// A latitude or longitude argument was outside its acceptable range.
  #[error("latitude or longitude outside acceptable range")]
  LatLngDomain = 3,
  /// A resolution argument was outside 0..=15.
  #[error("resolution outside acceptable range")]
  ResDomain = 4,
  /// A cell index argument was not a valid cell.
  #[error("cell index not valid")]
  CellInvalid = 5,
  /// A directed edge index argument was not valid.
  #[error("directed edge index not valid")]
  DirEdgeInvalid = 6,
  /// An undirected edge index argument was not valid.
  #[error("undirected edge index not valid")]
  UndirEdgeInvalid = 7,
  /// A vertex index argument was not valid.
  #[error("vertex index not valid")]
  VertexInvalid = 8,
  /// Pentagon distortion was encountered and the algorithm could not cope.
  #[error("pentagon distortion encountered")]
  Pentagon = 9,
  /// Duplicate input was encountered where the algorithm forbids it.
  #[error("duplicate input")]
  DuplicateInput = 10,
  /// Cell arguments were expected to be neighbors but are not.
  #[error("cells are not neighbors")]
  NotNeighbors = 11,
  /// Cell arguments had incompatible resolutions.
  #[error("incompatible resolutions")]
  ResMismatch = 12,
  /// A necessary allocation failed.
  #[error("memory allocation failed")]
  MemoryAlloc = 13,
  /// A caller-provided buffer was too small.
  #[error("provided buffer too small")]
  MemoryBounds = 14,
  /// A mode or flags argument was not valid.
  #[error("mode or flags argument not valid")]
  OptionInvalid = 15,
}
