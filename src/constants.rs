//! Numeric and bit-layout constants for the grid.

use std::f64::consts;

/// pi
pub const M_PI: f64 = consts::PI;
/// pi / 2
pub const M_PI_2: f64 = consts::FRAC_PI_2;
/// 2 * pi
pub const M_2PI: f64 = 2.0 * consts::PI;
/// pi / 180
pub const M_PI_180: f64 = consts::PI / 180.0;
/// 180 / pi
pub const M_180_PI: f64 = 180.0 / consts::PI;

/// General-purpose comparison threshold.
pub const EPSILON: f64 = 0.000_000_000_000_000_1;
/// Comparison threshold of roughly 0.1mm, in degrees.
pub const EPSILON_DEG: f64 = 0.000_000_001;
/// Comparison threshold of roughly 0.1mm, in radians.
pub const EPSILON_RAD: f64 = EPSILON_DEG * M_PI_180;

/// sqrt(3) / 2, i.e. sin(60 degrees).
pub const M_SQRT3_2: f64 = 0.866_025_403_784_438_6;
/// sqrt(7)
pub const M_SQRT7: f64 = 2.645_751_311_064_590_6;
/// 1 / sqrt(7)
pub const M_RSQRT7: f64 = 1.0 / M_SQRT7;
/// 1 / 3
pub const M_ONETHIRD: f64 = 1.0 / 3.0;

/// Rotation angle between Class II and Class III resolution axes,
/// asin(sqrt(3.0 / 28.0)).
pub const M_AP7_ROT_RADS: f64 = 0.333_473_172_251_832_1;

/// Earth authalic radius in kilometers (WGS84).
pub const EARTH_RADIUS_KM: f64 = 6371.007_180_918_475;

/// Scaling factor from hex2d resolution 0 unit length (the distance between
/// adjacent cell centers on the plane) to gnomonic unit length.
pub const RES0_U_GNOMONIC: f64 = 0.381_966_011_250_105;
/// 1 / RES0_U_GNOMONIC
pub const INV_RES0_U_GNOMONIC: f64 = 1.0 / RES0_U_GNOMONIC;

/// Finest grid resolution. The grid has 16 resolutions, 0 through 15.
pub const MAX_RES: i32 = 15;
/// Number of faces on the icosahedron.
pub const NUM_ICOSA_FACES: i32 = 20;
/// Face number marking an unused slot in face-set output.
pub const INVALID_FACE: i32 = -1;
/// Number of resolution-0 base cells.
pub const NUM_BASE_CELLS: i32 = 122;
/// Vertices in a hexagonal cell.
pub const NUM_HEX_VERTS: usize = 6;
/// Vertices in a pentagonal cell.
pub const NUM_PENT_VERTS: usize = 5;
/// Pentagons per resolution.
pub const NUM_PENTAGONS: i32 = 12;
/// Maximum vertices in a cell boundary; worst case is a pentagon whose every
/// edge picks up a projection distortion vertex.
pub const MAX_CELL_BNDRY_VERTS: usize = 10;

/// Total cells at the finest resolution: 2 + 120 * 7^15.
pub const NUM_CELLS_MAX_RES: i64 = 569_707_381_193_162;

// 64-bit index layout. High bit must be zero; mode sits just below it.

/// Bit offset of the mode field.
pub const MODE_OFFSET: u8 = 59;
/// Bit offset of the reserved field (edge direction for edge indexes).
pub const RESERVED_OFFSET: u8 = 56;
/// Bit offset of the resolution field.
pub const RES_OFFSET: u8 = 52;
/// Bit offset of the base cell field.
pub const BASE_CELL_OFFSET: u8 = 45;
/// Bits per resolution digit.
pub const PER_DIGIT_OFFSET: u8 = 3;

/// 1 in the highest bit, 0 elsewhere.
pub const HIGH_BIT_MASK: u64 = 1u64 << 63;
/// Complement of [`HIGH_BIT_MASK`].
pub const HIGH_BIT_MASK_NEGATIVE: u64 = !HIGH_BIT_MASK;
/// 1s in the 4 mode bits, 0 elsewhere.
pub const MODE_MASK: u64 = 0b1111u64 << MODE_OFFSET;
/// Complement of [`MODE_MASK`].
pub const MODE_MASK_NEGATIVE: u64 = !MODE_MASK;
/// 1s in the 3 reserved bits, 0 elsewhere.
pub const RESERVED_MASK: u64 = 0b111u64 << RESERVED_OFFSET;
/// Complement of [`RESERVED_MASK`].
pub const RESERVED_MASK_NEGATIVE: u64 = !RESERVED_MASK;
/// 1s in the 4 resolution bits, 0 elsewhere.
pub const RES_MASK: u64 = 0b1111u64 << RES_OFFSET;
/// Complement of [`RES_MASK`].
pub const RES_MASK_NEGATIVE: u64 = !RES_MASK;
/// 1s in the 7 base cell bits, 0 elsewhere.
pub const BASE_CELL_MASK: u64 = 0b111_1111u64 << BASE_CELL_OFFSET;
/// Complement of [`BASE_CELL_MASK`].
pub const BASE_CELL_MASK_NEGATIVE: u64 = !BASE_CELL_MASK;
/// 1s in the 3 bits of a single digit.
pub const DIGIT_MASK: u64 = 0b111u64;

/// Index mode for cells.
pub const CELL_MODE: u8 = 1;
/// Index mode for directed edges.
pub const DIRECTED_EDGE_MODE: u8 = 2;

/// Mode 0, res 0, base cell 0, every digit set to 7. The blank slate every
/// cell index is built from.
pub const INDEX_INIT: u64 = 0x0000_1fff_ffff_ffff;

/// The cell containing the North Pole, by resolution.
#[rustfmt::skip]
pub const NORTH_POLE_CELLS: [u64; (MAX_RES + 1) as usize] = [
    0x8001fffffffffff, 0x81033ffffffffff, 0x820327fffffffff, 0x830326fffffffff,
    0x8403263ffffffff, 0x85032623fffffff, 0x860326237ffffff, 0x870326233ffffff,
    0x880326233bfffff, 0x890326233abffff, 0x8a0326233ab7fff, 0x8b0326233ab0fff,
    0x8c0326233ab03ff, 0x8d0326233ab03bf, 0x8e0326233ab039f, 0x8f0326233ab0399,
];

/// The cell containing the South Pole, by resolution.
#[rustfmt::skip]
pub const SOUTH_POLE_CELLS: [u64; (MAX_RES + 1) as usize] = [
    0x80f3fffffffffff, 0x81f2bffffffffff, 0x82f297fffffffff, 0x83f293fffffffff,
    0x84f2939ffffffff, 0x85f29383fffffff, 0x86f29380fffffff, 0x87f29380effffff,
    0x88f29380e1fffff, 0x89f29380e0fffff, 0x8af29380e0d7fff, 0x8bf29380e0d0fff,
    0x8cf29380e0d0dff, 0x8df29380e0d0cff, 0x8ef29380e0d0cc7, 0x8ff29380e0d0cc4,
];

/// Empirical factor by which a cell's bounding box must be scaled to cover
/// the whole cell.
pub const CELL_SCALE_FACTOR: f64 = 1.1;
/// Empirical factor by which a cell's bounding box must be scaled to cover
/// all of its children.
pub const CHILD_SCALE_FACTOR: f64 = 1.4;
