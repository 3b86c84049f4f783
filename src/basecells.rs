//! The 122 resolution-0 base cells and their adjacency on the icosahedron.
//!
//! Base cells are numbered 0 through 121. Twelve of them are pentagons, one
//! centered on each icosahedron vertex; they lack a neighbor in the `k` axis
//! direction. Each base cell has a "home" face and IJK+ coordinate on that
//! face, and may overlap up to four other faces.

use crate::constants::{NUM_BASE_CELLS, NUM_ICOSA_FACES};
use crate::face::FaceIJK;
use crate::ijk::{CoordIJK, Direction};

/// Sentinel for a base cell that does not exist, e.g. the deleted `k` axis
/// neighbor of a pentagon.
pub(crate) const INVALID_BASE_CELL: i32 = 127;
/// Largest IJK+ component in the face-to-base-cell lookup tables.
pub(crate) const MAX_FACE_COORD: i32 = 2;
/// Sentinel for a rotation count that could not be determined.
pub(crate) const INVALID_ROTATIONS: i32 = -1;

/// Per-base-cell orientation data.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BaseCellData {
  /// Home face and IJK+ coordinate on that face.
  pub home_fijk: FaceIJK,
  pub is_pentagon: bool,
  /// For pentagons, the two faces whose substrate grid is clockwise offset
  /// from the home face (-1 when not a pentagon).
  pub cw_offset_pent: [i32; 2],
}

const fn hexagon(face: i32, i: i32, j: i32, k: i32) -> BaseCellData {
  BaseCellData {
    home_fijk: FaceIJK {
      face,
      coord: CoordIJK { i, j, k },
    },
    is_pentagon: false,
    cw_offset_pent: [-1, -1],
  }
}

const fn pentagon(face: i32, i: i32, j: i32, k: i32, off0: i32, off1: i32) -> BaseCellData {
  BaseCellData {
    home_fijk: FaceIJK {
      face,
      coord: CoordIJK { i, j, k },
    },
    is_pentagon: true,
    cw_offset_pent: [off0, off1],
  }
}

/// Orientation data for every base cell, indexed by base cell number.
#[rustfmt::skip]
pub(crate) static BASE_CELL_DATA: [BaseCellData; NUM_BASE_CELLS as usize] = [
  hexagon(1, 1, 0, 0),            // 0
  hexagon(2, 1, 1, 0),            // 1
  hexagon(1, 0, 0, 0),            // 2
  hexagon(2, 1, 0, 0),            // 3
  pentagon(0, 2, 0, 0, -1, -1),   // 4
  hexagon(1, 1, 1, 0),            // 5
  hexagon(1, 0, 0, 1),            // 6
  hexagon(2, 0, 0, 0),            // 7
  hexagon(0, 1, 0, 0),            // 8
  hexagon(2, 0, 1, 0),            // 9
  hexagon(1, 0, 1, 0),            // 10
  hexagon(1, 0, 1, 1),            // 11
  hexagon(3, 1, 0, 0),            // 12
  hexagon(3, 1, 1, 0),            // 13
  pentagon(11, 2, 0, 0, 2, 6),    // 14
  hexagon(4, 1, 0, 0),            // 15
  hexagon(0, 0, 0, 0),            // 16
  hexagon(6, 0, 1, 0),            // 17
  hexagon(0, 0, 0, 1),            // 18
  hexagon(2, 0, 1, 1),            // 19
  hexagon(7, 0, 0, 1),            // 20
  hexagon(2, 0, 0, 1),            // 21
  hexagon(0, 1, 1, 0),            // 22
  hexagon(6, 0, 0, 1),            // 23
  pentagon(10, 2, 0, 0, 1, 5),    // 24
  hexagon(6, 0, 0, 0),            // 25
  hexagon(3, 0, 0, 0),            // 26
  hexagon(11, 1, 0, 0),           // 27
  hexagon(4, 1, 1, 0),            // 28
  hexagon(3, 0, 1, 0),            // 29
  hexagon(0, 0, 1, 1),            // 30
  hexagon(4, 0, 0, 0),            // 31
  hexagon(5, 0, 1, 0),            // 32
  hexagon(0, 0, 1, 0),            // 33
  hexagon(7, 0, 1, 0),            // 34
  hexagon(11, 1, 1, 0),           // 35
  hexagon(7, 0, 0, 0),            // 36
  hexagon(10, 1, 0, 0),           // 37
  pentagon(12, 2, 0, 0, 3, 7),    // 38
  hexagon(6, 1, 0, 1),            // 39
  hexagon(7, 1, 0, 1),            // 40
  hexagon(4, 0, 0, 1),            // 41
  hexagon(3, 0, 0, 1),            // 42
  hexagon(3, 0, 1, 1),            // 43
  hexagon(4, 0, 1, 0),            // 44
  hexagon(6, 1, 0, 0),            // 45
  hexagon(11, 0, 0, 0),           // 46
  hexagon(8, 0, 0, 1),            // 47
  hexagon(5, 0, 0, 1),            // 48
  pentagon(14, 2, 0, 0, 0, 9),    // 49
  hexagon(5, 0, 0, 0),            // 50
  hexagon(12, 1, 0, 0),           // 51
  hexagon(10, 1, 1, 0),           // 52
  hexagon(4, 0, 1, 1),            // 53
  hexagon(12, 1, 1, 0),           // 54
  hexagon(7, 1, 0, 0),            // 55
  hexagon(11, 0, 1, 0),           // 56
  hexagon(10, 0, 0, 0),           // 57
  pentagon(13, 2, 0, 0, 4, 8),    // 58
  hexagon(10, 0, 0, 1),           // 59
  hexagon(11, 0, 0, 1),           // 60
  hexagon(9, 0, 1, 0),            // 61
  hexagon(8, 0, 1, 0),            // 62
  pentagon(6, 2, 0, 0, 11, 15),   // 63
  hexagon(8, 0, 0, 0),            // 64
  hexagon(9, 0, 0, 1),            // 65
  hexagon(14, 1, 0, 0),           // 66
  hexagon(5, 1, 0, 1),            // 67
  hexagon(16, 0, 1, 1),           // 68
  hexagon(8, 1, 0, 1),            // 69
  hexagon(5, 1, 0, 0),            // 70
  hexagon(12, 0, 0, 0),           // 71
  pentagon(7, 2, 0, 0, 12, 16),   // 72
  hexagon(12, 0, 1, 0),           // 73
  hexagon(10, 0, 1, 0),           // 74
  hexagon(9, 0, 0, 0),            // 75
  hexagon(13, 1, 0, 0),           // 76
  hexagon(16, 0, 0, 1),           // 77
  hexagon(15, 0, 1, 1),           // 78
  hexagon(15, 0, 1, 0),           // 79
  hexagon(16, 0, 1, 0),           // 80
  hexagon(14, 1, 1, 0),           // 81
  hexagon(13, 1, 1, 0),           // 82
  pentagon(5, 2, 0, 0, 10, 19),   // 83
  hexagon(8, 1, 0, 0),            // 84
  hexagon(14, 0, 0, 0),           // 85
  hexagon(9, 1, 0, 1),            // 86
  hexagon(14, 0, 0, 1),           // 87
  hexagon(17, 0, 0, 1),           // 88
  hexagon(12, 0, 0, 1),           // 89
  hexagon(16, 0, 0, 0),           // 90
  hexagon(17, 0, 1, 1),           // 91
  hexagon(15, 0, 0, 1),           // 92
  hexagon(16, 1, 0, 1),           // 93
  hexagon(9, 1, 0, 0),            // 94
  hexagon(15, 0, 0, 0),           // 95
  hexagon(13, 0, 0, 0),           // 96
  pentagon(8, 2, 0, 0, 13, 17),   // 97
  hexagon(13, 0, 1, 0),           // 98
  hexagon(17, 1, 0, 1),           // 99
  hexagon(19, 0, 1, 0),           // 100
  hexagon(14, 0, 1, 0),           // 101
  hexagon(19, 0, 1, 1),           // 102
  hexagon(17, 0, 1, 0),           // 103
  hexagon(13, 0, 0, 1),           // 104
  hexagon(17, 0, 0, 0),           // 105
  hexagon(16, 1, 0, 0),           // 106
  pentagon(9, 2, 0, 0, 14, 18),   // 107
  hexagon(15, 1, 0, 1),           // 108
  hexagon(15, 1, 0, 0),           // 109
  hexagon(18, 0, 1, 1),           // 110
  hexagon(18, 0, 0, 1),           // 111
  hexagon(19, 0, 0, 1),           // 112
  hexagon(17, 1, 0, 0),           // 113
  hexagon(19, 0, 0, 0),           // 114
  hexagon(18, 0, 1, 0),           // 115
  hexagon(18, 1, 0, 1),           // 116
  pentagon(19, 2, 0, 0, -1, -1),  // 117
  hexagon(19, 1, 0, 0),           // 118
  hexagon(18, 0, 0, 0),           // 119
  hexagon(19, 1, 0, 1),           // 120
  hexagon(18, 1, 0, 0),           // 121
];

/// Neighboring base cell in each direction, indexed by base cell then digit.
/// Pentagons have no `k` axis neighbor.
#[rustfmt::skip]
pub(crate) static BASE_CELL_NEIGHBORS: [[i32; 7]; NUM_BASE_CELLS as usize] = [
  [0, 1, 5, 2, 4, 3, 8],                           // 0
  [1, 7, 6, 9, 0, 3, 2],                           // 1
  [2, 6, 10, 11, 0, 1, 5],                         // 2
  [3, 13, 1, 7, 4, 12, 0],                         // 3
  [4, INVALID_BASE_CELL, 15, 8, 3, 0, 12],         // 4 (pentagon)
  [5, 2, 18, 10, 8, 0, 16],                        // 5
  [6, 14, 11, 17, 1, 9, 2],                        // 6
  [7, 21, 9, 19, 3, 13, 1],                        // 7
  [8, 5, 22, 16, 4, 0, 15],                        // 8
  [9, 19, 14, 20, 1, 7, 6],                        // 9
  [10, 11, 24, 23, 5, 2, 18],                      // 10
  [11, 17, 23, 25, 2, 6, 10],                      // 11
  [12, 28, 13, 26, 4, 15, 3],                      // 12
  [13, 26, 21, 29, 3, 12, 7],                      // 13
  [14, INVALID_BASE_CELL, 17, 27, 9, 20, 6],       // 14 (pentagon)
  [15, 22, 28, 31, 4, 8, 12],                      // 15
  [16, 18, 33, 30, 8, 5, 22],                      // 16
  [17, 11, 14, 6, 35, 25, 27],                     // 17
  [18, 24, 30, 32, 5, 10, 16],                     // 18
  [19, 34, 20, 36, 7, 21, 9],                      // 19
  [20, 14, 19, 9, 40, 27, 36],                     // 20
  [21, 38, 19, 34, 13, 29, 7],                     // 21
  [22, 16, 41, 33, 15, 8, 31],                     // 22
  [23, 24, 11, 10, 39, 37, 25],                    // 23
  [24, INVALID_BASE_CELL, 32, 37, 10, 23, 18],     // 24 (pentagon)
  [25, 23, 17, 11, 45, 39, 35],                    // 25
  [26, 42, 29, 43, 12, 28, 13],                    // 26
  [27, 40, 35, 46, 14, 20, 17],                    // 27
  [28, 31, 42, 44, 12, 15, 26],                    // 28
  [29, 43, 38, 47, 13, 26, 21],                    // 29
  [30, 32, 48, 50, 16, 18, 33],                    // 30
  [31, 41, 44, 53, 15, 22, 28],                    // 31
  [32, 30, 24, 18, 52, 50, 37],                    // 32
  [33, 30, 49, 48, 22, 16, 41],                    // 33
  [34, 19, 38, 21, 54, 36, 51],                    // 34
  [35, 46, 45, 56, 17, 27, 25],                    // 35
  [36, 20, 34, 19, 55, 40, 54],                    // 36
  [37, 39, 52, 57, 24, 23, 32],                    // 37
  [38, INVALID_BASE_CELL, 34, 51, 29, 47, 21],     // 38 (pentagon)
  [39, 37, 25, 23, 59, 57, 45],                    // 39
  [40, 27, 36, 20, 60, 46, 55],                    // 40
  [41, 49, 53, 61, 22, 33, 31],                    // 41
  [42, 58, 43, 62, 28, 44, 26],                    // 42
  [43, 62, 47, 64, 26, 42, 29],                    // 43
  [44, 53, 58, 65, 28, 31, 42],                    // 44
  [45, 39, 35, 25, 63, 59, 56],                    // 45
  [46, 60, 56, 68, 27, 40, 35],                    // 46
  [47, 38, 43, 29, 69, 51, 64],                    // 47
  [48, 49, 30, 33, 67, 66, 50],                    // 48
  [49, INVALID_BASE_CELL, 61, 66, 33, 48, 41],     // 49 (pentagon)
  [50, 48, 32, 30, 70, 67, 52],                    // 50
  [51, 69, 54, 71, 38, 47, 34],                    // 51
  [52, 57, 70, 74, 32, 37, 50],                    // 52
  [53, 61, 65, 75, 31, 41, 44],                    // 53
  [54, 71, 55, 73, 34, 51, 36],                    // 54
  [55, 40, 54, 36, 72, 60, 73],                    // 55
  [56, 68, 63, 77, 35, 46, 45],                    // 56
  [57, 59, 74, 78, 37, 39, 52],                    // 57
  [58, INVALID_BASE_CELL, 62, 76, 44, 65, 42],     // 58 (pentagon)
  [59, 63, 78, 79, 39, 45, 57],                    // 59
  [60, 72, 68, 80, 40, 55, 46],                    // 60
  [61, 53, 49, 41, 81, 75, 66],                    // 61
  [62, 43, 58, 42, 82, 64, 76],                    // 62
  [63, INVALID_BASE_CELL, 56, 45, 79, 59, 77],     // 63 (pentagon)
  [64, 47, 62, 43, 84, 69, 82],                    // 64
  [65, 58, 53, 44, 86, 76, 75],                    // 65
  [66, 67, 81, 85, 49, 48, 61],                    // 66
  [67, 66, 50, 48, 87, 85, 70],                    // 67
  [68, 56, 60, 46, 90, 77, 80],                    // 68
  [69, 51, 64, 47, 89, 71, 84],                    // 69
  [70, 67, 52, 50, 83, 87, 74],                    // 70
  [71, 89, 73, 91, 51, 69, 54],                    // 71
  [72, INVALID_BASE_CELL, 73, 55, 80, 60, 88],     // 72 (pentagon)
  [73, 91, 72, 88, 54, 71, 55],                    // 73
  [74, 78, 83, 92, 52, 57, 70],                    // 74
  [75, 65, 61, 53, 94, 86, 81],                    // 75
  [76, 86, 82, 96, 58, 65, 62],                    // 76
  [77, 63, 68, 56, 93, 79, 90],                    // 77
  [78, 74, 59, 57, 95, 92, 79],                    // 78
  [79, 78, 63, 59, 93, 95, 77],                    // 79
  [80, 68, 72, 60, 99, 90, 88],                    // 80
  [81, 85, 94, 101, 61, 66, 75],                   // 81
  [82, 96, 84, 98, 62, 76, 64],                    // 82
  [83, INVALID_BASE_CELL, 74, 70, 100, 87, 92],    // 83 (pentagon)
  [84, 69, 82, 64, 97, 89, 98],                    // 84
  [85, 87, 101, 102, 66, 67, 81],                  // 85
  [86, 76, 75, 65, 104, 96, 94],                   // 86
  [87, 83, 102, 100, 67, 70, 85],                  // 87
  [88, 72, 91, 73, 99, 80, 105],                   // 88
  [89, 97, 91, 103, 69, 84, 71],                   // 89
  [90, 77, 80, 68, 106, 93, 99],                   // 90
  [91, 73, 89, 71, 105, 88, 103],                  // 91
  [92, 83, 78, 74, 108, 100, 95],                  // 92
  [93, 79, 90, 77, 109, 95, 106],                  // 93
  [94, 86, 81, 75, 107, 104, 101],                 // 94
  [95, 92, 79, 78, 109, 108, 93],                  // 95
  [96, 104, 98, 110, 76, 86, 82],                  // 96
  [97, INVALID_BASE_CELL, 98, 84, 103, 89, 111],   // 97 (pentagon)
  [98, 110, 97, 111, 82, 96, 84],                  // 98
  [99, 80, 105, 88, 106, 90, 113],                 // 99
  [100, 102, 83, 87, 108, 114, 92],                // 100
  [101, 102, 107, 112, 81, 85, 94],                // 101
  [102, 101, 87, 85, 114, 112, 100],               // 102
  [103, 91, 97, 89, 116, 105, 111],                // 103
  [104, 107, 110, 115, 86, 94, 96],                // 104
  [105, 88, 103, 91, 113, 99, 116],                // 105
  [106, 93, 99, 90, 117, 109, 113],                // 106
  [107, INVALID_BASE_CELL, 101, 94, 115, 104, 112],// 107 (pentagon)
  [108, 100, 95, 92, 118, 114, 109],               // 108
  [109, 108, 93, 95, 117, 118, 106],               // 109
  [110, 98, 104, 96, 119, 111, 115],               // 110
  [111, 97, 110, 98, 116, 103, 119],               // 111
  [112, 107, 102, 101, 120, 115, 114],             // 112
  [113, 99, 116, 105, 117, 106, 121],              // 113
  [114, 112, 100, 102, 118, 120, 108],             // 114
  [115, 110, 107, 104, 120, 119, 112],             // 115
  [116, 103, 119, 111, 113, 105, 121],             // 116
  [117, INVALID_BASE_CELL, 109, 118, 113, 121, 106],// 117 (pentagon)
  [118, 120, 108, 114, 117, 121, 109],             // 118
  [119, 111, 115, 110, 121, 116, 120],             // 119
  [120, 115, 114, 112, 121, 119, 118],             // 120
  [121, 116, 120, 119, 117, 113, 118],             // 121
];

/// Number of 60 degree counterclockwise rotations picked up when crossing
/// into the neighboring base cell in each direction.
#[rustfmt::skip]
pub(crate) static BASE_CELL_NEIGHBOR_60CCW_ROTS: [[i32; 7]; NUM_BASE_CELLS as usize] = [
  [0, 5, 0, 0, 1, 5, 1],   // 0
  [0, 0, 1, 0, 1, 0, 1],   // 1
  [0, 0, 0, 0, 0, 5, 0],   // 2
  [0, 5, 0, 0, 2, 5, 1],   // 3
  [0, -1, 1, 0, 3, 4, 2],  // 4 (pentagon)
  [0, 0, 1, 0, 1, 0, 1],   // 5
  [0, 0, 0, 3, 5, 5, 0],   // 6
  [0, 0, 0, 0, 0, 5, 0],   // 7
  [0, 5, 0, 0, 0, 5, 1],   // 8
  [0, 0, 1, 3, 0, 0, 1],   // 9
  [0, 0, 1, 3, 0, 0, 1],   // 10
  [0, 3, 3, 3, 0, 0, 0],   // 11
  [0, 5, 0, 0, 3, 5, 1],   // 12
  [0, 0, 1, 0, 1, 0, 1],   // 13
  [0, -1, 3, 0, 5, 2, 0],  // 14 (pentagon)
  [0, 5, 0, 0, 4, 5, 1],   // 15
  [0, 0, 0, 0, 0, 5, 0],   // 16
  [0, 3, 3, 3, 3, 0, 3],   // 17
  [0, 0, 0, 3, 5, 5, 0],   // 18
  [0, 3, 3, 3, 0, 0, 0],   // 19
  [0, 3, 3, 3, 0, 3, 0],   // 20
  [0, 0, 0, 3, 5, 5, 0],   // 21
  [0, 0, 1, 0, 1, 0, 1],   // 22
  [0, 3, 3, 3, 0, 3, 0],   // 23
  [0, -1, 3, 0, 5, 2, 0],  // 24 (pentagon)
  [0, 0, 0, 3, 0, 0, 3],   // 25
  [0, 0, 0, 0, 0, 5, 0],   // 26
  [0, 3, 0, 0, 0, 3, 3],   // 27
  [0, 0, 1, 0, 1, 0, 1],   // 28
  [0, 0, 1, 3, 0, 0, 1],   // 29
  [0, 3, 3, 3, 0, 0, 0],   // 30
  [0, 0, 0, 0, 0, 5, 0],   // 31
  [0, 3, 3, 3, 3, 0, 3],   // 32
  [0, 0, 1, 3, 0, 0, 1],   // 33
  [0, 3, 3, 3, 3, 0, 3],   // 34
  [0, 0, 3, 0, 3, 0, 3],   // 35
  [0, 0, 0, 3, 0, 0, 3],   // 36
  [0, 3, 0, 0, 0, 3, 3],   // 37
  [0, -1, 3, 0, 5, 2, 0],  // 38 (pentagon)
  [0, 3, 0, 0, 3, 3, 0],   // 39
  [0, 3, 0, 0, 3, 3, 0],   // 40
  [0, 0, 0, 3, 5, 5, 0],   // 41
  [0, 0, 0, 3, 5, 5, 0],   // 42
  [0, 3, 3, 3, 0, 0, 0],   // 43
  [0, 0, 1, 3, 0, 0, 1],   // 44
  [0, 0, 3, 0, 0, 3, 3],   // 45
  [0, 0, 0, 3, 0, 3, 0],   // 46
  [0, 3, 3, 3, 0, 3, 0],   // 47
  [0, 3, 3, 3, 0, 3, 0],   // 48
  [0, -1, 3, 0, 5, 2, 0],  // 49 (pentagon)
  [0, 0, 0, 3, 0, 0, 3],   // 50
  [0, 3, 0, 0, 0, 3, 3],   // 51
  [0, 0, 3, 0, 3, 0, 3],   // 52
  [0, 3, 3, 3, 0, 0, 0],   // 53
  [0, 0, 3, 0, 3, 0, 3],   // 54
  [0, 0, 3, 0, 0, 3, 3],   // 55
  [0, 3, 3, 3, 0, 0, 3],   // 56
  [0, 0, 0, 3, 0, 3, 0],   // 57
  [0, -1, 3, 0, 5, 2, 0],  // 58 (pentagon)
  [0, 3, 3, 3, 3, 3, 0],   // 59
  [0, 3, 3, 3, 3, 3, 0],   // 60
  [0, 3, 3, 3, 3, 0, 3],   // 61
  [0, 3, 3, 3, 3, 0, 3],   // 62
  [0, -1, 3, 0, 5, 2, 0],  // 63 (pentagon)
  [0, 0, 0, 3, 0, 0, 3],   // 64
  [0, 3, 3, 3, 0, 3, 0],   // 65
  [0, 3, 0, 0, 0, 3, 3],   // 66
  [0, 3, 0, 0, 3, 3, 0],   // 67
  [0, 3, 3, 3, 0, 0, 0],   // 68
  [0, 3, 0, 0, 3, 3, 0],   // 69
  [0, 0, 3, 0, 0, 3, 3],   // 70
  [0, 0, 0, 3, 0, 3, 0],   // 71
  [0, -1, 3, 0, 5, 2, 0],  // 72 (pentagon)
  [0, 3, 3, 3, 0, 0, 3],   // 73
  [0, 3, 3, 3, 0, 0, 3],   // 74
  [0, 0, 0, 3, 0, 0, 3],   // 75
  [0, 3, 0, 0, 0, 3, 3],   // 76
  [0, 0, 0, 3, 0, 5, 0],   // 77
  [0, 3, 3, 3, 0, 0, 0],   // 78
  [0, 0, 1, 3, 1, 0, 1],   // 79
  [0, 0, 1, 3, 1, 0, 1],   // 80
  [0, 0, 3, 0, 3, 0, 3],   // 81
  [0, 0, 3, 0, 3, 0, 3],   // 82
  [0, -1, 3, 0, 5, 2, 0],  // 83 (pentagon)
  [0, 0, 3, 0, 0, 3, 3],   // 84
  [0, 0, 0, 3, 0, 3, 0],   // 85
  [0, 3, 0, 0, 3, 3, 0],   // 86
  [0, 3, 3, 3, 3, 3, 0],   // 87
  [0, 0, 0, 3, 0, 5, 0],   // 88
  [0, 3, 3, 3, 3, 3, 0],   // 89
  [0, 0, 0, 0, 0, 0, 1],   // 90
  [0, 3, 3, 3, 0, 0, 0],   // 91
  [0, 0, 0, 3, 0, 5, 0],   // 92
  [0, 5, 0, 0, 5, 5, 0],   // 93
  [0, 0, 3, 0, 0, 3, 3],   // 94
  [0, 0, 0, 0, 0, 0, 1],   // 95
  [0, 0, 0, 3, 0, 3, 0],   // 96
  [0, -1, 3, 0, 5, 2, 0],  // 97 (pentagon)
  [0, 3, 3, 3, 0, 0, 3],   // 98
  [0, 5, 0, 0, 5, 5, 0],   // 99
  [0, 0, 1, 3, 1, 0, 1],   // 100
  [0, 3, 3, 3, 0, 0, 3],   // 101
  [0, 3, 3, 3, 0, 0, 0],   // 102
  [0, 0, 1, 3, 1, 0, 1],   // 103
  [0, 3, 3, 3, 3, 3, 0],   // 104
  [0, 0, 0, 0, 0, 0, 1],   // 105
  [0, 0, 1, 0, 3, 5, 1],   // 106
  [0, -1, 3, 0, 5, 2, 0],  // 107 (pentagon)
  [0, 5, 0, 0, 5, 5, 0],   // 108
  [0, 0, 1, 0, 4, 5, 1],   // 109
  [0, 3, 3, 3, 0, 0, 0],   // 110
  [0, 0, 0, 3, 0, 5, 0],   // 111
  [0, 0, 0, 3, 0, 5, 0],   // 112
  [0, 0, 1, 0, 2, 5, 1],   // 113
  [0, 0, 0, 0, 0, 0, 1],   // 114
  [0, 0, 1, 3, 1, 0, 1],   // 115
  [0, 5, 0, 0, 5, 5, 0],   // 116
  [0, -1, 1, 0, 3, 4, 2],  // 117 (pentagon)
  [0, 0, 1, 0, 0, 5, 1],   // 118
  [0, 0, 0, 0, 0, 0, 1],   // 119
  [0, 5, 0, 0, 5, 5, 0],   // 120
  [0, 0, 1, 0, 1, 5, 1],   // 121
];

/// Base cell number and orientation rotation at one face IJK+ coordinate.
#[derive(Debug, Clone, Copy)]
struct BaseCellRotation {
  base_cell: i32,
  ccw_rot60: i32,
}

const fn r(base_cell: i32, ccw_rot60: i32) -> BaseCellRotation {
  BaseCellRotation {
    base_cell,
    ccw_rot60,
  }
}

/// Reverse lookup: base cell and orientation for each resolution 0 IJK+
/// coordinate on each face. Valid coordinates range from (0,0,0) to (2,2,2).
#[rustfmt::skip]
static FACE_IJK_BASE_CELLS: [[[[BaseCellRotation; 3]; 3]; 3]; NUM_ICOSA_FACES as usize] = [
  // face 0
  [[[r(16, 0), r(18, 0), r(24, 0)], [r(33, 0), r(30, 0), r(32, 3)], [r(49, 1), r(48, 3), r(50, 3)]],
   [[r(8, 0), r(5, 5), r(10, 5)], [r(22, 0), r(16, 0), r(18, 0)], [r(41, 1), r(33, 0), r(30, 0)]],
   [[r(4, 0), r(0, 5), r(2, 5)], [r(15, 1), r(8, 0), r(5, 5)], [r(31, 1), r(22, 0), r(16, 0)]]],
  // face 1
  [[[r(2, 0), r(6, 0), r(14, 0)], [r(10, 0), r(11, 0), r(17, 3)], [r(24, 1), r(23, 3), r(25, 3)]],
   [[r(0, 0), r(1, 5), r(9, 5)], [r(5, 0), r(2, 0), r(6, 0)], [r(18, 1), r(10, 0), r(11, 0)]],
   [[r(4, 1), r(3, 5), r(7, 5)], [r(8, 1), r(0, 0), r(1, 5)], [r(16, 1), r(5, 0), r(2, 0)]]],
  // face 2
  [[[r(7, 0), r(21, 0), r(38, 0)], [r(9, 0), r(19, 0), r(34, 3)], [r(14, 1), r(20, 3), r(36, 3)]],
   [[r(3, 0), r(13, 5), r(29, 5)], [r(1, 0), r(7, 0), r(21, 0)], [r(6, 1), r(9, 0), r(19, 0)]],
   [[r(4, 2), r(12, 5), r(26, 5)], [r(0, 1), r(3, 0), r(13, 5)], [r(2, 1), r(1, 0), r(7, 0)]]],
  // face 3
  [[[r(26, 0), r(42, 0), r(58, 0)], [r(29, 0), r(43, 0), r(62, 3)], [r(38, 1), r(47, 3), r(64, 3)]],
   [[r(12, 0), r(28, 5), r(44, 5)], [r(13, 0), r(26, 0), r(42, 0)], [r(21, 1), r(29, 0), r(43, 0)]],
   [[r(4, 3), r(15, 5), r(31, 5)], [r(3, 1), r(12, 0), r(28, 5)], [r(7, 1), r(13, 0), r(26, 0)]]],
  // face 4
  [[[r(31, 0), r(41, 0), r(49, 0)], [r(44, 0), r(53, 0), r(61, 3)], [r(58, 1), r(65, 3), r(75, 3)]],
   [[r(15, 0), r(22, 5), r(33, 5)], [r(28, 0), r(31, 0), r(41, 0)], [r(42, 1), r(44, 0), r(53, 0)]],
   [[r(4, 4), r(8, 5), r(16, 5)], [r(12, 1), r(15, 0), r(22, 5)], [r(26, 1), r(28, 0), r(31, 0)]]],
  // face 5
  [[[r(50, 0), r(48, 0), r(49, 3)], [r(32, 0), r(30, 3), r(33, 3)], [r(24, 3), r(18, 3), r(16, 3)]],
   [[r(70, 0), r(67, 0), r(66, 3)], [r(52, 3), r(50, 0), r(48, 0)], [r(37, 3), r(32, 0), r(30, 3)]],
   [[r(83, 0), r(87, 3), r(85, 3)], [r(74, 3), r(70, 0), r(67, 0)], [r(57, 1), r(52, 3), r(50, 0)]]],
  // face 6
  [[[r(25, 0), r(23, 0), r(24, 3)], [r(17, 0), r(11, 3), r(10, 3)], [r(14, 3), r(6, 3), r(2, 3)]],
   [[r(45, 0), r(39, 0), r(37, 3)], [r(35, 3), r(25, 0), r(23, 0)], [r(27, 3), r(17, 0), r(11, 3)]],
   [[r(63, 0), r(59, 3), r(57, 3)], [r(56, 3), r(45, 0), r(39, 0)], [r(46, 3), r(35, 3), r(25, 0)]]],
  // face 7
  [[[r(36, 0), r(20, 0), r(14, 3)], [r(34, 0), r(19, 3), r(9, 3)], [r(38, 3), r(21, 3), r(7, 3)]],
   [[r(55, 0), r(40, 0), r(27, 3)], [r(54, 3), r(36, 0), r(20, 0)], [r(51, 3), r(34, 0), r(19, 3)]],
   [[r(72, 0), r(60, 3), r(46, 3)], [r(73, 3), r(55, 0), r(40, 0)], [r(71, 3), r(54, 3), r(36, 0)]]],
  // face 8
  [[[r(64, 0), r(47, 0), r(38, 3)], [r(62, 0), r(43, 3), r(29, 3)], [r(58, 3), r(42, 3), r(26, 3)]],
   [[r(84, 0), r(69, 0), r(51, 3)], [r(82, 3), r(64, 0), r(47, 0)], [r(76, 3), r(62, 0), r(43, 3)]],
   [[r(97, 0), r(89, 3), r(71, 3)], [r(98, 3), r(84, 0), r(69, 0)], [r(96, 3), r(82, 3), r(64, 0)]]],
  // face 9
  [[[r(75, 0), r(65, 0), r(58, 3)], [r(61, 0), r(53, 3), r(44, 3)], [r(49, 3), r(41, 3), r(31, 3)]],
   [[r(94, 0), r(86, 0), r(76, 3)], [r(81, 3), r(75, 0), r(65, 0)], [r(66, 3), r(61, 0), r(53, 3)]],
   [[r(107, 0), r(104, 3), r(96, 3)], [r(101, 3), r(94, 0), r(86, 0)], [r(85, 3), r(81, 3), r(75, 0)]]],
  // face 10
  [[[r(57, 0), r(59, 0), r(63, 3)], [r(74, 0), r(78, 3), r(79, 3)], [r(83, 3), r(92, 3), r(95, 3)]],
   [[r(37, 0), r(39, 3), r(45, 3)], [r(52, 0), r(57, 0), r(59, 0)], [r(70, 3), r(74, 0), r(78, 3)]],
   [[r(24, 0), r(23, 3), r(25, 3)], [r(32, 3), r(37, 0), r(39, 3)], [r(50, 3), r(52, 0), r(57, 0)]]],
  // face 11
  [[[r(46, 0), r(60, 0), r(72, 3)], [r(56, 0), r(68, 3), r(80, 3)], [r(63, 3), r(77, 3), r(90, 3)]],
   [[r(27, 0), r(40, 3), r(55, 3)], [r(35, 0), r(46, 0), r(60, 0)], [r(45, 3), r(56, 0), r(68, 3)]],
   [[r(14, 0), r(20, 3), r(36, 3)], [r(17, 3), r(27, 0), r(40, 3)], [r(25, 3), r(35, 0), r(46, 0)]]],
  // face 12
  [[[r(71, 0), r(89, 0), r(97, 3)], [r(73, 0), r(91, 3), r(103, 3)], [r(72, 3), r(88, 3), r(105, 3)]],
   [[r(51, 0), r(69, 3), r(84, 3)], [r(54, 0), r(71, 0), r(89, 0)], [r(55, 3), r(73, 0), r(91, 3)]],
   [[r(38, 0), r(47, 3), r(64, 3)], [r(34, 3), r(51, 0), r(69, 3)], [r(36, 3), r(54, 0), r(71, 0)]]],
  // face 13
  [[[r(96, 0), r(104, 0), r(107, 3)], [r(98, 0), r(110, 3), r(115, 3)], [r(97, 3), r(111, 3), r(119, 3)]],
   [[r(76, 0), r(86, 3), r(94, 3)], [r(82, 0), r(96, 0), r(104, 0)], [r(84, 3), r(98, 0), r(110, 3)]],
   [[r(58, 0), r(65, 3), r(75, 3)], [r(62, 3), r(76, 0), r(86, 3)], [r(64, 3), r(82, 0), r(96, 0)]]],
  // face 14
  [[[r(85, 0), r(87, 0), r(83, 3)], [r(101, 0), r(102, 3), r(100, 3)], [r(107, 3), r(112, 3), r(114, 3)]],
   [[r(66, 0), r(67, 3), r(70, 3)], [r(81, 0), r(85, 0), r(87, 0)], [r(94, 3), r(101, 0), r(102, 3)]],
   [[r(49, 0), r(48, 3), r(50, 3)], [r(61, 3), r(66, 0), r(67, 3)], [r(75, 3), r(81, 0), r(85, 0)]]],
  // face 15
  [[[r(95, 0), r(92, 0), r(83, 0)], [r(79, 0), r(78, 0), r(74, 3)], [r(63, 1), r(59, 3), r(57, 3)]],
   [[r(109, 0), r(108, 0), r(100, 5)], [r(93, 1), r(95, 0), r(92, 0)], [r(77, 1), r(79, 0), r(78, 0)]],
   [[r(117, 4), r(118, 5), r(114, 5)], [r(106, 1), r(109, 0), r(108, 0)], [r(90, 1), r(93, 1), r(95, 0)]]],
  // face 16
  [[[r(90, 0), r(77, 0), r(63, 0)], [r(80, 0), r(68, 0), r(56, 3)], [r(72, 1), r(60, 3), r(46, 3)]],
   [[r(106, 0), r(93, 0), r(79, 5)], [r(99, 1), r(90, 0), r(77, 0)], [r(88, 1), r(80, 0), r(68, 0)]],
   [[r(117, 3), r(109, 5), r(95, 5)], [r(113, 1), r(106, 0), r(93, 0)], [r(105, 1), r(99, 1), r(90, 0)]]],
  // face 17
  [[[r(105, 0), r(88, 0), r(72, 0)], [r(103, 0), r(91, 0), r(73, 3)], [r(97, 1), r(89, 3), r(71, 3)]],
   [[r(113, 0), r(99, 0), r(80, 5)], [r(116, 1), r(105, 0), r(88, 0)], [r(111, 1), r(103, 0), r(91, 0)]],
   [[r(117, 2), r(106, 5), r(90, 5)], [r(121, 1), r(113, 0), r(99, 0)], [r(119, 1), r(116, 1), r(105, 0)]]],
  // face 18
  [[[r(119, 0), r(111, 0), r(97, 0)], [r(115, 0), r(110, 0), r(98, 3)], [r(107, 1), r(104, 3), r(96, 3)]],
   [[r(121, 0), r(116, 0), r(103, 5)], [r(120, 1), r(119, 0), r(111, 0)], [r(112, 1), r(115, 0), r(110, 0)]],
   [[r(117, 1), r(113, 5), r(105, 5)], [r(118, 1), r(121, 0), r(116, 0)], [r(114, 1), r(120, 1), r(119, 0)]]],
  // face 19
  [[[r(114, 0), r(112, 0), r(107, 0)], [r(100, 0), r(102, 0), r(101, 3)], [r(83, 1), r(87, 3), r(85, 3)]],
   [[r(118, 0), r(120, 0), r(115, 5)], [r(108, 1), r(114, 0), r(112, 0)], [r(92, 1), r(100, 0), r(102, 0)]],
   [[r(117, 0), r(121, 5), r(119, 5)], [r(109, 1), r(118, 0), r(120, 0)], [r(95, 1), r(108, 1), r(114, 0)]]],
];

/// Whether the base cell is a pentagon.
#[inline]
#[must_use]
pub(crate) fn _is_base_cell_pentagon(base_cell: i32) -> bool {
  if base_cell < 0 || base_cell >= NUM_BASE_CELLS {
    return false;
  }
  BASE_CELL_DATA[base_cell as usize].is_pentagon
}

/// Whether the base cell is one of the two polar pentagons, whose neighbors
/// are all oriented towards it.
#[inline]
#[must_use]
pub(crate) fn _is_base_cell_polar_pentagon(base_cell: i32) -> bool {
  base_cell == 4 || base_cell == 117
}

/// The base cell at a resolution 0 IJK+ coordinate on a face, or
/// [`INVALID_BASE_CELL`] when the coordinate is out of range.
#[must_use]
pub(crate) fn _face_ijk_to_base_cell(h: &FaceIJK) -> i32 {
  if !_face_coord_in_range(h) {
    return INVALID_BASE_CELL;
  }
  FACE_IJK_BASE_CELLS[h.face as usize][h.coord.i as usize][h.coord.j as usize][h.coord.k as usize]
    .base_cell
}

/// The number of 60 degree ccw rotations from a face's coordinate system to
/// that of the base cell at the given resolution 0 coordinate.
#[must_use]
pub(crate) fn _face_ijk_to_base_cell_ccwrot60(h: &FaceIJK) -> i32 {
  if !_face_coord_in_range(h) {
    return INVALID_ROTATIONS;
  }
  FACE_IJK_BASE_CELLS[h.face as usize][h.coord.i as usize][h.coord.j as usize][h.coord.k as usize]
    .ccw_rot60
}

#[inline]
fn _face_coord_in_range(h: &FaceIJK) -> bool {
  h.face >= 0
    && h.face < NUM_ICOSA_FACES
    && h.coord.i >= 0
    && h.coord.i <= MAX_FACE_COORD
    && h.coord.j >= 0
    && h.coord.j <= MAX_FACE_COORD
    && h.coord.k >= 0
    && h.coord.k <= MAX_FACE_COORD
}

/// The home face and IJK+ coordinate of a base cell.
#[inline]
pub(crate) fn _base_cell_to_face_ijk(base_cell: i32, h: &mut FaceIJK) {
  *h = BASE_CELL_DATA[base_cell as usize].home_fijk;
}

/// Whether the given face is a clockwise offset face of a pentagonal base
/// cell.
#[inline]
#[must_use]
pub(crate) fn _base_cell_is_cw_offset(base_cell: i32, test_face: i32) -> bool {
  if base_cell < 0 || base_cell >= NUM_BASE_CELLS {
    return false;
  }
  let data = &BASE_CELL_DATA[base_cell as usize];
  data.is_pentagon && (data.cw_offset_pent[0] == test_face || data.cw_offset_pent[1] == test_face)
}

/// The neighboring base cell in the given direction, or
/// [`INVALID_BASE_CELL`] for the deleted neighbor of a pentagon.
#[inline]
#[must_use]
pub(crate) fn _get_base_cell_neighbor(base_cell: i32, dir: Direction) -> i32 {
  if base_cell < 0 || base_cell >= NUM_BASE_CELLS || dir == Direction::InvalidDigit {
    return INVALID_BASE_CELL;
  }
  BASE_CELL_NEIGHBORS[base_cell as usize][dir as usize]
}

/// The direction from one base cell to a neighboring base cell, or
/// [`Direction::InvalidDigit`] when they are not neighbors.
#[must_use]
pub(crate) fn _get_base_cell_direction(origin_base_cell: i32, neighbor_base_cell: i32) -> Direction {
  for dir_val in 0..7u64 {
    let dir = Direction::from_u64(dir_val);
    if _get_base_cell_neighbor(origin_base_cell, dir) == neighbor_base_cell {
      return dir;
    }
  }
  Direction::InvalidDigit
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::NUM_PENTAGONS;

  #[test]
  fn test_pentagon_count() {
    let count = (0..NUM_BASE_CELLS)
      .filter(|&bc| _is_base_cell_pentagon(bc))
      .count();
    assert_eq!(count, NUM_PENTAGONS as usize);
  }

  #[test]
  fn test_polar_pentagons() {
    assert!(_is_base_cell_polar_pentagon(4));
    assert!(_is_base_cell_polar_pentagon(117));
    assert!(!_is_base_cell_polar_pentagon(14));
    assert!(!_is_base_cell_polar_pentagon(0));
  }

  #[test]
  fn test_base_cell_neighbors_consistent() {
    for bc in 0..NUM_BASE_CELLS {
      // Direction::Center maps every base cell to itself.
      assert_eq!(_get_base_cell_neighbor(bc, Direction::Center), bc);

      // Pentagons lack a K-axis neighbor; hexagons never do.
      let k_neighbor = _get_base_cell_neighbor(bc, Direction::KAxes);
      if _is_base_cell_pentagon(bc) {
        assert_eq!(k_neighbor, INVALID_BASE_CELL, "pentagon {bc}");
      } else {
        assert!((0..NUM_BASE_CELLS).contains(&k_neighbor), "hexagon {bc}");
      }
    }
  }

  #[test]
  fn test_home_fijk_round_trip() {
    // Every base cell's home coordinate looks itself up, with rotation 0.
    for bc in 0..NUM_BASE_CELLS {
      let mut fijk = FaceIJK::default();
      _base_cell_to_face_ijk(bc, &mut fijk);
      assert_eq!(_face_ijk_to_base_cell(&fijk), bc, "base cell {bc}");
      assert_eq!(_face_ijk_to_base_cell_ccwrot60(&fijk), 0, "base cell {bc}");
    }
  }

  #[test]
  fn test_neighbor_direction_round_trip() {
    for bc in 0..NUM_BASE_CELLS {
      for dir_val in 1..7u64 {
        let dir = Direction::from_u64(dir_val);
        let neighbor = _get_base_cell_neighbor(bc, dir);
        if neighbor == INVALID_BASE_CELL {
          continue;
        }
        let back = _get_base_cell_direction(bc, neighbor);
        assert_eq!(_get_base_cell_neighbor(bc, back), neighbor);
      }
    }
  }

  #[test]
  fn test_cw_offset_faces() {
    // Pentagon base cell 14 is offset on faces 2 and 6.
    assert!(_base_cell_is_cw_offset(14, 2));
    assert!(_base_cell_is_cw_offset(14, 6));
    assert!(!_base_cell_is_cw_offset(14, 11));
    // Hexagons are never offset.
    assert!(!_base_cell_is_cw_offset(0, 1));
  }

  #[test]
  fn test_out_of_range_lookups() {
    let bad = FaceIJK {
      face: 0,
      coord: CoordIJK { i: 3, j: 0, k: 0 },
    };
    assert_eq!(_face_ijk_to_base_cell(&bad), INVALID_BASE_CELL);
    assert_eq!(_face_ijk_to_base_cell_ccwrot60(&bad), INVALID_ROTATIONS);
    assert_eq!(
      _get_base_cell_neighbor(INVALID_BASE_CELL, Direction::IAxes),
      INVALID_BASE_CELL
    );
  }
}
