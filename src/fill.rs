//! Polygon fill: the set of cells at a resolution matching a polygon under
//! a containment mode. The search starts from the 122 resolution 0 cells
//! and descends, pruning by bounding box, so the cost tracks the polygon
//! rather than the cell count of the whole resolution.

use crate::bbox::{
  BBox, bbox_contains_bbox, bbox_from_cell_boundary, bbox_overlaps_bbox, bbox_to_cell_boundary,
  bboxes_from_geo_polygon, scale_bbox,
};
use crate::constants::{
  CELL_SCALE_FACTOR, CHILD_SCALE_FACTOR, MAX_RES, M_PI, M_PI_2, NORTH_POLE_CELLS, NUM_BASE_CELLS,
  SOUTH_POLE_CELLS,
};
use crate::error::HexGridError;
use crate::hierarchy::{ChildrenIter, cell_to_center_child, cell_to_children_size};
use crate::ijk::Direction;
use crate::index::{
  CellIndex, NULL_INDEX, base_cell_number_to_cell, get_base_cell, get_index_digit, get_resolution,
  is_pentagon, set_index_digit, set_resolution,
};
use crate::indexing::{cell_to_boundary, cell_to_lat_lng};
use crate::polygon::{
  GeoPolygon, cell_boundary_crosses_polygon, cell_boundary_inside_polygon, point_inside_cell_boundary,
  point_inside_polygon,
};
#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};

/// What it means for a cell to "match" the polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
pub enum ContainmentMode {
  /// The cell center is inside the polygon.
  #[default]
  Center = 0,
  /// The cell is entirely inside the polygon.
  Full = 1,
  /// The cell and the polygon share any area.
  Overlapping = 2,
  /// The cell's bounding box and the polygon share any area. A cheap
  /// superset of [`ContainmentMode::Overlapping`].
  OverlappingBbox = 3,
}

impl TryFrom<u32> for ContainmentMode {
  type Error = HexGridError;

  fn try_from(value: u32) -> Result<Self, HexGridError> {
    match value {
      0 => Ok(ContainmentMode::Center),
      1 => Ok(ContainmentMode::Full),
      2 => Ok(ContainmentMode::Overlapping),
      3 => Ok(ContainmentMode::OverlappingBbox),
      _ => Err(HexGridError::OptionInvalid),
    }
  }
}

/// Bits of the flags argument that select the containment mode.
const CONTAINMENT_MODE_MASK: u32 = 0b1111;

/// Rejects flags with unknown bits set and extracts the containment mode.
fn validate_polygon_flags(flags: u32) -> Result<ContainmentMode, HexGridError> {
  if flags & !CONTAINMENT_MODE_MASK != 0 {
    return Err(HexGridError::OptionInvalid);
  }
  ContainmentMode::try_from(flags & CONTAINMENT_MODE_MASK)
}

/// Precomputed bounding boxes for the 122 resolution 0 cells, in radians.
#[rustfmt::skip]
static RES0_BBOXES: [BBox; NUM_BASE_CELLS as usize] = [
  /*   0 */ BBox { north:  1.5248015836, south:  1.1787242429, east:  2.0562234494, west:  0.4377760900 },
  /*   1 */ BBox { north:  1.5248015836, south:  1.1787242429, east: -0.6066488365, west:  2.5404698032 },
  /*   2 */ BBox { north:  1.5248015836, south:  1.0906938732, east: -2.2499013873, west: -2.8528605332 },
  /*   3 */ BBox { north:  1.4184530255, south:  1.0128514572, east:  0.0056829727, west: -1.1677037961 },
  /*   4 */ BBox { north:  1.2795047789, south:  0.9722665256, east:  0.5555606501, west: -0.1822992482 },
  /*   5 */ BBox { north:  1.3292958660, south:  0.9189892077, east:  2.0562234494, west:  1.0881315428 },
  /*   6 */ BBox { north:  1.3289908609, south:  0.9427181540, east: -2.2987528958, west:  3.0170000806 },
  /*   7 */ BBox { north:  1.2602098388, south:  0.8429122844, east: -0.8997186764, west: -1.7596735929 },
  /*   8 */ BBox { north:  1.2111467388, south:  0.8617060094, east:  1.1912975761, west:  0.4377760900 },
  /*   9 */ BBox { north:  1.2107583144, south:  0.8379533107, east: -1.7202287576, west: -2.4379386170 },
  /*  10 */ BBox { north:  1.1554653095, south:  0.7898245541, east:  2.5365941223, west:  1.8570913345 },
  /*  11 */ BBox { north:  1.1552844509, south:  0.7664142875, east: -3.0673850718, west:  2.5364611027 },
  /*  12 */ BBox { north:  1.1012164356, south:  0.7133009368, east:  0.0964058190, west: -0.5215451449 },
  /*  13 */ BBox { north:  1.0704247279, south:  0.6760394884, east: -0.4798420282, west: -1.1030615958 },
  /*  14 */ BBox { north:  1.0327022877, south:  0.7235635885, east: -2.2499013873, west: -2.7451022089 },
  /*  15 */ BBox { north:  1.0192992465, south:  0.6549123286, east:  0.6303557424, west:  0.0353703010 },
  /*  16 */ BBox { north:  1.0178603759, south:  0.5882763676, east:  1.5319272182, west:  0.9367268251 },
  /*  17 */ BBox { north:  0.9808143416, south:  0.6107606356, east: -2.6710063657, west:  3.0651646303 },
  /*  18 */ BBox { north:  0.9810602322, south:  0.5867983660, east:  2.0282976621, west:  1.5133437497 },
  /*  19 */ BBox { north:  0.9637455181, south:  0.5518649176, east: -1.4297672129, west: -1.9685220251 },
  /*  20 */ BBox { north:  0.8753613623, south:  0.5000895279, east: -1.9243561355, west: -2.4164134319 },
  /*  21 */ BBox { north:  0.8861124347, south:  0.5274296374, east: -0.9578194630, west: -1.4762896628 },
  /*  22 */ BBox { north:  0.8688134327, south:  0.5077056705, east:  1.0323679550, west:  0.5034728403 },
  /*  23 */ BBox { north:  0.8923563821, south:  0.4878126492, east:  2.7643030212, west:  2.2998971670 },
  /*  24 */ BBox { north:  0.8257056928, south:  0.5217310176, east:  2.3092168149, west:  1.9319854185 },
  /*  25 */ BBox { north:  0.8059933046, south:  0.4015081960, east: -3.0641755938, west:  2.7007930081 },
  /*  26 */ BBox { north:  0.8161207973, south:  0.3839680066, east: -0.2161437887, west: -0.7042014970 },
  /*  27 */ BBox { north:  0.7582277987, south:  0.3994355541, east: -2.3405997806, west: -2.8212737380 },
  /*  28 */ BBox { north:  0.7886139100, south:  0.3874201833, east:  0.2311568773, west: -0.2259949106 },
  /*  29 */ BBox { north:  0.7151584037, south:  0.3301247846, east: -0.6484797614, west: -1.0824972810 },
  /*  30 */ BBox { north:  0.7035905107, south:  0.2914867320, east:  1.7144108186, west:  1.2844334838 },
  /*  31 */ BBox { north:  0.6919062957, south:  0.2880831321, east:  0.6486390924, west:  0.1637236928 },
  /*  32 */ BBox { north:  0.6486323568, south:  0.2629042009, east:  2.1031809827, west:  1.6955612255 },
  /*  33 */ BBox { north:  0.6572289230, south:  0.2822265333, east:  1.3091869329, west:  0.8759441627 },
  /*  34 */ BBox { north:  0.6475099776, south:  0.2414986573, east: -1.3027219245, west: -1.6870857014 },
  /*  35 */ BBox { north:  0.6238017405, south:  0.2552208039, east: -2.7242842300, west:  3.1040147326 },
  /*  36 */ BBox { north:  0.6422846044, south:  0.2120675345, east: -1.6763924097, west: -2.1177236674 },
  /*  37 */ BBox { north:  0.5991917539, south:  0.2162046086, east:  2.4859286839, west:  2.0735035389 },
  /*  38 */ BBox { north:  0.5563740687, south:  0.2527655746, east: -0.9988538848, west: -1.3264248933 },
  /*  39 */ BBox { north:  0.5564801333, south:  0.1518740134, east:  2.8703208842, west:  2.4464232048 },
  /*  40 */ BBox { north:  0.5460368800, south:  0.1558909154, east: -2.0678986604, west: -2.4909141961 },
  /*  41 */ BBox { north:  0.5120634778, south:  0.1552202040, east:  0.9544676732, west:  0.5444326211 },
  /*  42 */ BBox { north:  0.4976795156, south:  0.1094489892, east: -0.0433516224, west: -0.4290026815 },
  /*  43 */ BBox { north:  0.4653804551, south:  0.0602996866, east: -0.4124061369, west: -0.8060362378 },
  /*  44 */ BBox { north:  0.4468689109, south:  0.0692685748, east:  0.3205328479, west: -0.0700574888 },
  /*  45 */ BBox { north:  0.4320895823, south:  0.0779644096, east: -3.0623245305, west:  2.8060249999 },
  /*  46 */ BBox { north:  0.4310389261, south:  0.0292743194, east: -2.4158923859, west: -2.8573580993 },
  /*  47 */ BBox { north:  0.3807372758, south: -0.0029701614, east: -0.7703955384, west: -1.1478824872 },
  /*  48 */ BBox { north:  0.3911381671, south: -0.0151876488, east:  1.4913024696, west:  1.1471473174 },
  /*  49 */ BBox { north:  0.3342106317, south:  0.0252661345, east:  1.1514103258, west:  0.8500070626 },
  /*  50 */ BBox { north:  0.3891566980, south: -0.0437135980, east:  1.8804635394, west:  1.4823023138 },
  /*  51 */ BBox { north:  0.3378752085, south: -0.0483509010, east: -1.1227401436, west: -1.4945440882 },
  /*  52 */ BBox { north:  0.3360141896, south: -0.0667506815, east:  2.2379235421, west:  1.8572342301 },
  /*  53 */ BBox { north:  0.3183831810, south: -0.0582195560, east:  0.6605885406, west:  0.2545257294 },
  /*  54 */ BBox { north:  0.3363076150, south: -0.0758954099, east: -1.4795733172, west: -1.8598173569 },
  /*  55 */ BBox { north:  0.2892481735, south: -0.0915063804, east: -1.8356193026, west: -2.2185589736 },
  /*  56 */ BBox { north:  0.2667863228, south: -0.1005808897, east: -2.7680865196, west:  3.1279295327 },
  /*  57 */ BBox { north:  0.2928525414, south: -0.1348316507, east:  2.6140646838, west:  2.2046642291 },
  /*  58 */ BBox { north:  0.2015034281, south: -0.1027985271, east:  0.0688189634, west: -0.2392522941 },
  /*  59 */ BBox { north:  0.2128381330, south: -0.1862683539, east:  2.9380044026, west:  2.5747074766 },
  /*  60 */ BBox { north:  0.1958761421, south: -0.1723703028, east: -2.1694179540, west: -2.5540516588 },
  /*  61 */ BBox { north:  0.1723703033, south: -0.1958761415, east:  0.9721746993, west:  0.5875409945 },
  /*  62 */ BBox { north:  0.1862683544, south: -0.2128381325, east: -0.2035882508, west: -0.5668851768 },
  /*  63 */ BBox { north:  0.1027985275, south: -0.2015034276, east: -3.0727736899, west:  2.9023403595 },
  /*  64 */ BBox { north:  0.1348316512, south: -0.2928525409, east: -0.5275279695, west: -0.9369284242 },
  /*  65 */ BBox { north:  0.1005808902, south: -0.2667863222, east:  0.3735061337, west: -0.0136631208 },
  /*  66 */ BBox { north:  0.0915063809, south: -0.2892481729, east:  1.3059733507, west:  0.9230336798 },
  /*  67 */ BBox { north:  0.0758954106, south: -0.3363076144, east:  1.6620193362, west:  1.2817752964 },
  /*  68 */ BBox { north:  0.0582195565, south: -0.3183831805, east: -2.4810041127, west: -2.8870669240 },
  /*  69 */ BBox { north:  0.0667506820, south: -0.3360141890, east: -0.9036691113, west: -1.2843584232 },
  /*  70 */ BBox { north:  0.0483509015, south: -0.3378752080, east:  2.0188525098, west:  1.6470485652 },
  /*  71 */ BBox { north:  0.0437135985, south: -0.3891566975, east: -1.2611291140, west: -1.6592903395 },
  /*  72 */ BBox { north: -0.0252661340, south: -0.3342106311, east: -1.9901823275, west: -2.2915855907 },
  /*  73 */ BBox { north:  0.0151876493, south: -0.3911381666, east: -1.6502901838, west: -1.9944453360 },
  /*  74 */ BBox { north:  0.0029701618, south: -0.3807372753, east:  2.3711971150, west:  1.9937101662 },
  /*  75 */ BBox { north: -0.0292743189, south: -0.4310389256, east:  0.7257002674, west:  0.2842345541 },
  /*  76 */ BBox { north: -0.0779644091, south: -0.4320895817, east:  0.0792681228, west: -0.3355676534 },
  /*  77 */ BBox { north: -0.0692685743, south: -0.4468689104, east: -2.8210598054, west:  3.0715351648 },
  /*  78 */ BBox { north: -0.0602996861, south: -0.4653804545, east:  2.7291865165, west:  2.3355564155 },
  /*  79 */ BBox { north: -0.1094489886, south: -0.4976795151, east:  3.0982410310, west:  2.7125899718 },
  /*  80 */ BBox { north: -0.1552202035, south: -0.5120634772, east: -2.1871249802, west: -2.5971600322 },
  /*  81 */ BBox { north: -0.1558909148, south: -0.5460368794, east:  1.0736939929, west:  0.6506784573 },
  /*  82 */ BBox { north: -0.1518740130, south: -0.5564801327, east: -0.2712717691, west: -0.6951694486 },
  /*  83 */ BBox { north: -0.2527655741, south: -0.5563740682, east:  2.1427387686, west:  1.8151677600 },
  /*  84 */ BBox { north: -0.2162046081, south: -0.5991917533, east: -0.6556639695, west: -1.0680891144 },
  /*  85 */ BBox { north: -0.2120675340, south: -0.6422846038, east:  1.4652002437, west:  1.0238689859 },
  /*  86 */ BBox { north: -0.2552208034, south: -0.6238017399, east:  0.4173084233, west: -0.0375779209 },
  /*  87 */ BBox { north: -0.2414986568, south: -0.6475099771, east:  1.8388707289, west:  1.4545069520 },
  /*  88 */ BBox { north: -0.2822265329, south: -0.6572289225, east: -1.8324057205, west: -2.2656484906 },
  /*  89 */ BBox { north: -0.2629042004, south: -0.6486323563, east: -1.0384116707, west: -1.4460314278 },
  /*  90 */ BBox { north: -0.2880831316, south: -0.6919062952, east: -2.4929535609, west: -2.9778689605 },
  /*  91 */ BBox { north: -0.2914867316, south: -0.7035905102, east: -1.4271818348, west: -1.8571591695 },
  /*  92 */ BBox { north: -0.3301247841, south: -0.7151584032, east:  2.4931128920, west:  2.0590953724 },
  /*  93 */ BBox { north: -0.3874201828, south: -0.7886139094, east: -2.9104357760, west:  2.9155977430 },
  /*  94 */ BBox { north: -0.3994355536, south: -0.7582277983, east:  0.8009928728, west:  0.3203189154 },
  /*  95 */ BBox { north: -0.3839680061, south: -0.8161207968, east:  2.9254488647, west:  2.4373911564 },
  /*  96 */ BBox { north: -0.4015081955, south: -0.8059933041, east:  0.0774170600, west: -0.4407996455 },
  /*  97 */ BBox { north: -0.5217310172, south: -0.8257056923, east: -0.8323758387, west: -1.2096072351 },
  /*  98 */ BBox { north: -0.4878126487, south: -0.8923563816, east: -0.3772896322, west: -0.8416954863 },
  /*  99 */ BBox { north: -0.5077056699, south: -0.8688134323, east: -2.1092246984, west: -2.6381198131 },
  /* 100 */ BBox { north: -0.5274296369, south: -0.8861124342, east:  2.1837731904, west:  1.6653029906 },
  /* 101 */ BBox { north: -0.5000895274, south: -0.8753613619, east:  1.2172365179, west:  0.7251792214 },
  /* 102 */ BBox { north: -0.5518649171, south: -0.9637455176, east:  1.7118254405, west:  1.1730706283 },
  /* 103 */ BBox { north: -0.5867983655, south: -0.9810602317, east: -1.1132949912, west: -1.6282489036 },
  /* 104 */ BBox { north: -0.6107606351, south: -0.9808143411, east:  0.4705862876, west: -0.0764280232 },
  /* 105 */ BBox { north: -0.5882763671, south: -1.0178603754, east: -1.6096654352, west: -2.2048658282 },
  /* 106 */ BBox { north: -0.6549123281, south: -1.0192992459, east: -2.5112369109, west: -3.1062223524 },
  /* 107 */ BBox { north: -0.7235635880, south: -1.0327022872, east:  0.8916912664, west:  0.3964904444 },
  /* 108 */ BBox { north: -0.6760394879, south: -1.0704247274, east:  2.6617506252, west:  2.0385310576 },
  /* 109 */ BBox { north: -0.7133009364, south: -1.1012164351, east: -3.0451868343, west:  2.6200475087 },
  /* 110 */ BBox { north: -0.7664142870, south: -1.1552844504, east:  0.0742075819, west: -0.6051315508 },
  /* 111 */ BBox { north: -0.7898245536, south: -1.1554653090, east: -0.6049985309, west: -1.2845013188 },
  /* 112 */ BBox { north: -0.8379533102, south: -1.2107583139, east:  1.4213638958, west:  0.7036540363 },
  /* 113 */ BBox { north: -0.8617060089, south: -1.2111467383, east: -1.9502950772, west: -2.7038165634 },
  /* 114 */ BBox { north: -0.8429122839, south: -1.2602098384, east:  2.2418739770, west:  1.3819190605 },
  /* 115 */ BBox { north: -0.9427181535, south: -1.3289908604, east:  0.8428397578, west: -0.1245925729 },
  /* 116 */ BBox { north: -0.9189892073, south: -1.3292958655, east: -1.0853692039, west: -2.0534611106 },
  /* 117 */ BBox { north: -0.9722665251, south: -1.2795047784, east: -2.5860320035, west:  2.9592934054 },
  /* 118 */ BBox { north: -1.0128514567, south: -1.4184530251, east: -3.1359096806, west:  1.9738888575 },
  /* 119 */ BBox { north: -1.0906938727, south: -1.5248015831, east:  0.2887321209, west: -1.4984857630 },
  /* 120 */ BBox { north: -1.1787242424, south: -1.5248015831, east:  2.5349438173, west: -0.6011228503 },
  /* 121 */ BBox { north: -1.2030547180, south: -1.5248015831, east: -0.6011228503, west:  2.5349438173 },
];

/// Bounding box of a cell. With `cover_children` the box is buffered so
/// every descendant at any finer resolution fits inside it.
pub(crate) fn cell_to_bbox(cell: CellIndex, out: &mut BBox, cover_children: bool) -> Result<(), HexGridError> {
  let res = get_resolution(cell);

  if res == 0 {
    let base_cell = get_base_cell(cell);
    if !(0..NUM_BASE_CELLS).contains(&base_cell) {
      return Err(HexGridError::CellInvalid);
    }
    *out = RES0_BBOXES[base_cell as usize];
  } else {
    let boundary = cell_to_boundary(cell)?;
    bbox_from_cell_boundary(&boundary, out);
    scale_bbox(out, CELL_SCALE_FACTOR);
  }

  if cover_children {
    scale_bbox(out, CHILD_SCALE_FACTOR);
  }

  // Cells touching a pole cover all longitudes.
  if cell.0 == NORTH_POLE_CELLS[res as usize] {
    out.north = M_PI_2;
  }
  if cell.0 == SOUTH_POLE_CELLS[res as usize] {
    out.south = -M_PI_2;
  }
  if out.north == M_PI_2 || out.south == -M_PI_2 {
    out.east = M_PI;
    out.west = -M_PI;
  }
  Ok(())
}

/// The cell after `cell` in the depth-first walk over the whole grid:
/// next sibling if one exists, otherwise the parent's successor, rolling
/// over to the next base cell at the top. Null once the walk is complete.
fn next_cell(mut cell: CellIndex) -> CellIndex {
  let mut res = get_resolution(cell);
  loop {
    if res == 0 {
      let next_base = get_base_cell(cell) + 1;
      return if next_base < NUM_BASE_CELLS {
        base_cell_number_to_cell(next_base)
      } else {
        NULL_INDEX
      };
    }

    let mut parent = cell;
    set_resolution(&mut parent, res - 1);
    set_index_digit(&mut parent, res, Direction::InvalidDigit);

    let digit = get_index_digit(cell, res);
    if digit < Direction::InvalidDigit {
      let mut next_digit = digit as u64 + 1;
      // Pentagons have no K-axes child.
      if next_digit == Direction::KAxes as u64 && is_pentagon(parent) {
        next_digit += 1;
      }
      if next_digit < Direction::InvalidDigit as u64 {
        set_index_digit(&mut cell, res, Direction::from_u64(next_digit));
        return cell;
      }
    }

    res -= 1;
    cell = parent;
  }
}

/// Walks the grid hierarchy and yields a compact covering of the polygon:
/// coarse cells where the whole subtree matches, target-resolution cells
/// elsewhere.
struct CompactFillIter<'a> {
  polygon: &'a GeoPolygon,
  bboxes: Vec<BBox>,
  mode: ContainmentMode,
  res: i32,
  cell: CellIndex,
  started: bool,
}

impl<'a> CompactFillIter<'a> {
  fn new(polygon: &'a GeoPolygon, res: i32, mode: ContainmentMode) -> Self {
    Self {
      polygon,
      bboxes: bboxes_from_geo_polygon(polygon),
      mode,
      res,
      cell: base_cell_number_to_cell(0),
      started: false,
    }
  }

  /// Whether a target-resolution cell matches the polygon under the mode.
  fn cell_matches(&self, cell: CellIndex) -> Result<bool, HexGridError> {
    // The center test is the whole answer for Center mode and a cheap
    // first pass for the overlap modes.
    if self.mode != ContainmentMode::Full {
      let center = cell_to_lat_lng(cell)?;
      if point_inside_polygon(self.polygon, &self.bboxes, &center) {
        return Ok(true);
      }
    }
    if self.mode == ContainmentMode::Center {
      return Ok(false);
    }

    let boundary = cell_to_boundary(cell)?;
    let mut cell_bbox = BBox::default();
    cell_to_bbox(cell, &mut cell_bbox, false)?;

    if self.mode == ContainmentMode::Full {
      return Ok(cell_boundary_inside_polygon(
        self.polygon,
        &self.bboxes,
        &boundary,
        &cell_bbox,
      ));
    }

    if cell_boundary_crosses_polygon(self.polygon, &self.bboxes, &boundary, &cell_bbox) {
      return Ok(true);
    }
    // The polygon may sit entirely inside the cell.
    if self.polygon.geoloop.num_verts > 0
      && point_inside_cell_boundary(&boundary, &cell_bbox, &self.polygon.geoloop.verts[0])
    {
      return Ok(true);
    }

    if self.mode == ContainmentMode::OverlappingBbox {
      // Looser test: any contact between the cell's bounding box and the
      // polygon counts.
      if bbox_contains_bbox(&cell_bbox, &self.bboxes[0]) {
        return Ok(true);
      }
      let bbox_boundary = bbox_to_cell_boundary(&cell_bbox);
      if point_inside_polygon(self.polygon, &self.bboxes, &bbox_boundary.verts[0])
        || cell_boundary_crosses_polygon(self.polygon, &self.bboxes, &bbox_boundary, &cell_bbox)
      {
        return Ok(true);
      }
    }
    Ok(false)
  }

  /// Advances past the current cell to the next compact match, or `None`
  /// when the walk is exhausted.
  fn try_next(&mut self) -> Result<Option<CellIndex>, HexGridError> {
    if self.cell == NULL_INDEX {
      return Ok(None);
    }

    let mut cell = self.cell;
    if self.started {
      cell = next_cell(cell);
    } else {
      self.started = true;
    }

    while cell != NULL_INDEX {
      let cell_res = get_resolution(cell);

      if cell_res == self.res {
        if self.cell_matches(cell)? {
          self.cell = cell;
          return Ok(Some(cell));
        }
      } else {
        // Coarser candidate: emit the whole subtree when it is entirely
        // inside the polygon, descend when it merely overlaps.
        let mut subtree_bbox = BBox::default();
        cell_to_bbox(cell, &mut subtree_bbox, true)?;
        if bbox_overlaps_bbox(&self.bboxes[0], &subtree_bbox) {
          let subtree_boundary = bbox_to_cell_boundary(&subtree_bbox);
          if cell_boundary_inside_polygon(self.polygon, &self.bboxes, &subtree_boundary, &subtree_bbox) {
            self.cell = cell;
            return Ok(Some(cell));
          }
          cell = cell_to_center_child(cell, cell_res + 1)?;
          continue;
        }
      }

      cell = next_cell(cell);
    }

    self.cell = NULL_INDEX;
    Ok(None)
  }
}

/// Number of cells `polygon_to_cells` would return for these arguments.
/// Exact, at the cost of running the same walk.
pub fn max_polygon_to_cells_size(polygon: &GeoPolygon, res: i32, flags: u32) -> Result<i64, HexGridError> {
  let mode = validate_polygon_flags(flags)?;
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  if polygon.geoloop.num_verts == 0 {
    return Ok(0);
  }

  let mut iter = CompactFillIter::new(polygon, res, mode);
  let mut count: i64 = 0;
  while let Some(cell) = iter.try_next()? {
    count = count.saturating_add(cell_to_children_size(cell, res)?);
  }
  Ok(count)
}

/// All cells at `res` matching the polygon under the containment mode
/// selected by `flags` (see [`ContainmentMode`]; 0 is center containment).
///
/// Degenerate polygons yield an empty result rather than an error.
pub fn polygon_to_cells(polygon: &GeoPolygon, res: i32, flags: u32) -> Result<Vec<CellIndex>, HexGridError> {
  let mode = validate_polygon_flags(flags)?;
  if !(0..=MAX_RES).contains(&res) {
    return Err(HexGridError::ResDomain);
  }
  if polygon.geoloop.num_verts == 0 {
    return Ok(Vec::new());
  }

  let mut out = Vec::new();
  let mut iter = CompactFillIter::new(polygon, res, mode);
  while let Some(cell) = iter.try_next()? {
    if get_resolution(cell) == res {
      out.push(cell);
    } else {
      out.extend(ChildrenIter::new(cell, res));
    }
  }
  Ok(out)
}
