//! Icosahedron faces, gnomonic projection, and cell boundary generation.
//!
//! Each of the 20 faces carries a planar IJK grid. A point on the sphere is
//! projected gnomonically onto its nearest face; coordinates that spill past
//! a face edge are folded onto the neighboring face. Cell boundaries are
//! computed on a "substrate" grid three aperture steps finer than the cell,
//! where both the cell's vertices and the icosahedron edges are exact
//! lattice points.

use crate::constants::{
  EPSILON, INV_RES0_U_GNOMONIC, MAX_CELL_BNDRY_VERTS, MAX_RES, M_AP7_ROT_RADS, M_ONETHIRD,
  M_RSQRT7, M_SQRT3_2, M_SQRT7, NUM_HEX_VERTS, NUM_ICOSA_FACES, NUM_PENT_VERTS, RES0_U_GNOMONIC,
};
use crate::geo::{CellBoundary, LatLng, _geo_az_distance_rads, _geo_azimuth_rads, _pos_angle_rads};
use crate::ijk::{
  CoordIJK, _down_ap3, _down_ap3r, _down_ap7r, _hex2d_to_coord_ijk, _ijk_add, _ijk_normalize,
  _ijk_rotate60_ccw, _ijk_rotate60_cw, _ijk_scale, _ijk_sub, _ijk_to_hex2d, _set_ijk,
};
use crate::index::is_res_class_iii;
use crate::math::{Vec2d, Vec3d, _geo_to_vec3d, _point_square_dist, _v2d_almost_equals,
  _v2d_intersect, _v2d_mag};

/// A face number paired with IJK+ coordinates on that face's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceIJK {
  pub face: i32,
  pub coord: CoordIJK,
}

// Indexes into a face's neighbor table by the quadrant being exited.
pub(crate) const IJ_QUADRANT: usize = 1;
pub(crate) const KI_QUADRANT: usize = 2;
pub(crate) const JK_QUADRANT: usize = 3;

/// Outcome of checking a coordinate against its face's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overage {
  /// On the original face.
  NoOverage,
  /// On a face edge; only occurs on substrate grids.
  FaceEdge,
  /// Spilled into the interior of a new face.
  NewFace,
}

/// Largest IJK+ component sum still on a face, by Class II resolution.
/// Class III resolutions index with `res + 1`, hence 17 entries.
#[rustfmt::skip]
static MAX_DIM_BY_CII_RES: [i32; (MAX_RES + 2) as usize] = [
  2, -1, 14, -1, 98, -1, 686, -1, 4802, -1, 33614, -1, 235_298, -1,
  1_647_086, -1, 11_529_602,
];

/// Scale of one resolution 0 unit in each Class II resolution's units.
#[rustfmt::skip]
static UNIT_SCALE_BY_CII_RES: [i32; (MAX_RES + 2) as usize] = [
  1, -1, 7, -1, 49, -1, 343, -1, 2401, -1, 16807, -1, 117_649, -1,
  823_543, -1, 5_764_801,
];

/// Face centers in latitude/longitude radians.
#[rustfmt::skip]
pub(crate) static FACE_CENTER_GEO: [LatLng; NUM_ICOSA_FACES as usize] = [
  LatLng { lat: 0.803_582_649_718_989_94, lng: 1.248_397_419_617_396 },     // face 0
  LatLng { lat: 1.307_747_883_455_638_2, lng: 2.536_945_009_877_921 },      // face 1
  LatLng { lat: 1.054_751_253_523_952, lng: -1.347_517_358_900_396_6 },     // face 2
  LatLng { lat: 0.600_191_595_538_186_8, lng: -0.450_603_909_469_755_75 },  // face 3
  LatLng { lat: 0.491_715_428_198_773_87, lng: 0.401_988_202_911_306_94 },  // face 4
  LatLng { lat: 0.172_745_327_415_618_7, lng: 1.678_146_885_280_433_7 },    // face 5
  LatLng { lat: 0.605_929_321_571_350_7, lng: 2.953_923_329_812_411_6 },    // face 6
  LatLng { lat: 0.427_370_518_328_979_64, lng: -1.888_876_200_336_285_4 },  // face 7
  LatLng { lat: -0.079_066_118_549_212_83, lng: -0.733_429_513_380_867_74 },// face 8
  LatLng { lat: -0.230_961_644_455_383_64, lng: 0.506_495_587_332_349 },    // face 9
  LatLng { lat: 0.079_066_118_549_212_83, lng: 2.408_163_140_208_925_5 },   // face 10
  LatLng { lat: 0.230_961_644_455_383_64, lng: -2.635_097_066_257_444 },    // face 11
  LatLng { lat: -0.172_745_327_415_618_7, lng: -1.463_445_768_309_359_5 },  // face 12
  LatLng { lat: -0.605_929_321_571_350_7, lng: -0.187_669_323_777_381_62 }, // face 13
  LatLng { lat: -0.427_370_518_328_979_64, lng: 1.252_716_453_253_508 },    // face 14
  LatLng { lat: -0.600_191_595_538_186_8, lng: 2.690_988_744_120_037_5 },   // face 15
  LatLng { lat: -0.491_715_428_198_773_87, lng: -2.739_604_450_678_486_3 }, // face 16
  LatLng { lat: -0.803_582_649_718_989_94, lng: -1.893_195_233_972_397 },   // face 17
  LatLng { lat: -1.307_747_883_455_638_2, lng: -0.604_647_643_711_872_1 },  // face 18
  LatLng { lat: -1.054_751_253_523_952, lng: 1.794_075_294_689_396_6 },     // face 19
];

/// Face centers as x/y/z points on the unit sphere.
#[rustfmt::skip]
static FACE_CENTER_POINT: [Vec3d; NUM_ICOSA_FACES as usize] = [
  Vec3d { x: 0.219_930_779_140_460_6, y: 0.658_369_178_027_499_6, z: 0.719_847_537_892_618_2 },    // face 0
  Vec3d { x: -0.213_923_483_450_142_1, y: 0.147_817_182_955_070_3, z: 0.965_601_793_521_420_5 },   // face 1
  Vec3d { x: 0.109_262_527_878_479_7, y: -0.481_195_157_287_321, z: 0.869_777_512_128_725_3 },     // face 2
  Vec3d { x: 0.742_856_730_158_679_1, y: -0.359_394_167_827_802_8, z: 0.564_800_593_651_703_3 },   // face 3
  Vec3d { x: 0.811_253_470_914_096_9, y: 0.344_895_323_763_938_4, z: 0.472_138_773_641_393 },      // face 4
  Vec3d { x: -0.105_549_814_961_392_1, y: 0.979_445_729_641_141_3, z: 0.171_887_461_000_936_5 },   // face 5
  Vec3d { x: -0.807_540_757_997_009_2, y: 0.153_355_248_589_881_8, z: 0.569_526_199_488_268_8 },   // face 6
  Vec3d { x: -0.284_614_806_978_790_7, y: -0.864_408_097_265_420_6, z: 0.414_479_255_247_354 },    // face 7
  Vec3d { x: 0.740_562_147_385_448_2, y: -0.667_329_956_456_552_4, z: -0.078_983_764_632_673_77 }, // face 8
  Vec3d { x: 0.851_230_398_647_429_3, y: 0.472_234_378_858_268_1, z: -0.228_913_738_868_780_8 },   // face 9
  Vec3d { x: -0.740_562_147_385_448_1, y: 0.667_329_956_456_552_4, z: 0.078_983_764_632_673_77 },  // face 10
  Vec3d { x: -0.851_230_398_647_429_2, y: -0.472_234_378_858_268_2, z: 0.228_913_738_868_780_8 },  // face 11
  Vec3d { x: 0.105_549_814_961_391_9, y: -0.979_445_729_641_141_3, z: -0.171_887_461_000_936_5 },  // face 12
  Vec3d { x: 0.807_540_757_997_009_2, y: -0.153_355_248_589_881_9, z: -0.569_526_199_488_268_8 },  // face 13
  Vec3d { x: 0.284_614_806_978_790_8, y: 0.864_408_097_265_420_4, z: -0.414_479_255_247_354 },     // face 14
  Vec3d { x: -0.742_856_730_158_679_1, y: 0.359_394_167_827_802_7, z: -0.564_800_593_651_703_3 },  // face 15
  Vec3d { x: -0.811_253_470_914_097_1, y: -0.344_895_323_763_938_2, z: -0.472_138_773_641_393 },   // face 16
  Vec3d { x: -0.219_930_779_140_460_7, y: -0.658_369_178_027_499_6, z: -0.719_847_537_892_618_2 }, // face 17
  Vec3d { x: 0.213_923_483_450_142, y: -0.147_817_182_955_070_4, z: -0.965_601_793_521_420_5 },    // face 18
  Vec3d { x: -0.109_262_527_878_479_6, y: 0.481_195_157_287_321, z: -0.869_777_512_128_725_3 },    // face 19
];

/// Azimuth in radians from each face center to its vertices 0, 1, and 2,
/// which anchor the i, j, and k axes at Class II orientation.
#[rustfmt::skip]
static FACE_AXES_AZ_RADS_CII: [[f64; 3]; NUM_ICOSA_FACES as usize] = [
  [5.619_958_268_523_94, 3.525_563_166_130_744_5, 1.431_168_063_737_548_7],   // face 0
  [5.760_339_081_714_187, 3.665_943_979_320_991_7, 1.571_548_876_927_796],    // face 1
  [0.780_213_654_393_430_1, 4.969_003_859_179_821, 2.874_608_756_786_625_7],  // face 2
  [0.430_469_363_979_999_9, 4.619_259_568_766_391, 2.524_864_466_373_195_5],  // face 3
  [6.130_269_123_335_111, 4.035_874_020_941_916, 1.941_478_918_548_720_3],    // face 4
  [2.692_877_706_530_643, 0.598_482_604_137_447_1, 4.787_272_808_923_838],    // face 5
  [2.982_963_003_477_244, 0.888_567_901_084_048_4, 5.077_358_105_870_44],     // face 6
  [3.532_912_002_790_141, 1.438_516_900_396_945_7, 5.627_307_105_183_337],    // face 7
  [3.494_305_004_259_568, 1.399_909_901_866_372_9, 5.588_700_106_652_764],    // face 8
  [3.003_214_169_499_538_4, 0.908_819_067_106_342_9, 5.097_609_271_892_734],  // face 9
  [5.930_472_956_509_811_6, 3.836_077_854_116_616, 1.741_682_751_723_420_4],  // face 10
  [0.138_378_484_090_254_85, 4.327_168_688_876_646, 2.232_773_586_483_45],    // face 11
  [0.448_714_947_059_150_36, 4.637_505_151_845_541_5, 2.543_110_049_452_346], // face 12
  [0.158_629_650_112_549_36, 4.347_419_854_898_94, 2.253_024_752_505_745],    // face 13
  [5.891_865_957_979_238_5, 3.797_470_855_586_043, 1.703_075_753_192_847_6],  // face 14
  [2.711_123_289_609_793_3, 0.616_728_187_216_597_8, 4.805_518_392_002_988_7],// face 15
  [3.294_508_837_434_268, 1.200_113_735_041_073, 5.388_903_939_827_464],      // face 16
  [3.804_819_692_245_44, 1.710_424_589_852_244_5, 5.899_214_794_638_635],     // face 17
  [3.664_438_879_055_192_4, 1.570_043_776_661_997, 5.758_833_981_448_388],    // face 18
  [2.361_378_999_196_363, 0.266_983_896_803_167_6, 4.455_774_101_589_558_6],  // face 19
];

/// How to re-express coordinates in a neighboring face's IJK system.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FaceOrientIJK {
  pub(crate) face: i32,
  /// Resolution 0 translation relative to the primary face.
  pub(crate) translate: CoordIJK,
  /// 60 degree ccw rotations relative to the primary face.
  pub(crate) ccw_rot60: i32,
}

const fn orient(face: i32, i: i32, j: i32, k: i32, ccw_rot60: i32) -> FaceOrientIJK {
  FaceOrientIJK {
    face,
    translate: CoordIJK { i, j, k },
    ccw_rot60,
  }
}

/// Neighboring face orientation in each quadrant, indexed by face then by
/// central/IJ/KI/JK.
#[rustfmt::skip]
pub(crate) static FACE_NEIGHBORS: [[FaceOrientIJK; 4]; NUM_ICOSA_FACES as usize] = [
  [orient(0, 0, 0, 0, 0), orient(4, 2, 0, 2, 1), orient(1, 2, 2, 0, 5), orient(5, 0, 2, 2, 3)],    // face 0
  [orient(1, 0, 0, 0, 0), orient(0, 2, 0, 2, 1), orient(2, 2, 2, 0, 5), orient(6, 0, 2, 2, 3)],    // face 1
  [orient(2, 0, 0, 0, 0), orient(1, 2, 0, 2, 1), orient(3, 2, 2, 0, 5), orient(7, 0, 2, 2, 3)],    // face 2
  [orient(3, 0, 0, 0, 0), orient(2, 2, 0, 2, 1), orient(4, 2, 2, 0, 5), orient(8, 0, 2, 2, 3)],    // face 3
  [orient(4, 0, 0, 0, 0), orient(3, 2, 0, 2, 1), orient(0, 2, 2, 0, 5), orient(9, 0, 2, 2, 3)],    // face 4
  [orient(5, 0, 0, 0, 0), orient(10, 2, 2, 0, 3), orient(14, 2, 0, 2, 3), orient(0, 0, 2, 2, 3)],  // face 5
  [orient(6, 0, 0, 0, 0), orient(11, 2, 2, 0, 3), orient(10, 2, 0, 2, 3), orient(1, 0, 2, 2, 3)],  // face 6
  [orient(7, 0, 0, 0, 0), orient(12, 2, 2, 0, 3), orient(11, 2, 0, 2, 3), orient(2, 0, 2, 2, 3)],  // face 7
  [orient(8, 0, 0, 0, 0), orient(13, 2, 2, 0, 3), orient(12, 2, 0, 2, 3), orient(3, 0, 2, 2, 3)],  // face 8
  [orient(9, 0, 0, 0, 0), orient(14, 2, 2, 0, 3), orient(13, 2, 0, 2, 3), orient(4, 0, 2, 2, 3)],  // face 9
  [orient(10, 0, 0, 0, 0), orient(5, 2, 2, 0, 3), orient(6, 2, 0, 2, 3), orient(15, 0, 2, 2, 3)],  // face 10
  [orient(11, 0, 0, 0, 0), orient(6, 2, 2, 0, 3), orient(7, 2, 0, 2, 3), orient(16, 0, 2, 2, 3)],  // face 11
  [orient(12, 0, 0, 0, 0), orient(7, 2, 2, 0, 3), orient(8, 2, 0, 2, 3), orient(17, 0, 2, 2, 3)],  // face 12
  [orient(13, 0, 0, 0, 0), orient(8, 2, 2, 0, 3), orient(9, 2, 0, 2, 3), orient(18, 0, 2, 2, 3)],  // face 13
  [orient(14, 0, 0, 0, 0), orient(9, 2, 2, 0, 3), orient(5, 2, 0, 2, 3), orient(19, 0, 2, 2, 3)],  // face 14
  [orient(15, 0, 0, 0, 0), orient(16, 2, 0, 2, 1), orient(19, 2, 2, 0, 5), orient(10, 0, 2, 2, 3)],// face 15
  [orient(16, 0, 0, 0, 0), orient(17, 2, 0, 2, 1), orient(15, 2, 2, 0, 5), orient(11, 0, 2, 2, 3)],// face 16
  [orient(17, 0, 0, 0, 0), orient(18, 2, 0, 2, 1), orient(16, 2, 2, 0, 5), orient(12, 0, 2, 2, 3)],// face 17
  [orient(18, 0, 0, 0, 0), orient(19, 2, 0, 2, 1), orient(17, 2, 2, 0, 5), orient(13, 0, 2, 2, 3)],// face 18
  [orient(19, 0, 0, 0, 0), orient(15, 2, 0, 2, 1), orient(18, 2, 2, 0, 5), orient(14, 0, 2, 2, 3)],// face 19
];

const IJ: i32 = IJ_QUADRANT as i32;
const KI: i32 = KI_QUADRANT as i32;
const JK: i32 = JK_QUADRANT as i32;

/// Direction from an origin face to a destination face, in the origin
/// face's coordinate system, or -1 if the faces are not adjacent.
#[rustfmt::skip]
pub(crate) static ADJACENT_FACE_DIR: [[i32; NUM_ICOSA_FACES as usize]; NUM_ICOSA_FACES as usize] = [
  [0, KI, -1, -1, IJ, JK, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],  // face 0
  [IJ, 0, KI, -1, -1, -1, JK, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],  // face 1
  [-1, IJ, 0, KI, -1, -1, -1, JK, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],  // face 2
  [-1, -1, IJ, 0, KI, -1, -1, -1, JK, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],  // face 3
  [KI, -1, -1, IJ, 0, -1, -1, -1, -1, JK, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1],  // face 4
  [JK, -1, -1, -1, -1, 0, -1, -1, -1, -1, IJ, -1, -1, -1, KI, -1, -1, -1, -1, -1],  // face 5
  [-1, JK, -1, -1, -1, -1, 0, -1, -1, -1, KI, IJ, -1, -1, -1, -1, -1, -1, -1, -1],  // face 6
  [-1, -1, JK, -1, -1, -1, -1, 0, -1, -1, -1, KI, IJ, -1, -1, -1, -1, -1, -1, -1],  // face 7
  [-1, -1, -1, JK, -1, -1, -1, -1, 0, -1, -1, -1, KI, IJ, -1, -1, -1, -1, -1, -1],  // face 8
  [-1, -1, -1, -1, JK, -1, -1, -1, -1, 0, -1, -1, -1, KI, IJ, -1, -1, -1, -1, -1],  // face 9
  [-1, -1, -1, -1, -1, IJ, KI, -1, -1, -1, 0, -1, -1, -1, -1, JK, -1, -1, -1, -1],  // face 10
  [-1, -1, -1, -1, -1, -1, IJ, KI, -1, -1, -1, 0, -1, -1, -1, -1, JK, -1, -1, -1],  // face 11
  [-1, -1, -1, -1, -1, -1, -1, IJ, KI, -1, -1, -1, 0, -1, -1, -1, -1, JK, -1, -1],  // face 12
  [-1, -1, -1, -1, -1, -1, -1, -1, IJ, KI, -1, -1, -1, 0, -1, -1, -1, -1, JK, -1],  // face 13
  [-1, -1, -1, -1, -1, KI, -1, -1, -1, IJ, -1, -1, -1, -1, 0, -1, -1, -1, -1, JK],  // face 14
  [-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, JK, -1, -1, -1, -1, 0, IJ, -1, -1, KI],  // face 15
  [-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, JK, -1, -1, -1, KI, 0, IJ, -1, -1],  // face 16
  [-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, JK, -1, -1, -1, KI, 0, IJ, -1],  // face 17
  [-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, JK, -1, -1, -1, KI, 0, IJ],  // face 18
  [-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, JK, IJ, -1, -1, KI, 0],  // face 19
];

/// Finds the face whose center is closest to the point, and the squared
/// Euclidean chord distance to that center.
pub(crate) fn _geo_to_closest_face(g: &LatLng, face: &mut i32, sqd: &mut f64) {
  let mut v3d = Vec3d::default();
  _geo_to_vec3d(g, &mut v3d);

  *face = 0;
  *sqd = 5.0;
  for (f, center) in FACE_CENTER_POINT.iter().enumerate() {
    let d = _point_square_dist(center, &v3d);
    if d < *sqd {
      *face = f as i32;
      *sqd = d;
    }
  }
}

/// Projects a spherical point to hex2d coordinates on its nearest face, at
/// the scale of the given resolution.
pub(crate) fn _geo_to_hex2d(g: &LatLng, res: i32, face: &mut i32, v: &mut Vec2d) {
  let mut sqd = 0.0;
  _geo_to_closest_face(g, face, &mut sqd);

  // cos(r) = 1 - 2 * sin^2(r/2) = 1 - 2 * (sqd/4)
  let r = (1.0 - sqd * 0.5).clamp(-1.0, 1.0).acos();
  if r < EPSILON {
    v.x = 0.0;
    v.y = 0.0;
    return;
  }

  let az = _geo_azimuth_rads(&FACE_CENTER_GEO[*face as usize], g);
  let mut theta = _pos_angle_rads(FACE_AXES_AZ_RADS_CII[*face as usize][0] - _pos_angle_rads(az));
  if is_res_class_iii(res) {
    theta = _pos_angle_rads(theta - M_AP7_ROT_RADS);
  }

  // Gnomonic scaling, then to hex2d units at the target resolution.
  let mut r_scaled = r.tan() * INV_RES0_U_GNOMONIC;
  for _ in 0..res {
    r_scaled *= M_SQRT7;
  }

  v.x = r_scaled * theta.cos();
  v.y = r_scaled * theta.sin();
}

/// Inverse projection: hex2d coordinates on a face back to a spherical
/// point. Substrate grids carry an extra aperture 3 (and, for Class III,
/// aperture 7) scale factor that must be undone here.
pub(crate) fn _hex2d_to_geo(v: &Vec2d, face: i32, res: i32, substrate: bool, g: &mut LatLng) {
  let mut r = _v2d_mag(v);
  if r < EPSILON {
    *g = FACE_CENTER_GEO[face as usize];
    return;
  }

  let mut theta = v.y.atan2(v.x);

  for _ in 0..res {
    r *= M_RSQRT7;
  }
  if substrate {
    r *= M_ONETHIRD;
    if is_res_class_iii(res) {
      r *= M_RSQRT7;
    }
  }
  r = (r * RES0_U_GNOMONIC).atan();

  if !substrate && is_res_class_iii(res) {
    theta = _pos_angle_rads(theta + M_AP7_ROT_RADS);
  }
  let az = _pos_angle_rads(FACE_AXES_AZ_RADS_CII[face as usize][0] - theta);

  _geo_az_distance_rads(&FACE_CENTER_GEO[face as usize], az, r, g);
}

/// Projects a spherical point to the containing cell's face and IJK+
/// coordinates at the given resolution.
#[inline]
pub(crate) fn _geo_to_face_ijk(g: &LatLng, res: i32, h: &mut FaceIJK) {
  let mut v = Vec2d::default();
  _geo_to_hex2d(g, res, &mut h.face, &mut v);
  _hex2d_to_coord_ijk(&v, &mut h.coord);
}

/// Center point of the cell at the given face IJK+ coordinates.
#[inline]
pub(crate) fn _face_ijk_to_geo(h: &FaceIJK, res: i32, g: &mut LatLng) {
  let mut v = Vec2d::default();
  _ijk_to_hex2d(&h.coord, &mut v);
  _hex2d_to_geo(&v, h.face, res, false, g);
}

/// Folds a coordinate that has spilled past its face's bounds onto the
/// proper neighboring face. `pent_leading_4` applies the extra rotation a
/// pentagon with a leading digit 4 needs before folding.
pub(crate) fn _adjust_overage_class_ii(
  fijk: &mut FaceIJK,
  res: i32,
  pent_leading_4: bool,
  substrate: bool,
) -> Overage {
  let mut overage = Overage::NoOverage;
  let ijk = &mut fijk.coord;

  let mut max_dim = MAX_DIM_BY_CII_RES[res as usize];
  if substrate {
    max_dim *= 3;
  }

  let coord_sum = ijk.i + ijk.j + ijk.k;
  if substrate && coord_sum == max_dim {
    overage = Overage::FaceEdge;
  } else if coord_sum > max_dim {
    overage = Overage::NewFace;

    let fijk_orient = if ijk.k > 0 {
      if ijk.j > 0 {
        &FACE_NEIGHBORS[fijk.face as usize][JK_QUADRANT]
      } else {
        // The pentagon adjustment pivots around the i-axis corner at the
        // unscaled Class II max dimension.
        if pent_leading_4 {
          let mut origin = CoordIJK::default();
          _set_ijk(&mut origin, MAX_DIM_BY_CII_RES[res as usize], 0, 0);
          let mut tmp = CoordIJK::default();
          _ijk_sub(ijk, &origin, &mut tmp);
          _ijk_rotate60_cw(&mut tmp);
          _ijk_add(&tmp, &origin, ijk);
        }
        &FACE_NEIGHBORS[fijk.face as usize][KI_QUADRANT]
      }
    } else {
      &FACE_NEIGHBORS[fijk.face as usize][IJ_QUADRANT]
    };

    fijk.face = fijk_orient.face;

    for _ in 0..fijk_orient.ccw_rot60 {
      _ijk_rotate60_ccw(ijk);
    }

    let mut trans_vec = fijk_orient.translate;
    let mut unit_scale = UNIT_SCALE_BY_CII_RES[res as usize];
    if substrate {
      unit_scale *= 3;
    }
    _ijk_scale(&mut trans_vec, unit_scale);
    let before = *ijk;
    _ijk_add(&before, &trans_vec, ijk);
    _ijk_normalize(ijk);

    // Landing on the edge of the new face counts as an edge for substrate
    // grids.
    if substrate && ijk.i + ijk.j + ijk.k == max_dim {
      overage = Overage::FaceEdge;
    }
  }

  overage
}

/// Folds a pentagon vertex onto the proper face, repeating until the
/// coordinate settles. Pentagon vertices can spill across two faces.
pub(crate) fn _adjust_pent_vert_overage(fijk: &mut FaceIJK, res: i32) -> Overage {
  loop {
    let overage = _adjust_overage_class_ii(fijk, res, false, true);
    if overage != Overage::NewFace {
      return overage;
    }
  }
}

/// Substrate-grid vertex offsets shared by the hexagon and pentagon vertex
/// walks; pentagons use the first five.
#[rustfmt::skip]
const VERTS_CII: [CoordIJK; NUM_HEX_VERTS] = [
  CoordIJK { i: 2, j: 1, k: 0 }, CoordIJK { i: 1, j: 2, k: 0 },
  CoordIJK { i: 0, j: 2, k: 1 }, CoordIJK { i: 0, j: 1, k: 2 },
  CoordIJK { i: 1, j: 0, k: 2 }, CoordIJK { i: 2, j: 0, k: 1 },
];
#[rustfmt::skip]
const VERTS_CIII: [CoordIJK; NUM_HEX_VERTS] = [
  CoordIJK { i: 5, j: 4, k: 0 }, CoordIJK { i: 1, j: 5, k: 0 },
  CoordIJK { i: 0, j: 5, k: 4 }, CoordIJK { i: 0, j: 1, k: 5 },
  CoordIJK { i: 4, j: 0, k: 5 }, CoordIJK { i: 5, j: 0, k: 1 },
];

/// Moves a cell center onto the substrate grid and produces the face IJK+
/// coordinates of its six vertices there. `res` is updated to the adjusted
/// (Class II) substrate resolution.
pub(crate) fn _face_ijk_to_verts(
  fijk: &mut FaceIJK,
  res: &mut i32,
  fijk_verts: &mut [FaceIJK; NUM_HEX_VERTS],
) {
  let verts = if is_res_class_iii(*res) {
    &VERTS_CIII
  } else {
    &VERTS_CII
  };

  // One aperture 3, one aperture 3r: vertices become lattice points. A
  // final aperture 7r returns Class III cells to Class II orientation.
  _down_ap3(&mut fijk.coord);
  _down_ap3r(&mut fijk.coord);
  if is_res_class_iii(*res) {
    _down_ap7r(&mut fijk.coord);
    *res += 1;
  }

  for (vert, offset) in fijk_verts.iter_mut().zip(verts.iter()) {
    vert.face = fijk.face;
    _ijk_add(&fijk.coord, offset, &mut vert.coord);
    _ijk_normalize(&mut vert.coord);
  }
}

/// Pentagon variant of [`_face_ijk_to_verts`]; five vertices.
pub(crate) fn _face_ijk_pent_to_verts(
  fijk: &mut FaceIJK,
  res: &mut i32,
  fijk_verts: &mut [FaceIJK; NUM_PENT_VERTS],
) {
  let verts = if is_res_class_iii(*res) {
    &VERTS_CIII
  } else {
    &VERTS_CII
  };

  _down_ap3(&mut fijk.coord);
  _down_ap3r(&mut fijk.coord);
  if is_res_class_iii(*res) {
    _down_ap7r(&mut fijk.coord);
    *res += 1;
  }

  for (vert, offset) in fijk_verts.iter_mut().zip(verts.iter()) {
    vert.face = fijk.face;
    _ijk_add(&fijk.coord, offset, &mut vert.coord);
    _ijk_normalize(&mut vert.coord);
  }
}

/// The three corners of a face triangle in substrate hex2d coordinates;
/// edges between them are where Class III boundaries pick up distortion
/// vertices.
fn _icosa_edge_corners(adj_res: i32) -> [Vec2d; 3] {
  let max_dim = f64::from(MAX_DIM_BY_CII_RES[adj_res as usize]);
  [
    Vec2d {
      x: 3.0 * max_dim,
      y: 0.0,
    },
    Vec2d {
      x: -1.5 * max_dim,
      y: 3.0 * M_SQRT3_2 * max_dim,
    },
    Vec2d {
      x: -1.5 * max_dim,
      y: -3.0 * M_SQRT3_2 * max_dim,
    },
  ]
}

fn _icosa_edge(corners: &[Vec2d; 3], quadrant: i32) -> (&Vec2d, &Vec2d) {
  match quadrant as usize {
    IJ_QUADRANT => (&corners[0], &corners[1]),
    JK_QUADRANT => (&corners[1], &corners[2]),
    _ => (&corners[2], &corners[0]),
  }
}

/// Boundary of the cell at the given face IJK+ coordinates, in ccw order.
/// At Class III resolutions, edges that cross an icosahedron edge gain an
/// extra distortion vertex where the projection plane changes.
pub(crate) fn _face_ijk_to_cell_boundary(
  h: &FaceIJK,
  res: i32,
  start: i32,
  length: i32,
  g: &mut CellBoundary,
) {
  let mut adj_res = res;
  let mut center_ijk = *h;
  let mut fijk_verts = [FaceIJK::default(); NUM_HEX_VERTS];
  _face_ijk_to_verts(&mut center_ijk, &mut adj_res, &mut fijk_verts);

  // One extra pass tests the closing edge for an intersection.
  let additional_iteration = if length == NUM_HEX_VERTS as i32 { 1 } else { 0 };

  g.num_verts = 0;
  let mut last_fijk = FaceIJK::default();
  let mut last_overage = Overage::NoOverage;

  for vert in 0..(length + additional_iteration) {
    let v = (start + vert) % NUM_HEX_VERTS as i32;

    let mut fijk = fijk_verts[v as usize];
    let overage = _adjust_overage_class_ii(&mut fijk, adj_res, false, true);

    if is_res_class_iii(res)
      && vert > 0
      && fijk.face != last_fijk.face
      && last_overage != Overage::FaceEdge
    {
      // Both endpoint projections live on the center face, where the
      // crossed icosahedron edge is a known line segment.
      let last_v = (v + 5) % NUM_HEX_VERTS as i32;
      let mut orig2d0 = Vec2d::default();
      _ijk_to_hex2d(&fijk_verts[last_v as usize].coord, &mut orig2d0);
      let mut orig2d1 = Vec2d::default();
      _ijk_to_hex2d(&fijk_verts[v as usize].coord, &mut orig2d1);

      let crossed_face = if fijk.face == center_ijk.face {
        last_fijk.face
      } else {
        fijk.face
      };
      let quadrant = ADJACENT_FACE_DIR[center_ijk.face as usize][crossed_face as usize];

      if quadrant > 0 {
        let corners = _icosa_edge_corners(adj_res);
        let (edge0, edge1) = _icosa_edge(&corners, quadrant);

        let mut inter = Vec2d::default();
        _v2d_intersect(&orig2d0, &orig2d1, edge0, edge1, &mut inter);

        // An endpoint exactly on the edge needs no extra vertex.
        let is_intersection_at_vertex =
          _v2d_almost_equals(&orig2d0, &inter) || _v2d_almost_equals(&orig2d1, &inter);
        if !is_intersection_at_vertex && g.num_verts < MAX_CELL_BNDRY_VERTS {
          _hex2d_to_geo(&inter, center_ijk.face, adj_res, true, &mut g.verts[g.num_verts]);
          g.num_verts += 1;
        }
      }
    }

    if vert < length && g.num_verts < MAX_CELL_BNDRY_VERTS {
      let mut vec = Vec2d::default();
      _ijk_to_hex2d(&fijk.coord, &mut vec);
      _hex2d_to_geo(&vec, fijk.face, adj_res, true, &mut g.verts[g.num_verts]);
      g.num_verts += 1;
    }

    last_fijk = fijk;
    last_overage = overage;
  }
}

/// Pentagon variant of [`_face_ijk_to_cell_boundary`]. Every Class III
/// pentagon edge crosses an icosahedron edge; Class II pentagons have their
/// vertices exactly on the edges instead.
pub(crate) fn _face_ijk_pent_to_cell_boundary(
  h: &FaceIJK,
  res: i32,
  start: i32,
  length: i32,
  g: &mut CellBoundary,
) {
  let mut adj_res = res;
  let mut center_ijk = *h;
  let mut fijk_verts = [FaceIJK::default(); NUM_PENT_VERTS];
  _face_ijk_pent_to_verts(&mut center_ijk, &mut adj_res, &mut fijk_verts);

  let additional_iteration = if length == NUM_PENT_VERTS as i32 { 1 } else { 0 };

  g.num_verts = 0;
  let mut last_fijk = FaceIJK::default();

  for vert in 0..(length + additional_iteration) {
    let v = (start + vert) % NUM_PENT_VERTS as i32;

    let mut fijk = fijk_verts[v as usize];
    _adjust_pent_vert_overage(&mut fijk, adj_res);

    if is_res_class_iii(res) && vert > 0 {
      // Project this vertex into the previous vertex's face plane, then
      // intersect the connecting segment with the crossed icosahedron edge.
      let mut tmp_fijk = fijk;

      let mut orig2d0 = Vec2d::default();
      _ijk_to_hex2d(&last_fijk.coord, &mut orig2d0);

      let current_to_last_dir =
        ADJACENT_FACE_DIR[tmp_fijk.face as usize][last_fijk.face as usize];
      let fijk_orient = &FACE_NEIGHBORS[tmp_fijk.face as usize][current_to_last_dir as usize];

      tmp_fijk.face = fijk_orient.face;
      for _ in 0..fijk_orient.ccw_rot60 {
        _ijk_rotate60_ccw(&mut tmp_fijk.coord);
      }
      let mut trans_vec = fijk_orient.translate;
      _ijk_scale(&mut trans_vec, UNIT_SCALE_BY_CII_RES[adj_res as usize] * 3);
      let before = tmp_fijk.coord;
      _ijk_add(&before, &trans_vec, &mut tmp_fijk.coord);
      _ijk_normalize(&mut tmp_fijk.coord);

      let mut orig2d1 = Vec2d::default();
      _ijk_to_hex2d(&tmp_fijk.coord, &mut orig2d1);

      let corners = _icosa_edge_corners(adj_res);
      let quadrant = ADJACENT_FACE_DIR[tmp_fijk.face as usize][fijk.face as usize];
      let (edge0, edge1) = _icosa_edge(&corners, quadrant);

      let mut inter = Vec2d::default();
      _v2d_intersect(&orig2d0, &orig2d1, edge0, edge1, &mut inter);

      if g.num_verts < MAX_CELL_BNDRY_VERTS {
        _hex2d_to_geo(&inter, tmp_fijk.face, adj_res, true, &mut g.verts[g.num_verts]);
        g.num_verts += 1;
      }
    }

    if vert < length && g.num_verts < MAX_CELL_BNDRY_VERTS {
      let mut vec = Vec2d::default();
      _ijk_to_hex2d(&fijk.coord, &mut vec);
      _hex2d_to_geo(&vec, fijk.face, adj_res, true, &mut g.verts[g.num_verts]);
      g.num_verts += 1;
    }

    last_fijk = fijk;
  }
}
