// tests/acceptance.rs
//
// End-to-end scenarios exercised through the public API only.

use hexgrid::*;

// Downtown San Francisco.
const SF_LAT_DEG: f64 = 37.7792;
const SF_LNG_DEG: f64 = -122.4192;

// A ring around downtown San Francisco, in radians.
const SF_VERTS: [(f64, f64); 6] = [
  (0.659966917655, -2.1364398519396),
  (0.6595011102219, -2.1359434279405),
  (0.6583348114025, -2.1354884206045),
  (0.6581220034068, -2.1382437718946),
  (0.6594479998527, -2.1384597563896),
  (0.6599990002976, -2.1376771158464),
];

const HOLE_VERTS: [(f64, f64); 3] = [
  (0.6595072188743, -2.1371053983433),
  (0.6591482046471, -2.1373141048153),
  (0.6592295020837, -2.1365222838402),
];

fn sf_geo() -> LatLng {
  LatLng {
    lat: degs_to_rads(SF_LAT_DEG),
    lng: degs_to_rads(SF_LNG_DEG),
  }
}

fn loop_from_pairs(pairs: &[(f64, f64)]) -> GeoLoop {
  GeoLoop::from_verts(pairs.iter().map(|&(lat, lng)| LatLng { lat, lng }).collect())
}

fn sf_polygon(with_hole: bool) -> GeoPolygon {
  let holes = if with_hole {
    vec![loop_from_pairs(&HOLE_VERTS)]
  } else {
    vec![]
  };
  GeoPolygon {
    geoloop: loop_from_pairs(&SF_VERTS),
    num_holes: holes.len(),
    holes,
  }
}

#[test]
fn test_geo_cell_round_trip() {
  let geo = sf_geo();
  let cell = lat_lng_to_cell(&geo, 9).unwrap();
  let center = cell_to_lat_lng(cell).unwrap();
  let again = lat_lng_to_cell(&center, 9).unwrap();
  assert_eq!(cell, again);

  // The center must sit close to the query point at res 9.
  assert!(great_circle_distance_km(&geo, &center) < 0.5);
}

#[test]
fn test_round_trip_across_resolutions() {
  let points = [
    (37.7792, -122.4192),
    (-35.28, 149.13),
    (64.15, -21.94),
    (0.0, 0.0),
    (-88.0, 170.0),
  ];
  for &(lat, lng) in &points {
    let geo = LatLng {
      lat: degs_to_rads(lat),
      lng: degs_to_rads(lng),
    };
    for res in [0, 2, 5, 9, 12, 15] {
      let cell = lat_lng_to_cell(&geo, res).unwrap();
      assert!(is_valid_cell(cell), "res {res} at ({lat}, {lng})");
      assert_eq!(get_resolution(cell), res);
      let center = cell_to_lat_lng(cell).unwrap();
      assert_eq!(lat_lng_to_cell(&center, res), Ok(cell));
    }
  }
}

#[test]
fn test_disk_compact_uncompact() {
  // Sunnyvale at res 9.
  let sunnyvale = CellIndex(0x89283470c27ffff);

  let disk = grid_disk(sunnyvale, 9).unwrap();
  assert_eq!(disk.len(), 271);
  assert_eq!(max_grid_disk_size(9), Ok(271));

  let compacted = compact_cells(&disk).unwrap();
  assert_eq!(compacted.len(), 73);

  assert_eq!(uncompact_cells_size(&compacted, 9), Ok(271));
  let mut uncompacted = uncompact_cells(&compacted, 9).unwrap();
  assert_eq!(uncompacted.len(), 271);

  let mut expected = disk.clone();
  expected.sort();
  uncompacted.sort();
  assert_eq!(uncompacted, expected);

  // Compacting again is a no-op.
  let mut twice = compact_cells(&uncompacted).unwrap();
  twice.sort();
  let mut once = compacted;
  once.sort();
  assert_eq!(twice, once);
}

#[test]
fn test_ring_unsafe_fails_near_pentagon() {
  let mut pentagons = [NULL_INDEX; 12];
  get_pentagons(2, &mut pentagons).unwrap();
  let pentagon = pentagons[0];
  assert!(is_pentagon(pentagon));

  assert_eq!(grid_ring_unsafe(pentagon, 1), Err(HexGridError::Pentagon));

  // A hexagon whose k=1 ring contains the pentagon fails too, while the
  // safe disk copes.
  let neighbor = grid_disk(pentagon, 1)
    .unwrap()
    .into_iter()
    .find(|&c| !is_pentagon(c))
    .unwrap();
  assert_eq!(grid_ring_unsafe(neighbor, 1), Err(HexGridError::Pentagon));
  assert_eq!(grid_disk(neighbor, 1).unwrap().len(), 7);
}

#[test]
fn test_disk_matches_rings_away_from_pentagons() {
  let origin = lat_lng_to_cell(&sf_geo(), 8).unwrap();
  for k in 0..=4 {
    let mut from_rings: Vec<CellIndex> = Vec::new();
    from_rings.push(origin);
    for ring in 1..=k {
      from_rings.extend(grid_ring_unsafe(origin, ring).unwrap());
    }
    from_rings.sort();

    let mut disk = grid_disk(origin, k).unwrap();
    disk.sort();
    assert_eq!(disk, from_rings, "k = {k}");
  }
}

#[test]
fn test_polygon_to_cells_sf() {
  let polygon = sf_polygon(false);
  let cells = polygon_to_cells(&polygon, 9, 0).unwrap();
  assert_eq!(cells.len(), 1253);
  assert!(max_polygon_to_cells_size(&polygon, 9, 0).unwrap() >= 1253);

  // Every returned cell's center is inside the polygon bounding box.
  for cell in &cells {
    assert!(is_valid_cell(*cell));
    assert_eq!(get_resolution(*cell), 9);
  }
}

#[test]
fn test_polygon_to_cells_sf_hole() {
  let cells = polygon_to_cells(&sf_polygon(true), 9, 0).unwrap();
  assert_eq!(cells.len(), 1214);
}

#[test]
fn test_polygon_of_cell_boundary_yields_children() {
  let cell = lat_lng_to_cell(&sf_geo(), 7).unwrap();
  let boundary = cell_to_boundary(cell).unwrap();
  let polygon = GeoPolygon {
    geoloop: GeoLoop::from_verts(boundary.verts[..boundary.num_verts].to_vec()),
    num_holes: 0,
    holes: vec![],
  };

  let mut filled = polygon_to_cells(&polygon, 8, 0).unwrap();
  filled.sort();
  let mut children = cell_to_children(cell, 8).unwrap();
  children.sort();
  assert_eq!(filled, children);
}

#[test]
fn test_cells_to_multi_polygon_single_cell() {
  let cell = lat_lng_to_cell(&sf_geo(), 9).unwrap();
  let multi = cells_to_multi_polygon(&[cell]).unwrap();
  assert_eq!(multi.len(), 1);
  assert_eq!(multi[0].outer.len(), 6);
  assert!(multi[0].holes.is_empty());
}

#[test]
fn test_directed_edge_distances() {
  let cell = lat_lng_to_cell(&sf_geo(), 9).unwrap();
  let neighbor = grid_ring_unsafe(cell, 1).unwrap()[0];
  let edge = cells_to_directed_edge(cell, neighbor).unwrap();

  let [origin, destination] = directed_edge_to_cells(edge).unwrap();
  assert_eq!(grid_distance(cell, origin), Ok(0));
  assert_eq!(grid_distance(cell, destination), Ok(1));
}

#[test]
fn test_distance_and_path_agree() {
  let geo = sf_geo();
  let start = lat_lng_to_cell(&geo, 8).unwrap();
  let other = LatLng {
    lat: degs_to_rads(SF_LAT_DEG + 0.2),
    lng: degs_to_rads(SF_LNG_DEG + 0.3),
  };
  let end = lat_lng_to_cell(&other, 8).unwrap();

  let distance = grid_distance(start, end).unwrap();
  assert!(distance > 0);
  assert_eq!(grid_distance(end, start), Ok(distance));

  let path = grid_path_cells(start, end).unwrap();
  assert_eq!(path.len() as i64, distance + 1);
  assert_eq!(path.first(), Some(&start));
  assert_eq!(path.last(), Some(&end));
  for pair in path.windows(2) {
    assert_eq!(grid_distance(pair[0], pair[1]), Ok(1));
  }
}

#[test]
fn test_hierarchy_round_trips() {
  let cell = lat_lng_to_cell(&sf_geo(), 9).unwrap();

  let parent = cell_to_parent(cell, 8).unwrap();
  let children = cell_to_children(parent, 9).unwrap();
  assert_eq!(children.len(), 7);
  assert_eq!(cell_to_children_size(parent, 9), Ok(7));
  assert!(children.contains(&cell));
  for child in &children {
    assert_eq!(cell_to_parent(*child, 8), Ok(parent));
  }

  assert_eq!(cell_to_center_child(parent, 9), Ok(children[0]));

  let pos = cell_to_child_pos(cell, 8).unwrap();
  assert_eq!(child_pos_to_cell(pos, parent, 9), Ok(cell));
}

#[test]
fn test_inspection_known_cell() {
  // "getResolution -c 85283473fffffff" "5"
  let cell = CellIndex(0x85283473fffffff);
  assert_eq!(get_resolution(cell), 5);
  assert_eq!(get_base_cell_number(cell), 20);
  assert!(!is_pentagon(cell));
  assert!(is_class_iii(cell));
  assert!(is_valid_cell(cell));

  assert_eq!(index_to_string(cell), "85283473fffffff");
  assert_eq!(string_to_index("85283473fffffff"), Ok(cell));
  assert_eq!(cell, CellIndex(599686042433355775));

  assert_eq!(string_to_index(""), Err(HexGridError::Failed));
  assert_eq!(string_to_index("not hex"), Err(HexGridError::Failed));
}

#[test]
fn test_cell_counts() {
  assert_eq!(get_num_cells(0), Ok(122));
  assert_eq!(get_num_cells(1), Ok(842));
  assert_eq!(pentagon_count(), 12);

  let mut res0 = [NULL_INDEX; 122];
  get_res0_cells(&mut res0);
  assert!(res0.iter().all(|&c| is_valid_cell(c)));
  assert_eq!(cells_at_resolution(0).count(), 122);
}
