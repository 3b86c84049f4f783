use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hexgrid::*;

fn sf_geo() -> LatLng {
  LatLng {
    lat: degs_to_rads(37.7749),
    lng: degs_to_rads(-122.4194),
  }
}

// SF at resolutions 5 and 10.
const SF_RES5: CellIndex = CellIndex(0x85283473fffffff);
const SF_RES10: CellIndex = CellIndex(0x8a2830828767fff);

// Center child of base cell 4 at resolution 5.
const PENTAGON_RES5: CellIndex = CellIndex(0x85080003fffffff);

fn bench_lat_lng_to_cell(c: &mut Criterion) {
  let geo = sf_geo();
  let mut group = c.benchmark_group("lat_lng_to_cell");
  for res in [0, 5, 10, 15] {
    group.bench_with_input(format!("res_{res}"), &res, |b, &r| {
      b.iter(|| lat_lng_to_cell(black_box(&geo), black_box(r)));
    });
  }
  group.finish();
}

fn bench_cell_to_lat_lng(c: &mut Criterion) {
  c.benchmark_group("cell_to_lat_lng")
    .bench_function("res_5", |b| b.iter(|| cell_to_lat_lng(black_box(SF_RES5))))
    .bench_function("res_10", |b| b.iter(|| cell_to_lat_lng(black_box(SF_RES10))));
}

fn bench_cell_to_boundary(c: &mut Criterion) {
  c.benchmark_group("cell_to_boundary")
    .bench_function("hex_res_5", |b| b.iter(|| cell_to_boundary(black_box(SF_RES5))))
    .bench_function("hex_res_10", |b| b.iter(|| cell_to_boundary(black_box(SF_RES10))))
    .bench_function("pent_res_5", |b| {
      b.iter(|| cell_to_boundary(black_box(PENTAGON_RES5)))
    });
}

fn bench_grid_disk(c: &mut Criterion) {
  let origin = lat_lng_to_cell(&sf_geo(), 9).unwrap();
  let mut group = c.benchmark_group("grid_disk");
  for k in [1, 3, 9] {
    group.bench_with_input(format!("k_{k}"), &k, |b, &k| {
      b.iter(|| grid_disk(black_box(origin), black_box(k)));
    });
  }
  group.finish();
}

fn bench_compact_cells(c: &mut Criterion) {
  let origin = lat_lng_to_cell(&sf_geo(), 9).unwrap();
  let disk = grid_disk(origin, 9).unwrap();
  c.bench_function("compact_cells_disk_k9", |b| {
    b.iter(|| compact_cells(black_box(&disk)));
  });
}

criterion_group!(
  indexing_benches,
  bench_lat_lng_to_cell,
  bench_cell_to_lat_lng,
  bench_cell_to_boundary,
  bench_grid_disk,
  bench_compact_cells
);
criterion_main!(indexing_benches);
