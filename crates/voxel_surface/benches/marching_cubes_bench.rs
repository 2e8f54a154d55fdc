//! Marching Cubes extraction throughput, serial against slab-parallel.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxel_surface::{
  extract_marching_cubes_mesh, extract_parallel, ExtractorConfig, RawVolume, Region, Vector3DFloat,
};

/// 8-bit sphere density field: 255 at the centre, 0 well outside.
fn sphere_volume(size: i32, radius: f32) -> RawVolume<u8> {
  let region = Region::from_coords(0, 0, 0, size - 1, size - 1, size - 1).unwrap();
  let centre = Vector3DFloat::splat((size - 1) as f32 * 0.5);
  let mut volume = RawVolume::new(region);
  volume.fill_with(|p| {
    let distance = (p.as_float() - centre).length();
    (127.5 + (radius - distance) * 40.0).clamp(0.0, 255.0) as u8
  });
  volume
}

/// Overlapping spheres (simulating complex terrain).
fn blob_volume(size: i32) -> RawVolume<f32> {
  let region = Region::from_coords(0, 0, 0, size - 1, size - 1, size - 1).unwrap();
  let s = size as f32;
  let spheres = [
    (Vector3DFloat::new(0.3 * s, 0.5 * s, 0.5 * s), 0.25 * s),
    (Vector3DFloat::new(0.7 * s, 0.5 * s, 0.5 * s), 0.25 * s),
    (Vector3DFloat::new(0.5 * s, 0.3 * s, 0.5 * s), 0.2 * s),
    (Vector3DFloat::new(0.5 * s, 0.7 * s, 0.5 * s), 0.2 * s),
    (Vector3DFloat::new(0.5 * s, 0.5 * s, 0.5 * s), 0.3 * s),
  ];

  let mut volume = RawVolume::with_border_value(region, -s);
  volume.fill_with(|p| {
    spheres
      .iter()
      .map(|(centre, radius)| radius - (p.as_float() - *centre).length())
      .fold(f32::MIN, f32::max)
  });
  volume
}

fn bench_serial(c: &mut Criterion) {
  let mut group = c.benchmark_group("marching_cubes_serial");

  for size in [32, 64] {
    let volume = sphere_volume(size, size as f32 * 0.375);
    group.bench_with_input(BenchmarkId::new("sphere", format!("{}³", size)), &size, |b, _| {
      b.iter(|| extract_marching_cubes_mesh(black_box(&volume), volume.region()))
    });
  }

  group.finish();
}

fn bench_parallel(c: &mut Criterion) {
  let mut group = c.benchmark_group("marching_cubes_parallel");
  let volume = sphere_volume(64, 24.0);

  for thickness in [4, 16, 32] {
    let config = ExtractorConfig::new().with_slab_thickness(thickness);
    group.bench_with_input(
      BenchmarkId::new("sphere 64³", format!("slab={}", thickness)),
      &thickness,
      |b, _| b.iter(|| extract_parallel(black_box(&volume), volume.region(), config.clone())),
    );
  }

  group.finish();
}

fn bench_complex(c: &mut Criterion) {
  let volume = blob_volume(48);

  c.bench_function("marching_cubes (5 spheres, 48³)", |b| {
    b.iter(|| extract_marching_cubes_mesh(black_box(&volume), volume.region()))
  });
}

criterion_group!(benches, bench_serial, bench_parallel, bench_complex);
criterion_main!(benches);
