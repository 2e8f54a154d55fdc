//! End-to-end extraction properties over the public API.

use std::collections::{HashMap, HashSet};

use voxel_surface::{
  extract_marching_cubes_mesh, extract_marching_cubes_mesh_with, extract_parallel, ExtractorConfig,
  MarchingCubesExtractor, MaterialDensityPair88, RawVolume, Region, SurfaceMesh, Vector3DFloat,
  Vector3DInt32, Vertex, VoxelError,
};

fn cube_region(size: i32) -> Region {
  Region::from_coords(0, 0, 0, size - 1, size - 1, size - 1).unwrap()
}

/// Float sphere: positive inside, zero on the surface.
fn float_sphere(size: i32, radius: f32) -> RawVolume<f32> {
  let centre = Vector3DFloat::splat((size - 1) as f32 * 0.5);
  let mut vol = RawVolume::with_border_value(cube_region(size), -radius);
  vol.fill_with(|p| radius - (p.as_float() - centre).length());
  vol
}

/// 8-bit sphere with density 255 at the centre fading to 0 outside.
fn byte_sphere(size: i32, radius: f32) -> RawVolume<u8> {
  let centre = Vector3DFloat::splat((size - 1) as f32 * 0.5);
  let mut vol = RawVolume::new(cube_region(size));
  vol.fill_with(|p| {
    let d = (p.as_float() - centre).length();
    (127.5 + (radius - d) * 40.0).clamp(0.0, 255.0) as u8
  });
  vol
}

/// Deterministic scattered solid voxels, empty on the outer shell.
fn scattered_volume(size: i32, seed: u64) -> RawVolume<u8> {
  let mut state = seed;
  let mut vol = RawVolume::new(cube_region(size));
  vol.fill_with(|p| {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    let inner = [p.x(), p.y(), p.z()].iter().all(|&c| c > 0 && c < size - 1);
    if inner && state & 1 == 1 {
      255
    } else {
      0
    }
  });
  vol
}

/// Every directed edge appears once and its reverse appears once.
fn assert_closed_and_oriented(mesh: &SurfaceMesh) {
  let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
  for [a, b, c] in mesh.triangles() {
    for edge in [(a, b), (b, c), (c, a)] {
      *directed.entry(edge).or_default() += 1;
    }
  }
  for (&(u, v), &count) in &directed {
    assert_eq!(count, 1, "edge {}->{} used {} times", u, v, count);
    assert_eq!(directed.get(&(v, u)), Some(&1), "edge {}->{} has no twin", u, v);
  }
}

/// Hashable identity of a vertex: position bits plus material.
fn vertex_key(v: &Vertex) -> ([u32; 3], u16) {
  (v.position.to_array().map(f32::to_bits), v.material)
}

fn assert_no_duplicate_vertices(mesh: &SurfaceMesh) {
  let mut seen = HashSet::new();
  for v in mesh.vertices() {
    assert!(seen.insert(vertex_key(v)), "duplicate vertex {:?}", v);
  }
}

fn face_normal(mesh: &SurfaceMesh, [a, b, c]: [u32; 3]) -> Vector3DFloat {
  let p = |i: u32| mesh.vertex(i).unwrap().position;
  (p(b) - p(a)).cross(p(c) - p(a))
}

#[test]
fn single_voxel_yields_octahedron() {
  let mut vol = RawVolume::<u8>::new(cube_region(32));
  vol.set_voxel_at(Vector3DInt32::new(5, 5, 5), 200).unwrap();

  let mut mesh = SurfaceMesh::new();
  MarchingCubesExtractor::new(&vol, cube_region(32), &mut mesh)
    .execute()
    .unwrap();

  assert_eq!(mesh.no_of_vertices(), 6);
  assert_eq!(mesh.no_of_indices(), 24);
  assert_closed_and_oriented(&mesh);
}

#[test]
fn all_empty_volume_yields_nothing() {
  let vol = RawVolume::<u8>::new(cube_region(16));
  let mesh = extract_marching_cubes_mesh(&vol, cube_region(16)).unwrap();
  assert_eq!(mesh.no_of_vertices(), 0);
  assert_eq!(mesh.no_of_indices(), 0);
}

#[test]
fn sphere_is_closed_and_crack_free() {
  let vol = float_sphere(20, 6.3);
  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();

  assert!(mesh.triangle_count() > 100);
  assert_no_duplicate_vertices(&mesh);
  assert_closed_and_oriented(&mesh);

  // Euler characteristic of a sphere
  let edges = mesh.no_of_indices() / 2;
  let euler = mesh.no_of_vertices() as i64 - edges as i64 + mesh.triangle_count() as i64;
  assert_eq!(euler, 2);
}

#[test]
fn sphere_vertices_lie_near_surface() {
  let vol = float_sphere(20, 6.3);
  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  let centre = Vector3DFloat::splat(9.5);

  for v in mesh.vertices() {
    let r = (v.position - centre).length();
    assert!((r - 6.3).abs() < 0.25, "vertex at radius {}", r);
    assert!((v.normal.length() - 1.0).abs() < 1e-4);
  }
}

#[test]
fn scattered_voxels_stay_closed() {
  for seed in [1, 7, 42] {
    let vol = scattered_volume(10, seed);
    let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
    assert!(!mesh.is_empty(), "seed {}", seed);
    assert_no_duplicate_vertices(&mesh);
    assert_closed_and_oriented(&mesh);
  }
}

#[test]
fn every_two_cube_pattern_is_closed() {
  // Two cubes sharing a face, every solid/empty assignment of their 12
  // corners, joined along each axis. The empty shell closes the surface.
  for axis in 0..3 {
    let upper = Vector3DInt32::splat(3).with_axis(axis, 4);
    let region = Region::new(Vector3DInt32::splat(0), upper).unwrap();

    for pattern in 0u32..4096 {
      let mut vol = RawVolume::<u8>::new(region);
      let mut bit = 0;
      for a in 1..=3 {
        for b in 1..=2 {
          for c in 1..=2 {
            if pattern >> bit & 1 == 1 {
              let point = match axis {
                0 => Vector3DInt32::new(a, b, c),
                1 => Vector3DInt32::new(b, a, c),
                _ => Vector3DInt32::new(b, c, a),
              };
              vol.set_voxel_at(point, 255).unwrap();
            }
            bit += 1;
          }
        }
      }

      let mesh = extract_marching_cubes_mesh(&vol, region).unwrap();
      assert_eq!(mesh.is_empty(), pattern == 0, "axis {axis} pattern {pattern:#05x}");
      assert_closed_and_oriented(&mesh);
    }
  }
}

#[test]
fn winding_agrees_with_vertex_normals() {
  let vol = byte_sphere(32, 10.2);
  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  assert!(!mesh.is_empty());

  for tri in mesh.triangles() {
    let n = face_normal(&mesh, tri);
    for i in tri {
      let vn = mesh.vertex(i).unwrap().normal;
      assert!(n.dot(vn) > 0.0, "triangle {:?} faces inward", tri);
    }
  }
}

#[test]
fn winding_points_away_from_solid() {
  let vol = float_sphere(16, 5.1);
  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  let centre = Vector3DFloat::splat(7.5);

  for tri in mesh.triangles() {
    let n = face_normal(&mesh, tri);
    let p = mesh.vertex(tri[0]).unwrap().position;
    assert!(n.dot(p - centre) > 0.0);
  }
}

#[test]
fn extraction_is_deterministic() {
  let vol = byte_sphere(24, 7.7);
  let a = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  let b = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();

  assert_eq!(a.vertices(), b.vertices());
  assert_eq!(a.indices(), b.indices());
}

#[test]
fn adjacent_regions_share_seam_vertices() {
  let vol = float_sphere(20, 6.3);
  let whole = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();

  let left = Region::from_coords(0, 0, 0, 9, 19, 19).unwrap();
  let right = Region::from_coords(9, 0, 0, 19, 19, 19).unwrap();
  let mut joined = extract_marching_cubes_mesh(&vol, left).unwrap();
  joined
    .merge(&extract_marching_cubes_mesh(&vol, right).unwrap())
    .unwrap();

  assert_eq!(joined.no_of_vertices(), whole.no_of_vertices());
  assert_eq!(joined.triangle_count(), whole.triangle_count());
  assert_closed_and_oriented(&joined);
}

#[test]
fn parallel_matches_serial() {
  let vol = byte_sphere(32, 11.4);
  for thickness in [1, 3, 16, 64] {
    let config = ExtractorConfig::new().with_slab_thickness(thickness);
    let serial = extract_marching_cubes_mesh_with(&vol, vol.region(), config.clone()).unwrap();
    let parallel = extract_parallel(&vol, vol.region(), config).unwrap();

    let serial_set: HashSet<_> = serial.vertices().iter().map(vertex_key).collect();
    let parallel_set: HashSet<_> = parallel.vertices().iter().map(vertex_key).collect();
    assert_eq!(serial_set, parallel_set, "thickness {}", thickness);
    assert_eq!(serial.triangle_count(), parallel.triangle_count(), "thickness {}", thickness);
  }
}

#[test]
fn second_execute_is_rejected() {
  let vol = byte_sphere(8, 2.5);
  let mut mesh = SurfaceMesh::new();
  let mut extractor = MarchingCubesExtractor::new(&vol, vol.region(), &mut mesh);
  extractor.execute().unwrap();
  assert_eq!(extractor.execute().unwrap_err(), VoxelError::AlreadyExecuted);
}

#[test]
fn material_regions_keep_hard_boundaries() {
  let mut vol = RawVolume::<MaterialDensityPair88>::new(cube_region(16));
  vol.fill_with(|p| {
    let inside = (3..=12).contains(&p.x()) && (3..=12).contains(&p.y()) && (3..=12).contains(&p.z());
    let material = if p.x() < 8 { 1 } else { 2 };
    MaterialDensityPair88::new(material, if inside { 255 } else { 0 })
  });

  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  let materials: HashSet<u16> = mesh.vertices().iter().map(|v| v.material).collect();
  assert_eq!(materials, HashSet::from([1, 2]));

  for v in mesh.vertices() {
    let expected = if v.position.x() < 7.5 { 1 } else { 2 };
    assert_eq!(v.material, expected, "{:?}", v);
  }
  assert_no_duplicate_vertices(&mesh);
}

#[test]
fn region_rejects_inverted_bounds() {
  let err = Region::from_coords(0, 5, 0, 4, 4, 4).unwrap_err();
  assert!(matches!(err, VoxelError::InvalidRegion { .. }));
}
