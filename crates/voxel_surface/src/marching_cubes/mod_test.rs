use super::*;
use crate::volume::RawVolume;
use crate::voxel::{MaterialDensityPair88, DEFAULT_MATERIAL};

fn region(lower: i32, upper: i32) -> Region {
  Region::from_coords(lower, lower, lower, upper, upper, upper).unwrap()
}

fn single_voxel_volume() -> RawVolume<u8> {
  let mut vol = RawVolume::new(region(0, 31));
  vol.set_voxel_at_xyz(5, 5, 5, 200).unwrap();
  vol
}

#[test]
fn test_empty_volume_produces_no_mesh() {
  let vol = RawVolume::<u8>::new(region(0, 15));
  let mut mesh = SurfaceMesh::new();
  let stats = MarchingCubesExtractor::new(&vol, vol.region(), &mut mesh)
    .execute()
    .unwrap();

  assert!(mesh.is_empty());
  assert_eq!(mesh.no_of_indices(), 0);
  assert_eq!(stats.cubes_visited, 15 * 15 * 15);
  assert_eq!(stats.active_cubes, 0);
}

#[test]
fn test_solid_volume_produces_no_mesh() {
  let mut vol = RawVolume::<u8>::with_border_value(region(0, 7), 255);
  vol.fill(255);
  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  assert!(mesh.is_empty());
}

#[test]
fn test_single_voxel_octahedron() {
  let vol = single_voxel_volume();
  let mut mesh = SurfaceMesh::new();
  let stats = MarchingCubesExtractor::new(&vol, vol.region(), &mut mesh)
    .execute()
    .unwrap();

  assert_eq!(mesh.no_of_vertices(), 6);
  assert_eq!(mesh.no_of_indices(), 24);
  assert_eq!(stats.cubes_visited, 31 * 31 * 31);
  assert_eq!(stats.active_cubes, 8);
  assert_eq!(stats.vertices_added, 6);
  assert_eq!(stats.indices_added, 24);
  assert_eq!(stats.degenerate_triangles, 0);

  // One vertex on each axis-aligned edge leaving (5,5,5)
  let near = 4.0 + 127.0 / 200.0;
  let far = 6.0 - 127.0 / 200.0;
  let expected = [
    Vector3DFloat::new(near, 5.0, 5.0),
    Vector3DFloat::new(far, 5.0, 5.0),
    Vector3DFloat::new(5.0, near, 5.0),
    Vector3DFloat::new(5.0, far, 5.0),
    Vector3DFloat::new(5.0, 5.0, near),
    Vector3DFloat::new(5.0, 5.0, far),
  ];
  for e in expected {
    assert!(
      mesh.vertices().iter().any(|v| (v.position - e).length() < 1e-5),
      "missing vertex near {}",
      e
    );
  }
}

#[test]
fn test_single_voxel_normals_point_outward() {
  let vol = single_voxel_volume();
  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  let centre = Vector3DFloat::new(5.0, 5.0, 5.0);

  for v in mesh.vertices() {
    let outward = (v.position - centre).normalized().unwrap();
    assert!((v.normal.dot(outward) - 1.0).abs() < 1e-5, "{:?}", v);
    assert_eq!(v.material, DEFAULT_MATERIAL);
  }
}

#[test]
fn test_threshold_override() {
  let vol = single_voxel_volume();
  // Nothing exceeds 250
  let mesh =
    extract_marching_cubes_mesh_with(&vol, vol.region(), ExtractorConfig::new().with_threshold(250.0))
      .unwrap();
  assert!(mesh.is_empty());

  // Lower threshold moves the crossing further out
  let mesh =
    extract_marching_cubes_mesh_with(&vol, vol.region(), ExtractorConfig::new().with_threshold(100.0))
      .unwrap();
  assert_eq!(mesh.no_of_vertices(), 6);
  assert!(mesh
    .vertices()
    .iter()
    .any(|v| (v.position - Vector3DFloat::new(4.5, 5.0, 5.0)).length() < 1e-6));
}

#[test]
fn test_second_execute_fails() {
  let vol = single_voxel_volume();
  let mut mesh = SurfaceMesh::new();
  let mut extractor = MarchingCubesExtractor::new(&vol, vol.region(), &mut mesh);
  assert_eq!(extractor.state(), ExtractorState::Unexecuted);

  extractor.execute().unwrap();
  assert_eq!(extractor.state(), ExtractorState::Done);

  assert_eq!(extractor.execute(), Err(VoxelError::AlreadyExecuted));
  assert_eq!(extractor.state(), ExtractorState::Done);
  drop(extractor);

  // Mesh untouched by the rejected call
  assert_eq!(mesh.no_of_vertices(), 6);
}

#[test]
fn test_flat_region_visits_no_cubes() {
  let vol = single_voxel_volume();
  let flat = Region::from_coords(0, 0, 5, 31, 31, 5).unwrap();
  let mut mesh = SurfaceMesh::new();
  let stats = MarchingCubesExtractor::new(&vol, flat, &mut mesh)
    .execute()
    .unwrap();
  assert_eq!(stats.cubes_visited, 0);
  assert!(mesh.is_empty());
}

#[test]
fn test_material_follows_solid_corner() {
  let mut vol = RawVolume::<MaterialDensityPair88>::new(region(0, 15));
  vol
    .set_voxel_at_xyz(5, 5, 5, MaterialDensityPair88::new(9, 200))
    .unwrap();

  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  assert_eq!(mesh.no_of_vertices(), 6);
  assert!(mesh.vertices().iter().all(|v| v.material == 9));
}

#[test]
fn test_material_boundary_splits_vertices() {
  // Two adjacent solid voxels with different materials
  let mut vol = RawVolume::<MaterialDensityPair88>::new(region(0, 15));
  vol
    .set_voxel_at_xyz(5, 5, 5, MaterialDensityPair88::new(2, 200))
    .unwrap();
  vol
    .set_voxel_at_xyz(6, 5, 5, MaterialDensityPair88::new(3, 200))
    .unwrap();

  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  let materials: std::collections::HashSet<u16> = mesh.vertices().iter().map(|v| v.material).collect();
  assert_eq!(materials, [2, 3].into_iter().collect());
}

#[test]
fn test_iso_value_on_corner_drops_degenerate_triangle() {
  // One cube: corners 0 and 2 solid, corner 1 exactly at the threshold
  let mut vol = RawVolume::<u8>::new(region(0, 1));
  vol.set_voxel_at_xyz(0, 0, 0, 200).unwrap();
  vol.set_voxel_at_xyz(1, 1, 0, 200).unwrap();
  vol.set_voxel_at_xyz(1, 0, 0, 127).unwrap();

  let mut mesh = SurfaceMesh::new();
  let stats = MarchingCubesExtractor::new(&vol, vol.region(), &mut mesh)
    .execute()
    .unwrap();

  assert_eq!(stats.degenerate_triangles, 1);
  assert_eq!(mesh.triangle_count(), 3);
  for [a, b, c] in mesh.triangles() {
    assert!(a != b && b != c && a != c);
  }
  // The collapsed crossing sits on the threshold corner
  assert!(mesh
    .vertices()
    .iter()
    .any(|v| v.position == Vector3DFloat::new(1.0, 0.0, 0.0)));
  assert_eq!(mesh.no_of_vertices(), 5);
  assert_every_vertex_referenced(&mesh);
}

fn assert_every_vertex_referenced(mesh: &SurfaceMesh) {
  let mut used = vec![false; mesh.no_of_vertices() as usize];
  for &i in mesh.indices() {
    used[i as usize] = true;
  }
  if let Some(orphan) = used.iter().position(|u| !u) {
    panic!("vertex {orphan} is not referenced by any triangle: {:?}", mesh.vertices()[orphan]);
  }
}

#[test]
fn test_degenerate_triangle_leaves_no_orphan_vertex() {
  // Corners 0, 2 and 5 solid, corner 1 on the threshold. The collapsed
  // triangle owns a crossing no surviving triangle uses.
  let mut vol = RawVolume::<u8>::new(region(0, 1));
  vol.set_voxel_at_xyz(0, 0, 0, 255).unwrap();
  vol.set_voxel_at_xyz(1, 0, 0, 127).unwrap();
  vol.set_voxel_at_xyz(1, 1, 0, 255).unwrap();
  vol.set_voxel_at_xyz(1, 0, 1, 255).unwrap();

  let mut mesh = SurfaceMesh::new();
  let stats = MarchingCubesExtractor::new(&vol, vol.region(), &mut mesh)
    .execute()
    .unwrap();

  assert_eq!(stats.degenerate_triangles, 1);
  assert_eq!(mesh.triangle_count(), 4);
  assert_eq!(mesh.no_of_vertices(), 6);
  assert_eq!(stats.vertices_added, 6);
  assert_every_vertex_referenced(&mesh);
}

#[test]
fn test_threshold_valued_voxels_leave_no_orphan_vertices() {
  for seed in 1..=24u64 {
    let mut vol = RawVolume::<u8>::new(region(0, 9));
    let mut state = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15);
    vol.fill_with(|p| {
      if p.to_array().iter().any(|&c| c == 0 || c == 9) {
        return 0;
      }
      state ^= state << 13;
      state ^= state >> 7;
      state ^= state << 17;
      [0, 127, 255][(state % 3) as usize]
    });

    let mut mesh = SurfaceMesh::new();
    let stats = MarchingCubesExtractor::new(&vol, vol.region(), &mut mesh)
      .execute()
      .unwrap();

    assert!(stats.degenerate_triangles > 0, "seed {seed}");
    assert_eq!(stats.vertices_added, mesh.no_of_vertices() as u64);
    assert_every_vertex_referenced(&mesh);
  }
}

#[test]
fn test_float_volume_default_threshold() {
  let mut vol = RawVolume::<f32>::with_border_value(region(0, 7), -1.0);
  vol.fill(-1.0);
  vol.set_voxel_at_xyz(3, 3, 3, 1.0).unwrap();

  let mesh = extract_marching_cubes_mesh(&vol, vol.region()).unwrap();
  assert_eq!(mesh.no_of_vertices(), 6);
  assert!(mesh
    .vertices()
    .iter()
    .any(|v| v.position == Vector3DFloat::new(2.5, 3.0, 3.0)));
}

#[test]
fn test_appends_to_existing_mesh() {
  let vol = single_voxel_volume();
  let mut mesh = SurfaceMesh::new();
  let before = mesh.add_vertex(Vector3DFloat::new(-10.0, -10.0, -10.0), Vector3DFloat::ZERO, 1);

  let stats = MarchingCubesExtractor::new(&vol, vol.region(), &mut mesh)
    .execute()
    .unwrap();

  assert_eq!(before, 0);
  assert_eq!(stats.vertices_added, 6);
  assert_eq!(mesh.no_of_vertices(), 7);
  assert!(mesh.indices().iter().all(|&i| i >= 1));
}
