//! Marching Cubes iso-surface extraction.
//!
//! Walks every unit cube of a [`Region`], classifies its 8 corners against an
//! iso-threshold and emits the triangles of the matching case into a
//! [`SurfaceMesh`]. Vertices sit on cube edges, so neighbouring cubes share
//! them through the mesh's deduplicating insert.
//!
//! # Processing Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  volume: &impl Volume    - voxel_at(p) for any lattice point    │
//! │  region: Region          - inclusive voxel box to scan          │
//! │  config: ExtractorConfig - threshold (default per voxel type)   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 1: Corner Classification               │
//! │  For each cube with lower <= (x,y,z) < upper:                   │
//! │    Sample 8 corner voxels                                       │
//! │    Case index: bit i set when density_i > threshold             │
//! │    Early-out if homogeneous (case == 0 or case == 255)          │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 2: Edge Vertices                       │
//! │  For each edge the case table references (once per cube):       │
//! │    t = (threshold - d0) / (d1 - d0), clamped, 0.5 if d0 == d1   │
//! │    Position on the edge, walked lower corner -> higher corner   │
//! │    Normal from the negated central-difference gradient          │
//! │    Material of the solid corner                                 │
//! │    Cached per cube; nothing reaches the mesh yet                │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PHASE 3: Triangulation                       │
//! │  Up to 5 triangles from TRI_TABLE[case], table winding          │
//! │  Drop triangles whose corners collapsed onto one point          │
//! │  add_vertex for survivors only (deduplicated on pos + material) │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! Unexecuted ──execute()──▶ Executing ──▶ Done
//!                                           │
//!                              execute() ───┴──▶ Err(AlreadyExecuted)
//! ```

mod corner_mask;
mod gradient;
mod vertex_calc;

use glam::Vec3A;
use smallvec::SmallVec;
use web_time::Instant;

use crate::error::{Result, VoxelError};
use crate::mesh::SurfaceMesh;
use crate::metrics::ExtractionStats;
use crate::region::Region;
use crate::tables::{self, CORNER_OFFSETS, EDGE_AXIS, EDGE_CORNERS, EDGE_TABLE};
use crate::types::ExtractorConfig;
use crate::vector::{Vector3DFloat, Vector3DInt32};
use crate::volume::Volume;
use crate::voxel::Voxel;

/// Extractor lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractorState {
  Unexecuted,
  Executing,
  Done,
}

/// Single-use Marching Cubes run over one region of a volume.
///
/// The extractor borrows the volume read-only and the output mesh mutably for
/// its whole lifetime. [`execute`](Self::execute) runs exactly once.
pub struct MarchingCubesExtractor<'a, V: Volume + ?Sized> {
  volume: &'a V,
  region: Region,
  mesh: &'a mut SurfaceMesh,
  config: ExtractorConfig,
  state: ExtractorState,
}

/// Corner samples of one unit cube.
struct Cube<T> {
  corners: [Vector3DInt32; 8],
  voxels: [T; 8],
  densities: [f32; 8],
  case: u8,
}

impl<T: Voxel> Cube<T> {
  #[inline]
  fn is_solid(&self, corner: usize) -> bool {
    (self.case >> corner) & 1 == 1
  }
}

/// Crossing on one cube edge. `index` stays `None` until a surviving
/// triangle uses the crossing.
#[derive(Clone, Copy)]
struct EdgeCrossing {
  position: Vector3DFloat,
  normal: Vector3DFloat,
  material: u16,
  index: Option<u32>,
}

/// Per-cube caches, reset for every cube.
struct CubeScratch {
  crossings: [Option<EdgeCrossing>; 12],
  gradients: [Option<Vec3A>; 8],
}

impl CubeScratch {
  fn new() -> Self {
    Self {
      crossings: [None; 12],
      gradients: [None; 8],
    }
  }
}

impl<'a, V: Volume + ?Sized> MarchingCubesExtractor<'a, V> {
  pub fn new(volume: &'a V, region: Region, mesh: &'a mut SurfaceMesh) -> Self {
    Self {
      volume,
      region,
      mesh,
      config: ExtractorConfig::default(),
      state: ExtractorState::Unexecuted,
    }
  }

  /// Override the extraction configuration.
  pub fn with_config(mut self, config: ExtractorConfig) -> Self {
    self.config = config;
    self
  }

  pub fn state(&self) -> ExtractorState {
    self.state
  }

  pub fn region(&self) -> Region {
    self.region
  }

  pub fn config(&self) -> &ExtractorConfig {
    &self.config
  }

  /// Effective iso-threshold for this run.
  pub fn threshold(&self) -> f32 {
    self.config.threshold_for::<V::Voxel>()
  }

  /// Run the extraction, appending geometry to the bound mesh.
  ///
  /// Fails with [`VoxelError::AlreadyExecuted`] on a second call. The
  /// extractor ends in [`ExtractorState::Done`] even if the run fails.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "marching_cubes::execute", fields(region = %self.region)))]
  pub fn execute(&mut self) -> Result<ExtractionStats> {
    if self.state != ExtractorState::Unexecuted {
      return Err(VoxelError::AlreadyExecuted);
    }

    self.state = ExtractorState::Executing;
    let result = self.run();
    self.state = ExtractorState::Done;
    result
  }

  fn run(&mut self) -> Result<ExtractionStats> {
    let start = Instant::now();
    let threshold = self.threshold();
    let lower = self.region.lower();
    let upper = self.region.upper();

    let vertices_before = self.mesh.no_of_vertices();
    let indices_before = self.mesh.no_of_indices();
    let mut stats = ExtractionStats::default();
    let mut scratch = CubeScratch::new();

    // Z innermost to follow the volume's storage order
    for x in lower.x()..upper.x() {
      for y in lower.y()..upper.y() {
        for z in lower.z()..upper.z() {
          stats.cubes_visited += 1;
          self.process_cube(Vector3DInt32::new(x, y, z), threshold, &mut scratch, &mut stats)?;
        }
      }
    }

    stats.vertices_added = (self.mesh.no_of_vertices() - vertices_before) as u64;
    stats.indices_added = (self.mesh.no_of_indices() - indices_before) as u64;
    stats.elapsed_us = start.elapsed().as_micros() as u64;

    #[cfg(feature = "tracing")]
    tracing::debug!(
      cubes = stats.cubes_visited,
      active = stats.active_cubes,
      vertices = stats.vertices_added,
      triangles = stats.triangles_added(),
      degenerate = stats.degenerate_triangles,
      elapsed_us = stats.elapsed_us,
      "marching cubes extraction finished"
    );

    Ok(stats)
  }

  /// Classify one cube and emit its triangles.
  fn process_cube(
    &mut self,
    base: Vector3DInt32,
    threshold: f32,
    scratch: &mut CubeScratch,
    stats: &mut ExtractionStats,
  ) -> Result<()> {
    let corners: [Vector3DInt32; 8] =
      std::array::from_fn(|i| base + Vector3DInt32::from(CORNER_OFFSETS[i]));
    let voxels: [V::Voxel; 8] = std::array::from_fn(|i| self.volume.voxel_at(corners[i]));
    let densities: [f32; 8] = std::array::from_fn(|i| voxels[i].density());

    let case = corner_mask::build(&densities, threshold);
    if corner_mask::is_homogeneous(case) {
      return Ok(());
    }
    stats.active_cubes += 1;

    let cube = Cube {
      corners,
      voxels,
      densities,
      case,
    };
    debug_assert_ne!(EDGE_TABLE[case as usize], 0);

    *scratch = CubeScratch::new();
    let mut triangles: SmallVec<[[u32; 3]; 5]> = SmallVec::new();

    for tri in tables::triangles(case) {
      let [p0, p1, p2] = tri.map(|edge| self.edge_crossing(&cube, edge, threshold, scratch).position);

      // Iso-value on a shared corner collapses the triangle to zero area
      if p0 == p1 || p1 == p2 || p0 == p2 {
        stats.degenerate_triangles += 1;
        continue;
      }
      triangles.push(tri.map(|edge| self.edge_index(&cube, edge, threshold, scratch)));
    }

    for [i0, i1, i2] in triangles {
      self.mesh.add_triangle(i0, i1, i2)?;
    }
    Ok(())
  }

  /// Mesh index of the crossing on `edge`, inserting the vertex on first use.
  fn edge_index(
    &mut self,
    cube: &Cube<V::Voxel>,
    edge: usize,
    threshold: f32,
    scratch: &mut CubeScratch,
  ) -> u32 {
    let crossing = self.edge_crossing(cube, edge, threshold, scratch);
    if let Some(index) = crossing.index {
      return index;
    }

    let index = self.mesh.add_vertex(crossing.position, crossing.normal, crossing.material);
    scratch.crossings[edge] = Some(EdgeCrossing {
      index: Some(index),
      ..crossing
    });
    index
  }

  /// Crossing on `edge`, computed once per cube.
  fn edge_crossing(
    &self,
    cube: &Cube<V::Voxel>,
    edge: usize,
    threshold: f32,
    scratch: &mut CubeScratch,
  ) -> EdgeCrossing {
    if let Some(cached) = scratch.crossings[edge] {
      return cached;
    }

    let [c0, c1] = EDGE_CORNERS[edge].map(usize::from);
    let (d0, d1) = (cube.densities[c0], cube.densities[c1]);

    let t = vertex_calc::interpolation_factor(d0, d1, threshold);
    let position = vertex_calc::crossing_position(cube.corners[c0], cube.corners[c1], t);

    let g0 = self.corner_gradient(cube, c0, scratch);
    let g1 = self.corner_gradient(cube, c1, scratch);
    let solid0 = cube.is_solid(c0);
    let normal = gradient::surface_normal(g0, g1, t, EDGE_AXIS[edge], solid0);

    let material = if !solid0 && cube.is_solid(c1) {
      cube.voxels[c1].material()
    } else {
      cube.voxels[c0].material()
    };

    let crossing = EdgeCrossing {
      position,
      normal,
      material,
      index: None,
    };
    scratch.crossings[edge] = Some(crossing);
    crossing
  }

  fn corner_gradient(&self, cube: &Cube<V::Voxel>, corner: usize, scratch: &mut CubeScratch) -> Vec3A {
    *scratch.gradients[corner]
      .get_or_insert_with(|| gradient::central_difference(self.volume, cube.corners[corner]))
  }
}

/// Extract the iso-surface of `region` with the voxel type's default
/// threshold.
pub fn extract_marching_cubes_mesh<V: Volume + ?Sized>(volume: &V, region: Region) -> Result<SurfaceMesh> {
  extract_marching_cubes_mesh_with(volume, region, ExtractorConfig::default())
}

/// Extract the iso-surface of `region` with an explicit configuration.
pub fn extract_marching_cubes_mesh_with<V: Volume + ?Sized>(
  volume: &V,
  region: Region,
  config: ExtractorConfig,
) -> Result<SurfaceMesh> {
  let mut mesh = SurfaceMesh::new();
  MarchingCubesExtractor::new(volume, region, &mut mesh)
    .with_config(config)
    .execute()?;
  Ok(mesh)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
