//! voxel_surface - Marching Cubes iso-surface extraction over voxel volumes
//!
//! This crate turns a dense 3D scalar field into an indexed triangle mesh.
//! Every unit cube of a region is classified against an iso-threshold and
//! triangulated from a fixed 256-case table; vertices land on cube edges and
//! are shared between neighbouring cubes, so the output is a connected,
//! crack-free surface rather than a triangle soup.
//!
//! # Features
//!
//! - **Marching Cubes**: canonical case table, strict `density > threshold`
//!   classification, clamped edge interpolation
//! - **Gradient Normals**: central-difference density gradient, oriented from
//!   solid toward empty
//! - **Materials**: per-vertex material from the solid corner, hard material
//!   boundaries kept as separate vertices
//! - **Parallel Extraction**: rayon slab sharding with a seam-unifying merge
//! - **Raycasting**: voxel traversal along a segment and first-solid picking
//!
//! # Example
//!
//! ```ignore
//! use voxel_surface::{extract_marching_cubes_mesh, RawVolume, Region};
//!
//! let region = Region::from_coords(0, 0, 0, 31, 31, 31)?;
//! let mut volume = RawVolume::<u8>::new(region);
//! volume.set_voxel_at_xyz(5, 5, 5, 200)?;
//!
//! let mesh = extract_marching_cubes_mesh(&volume, region)?;
//! println!("{} vertices, {} triangles", mesh.no_of_vertices(), mesh.triangle_count());
//! ```
//!
//! Recording statistics across runs is the caller's job:
//!
//! ```ignore
//! use voxel_surface::metrics::ExtractionMetrics;
//! use voxel_surface::{MarchingCubesExtractor, SurfaceMesh};
//!
//! let mut metrics = ExtractionMetrics::new();
//! for chunk in chunks {
//!   let mut mesh = SurfaceMesh::new();
//!   let stats = MarchingCubesExtractor::new(&volume, chunk, &mut mesh).execute()?;
//!   metrics.record(&stats);
//! }
//! println!("avg {:.1}us over {} runs", metrics.avg_extraction_us(), metrics.total_extractions);
//! ```
//!
//! # Cargo Features
//!
//! - `metrics`: enables [`metrics::ExtractionMetrics`] accumulation
//! - `tracing`: spans and events for profilers (Tracy, etc.)

pub mod error;
pub mod region;
pub mod tables;
pub mod types;
pub mod vector;
pub mod volume;
pub mod voxel;

// Re-export commonly used items
pub use error::{Result, VoxelError};
pub use region::Region;
pub use types::{ExtractorConfig, MinMaxAABB, Vertex, DEFAULT_SLAB_THICKNESS};
pub use vector::{Vector3D, Vector3DFloat, Vector3DInt32, Vector3DUint16};
pub use volume::{RawVolume, Volume};
pub use voxel::{MaterialDensityPair44, MaterialDensityPair88, Voxel, DEFAULT_MATERIAL};

// Mesh accumulator
pub mod mesh;
pub use mesh::SurfaceMesh;

// Marching Cubes extractor
pub mod marching_cubes;
pub use marching_cubes::{
  extract_marching_cubes_mesh, extract_marching_cubes_mesh_with, ExtractorState,
  MarchingCubesExtractor,
};

// Slab-parallel extraction
pub mod parallel;
pub use parallel::extract_parallel;

// Voxel raycasting
pub mod raycast;
pub use raycast::{pick_voxel, raycast_with_direction, raycast_with_endpoints, PickResult, RaycastResult};

// Extraction statistics
pub mod metrics;
pub use metrics::ExtractionStats;
