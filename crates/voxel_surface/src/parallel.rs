//! Slab-sharded parallel extraction.
//!
//! The cube lattice is cut into slabs along X. Each slab runs its own
//! extractor into its own mesh on rayon's pool; the shards are then merged in
//! slab order through the deduplicating insert.
//!
//! ```text
//!   region x:  lower ─────────────────────────────────────── upper
//!   slab 0:    [lower ......... s1]
//!   slab 1:                    [s1 ......... s2]
//!   slab 2:                                 [s2 ........... upper]
//!                               ▲            ▲
//!                       shared voxel layers (seams)
//! ```
//!
//! Adjacent slabs share one voxel layer but no cube. Seam vertices are
//! computed from identical inputs on both sides, so the merge unifies them
//! and the merged mesh equals the serial one.

use rayon::prelude::*;
use web_time::Instant;

use crate::error::Result;
use crate::marching_cubes::MarchingCubesExtractor;
use crate::mesh::SurfaceMesh;
use crate::metrics::ExtractionStats;
use crate::region::Region;
use crate::types::ExtractorConfig;
use crate::volume::Volume;

/// Split `region` into X slabs of at most `thickness` cube layers.
///
/// Consecutive slabs overlap by exactly one voxel layer. A region with no
/// cubes along X yields itself.
pub fn slab_regions(region: &Region, thickness: usize) -> Result<Vec<Region>> {
  let lower = region.lower().x();
  let upper = region.upper().x();
  let step = i32::try_from(thickness.max(1)).unwrap_or(i32::MAX);

  if lower == upper {
    return Ok(vec![*region]);
  }

  let mut slabs = Vec::new();
  let mut start = lower;
  while start < upper {
    let end = start.saturating_add(step).min(upper);
    slabs.push(region.with_axis_range(0, start, end)?);
    start = end;
  }
  Ok(slabs)
}

/// Extract `region` on rayon's pool. Produces the same mesh as the serial
/// extractor.
pub fn extract_parallel<V: Volume + ?Sized>(
  volume: &V,
  region: Region,
  config: ExtractorConfig,
) -> Result<SurfaceMesh> {
  extract_parallel_with_stats(volume, region, config).map(|(mesh, _)| mesh)
}

/// [`extract_parallel`], also returning the combined shard statistics.
///
/// `vertices_added` and `indices_added` describe the merged mesh; elapsed
/// time covers sharding and merging.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "parallel::extract", fields(region = %region)))]
pub fn extract_parallel_with_stats<V: Volume + ?Sized>(
  volume: &V,
  region: Region,
  config: ExtractorConfig,
) -> Result<(SurfaceMesh, ExtractionStats)> {
  let start = Instant::now();
  let slabs = slab_regions(&region, config.slab_thickness)?;

  let shards: Vec<(SurfaceMesh, ExtractionStats)> = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("extract_slabs", slabs = slabs.len()).entered();
    slabs
      .par_iter()
      .map(|slab| {
        let mut mesh = SurfaceMesh::new();
        let stats = MarchingCubesExtractor::new(volume, *slab, &mut mesh)
          .with_config(config.clone())
          .execute()?;
        Ok((mesh, stats))
      })
      .collect::<Result<_>>()?
  };

  let mut shards = shards.into_iter();
  let (mut mesh, mut stats) = shards.next().unwrap_or_default();
  {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("merge_slabs").entered();
    for (shard, shard_stats) in shards {
      mesh.merge(&shard)?;
      stats = stats.combine(shard_stats);
    }
  }

  stats.vertices_added = mesh.no_of_vertices() as u64;
  stats.indices_added = mesh.no_of_indices() as u64;
  stats.elapsed_us = start.elapsed().as_micros() as u64;

  #[cfg(feature = "tracing")]
  tracing::debug!(
    cubes = stats.cubes_visited,
    vertices = stats.vertices_added,
    triangles = stats.triangles_added(),
    elapsed_us = stats.elapsed_us,
    "parallel extraction finished"
  );

  Ok((mesh, stats))
}

#[cfg(test)]
#[path = "parallel_test.rs"]
mod parallel_test;
