//! Engine-agnostic extraction statistics.
//!
//! Every extraction returns an [`ExtractionStats`]. Accumulating them over
//! many runs goes through [`ExtractionMetrics`], which is feature-gated and
//! runtime-toggled so it costs nothing when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use voxel_surface::metrics::{ExtractionMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let stats = extractor.execute()?;
//! metrics.record(&stats);
//! println!("avg {:.1}us", metrics.avg_extraction_us());
//! ```

#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Counters for a single extraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractionStats {
  /// Unit cubes visited.
  pub cubes_visited: u64,
  /// Cubes whose case index produced at least one triangle.
  pub active_cubes: u64,
  /// New vertices appended to the mesh (deduplicated hits excluded).
  pub vertices_added: u64,
  /// Indices appended to the mesh.
  pub indices_added: u64,
  /// Triangles dropped because their corners collapsed onto one point.
  pub degenerate_triangles: u64,
  /// Wall time of the extraction in microseconds.
  pub elapsed_us: u64,
}

impl ExtractionStats {
  /// Triangles appended to the mesh.
  pub fn triangles_added(&self) -> u64 {
    self.indices_added / 3
  }

  /// Sum counters of two shards. Elapsed time takes the longer shard, since
  /// shards run concurrently.
  pub fn combine(self, other: Self) -> Self {
    Self {
      cubes_visited: self.cubes_visited + other.cubes_visited,
      active_cubes: self.active_cubes + other.active_cubes,
      vertices_added: self.vertices_added + other.vertices_added,
      indices_added: self.indices_added + other.indices_added,
      degenerate_triangles: self.degenerate_triangles + other.degenerate_triangles,
      elapsed_us: self.elapsed_us.max(other.elapsed_us),
    }
  }
}

/// Fixed-size ring of recent extraction times in microseconds.
#[derive(Debug, Clone)]
pub struct TimingWindow {
  samples: Vec<u64>,
  capacity: usize,
  /// Slot the next sample overwrites once the ring is full.
  cursor: usize,
}

impl TimingWindow {
  pub const DEFAULT_CAPACITY: usize = 128;

  pub fn new(capacity: usize) -> Self {
    Self {
      samples: Vec::with_capacity(capacity),
      capacity,
      cursor: 0,
    }
  }

  /// Record a sample, overwriting the oldest once full.
  pub fn push(&mut self, elapsed_us: u64) {
    if self.capacity == 0 {
      return;
    }
    if self.samples.len() < self.capacity {
      self.samples.push(elapsed_us);
    } else {
      self.samples[self.cursor] = elapsed_us;
    }
    self.cursor = (self.cursor + 1) % self.capacity;
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  pub fn clear(&mut self) {
    self.samples.clear();
    self.cursor = 0;
  }

  /// Most recent sample.
  pub fn latest(&self) -> Option<u64> {
    if self.samples.is_empty() {
      return None;
    }
    let newest = (self.cursor + self.samples.len() - 1) % self.samples.len();
    Some(self.samples[newest])
  }

  /// Samples oldest to newest.
  pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
    let split = if self.samples.len() < self.capacity { 0 } else { self.cursor };
    let (newer, older) = self.samples.split_at(split);
    older.iter().chain(newer).copied()
  }

  pub fn total(&self) -> u64 {
    self.samples.iter().sum()
  }

  pub fn average(&self) -> f64 {
    if self.samples.is_empty() {
      0.0
    } else {
      self.total() as f64 / self.samples.len() as f64
    }
  }

  pub fn min_max(&self) -> Option<(u64, u64)> {
    let min = self.samples.iter().min()?;
    let max = self.samples.iter().max()?;
    Some((*min, *max))
  }
}

impl Default for TimingWindow {
  fn default() -> Self {
    Self::new(Self::DEFAULT_CAPACITY)
  }
}

/// Statistics accumulated across many extractions.
#[derive(Debug, Clone, Default)]
pub struct ExtractionMetrics {
  /// Rolling window of extraction times in microseconds.
  pub timings: TimingWindow,
  /// Last extraction time in microseconds.
  pub last_extraction_us: u64,
  /// Extractions recorded this session.
  pub total_extractions: u64,
  /// Running totals across every recorded extraction.
  pub totals: ExtractionStats,
}

impl ExtractionMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record one extraction. No-op unless metrics are enabled.
  pub fn record(&mut self, stats: &ExtractionStats) {
    if !is_enabled() {
      return;
    }

    self.timings.push(stats.elapsed_us);
    self.last_extraction_us = stats.elapsed_us;
    self.total_extractions += 1;

    let elapsed_us = self.totals.elapsed_us + stats.elapsed_us;
    self.totals = self.totals.combine(*stats);
    self.totals.elapsed_us = elapsed_us;
  }

  /// Reset windowed values. Session totals are cumulative and survive.
  pub fn reset(&mut self) {
    self.timings.clear();
    self.last_extraction_us = 0;
  }

  pub fn avg_extraction_us(&self) -> f64 {
    self.timings.average()
  }

  /// Approximate mesh memory produced so far (vertices + indices).
  pub fn mesh_memory_bytes(&self) -> u64 {
    let vertex_size = std::mem::size_of::<crate::types::Vertex>() as u64;
    self.totals.vertices_added * vertex_size + self.totals.indices_added * 4
  }
}
