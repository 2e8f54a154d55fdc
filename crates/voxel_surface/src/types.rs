//! Core data types shared by the mesh and the extractor.

use crate::vector::Vector3DFloat;
use crate::voxel::Voxel;

/// Output vertex with all mesh attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
  /// Vertex position in volume coordinates.
  pub position: Vector3DFloat,

  /// Surface normal (unit vector), pointing from solid toward empty space.
  pub normal: Vector3DFloat,

  /// Material tag of the solid corner the vertex was interpolated from.
  pub material: u16,
}

impl Default for Vertex {
  fn default() -> Self {
    Self {
      position: Vector3DFloat::ZERO,
      normal: Vector3DFloat::new(0.0, 1.0, 0.0),
      material: 0,
    }
  }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  /// Create AABB from min/max corners.
  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Expand AABB to include another box.
  pub fn union(&mut self, other: &MinMaxAABB) {
    if other.is_valid() {
      self.encapsulate(other.min);
      self.encapsulate(other.max);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Default number of cube layers per shard in parallel extraction.
pub const DEFAULT_SLAB_THICKNESS: usize = 16;

/// Configuration for surface extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractorConfig {
  /// Iso-threshold. Corners with density strictly above it are solid.
  /// `None` uses the voxel type's [`Voxel::default_threshold`].
  pub threshold: Option<f32>,

  /// Cube layers (along X) handled by each parallel shard.
  pub slab_thickness: usize,
}

impl Default for ExtractorConfig {
  fn default() -> Self {
    Self {
      threshold: None,
      slab_thickness: DEFAULT_SLAB_THICKNESS,
    }
  }
}

impl ExtractorConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_threshold(mut self, threshold: f32) -> Self {
    self.threshold = Some(threshold);
    self
  }

  /// Shard thickness for parallel extraction; clamped to at least one layer.
  pub fn with_slab_thickness(mut self, thickness: usize) -> Self {
    self.slab_thickness = thickness.max(1);
    self
  }

  /// Effective threshold for voxel type `V`.
  #[inline]
  pub fn threshold_for<V: Voxel>(&self) -> f32 {
    self.threshold.unwrap_or_else(V::default_threshold)
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
