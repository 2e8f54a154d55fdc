//! Error taxonomy for region construction, volume writes, mesh building and
//! extraction.
//!
//! Volume reads never fail (see [`crate::volume::Volume::voxel_at`]), so
//! nothing on the extractor's per-cube hot path returns an error except the
//! mesh index check, which only trips on an extractor bug.

use thiserror::Error;

use crate::region::Region;
use crate::vector::Vector3DInt32;

/// Errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoxelError {
  /// A region was constructed with `lower > upper` on some axis, or with
  /// more voxels on an axis than `i32` can count.
  #[error("invalid region: {lower} .. {upper} is inverted or too large")]
  InvalidRegion {
    lower: Vector3DInt32,
    upper: Vector3DInt32,
  },

  /// A voxel write targeted a point outside the volume's backing region.
  #[error("point {point} is outside volume region {region}")]
  OutOfBounds { point: Vector3DInt32, region: Region },

  /// A triangle referenced a vertex index that was never handed out.
  #[error("triangle index {index} is out of range ({vertex_count} vertices)")]
  InvalidIndex { index: u32, vertex_count: u32 },

  /// `execute()` was called on an extractor that already ran.
  #[error("extractor has already been executed")]
  AlreadyExecuted,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, VoxelError>;
