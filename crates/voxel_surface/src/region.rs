//! Axis-aligned integer box of voxels.

use std::fmt;

use crate::error::{Result, VoxelError};
use crate::vector::{Vector3DFloat, Vector3DInt32};

/// Inclusive integer bounding box.
///
/// A region `(0,0,0)-(31,31,31)` holds 32³ voxels and 31³ cells (unit cubes
/// whose eight corners all lie inside the region). Regions are immutable;
/// the resizing helpers return new values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
  lower: Vector3DInt32,
  upper: Vector3DInt32,
}

impl Region {
  /// Create a region from its lower and upper corners (both inclusive).
  ///
  /// Fails with [`VoxelError::InvalidRegion`] if `lower` exceeds `upper` on
  /// any axis, or if an axis holds more than `i32::MAX` voxels.
  pub fn new(lower: Vector3DInt32, upper: Vector3DInt32) -> Result<Self> {
    for axis in 0..3 {
      let span = i64::from(upper.axis(axis)) - i64::from(lower.axis(axis));
      if !(0..i64::from(i32::MAX)).contains(&span) {
        return Err(VoxelError::InvalidRegion { lower, upper });
      }
    }
    Ok(Self { lower, upper })
  }

  /// Region from corners computed in wide arithmetic. Corners outside the
  /// `i32` range are reported clamped.
  fn from_wide(lower: [i64; 3], upper: [i64; 3]) -> Result<Self> {
    let narrow = |v: [i64; 3]| v.map(|c| c.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32);
    let (lower_narrow, upper_narrow) = (narrow(lower), narrow(upper));
    if lower_narrow.map(i64::from) != lower || upper_narrow.map(i64::from) != upper {
      return Err(VoxelError::InvalidRegion {
        lower: lower_narrow.into(),
        upper: upper_narrow.into(),
      });
    }
    Self::new(lower_narrow.into(), upper_narrow.into())
  }

  pub fn from_coords(
    lower_x: i32,
    lower_y: i32,
    lower_z: i32,
    upper_x: i32,
    upper_y: i32,
    upper_z: i32,
  ) -> Result<Self> {
    Self::new(
      Vector3DInt32::new(lower_x, lower_y, lower_z),
      Vector3DInt32::new(upper_x, upper_y, upper_z),
    )
  }

  /// Single-voxel region.
  pub fn from_point(point: Vector3DInt32) -> Self {
    Self {
      lower: point,
      upper: point,
    }
  }

  #[inline]
  pub fn lower(&self) -> Vector3DInt32 {
    self.lower
  }

  #[inline]
  pub fn upper(&self) -> Vector3DInt32 {
    self.upper
  }

  /// Voxel count along X (`upper.x - lower.x + 1`). Never overflows: the
  /// constructor caps each axis at `i32::MAX` voxels.
  #[inline]
  pub fn width(&self) -> i32 {
    self.upper.x() - self.lower.x() + 1
  }

  #[inline]
  pub fn height(&self) -> i32 {
    self.upper.y() - self.lower.y() + 1
  }

  #[inline]
  pub fn depth(&self) -> i32 {
    self.upper.z() - self.lower.z() + 1
  }

  #[inline]
  pub fn dimensions_in_voxels(&self) -> Vector3DInt32 {
    Vector3DInt32::new(self.width(), self.height(), self.depth())
  }

  /// Number of unit cubes per axis (one fewer than voxels).
  #[inline]
  pub fn dimensions_in_cells(&self) -> Vector3DInt32 {
    self.dimensions_in_voxels() - Vector3DInt32::splat(1)
  }

  /// Total voxels in the region.
  pub fn voxel_count(&self) -> usize {
    self.width() as usize * self.height() as usize * self.depth() as usize
  }

  /// Integer centre, rounded toward zero.
  pub fn centre(&self) -> Vector3DInt32 {
    let mid = |axis: usize| ((i64::from(self.lower.axis(axis)) + i64::from(self.upper.axis(axis))) / 2) as i32;
    Vector3DInt32::new(mid(0), mid(1), mid(2))
  }

  /// Inclusive containment test.
  #[inline]
  pub fn contains(&self, point: Vector3DInt32) -> bool {
    self.contains_with_boundary(point, 0)
  }

  /// Containment test requiring the point to sit at least `boundary` voxels
  /// inside every face.
  #[inline]
  pub fn contains_with_boundary(&self, point: Vector3DInt32, boundary: i32) -> bool {
    let boundary = i64::from(boundary);
    (0..3).all(|axis| {
      let p = i64::from(point.axis(axis));
      p >= i64::from(self.lower.axis(axis)) + boundary && p <= i64::from(self.upper.axis(axis)) - boundary
    })
  }

  /// Inclusive containment test for a float position.
  pub fn contains_float(&self, point: Vector3DFloat) -> bool {
    let lower = self.lower.as_float();
    let upper = self.upper.as_float();
    point.x() >= lower.x()
      && point.x() <= upper.x()
      && point.y() >= lower.y()
      && point.y() <= upper.y()
      && point.z() >= lower.z()
      && point.z() <= upper.z()
  }

  /// True if `other` lies entirely inside this region.
  pub fn contains_region(&self, other: &Region) -> bool {
    self.contains(other.lower) && self.contains(other.upper)
  }

  /// True if the regions share at least one voxel.
  pub fn intersects(&self, other: &Region) -> bool {
    self.lower.x() <= other.upper.x()
      && self.upper.x() >= other.lower.x()
      && self.lower.y() <= other.upper.y()
      && self.upper.y() >= other.lower.y()
      && self.lower.z() <= other.upper.z()
      && self.upper.z() >= other.lower.z()
  }

  /// Overlap of the two regions, `None` if they are disjoint.
  pub fn intersection(&self, other: &Region) -> Option<Region> {
    Region::new(self.lower.max(other.lower), self.upper.min(other.upper)).ok()
  }

  /// Smallest region containing both this region and `point`.
  ///
  /// Fails with [`VoxelError::InvalidRegion`] if the result is too large.
  pub fn accumulated(&self, point: Vector3DInt32) -> Result<Region> {
    Region::new(self.lower.min(point), self.upper.max(point))
  }

  /// Region enlarged by `amount` voxels on every face.
  ///
  /// Fails with [`VoxelError::InvalidRegion`] if a corner leaves the `i32`
  /// range.
  pub fn grown(&self, amount: i32) -> Result<Region> {
    self.resized(i64::from(amount))
  }

  /// Region reduced by `amount` voxels on every face.
  ///
  /// Fails with [`VoxelError::InvalidRegion`] if the region would invert.
  pub fn shrunk(&self, amount: i32) -> Result<Region> {
    self.resized(-i64::from(amount))
  }

  fn resized(&self, amount: i64) -> Result<Region> {
    let widen = |v: Vector3DInt32, delta: i64| v.to_array().map(|c| i64::from(c) + delta);
    Region::from_wide(widen(self.lower, -amount), widen(self.upper, amount))
  }

  /// Region translated by `offset`.
  ///
  /// Fails with [`VoxelError::InvalidRegion`] if a corner leaves the `i32`
  /// range.
  pub fn shifted(&self, offset: Vector3DInt32) -> Result<Region> {
    let shift = |v: Vector3DInt32| {
      let [x, y, z] = v.to_array();
      [
        i64::from(x) + i64::from(offset.x()),
        i64::from(y) + i64::from(offset.y()),
        i64::from(z) + i64::from(offset.z()),
      ]
    };
    Region::from_wide(shift(self.lower), shift(self.upper))
  }

  /// Copy with `lower` and `upper` replaced on a single axis.
  pub(crate) fn with_axis_range(&self, axis: usize, lower: i32, upper: i32) -> Result<Region> {
    Region::new(
      self.lower.with_axis(axis, lower),
      self.upper.with_axis(axis, upper),
    )
  }
}

impl fmt::Display for Region {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{} .. {}]", self.lower, self.upper)
  }
}

#[cfg(test)]
#[path = "region_test.rs"]
mod region_test;
