//! Voxel storage.
//!
//! [`Volume`] is the read capability the extractor consumes. Reads never
//! fail: any coordinate outside the stored range yields the volume's border
//! value. The extractor samples one voxel beyond the cubes it walks (for
//! central-difference normals), and this contract is what lets it do so
//! without bounds checks on the hot path.
//!
//! # Memory Layout
//!
//! ```text
//! RawVolume layout (row-major, Z innermost), region-local coordinates:
//!
//! index = (x * height + y) * depth + z
//!
//! Optimal access: Sequential Z, then Y, then X
//! ```

use crate::error::{Result, VoxelError};
use crate::region::Region;
use crate::vector::Vector3DInt32;
use crate::voxel::Voxel;

/// Read access to a voxel field.
pub trait Volume: Sync {
  type Voxel: Voxel;

  /// Voxel at `point`, or the border value if `point` lies outside the
  /// stored range. Never fails.
  fn voxel_at(&self, point: Vector3DInt32) -> Self::Voxel;

  /// Region covered by stored voxels.
  fn enclosing_region(&self) -> Region;

  #[inline]
  fn voxel_at_xyz(&self, x: i32, y: i32, z: i32) -> Self::Voxel {
    self.voxel_at(Vector3DInt32::new(x, y, z))
  }
}

impl<T: Volume + ?Sized> Volume for &T {
  type Voxel = T::Voxel;

  #[inline]
  fn voxel_at(&self, point: Vector3DInt32) -> Self::Voxel {
    (**self).voxel_at(point)
  }

  fn enclosing_region(&self) -> Region {
    (**self).enclosing_region()
  }
}

/// Dense, flat-array volume sized exactly to its region.
#[derive(Clone, Debug)]
pub struct RawVolume<V: Voxel> {
  region: Region,
  data: Vec<V>,
  border: V,
}

impl<V: Voxel> RawVolume<V> {
  /// Allocate a volume over `region` with every voxel (and the border) set to
  /// `V::default()`, i.e. empty.
  pub fn new(region: Region) -> Self {
    Self::with_border_value(region, V::default())
  }

  /// Allocate a volume whose voxels and border all start as `border`.
  pub fn with_border_value(region: Region, border: V) -> Self {
    Self {
      region,
      data: vec![border; region.voxel_count()],
      border,
    }
  }

  #[inline]
  pub fn region(&self) -> Region {
    self.region
  }

  /// Value returned for reads outside the region.
  #[inline]
  pub fn border_value(&self) -> V {
    self.border
  }

  /// Change the value returned for reads outside the region. Stored voxels
  /// are untouched.
  pub fn set_border_value(&mut self, border: V) {
    self.border = border;
  }

  /// Overwrite the voxel at `point`.
  ///
  /// Fails with [`VoxelError::OutOfBounds`] outside the region; writes are
  /// never clamped.
  pub fn set_voxel_at(&mut self, point: Vector3DInt32, voxel: V) -> Result<()> {
    match self.index_of(point) {
      Some(idx) => {
        self.data[idx] = voxel;
        Ok(())
      }
      None => Err(VoxelError::OutOfBounds {
        point,
        region: self.region,
      }),
    }
  }

  pub fn set_voxel_at_xyz(&mut self, x: i32, y: i32, z: i32, voxel: V) -> Result<()> {
    self.set_voxel_at(Vector3DInt32::new(x, y, z), voxel)
  }

  /// Set every stored voxel to `voxel`.
  pub fn fill(&mut self, voxel: V) {
    self.data.fill(voxel);
  }

  /// Set every voxel from a function of its position.
  pub fn fill_with(&mut self, mut f: impl FnMut(Vector3DInt32) -> V) {
    let lower = self.region.lower();
    let upper = self.region.upper();
    let mut idx = 0;
    for x in lower.x()..=upper.x() {
      for y in lower.y()..=upper.y() {
        for z in lower.z()..=upper.z() {
          self.data[idx] = f(Vector3DInt32::new(x, y, z));
          idx += 1;
        }
      }
    }
  }

  /// Raw storage in layout order.
  pub fn as_slice(&self) -> &[V] {
    &self.data
  }

  /// Linear index of `point`, or `None` if it lies outside the region.
  #[inline(always)]
  fn index_of(&self, point: Vector3DInt32) -> Option<usize> {
    if !self.region.contains(point) {
      return None;
    }
    let local = point - self.region.lower();
    let height = self.region.height() as usize;
    let depth = self.region.depth() as usize;
    Some((local.x() as usize * height + local.y() as usize) * depth + local.z() as usize)
  }
}

impl<V: Voxel> Volume for RawVolume<V> {
  type Voxel = V;

  #[inline(always)]
  fn voxel_at(&self, point: Vector3DInt32) -> V {
    match self.index_of(point) {
      Some(idx) => self.data[idx],
      None => self.border,
    }
  }

  fn enclosing_region(&self) -> Region {
    self.region
  }
}

#[cfg(test)]
#[path = "volume_test.rs"]
mod volume_test;
