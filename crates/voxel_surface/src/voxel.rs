//! Voxel sample types.
//!
//! The extractor only needs two things from a voxel: a density to compare
//! against the iso-threshold and a material tag to attach to vertices. Plain
//! numeric types are pure densities with the implicit material `1`; the
//! `MaterialDensityPair` types pack both into one integer.

/// Material assigned to vertices extracted from density-only voxels.
pub const DEFAULT_MATERIAL: u16 = 1;

/// A single sample of the scalar field.
pub trait Voxel: Copy + Default + PartialEq + Send + Sync + 'static {
  /// Density as a float. Values above the threshold are solid.
  fn density(&self) -> f32;

  /// Material tag carried onto extracted vertices.
  fn material(&self) -> u16;

  /// Threshold used when none is configured: the midpoint of the density
  /// range.
  fn default_threshold() -> f32;
}

macro_rules! impl_integer_density {
  ($($t:ty),*) => {
    $(
      impl Voxel for $t {
        #[inline(always)]
        fn density(&self) -> f32 {
          *self as f32
        }

        #[inline(always)]
        fn material(&self) -> u16 {
          DEFAULT_MATERIAL
        }

        fn default_threshold() -> f32 {
          // Integer midpoint, matching the storage type's own arithmetic
          ((<$t>::MIN as i64 + <$t>::MAX as i64) / 2) as f32
        }
      }
    )*
  };
}

impl_integer_density!(u8, i8, u16, i16);

impl Voxel for f32 {
  #[inline(always)]
  fn density(&self) -> f32 {
    *self
  }

  #[inline(always)]
  fn material(&self) -> u16 {
    DEFAULT_MATERIAL
  }

  fn default_threshold() -> f32 {
    0.0
  }
}

macro_rules! material_density_pair {
  ($name:ident, $storage:ty, $material_bits:expr, $density_bits:expr) => {
    #[doc = concat!(
      "Packed voxel with ",
      stringify!($material_bits),
      " material bits and ",
      stringify!($density_bits),
      " density bits."
    )]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct $name($storage);

    impl $name {
      pub const MATERIAL_BITS: u32 = $material_bits;
      pub const DENSITY_BITS: u32 = $density_bits;
      const DENSITY_MASK: $storage = (1 << $density_bits) - 1;
      const MATERIAL_MASK: $storage = (1 << $material_bits) - 1;

      /// Pack a material and a density; both are masked to their bit width.
      pub fn new(material: $storage, density: $storage) -> Self {
        Self(((material & Self::MATERIAL_MASK) << $density_bits) | (density & Self::DENSITY_MASK))
      }

      #[inline]
      pub fn get_density(&self) -> $storage {
        self.0 & Self::DENSITY_MASK
      }

      #[inline]
      pub fn get_material(&self) -> $storage {
        (self.0 >> $density_bits) & Self::MATERIAL_MASK
      }

      pub fn with_density(self, density: $storage) -> Self {
        Self::new(self.get_material(), density)
      }

      pub fn with_material(self, material: $storage) -> Self {
        Self::new(material, self.get_density())
      }

      pub const fn max_density() -> $storage {
        (1 << $density_bits) - 1
      }

      pub const fn min_density() -> $storage {
        0
      }
    }

    impl Voxel for $name {
      #[inline(always)]
      fn density(&self) -> f32 {
        self.get_density() as f32
      }

      #[inline(always)]
      fn material(&self) -> u16 {
        self.get_material() as u16
      }

      fn default_threshold() -> f32 {
        ((Self::min_density() + Self::max_density()) / 2) as f32
      }
    }
  };
}

material_density_pair!(MaterialDensityPair44, u8, 4, 4);
material_density_pair!(MaterialDensityPair88, u16, 8, 8);
