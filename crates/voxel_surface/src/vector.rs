//! Generic three component vector used for voxel coordinates and mesh data.
//!
//! `Vector3D<T>` is a plain `Copy` value type; every operator returns a new
//! vector. Equality is exact for every scalar kind, floats included. Callers
//! that need a tolerance compare explicitly.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

use glam::Vec3A;

/// Scalar kinds a [`Vector3D`] can hold.
pub trait Scalar: Copy + PartialEq + fmt::Debug + Default + Send + Sync + 'static {
  /// Feed this component into `state` so that equal values hash equally.
  fn hash_component<H: Hasher>(&self, state: &mut H);
}

macro_rules! impl_integer_scalar {
  ($($t:ty),*) => {
    $(
      impl Scalar for $t {
        #[inline]
        fn hash_component<H: Hasher>(&self, state: &mut H) {
          self.hash(state);
        }
      }

      impl Eq for Vector3D<$t> {}
    )*
  };
}

impl_integer_scalar!(i8, u8, i16, u16, i32, u32, i64, u64);

impl Scalar for f32 {
  #[inline]
  fn hash_component<H: Hasher>(&self, state: &mut H) {
    // -0.0 + 0.0 == +0.0, keeping the hash consistent with `==`.
    (*self + 0.0).to_bits().hash(state);
  }
}

impl Scalar for f64 {
  #[inline]
  fn hash_component<H: Hasher>(&self, state: &mut H) {
    (*self + 0.0).to_bits().hash(state);
  }
}

/// Three component vector over a single scalar kind.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct Vector3D<T: Scalar> {
  x: T,
  y: T,
  z: T,
}

/// Integer vector for voxel positions.
pub type Vector3DInt32 = Vector3D<i32>;
/// Compact unsigned vector.
pub type Vector3DUint16 = Vector3D<u16>;
/// Float vector for mesh positions and normals.
pub type Vector3DFloat = Vector3D<f32>;

impl<T: Scalar> Vector3D<T> {
  #[inline]
  pub const fn new(x: T, y: T, z: T) -> Self {
    Self { x, y, z }
  }

  #[inline]
  pub const fn splat(v: T) -> Self {
    Self { x: v, y: v, z: v }
  }

  #[inline]
  pub fn x(&self) -> T {
    self.x
  }

  #[inline]
  pub fn y(&self) -> T {
    self.y
  }

  #[inline]
  pub fn z(&self) -> T {
    self.z
  }

  #[inline]
  pub fn to_array(self) -> [T; 3] {
    [self.x, self.y, self.z]
  }

  /// Component by axis index (0 = X, 1 = Y, 2 = Z).
  ///
  /// # Panics
  /// Panics if `axis > 2`.
  #[inline]
  pub fn axis(&self, axis: usize) -> T {
    match axis {
      0 => self.x,
      1 => self.y,
      2 => self.z,
      _ => panic!("axis index {axis} out of range"),
    }
  }

  /// Copy with one component replaced.
  #[inline]
  pub fn with_axis(self, axis: usize, value: T) -> Self {
    let mut arr = self.to_array();
    arr[axis] = value;
    Self::from(arr)
  }
}

impl<T: Scalar> From<[T; 3]> for Vector3D<T> {
  #[inline]
  fn from([x, y, z]: [T; 3]) -> Self {
    Self::new(x, y, z)
  }
}

impl<T: Scalar> From<Vector3D<T>> for [T; 3] {
  #[inline]
  fn from(v: Vector3D<T>) -> Self {
    v.to_array()
  }
}

impl<T: Scalar> Hash for Vector3D<T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.x.hash_component(state);
    self.y.hash_component(state);
    self.z.hash_component(state);
  }
}

impl<T: Scalar> fmt::Debug for Vector3D<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({:?}, {:?}, {:?})", self.x, self.y, self.z)
  }
}

impl<T: Scalar + fmt::Display> fmt::Display for Vector3D<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {}, {})", self.x, self.y, self.z)
  }
}

impl<T: Scalar + Add<Output = T>> Add for Vector3D<T> {
  type Output = Self;

  #[inline]
  fn add(self, rhs: Self) -> Self {
    Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
  }
}

impl<T: Scalar + Sub<Output = T>> Sub for Vector3D<T> {
  type Output = Self;

  #[inline]
  fn sub(self, rhs: Self) -> Self {
    Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
  }
}

impl<T: Scalar + Mul<Output = T>> Mul<T> for Vector3D<T> {
  type Output = Self;

  #[inline]
  fn mul(self, rhs: T) -> Self {
    Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
  }
}

impl<T: Scalar + Div<Output = T>> Div<T> for Vector3D<T> {
  type Output = Self;

  #[inline]
  fn div(self, rhs: T) -> Self {
    Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
  }
}

impl<T: Scalar + Neg<Output = T>> Neg for Vector3D<T> {
  type Output = Self;

  #[inline]
  fn neg(self) -> Self {
    Self::new(-self.x, -self.y, -self.z)
  }
}

impl Vector3DInt32 {
  /// Lossless-for-small-coordinates conversion to float.
  #[inline]
  pub fn as_float(self) -> Vector3DFloat {
    Vector3DFloat::new(self.x as f32, self.y as f32, self.z as f32)
  }

  /// Component-wise minimum.
  #[inline]
  pub fn min(self, other: Self) -> Self {
    Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
  }

  /// Component-wise maximum.
  #[inline]
  pub fn max(self, other: Self) -> Self {
    Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
  }
}

impl Vector3DFloat {
  pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

  #[inline]
  pub fn dot(self, rhs: Self) -> f32 {
    self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
  }

  #[inline]
  pub fn cross(self, rhs: Self) -> Self {
    Self::new(
      self.y * rhs.z - self.z * rhs.y,
      self.z * rhs.x - self.x * rhs.z,
      self.x * rhs.y - self.y * rhs.x,
    )
  }

  #[inline]
  pub fn length_squared(self) -> f32 {
    self.dot(self)
  }

  #[inline]
  pub fn length(self) -> f32 {
    self.length_squared().sqrt()
  }

  /// Unit vector in the same direction, or `None` if the length is too small
  /// to normalise reliably.
  #[inline]
  pub fn normalized(self) -> Option<Self> {
    let len_sq = self.length_squared();
    if len_sq < 1e-12 || !len_sq.is_finite() {
      return None;
    }
    Some(self * len_sq.sqrt().recip())
  }

  /// Linear interpolation `self + t * (rhs - self)`.
  #[inline]
  pub fn lerp(self, rhs: Self, t: f32) -> Self {
    self + (rhs - self) * t
  }
}

impl From<Vector3DFloat> for Vec3A {
  #[inline]
  fn from(v: Vector3DFloat) -> Self {
    Vec3A::new(v.x, v.y, v.z)
  }
}

impl From<Vec3A> for Vector3DFloat {
  #[inline]
  fn from(v: Vec3A) -> Self {
    Vector3DFloat::new(v.x, v.y, v.z)
  }
}

#[cfg(test)]
#[path = "vector_test.rs"]
mod vector_test;
