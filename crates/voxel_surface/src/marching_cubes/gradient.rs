//! Surface normals from the density gradient.
//!
//! The gradient is estimated by central differences on the voxel lattice,
//! which reads one voxel beyond the cube on every axis. Density grows toward
//! solid, so the normal is the negated gradient.

use glam::Vec3A;

use crate::vector::{Vector3DFloat, Vector3DInt32};
use crate::volume::Volume;
use crate::voxel::Voxel;

/// Central-difference density gradient at a lattice point.
#[inline]
pub fn central_difference<V: Volume + ?Sized>(volume: &V, p: Vector3DInt32) -> Vec3A {
  let sample = |axis: usize, step: i32| {
    let q = p.with_axis(axis, p.axis(axis).saturating_add(step));
    volume.voxel_at(q).density()
  };

  Vec3A::new(
    sample(0, 1) - sample(0, -1),
    sample(1, 1) - sample(1, -1),
    sample(2, 1) - sample(2, -1),
  ) * 0.5
}

/// Normal at an edge crossing.
///
/// Lerps the corner gradients by `t` and negates the result. When the
/// gradient vanishes the edge axis is used, oriented from the solid corner
/// toward the empty one.
#[inline]
pub fn surface_normal(g0: Vec3A, g1: Vec3A, t: f32, axis: usize, corner0_solid: bool) -> Vector3DFloat {
  let n = -g0.lerp(g1, t);
  let len_sq = n.length_squared();

  if len_sq.is_finite() && len_sq > 1e-12 {
    return (n * len_sq.sqrt().recip()).into();
  }

  // Edges run from the lower corner to the higher one
  let sign = if corner0_solid { 1.0 } else { -1.0 };
  Vector3DFloat::ZERO.with_axis(axis, sign)
}

#[cfg(test)]
#[path = "gradient_test.rs"]
mod gradient_test;
