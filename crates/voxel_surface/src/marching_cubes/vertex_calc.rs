//! Edge crossing interpolation.

use crate::vector::{Vector3DFloat, Vector3DInt32};

/// Interpolation factor of the iso-crossing between two corner densities.
///
/// Equal densities (and any non-finite intermediate) resolve to the edge
/// midpoint. The result is clamped to `[0, 1]` so the crossing never leaves
/// the edge.
#[inline]
pub fn interpolation_factor(d0: f32, d1: f32, threshold: f32) -> f32 {
  if d0 == d1 {
    return 0.5;
  }

  let t = (threshold - d0) / (d1 - d0);
  if t.is_nan() {
    0.5
  } else {
    t.clamp(0.0, 1.0)
  }
}

/// Crossing position on the edge `p0 -> p1`, in volume coordinates.
///
/// Components where the corners agree are copied exactly, so the result only
/// depends on `t` along the edge axis.
#[inline]
pub fn crossing_position(p0: Vector3DInt32, p1: Vector3DInt32, t: f32) -> Vector3DFloat {
  let a = p0.as_float();
  let b = p1.as_float();
  a + (b - a) * t
}

#[cfg(test)]
#[path = "vertex_calc_test.rs"]
mod vertex_calc_test;
