//! Voxel raycasting.
//!
//! A ray is a segment through the lattice. The traversal visits every voxel
//! the segment passes through, in order from the start point, and hands each
//! one to a callback that decides whether to continue. Voxel `(i, j, k)`
//! covers the unit box centred on that lattice point.
//!
//! ```text
//!   start ●──────┬──────┬──────┬──────● end
//!         │ v0   │ v1   │ v2   │ v3   │
//!         └──────┴──────┴──────┴──────┘
//!   callback(v0) -> true, callback(v1) -> true, callback(v2) -> false
//!   => Interrupted { position: v2 }
//! ```
//!
//! The length of the direction in [`raycast_with_direction`] is the length
//! of the ray. A unit direction only reaches the neighbouring voxel.

use crate::vector::{Vector3DFloat, Vector3DInt32};
use crate::volume::Volume;
use crate::voxel::Voxel;

/// How a raycast ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaycastResult {
  /// The ray reached its end point with every callback returning `true`.
  Completed,
  /// The callback returned `false` for the voxel at `position`.
  Interrupted { position: Vector3DInt32 },
}

/// First solid voxel found by [`pick_voxel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickResult {
  /// Voxel whose density exceeds the threshold.
  pub hit: Vector3DInt32,
  /// Voxel visited just before `hit`, `None` when the ray starts inside a
  /// solid voxel. Useful for placing a voxel against the hit face.
  pub previous: Option<Vector3DInt32>,
}

/// Per-axis stepping state of the traversal.
struct AxisWalk {
  voxel: i32,
  end: i32,
  step: i32,
  /// Ray parameter at which the next boundary on this axis is crossed.
  t_next: f32,
  /// Ray parameter span of one voxel on this axis.
  t_delta: f32,
}

impl AxisWalk {
  fn new(start: f32, end: f32) -> Self {
    // Shift so voxel centres sit on integers
    let (from, to) = (start + 0.5, end + 0.5);
    let voxel = from.floor() as i32;
    let end_voxel = to.floor() as i32;

    if from == to {
      return Self {
        voxel,
        end: end_voxel,
        step: 0,
        t_next: f32::INFINITY,
        t_delta: f32::INFINITY,
      };
    }

    let t_delta = 1.0 / (to - from).abs();
    let lower = from.floor();
    let (step, distance) = if to > from {
      (1, lower + 1.0 - from)
    } else {
      (-1, from - lower)
    };
    Self {
      voxel,
      end: end_voxel,
      step,
      t_next: distance * t_delta,
      t_delta,
    }
  }

  /// Move to the next voxel on this axis. Returns false at the end voxel.
  #[inline]
  fn advance(&mut self) -> bool {
    if self.voxel == self.end {
      return false;
    }
    self.voxel += self.step;
    self.t_next += self.t_delta;
    true
  }
}

/// Walk the voxels on the segment from `start` to `end`.
///
/// `callback` receives each voxel position and value in traversal order and
/// returns `false` to stop. Positions outside the volume yield its border
/// value, as every [`Volume`] read does.
///
/// # Example
///
/// ```ignore
/// let mut visited = Vec::new();
/// let result = raycast_with_endpoints(&volume, start, end, |p, _| {
///   visited.push(p);
///   true
/// });
/// assert_eq!(result, RaycastResult::Completed);
/// ```
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "raycast"))]
pub fn raycast_with_endpoints<V, F>(
  volume: &V,
  start: Vector3DFloat,
  end: Vector3DFloat,
  mut callback: F,
) -> RaycastResult
where
  V: Volume + ?Sized,
  F: FnMut(Vector3DInt32, V::Voxel) -> bool,
{
  let mut axes = [
    AxisWalk::new(start.x(), end.x()),
    AxisWalk::new(start.y(), end.y()),
    AxisWalk::new(start.z(), end.z()),
  ];

  loop {
    let position = Vector3DInt32::new(axes[0].voxel, axes[1].voxel, axes[2].voxel);
    if !callback(position, volume.voxel_at(position)) {
      return RaycastResult::Interrupted { position };
    }

    // Ties step X before Y before Z, visiting the extra voxel at a corner
    let axis = if axes[0].t_next <= axes[1].t_next && axes[0].t_next <= axes[2].t_next {
      0
    } else if axes[1].t_next <= axes[2].t_next {
      1
    } else {
      2
    };
    if !axes[axis].advance() {
      return RaycastResult::Completed;
    }
  }
}

/// Walk the voxels on the segment from `start` to `start + direction`.
pub fn raycast_with_direction<V, F>(
  volume: &V,
  start: Vector3DFloat,
  direction: Vector3DFloat,
  callback: F,
) -> RaycastResult
where
  V: Volume + ?Sized,
  F: FnMut(Vector3DInt32, V::Voxel) -> bool,
{
  raycast_with_endpoints(volume, start, start + direction, callback)
}

/// First voxel along the ray whose density is above `threshold`.
///
/// Uses the same strict comparison as surface extraction, so a voxel exactly
/// at the threshold is passed through.
pub fn pick_voxel<V: Volume + ?Sized>(
  volume: &V,
  start: Vector3DFloat,
  direction: Vector3DFloat,
  threshold: f32,
) -> Option<PickResult> {
  let mut previous = None;
  let result = raycast_with_direction(volume, start, direction, |position, voxel| {
    if voxel.density() > threshold {
      return false;
    }
    previous = Some(position);
    true
  });

  match result {
    RaycastResult::Interrupted { position } => Some(PickResult {
      hit: position,
      previous,
    }),
    RaycastResult::Completed => None,
  }
}

#[cfg(test)]
#[path = "raycast_test.rs"]
mod raycast_test;
