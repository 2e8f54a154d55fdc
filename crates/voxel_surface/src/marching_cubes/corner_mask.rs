//! Case index computation.
//!
//! The case index is an 8-bit value where each bit indicates whether a corner
//! of the unit cube is solid (density strictly above the threshold).

/// Build the case index from 8 corner densities.
///
/// Bit i is set when `densities[i] > threshold`. A density equal to the
/// threshold counts as empty; every cube sharing that corner classifies it
/// the same way, which keeps seams closed.
#[inline]
pub fn build(densities: &[f32; 8], threshold: f32) -> u8 {
  densities
    .iter()
    .enumerate()
    .fold(0u8, |mask, (i, &d)| if d > threshold { mask | (1 << i) } else { mask })
}

/// Homogeneous cubes (all solid or all empty) emit no geometry.
#[inline(always)]
pub fn is_homogeneous(case: u8) -> bool {
  case == 0 || case == 255
}

#[cfg(test)]
#[path = "corner_mask_test.rs"]
mod corner_mask_test;
