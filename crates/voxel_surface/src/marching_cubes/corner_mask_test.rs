use super::*;

#[test]
fn test_all_below() {
  assert_eq!(build(&[0.0; 8], 127.0), 0b0000_0000);
}

#[test]
fn test_all_above() {
  assert_eq!(build(&[200.0; 8], 127.0), 0b1111_1111);
}

#[test]
fn test_threshold_is_empty() {
  // Strict comparison: exactly at the threshold is not solid
  assert_eq!(build(&[127.0; 8], 127.0), 0);
  assert_eq!(build(&[127.0, 127.5, 127.0, 127.0, 127.0, 127.0, 127.0, 127.0], 127.0), 0b10);
}

#[test]
fn test_checkerboard() {
  let densities = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
  assert_eq!(build(&densities, 0.0), 0b0101_0101);
}

#[test]
fn test_last_corner_only() {
  let mut densities = [0.0; 8];
  densities[7] = 255.0;
  assert_eq!(build(&densities, 127.0), 0b1000_0000);
}

#[test]
fn test_nan_is_empty() {
  let mut densities = [1.0; 8];
  densities[3] = f32::NAN;
  assert_eq!(build(&densities, 0.0), !0b1000u8);
}

#[test]
fn test_matches_pattern() {
  for pattern in 0u8..=255 {
    let densities: [f32; 8] =
      std::array::from_fn(|i| if (pattern >> i) & 1 == 1 { 1.0 } else { -1.0 });
    assert_eq!(build(&densities, 0.0), pattern, "pattern {:#010b}", pattern);
  }
}

#[test]
fn test_homogeneous() {
  assert!(is_homogeneous(0));
  assert!(is_homogeneous(255));
  assert!(!is_homogeneous(1));
  assert!(!is_homogeneous(254));
}
