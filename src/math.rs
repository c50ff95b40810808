// src/math.rs
//
// Small scalar / point helpers shared by the filters, tracker and gesture code.

use crate::types::{Point2, Point3};

/// Clamp without panicking when `min > max` (the upper bound wins).
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

pub fn distance2d(a: Point2, b: Point2) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Planar distance between two landmarks (depth ignored).
pub fn planar_distance(a: Point3, b: Point3) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

pub fn distance3d(a: Point3, b: Point3) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Median of a sample set; even-length sets average the two middle values.
/// Returns 0.0 for an empty set.
pub fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) * 0.5
    } else {
        sorted[middle]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_prefers_upper_bound_when_inverted() {
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.8, 0.6), 0.6);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[0.3, 0.1, 0.2]), 0.2);
        assert!((median(&[0.4, 0.1, 0.2, 0.3]) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_distances() {
        let a = Point3 { x: 0.0, y: 0.0, z: 0.0 };
        let b = Point3 { x: 3.0, y: 4.0, z: 12.0 };
        assert!((distance3d(a, b) - 13.0).abs() < 1e-5);
        assert!((planar_distance(a, b) - 5.0).abs() < 1e-5);
        assert!((distance2d(a.xy(), b.xy()) - 5.0).abs() < 1e-5);
    }
}
