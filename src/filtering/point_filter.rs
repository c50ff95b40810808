// src/filtering/point_filter.rs
//
// 3D landmark smoothing built from per-axis One Euro filters.
//
// Two independent mechanisms:
//   - Jump clamp: a raw point that moved more than `max_jump` (planar) from
//     the previous filtered output is pulled back onto that radius before
//     filtering. Outlier suppression that does not depend on the cutoff.
//   - Per-axis One Euro filtering with a velocity-adaptive cutoff.
// Output is boxed to a margin around [0,1] so detector overshoot is absorbed
// instead of discarded.

use super::one_euro::OneEuroFilter;
use crate::landmarks::{HandLandmarks, LANDMARK_COUNT};
use crate::math::{clamp, planar_distance};
use crate::types::Point3;

const XY_BOUNDS: (f32, f32) = (-0.5, 1.5);
const Z_BOUNDS: (f32, f32) = (-1.5, 1.5);

/// Default jump clamp when the caller has no adaptive value
pub const DEFAULT_MAX_JUMP: f32 = 0.22;

#[derive(Debug, Clone, Default)]
pub struct OneEuroPointFilter {
    fx: OneEuroFilter,
    fy: OneEuroFilter,
    fz: OneEuroFilter,
    previous: Option<Point3>,
}

impl OneEuroPointFilter {
    pub fn filter(&mut self, next: Point3, dt: f32, max_jump: f32) -> Point3 {
        let mut input = next;
        if let Some(prev) = self.previous {
            let jump = planar_distance(prev, next);
            if jump > max_jump && jump > 0.0 {
                let scale = max_jump / jump;
                input = Point3 {
                    x: prev.x + (next.x - prev.x) * scale,
                    y: prev.y + (next.y - prev.y) * scale,
                    z: prev.z + (next.z - prev.z) * scale,
                };
            }
        }

        let filtered = Point3 {
            x: clamp(self.fx.filter(input.x, dt), XY_BOUNDS.0, XY_BOUNDS.1),
            y: clamp(self.fy.filter(input.y, dt), XY_BOUNDS.0, XY_BOUNDS.1),
            z: clamp(self.fz.filter(input.z, dt), Z_BOUNDS.0, Z_BOUNDS.1),
        };
        self.previous = Some(filtered);
        filtered
    }

    pub fn previous(&self) -> Option<Point3> {
        self.previous
    }

    pub fn reset(&mut self) {
        self.fx.reset();
        self.fy.reset();
        self.fz.reset();
        self.previous = None;
    }
}

/// One point filter per hand landmark, all stepped with the same `dt` and
/// jump clamp.
#[derive(Debug, Clone)]
pub struct LandmarkFilterBank {
    filters: [OneEuroPointFilter; LANDMARK_COUNT],
}

impl LandmarkFilterBank {
    pub fn new() -> Self {
        Self {
            filters: std::array::from_fn(|_| OneEuroPointFilter::default()),
        }
    }

    /// Filter one hand. Missing input indices reuse the already-filtered
    /// output of the previous index, so a short landmark list never fails.
    pub fn filter_landmarks(
        &mut self,
        landmarks: &[Point3],
        dt: f32,
        max_jump: f32,
    ) -> HandLandmarks {
        let mut out = [Point3::default(); LANDMARK_COUNT];
        for i in 0..LANDMARK_COUNT {
            let input = match landmarks.get(i) {
                Some(p) => *p,
                None if i > 0 => out[i - 1],
                None => self.filters[i].previous().unwrap_or_default(),
            };
            out[i] = self.filters[i].filter(input, dt, max_jump);
        }
        out
    }

    pub fn reset(&mut self) {
        for f in &mut self.filters {
            f.reset();
        }
    }
}

impl Default for LandmarkFilterBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_at(x: f32, y: f32) -> Vec<Point3> {
        (0..LANDMARK_COUNT)
            .map(|i| Point3::new(x + i as f32 * 0.005, y - i as f32 * 0.01, 0.0))
            .collect()
    }

    #[test]
    fn test_first_frame_is_unfiltered() {
        let mut bank = LandmarkFilterBank::new();
        let raw = hand_at(0.4, 0.7);
        let out = bank.filter_landmarks(&raw, 1.0 / 30.0, DEFAULT_MAX_JUMP);
        for (a, b) in out.iter().zip(raw.iter()) {
            assert!((a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_jump_is_clamped_before_filtering() {
        let mut f = OneEuroPointFilter::default();
        f.filter(Point3::new(0.2, 0.2, 0.0), 1.0 / 30.0, 0.1);
        let out = f.filter(Point3::new(0.9, 0.2, 0.0), 1.0 / 30.0, 0.1);
        // clamped input sits at x=0.3, the filter can only move toward it
        assert!(out.x <= 0.3 + 1e-5, "jump should be capped, got {}", out.x);
        assert!(out.x > 0.2);
    }

    #[test]
    fn test_output_is_boxed() {
        let mut f = OneEuroPointFilter::default();
        let out = f.filter(Point3::new(3.0, -2.0, 4.0), 0.03, 10.0);
        assert_eq!(out, Point3::new(1.5, -0.5, 1.5));
    }

    #[test]
    fn test_missing_landmarks_fall_back_to_previous_index() {
        let mut bank = LandmarkFilterBank::new();
        let raw = hand_at(0.3, 0.6);
        let out = bank.filter_landmarks(&raw[..5], 1.0 / 30.0, DEFAULT_MAX_JUMP);
        for p in &out[5..] {
            assert_eq!(*p, out[4]);
        }
    }

    #[test]
    fn test_empty_input_never_panics() {
        let mut bank = LandmarkFilterBank::new();
        let out = bank.filter_landmarks(&[], 1.0 / 30.0, DEFAULT_MAX_JUMP);
        assert_eq!(out[0], Point3::default());
        assert_eq!(out[20], Point3::default());
    }

    #[test]
    fn test_reset_restarts_cold() {
        let mut bank = LandmarkFilterBank::new();
        bank.filter_landmarks(&hand_at(0.2, 0.8), 0.03, DEFAULT_MAX_JUMP);
        bank.reset();
        let raw = hand_at(0.7, 0.5);
        let out = bank.filter_landmarks(&raw, 0.03, DEFAULT_MAX_JUMP);
        assert!((out[0].x - raw[0].x).abs() < 1e-6);
    }
}
