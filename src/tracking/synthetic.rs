// src/tracking/synthetic.rs
//
// Deterministic stand-in for the landmark model: a right hand drifting on a
// slow ellipse while the thumb/index gap cycles between pinched and open.
// Drives the replay binary and end-to-end tests.

use super::runtime::{DetectionSource, DetectorOptions};
use crate::math::clamp;
use crate::types::{Detection, Handedness, Point3};
use anyhow::Result;

/// Landmark offsets from the hand center, indices follow the 21-point model.
/// Thumb tip (4) and index tip (8) are placed separately from the pinch gap.
const HAND_TEMPLATE: [(f32, f32); 21] = [
    (0.0, 0.2),
    (-0.06, 0.13),
    (-0.085, 0.06),
    (-0.105, 0.005),
    (0.0, -0.04),
    (-0.035, 0.06),
    (-0.03, -0.005),
    (-0.02, -0.07),
    (0.0, -0.04),
    (0.01, 0.05),
    (0.015, -0.02),
    (0.02, -0.09),
    (0.048, 0.07),
    (0.055, 0.01),
    (0.06, -0.045),
    (0.062, -0.09),
    (0.078, 0.11),
    (0.09, 0.055),
    (0.098, 0.005),
    (0.105, -0.04),
    (0.112, -0.078),
];

const EDGE_MARGIN: f32 = 0.08;

#[derive(Debug, Clone)]
pub struct SyntheticHandSource {
    /// Angular rate (rad/s) of the pinch cycle
    pub pinch_rate: f32,
    pub score: f32,
    /// Also emit a mirrored left hand
    pub second_hand: bool,
    /// Amplitude of deterministic capture-time noise (ms)
    pub jitter_ms: f64,
    max_hands: usize,
    min_presence_confidence: f32,
    frames: u64,
}

impl Default for SyntheticHandSource {
    fn default() -> Self {
        Self {
            pinch_rate: 1.8,
            score: 0.95,
            second_hand: false,
            jitter_ms: 0.0,
            max_hands: 2,
            min_presence_confidence: 0.0,
            frames: 0,
        }
    }
}

impl SyntheticHandSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_second_hand(mut self) -> Self {
        self.second_hand = true;
        self
    }

    pub fn with_jitter(mut self, jitter_ms: f64) -> Self {
        self.jitter_ms = jitter_ms.max(0.0);
        self
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Landmarks of the primary hand at `now_ms`
    pub fn hand_at(&self, now_ms: f64) -> Vec<Point3> {
        let t = (now_ms * 0.001) as f32;
        let center_x = 0.5 + (t * 0.9).sin() * 0.08;
        let center_y = 0.56 + (t * 0.7).cos() * 0.04;
        let pinch_phase = ((t * self.pinch_rate).sin() + 1.0) * 0.5;
        let pinch_offset = 0.015 + pinch_phase * 0.045;

        HAND_TEMPLATE
            .iter()
            .enumerate()
            .map(|(i, &(dx, dy))| {
                let dx = match i {
                    4 => -pinch_offset,
                    8 => pinch_offset,
                    _ => dx,
                };
                Point3::new(
                    clamp(center_x + dx, EDGE_MARGIN, 1.0 - EDGE_MARGIN),
                    clamp(center_y + dy, EDGE_MARGIN, 1.0 - EDGE_MARGIN),
                    0.0,
                )
            })
            .collect()
    }
}

impl DetectionSource for SyntheticHandSource {
    fn detect(&mut self, now_ms: f64) -> Result<Vec<Detection>> {
        self.frames += 1;
        let jitter = self.jitter_ms * (self.frames as f64 * 0.37).sin();
        if self.score < self.min_presence_confidence {
            return Ok(Vec::new());
        }
        let landmarks = self.hand_at(now_ms + jitter);

        let mut detections = Vec::with_capacity(2);
        if self.second_hand && self.max_hands >= 2 {
            // Mirror about x = 0.5 and sit it lower so the two palms never overlap.
            let mirrored = landmarks
                .iter()
                .map(|p| {
                    let y = clamp(p.y + 0.1, EDGE_MARGIN, 1.0 - EDGE_MARGIN);
                    Point3::new(1.0 - p.x, y, p.z)
                })
                .collect();
            detections.push(Detection {
                landmarks: mirrored,
                handedness: Handedness::Left,
                score: self.score,
            });
        }
        detections.push(Detection {
            landmarks,
            handedness: Handedness::Right,
            score: self.score,
        });
        Ok(detections)
    }

    fn configure(&mut self, options: &DetectorOptions) {
        self.max_hands = options.max_hands;
        self.min_presence_confidence = options.min_presence_confidence;
    }

    fn name(&self) -> &str {
        "synthetic hand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{hand_scale, INDEX_TIP, THUMB_TIP};
    use crate::math::distance2d;
    use crate::types::TrackingConfig;

    fn pinch_ratio(landmarks: &[Point3]) -> f32 {
        distance2d(landmarks[THUMB_TIP].xy(), landmarks[INDEX_TIP].xy())
            / hand_scale(landmarks, 0.035)
    }

    #[test]
    fn test_hand_is_complete_and_in_bounds() {
        let source = SyntheticHandSource::new();
        for step in 0..50 {
            let hand = source.hand_at(step as f64 * 137.0);
            assert_eq!(hand.len(), 21);
            assert!(hand
                .iter()
                .all(|p| (0.08..=0.92).contains(&p.x) && (0.08..=0.92).contains(&p.y)));
        }
    }

    #[test]
    fn test_pinch_gap_cycles() {
        let source = SyntheticHandSource::new();
        let ratios: Vec<f32> = (0..120)
            .map(|i| pinch_ratio(&source.hand_at(i as f64 * 33.0)))
            .collect();
        let min = ratios.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = ratios.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(min < 0.3, "should pinch, min ratio {min}");
        assert!(max > 0.6, "should open, max ratio {max}");
    }

    #[test]
    fn test_detect_is_deterministic() {
        let mut a = SyntheticHandSource::new();
        let mut b = SyntheticHandSource::new();
        assert_eq!(a.detect(500.0).unwrap(), b.detect(500.0).unwrap());
        assert_eq!(a.frames(), 1);
    }

    #[test]
    fn test_second_hand_is_left() {
        let mut source = SyntheticHandSource::new().with_second_hand();
        let detections = source.detect(0.0).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].handedness, Handedness::Left);
        assert_eq!(detections[1].handedness, Handedness::Right);
    }

    #[test]
    fn test_options_limit_hands_and_presence() {
        let mut options = DetectorOptions::from_tracking(&TrackingConfig {
            max_hands: 1,
            ..TrackingConfig::default()
        });
        let mut source = SyntheticHandSource::new().with_second_hand();
        source.configure(&options);
        let detections = source.detect(0.0).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].handedness, Handedness::Right);

        options.min_presence_confidence = 0.99;
        source.configure(&options);
        assert!(source.detect(33.0).unwrap().is_empty());
    }
}
