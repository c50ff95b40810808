// src/tracking/slot_tracker.rs
//
// Two-slot hand tracker for per-frame landmark detections.
// Raw detections carry no identity; this assigns them to two persistent
// slots, smooths each slot's landmarks and decides when a hand is gone.
//
// Design:
//   - Closed-form 2x2 matching on palm distance (the detector is capped at
//     two hands, a general solver is not needed)
//   - Low-confidence detections that teleport are dropped as flicker; the
//     slot coasts toward staleness instead of snapping to the outlier
//   - Jump clamp of the landmark filters adapts to palm speed and score:
//     fast or uncertain hands trust raw motion more
//   - Slots keep reporting through short gaps (hysteresis) and raise `lost`
//     early so consumers can warn before the hand disappears
//   - Handedness is a majority vote over recent detections

use super::handedness_vote::HandednessVote;
use crate::filtering::{LandmarkFilterBank, MIN_DT_SECS};
use crate::landmarks::{
    bounding_box, complete_landmarks, hand_scale, palm_point, HandLandmarks, INDEX_TIP, WRIST,
};
use crate::math::{clamp, distance2d, median};
use crate::types::{BoundingBox, Detection, Handedness, Point2, TrackingConfig};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, info};

pub const SLOT_COUNT: usize = 2;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct SlotTrackerConfig {
    /// Detections kept per frame, at most `SLOT_COUNT`
    pub max_hands: usize,
    /// A slot is reported while `now - last_seen <= hysteresis_ms`
    pub hysteresis_ms: f64,
    /// Staleness after which a reported hand is flagged `lost`
    pub lost_after_ms: f64,
    /// Floor for wrist-to-middle-knuckle hand scale
    pub min_hand_scale: f32,
    /// Palm jump, in hand scales, treated as a possible flicker
    pub outlier_jump_ratio: f32,
    /// Absolute palm jump (normalized units) treated as a possible flicker
    pub outlier_abs_jump: f32,
    /// Detections scoring at or above this are never rejected as flicker
    pub outlier_max_score: f32,
    /// Multiplier applied to a rejected detection's score before it is
    /// folded into the score history
    pub rejected_score_damping: f32,
    /// Assignment cost for a slot with no known palm position
    pub unknown_assignment_cost: f32,
    pub score_history: usize,
    pub handedness_history: usize,
    /// Adaptive jump clamp: base + speed * speed_gain + (1 - score) * score_gain
    pub jump_clamp_base: f32,
    pub jump_clamp_speed_gain: f32,
    pub jump_clamp_score_gain: f32,
    pub jump_clamp_min: f32,
    pub jump_clamp_max: f32,
    /// dt used for the first frame of a slot
    pub default_dt_secs: f32,
    /// Upper bound on the filter dt after a long gap
    pub max_dt_secs: f32,
    /// Confidence multiplier reached when staleness hits the hysteresis window
    pub min_freshness: f32,
}

impl Default for SlotTrackerConfig {
    fn default() -> Self {
        Self {
            max_hands: SLOT_COUNT,
            hysteresis_ms: 250.0,
            lost_after_ms: 42.0, // ~1 frame at 24fps
            min_hand_scale: 0.035,
            outlier_jump_ratio: 4.2,
            outlier_abs_jump: 0.35,
            outlier_max_score: 0.84,
            rejected_score_damping: 0.5,
            unknown_assignment_cost: 0.4,
            score_history: 8,
            handedness_history: 10,
            jump_clamp_base: 0.12,
            jump_clamp_speed_gain: 0.017,
            jump_clamp_score_gain: 0.1,
            jump_clamp_min: 0.10,
            jump_clamp_max: 0.31,
            default_dt_secs: 1.0 / 30.0,
            max_dt_secs: 0.1,
            min_freshness: 0.5,
        }
    }
}

impl SlotTrackerConfig {
    pub fn from_tracking(tracking: &TrackingConfig) -> Self {
        Self {
            max_hands: tracking.max_hands.clamp(1, SLOT_COUNT),
            hysteresis_ms: tracking.hysteresis_ms,
            lost_after_ms: tracking.lost_after_ms,
            ..Self::default()
        }
    }

    /// Outlier clamp handed to the landmark filters for one accepted detection
    pub fn adaptive_jump_clamp(&self, palm_speed: f32, score: f32) -> f32 {
        clamp(
            self.jump_clamp_base
                + palm_speed * self.jump_clamp_speed_gain
                + (1.0 - score) * self.jump_clamp_score_gain,
            self.jump_clamp_min,
            self.jump_clamp_max,
        )
    }
}

// ============================================================================
// TYPES
// ============================================================================

/// Stabilised view of one slot for the current frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedHand {
    pub slot_id: usize,
    pub handedness: Handedness,
    /// Median recent score times freshness decay, in [0, 1]
    pub confidence: f32,
    /// Time since the last accepted detection
    pub stale_ms: f64,
    pub lost: bool,
    pub landmarks: HandLandmarks,
    pub raw_landmarks: HandLandmarks,
    pub palm: Point2,
    pub index_tip: Point2,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SlotUpdate {
    Acquired,
    Updated,
    Rejected { jump: f32, jump_ratio: f32 },
    Skipped,
}

#[derive(Debug, Clone)]
struct Slot {
    id: usize,
    filters: LandmarkFilterBank,
    last_seen_at: Option<f64>,
    /// Last smoothed palm, used for assignment
    palm: Option<Point2>,
    /// Last raw palm, used for jump gating
    raw_palm: Option<Point2>,
    smoothed: Option<HandLandmarks>,
    raw: Option<HandLandmarks>,
    scores: VecDeque<f32>,
    votes: HandednessVote,
    handedness: Handedness,
    /// Whether the slot was part of the previous output
    reported: bool,
}

impl Slot {
    fn new(id: usize, cfg: &SlotTrackerConfig) -> Self {
        Self {
            id,
            filters: LandmarkFilterBank::new(),
            last_seen_at: None,
            palm: None,
            raw_palm: None,
            smoothed: None,
            raw: None,
            scores: VecDeque::with_capacity(cfg.score_history),
            votes: HandednessVote::new(cfg.handedness_history),
            handedness: Handedness::Right,
            reported: false,
        }
    }

    fn reset(&mut self) {
        self.filters.reset();
        self.last_seen_at = None;
        self.palm = None;
        self.raw_palm = None;
        self.smoothed = None;
        self.raw = None;
        self.scores.clear();
        self.votes.clear();
        self.reported = false;
    }

    fn stale_ms(&self, now_ms: f64) -> Option<f64> {
        self.last_seen_at.map(|t| (now_ms - t).max(0.0))
    }

    fn is_live(&self, now_ms: f64, hysteresis_ms: f64) -> bool {
        self.smoothed.is_some()
            && self
                .stale_ms(now_ms)
                .map(|stale| stale <= hysteresis_ms)
                .unwrap_or(false)
    }

    fn push_score(&mut self, score: f32, cap: usize) {
        self.scores.push_back(clamp(score, 0.0, 1.0));
        while self.scores.len() > cap.max(1) {
            self.scores.pop_front();
        }
    }

    fn apply(&mut self, det: &Detection, now_ms: f64, cfg: &SlotTrackerConfig) -> SlotUpdate {
        let Some(raw_palm) = palm_point(&det.landmarks) else {
            return SlotUpdate::Skipped;
        };

        let live = self.is_live(now_ms, cfg.hysteresis_ms);
        if !live && self.smoothed.is_some() {
            // Expired: re-acquire from a cold start instead of sliding
            // the filters from a stale position.
            self.reset();
        }
        let acquired = self.smoothed.is_none();

        let (jump, elapsed_secs) = match (live, self.raw_palm, self.last_seen_at) {
            (true, Some(prev), Some(seen_at)) => (
                distance2d(prev, raw_palm),
                ((now_ms - seen_at) / 1000.0) as f32,
            ),
            _ => (0.0, cfg.default_dt_secs),
        };

        if live {
            let scale = hand_scale(&det.landmarks, cfg.min_hand_scale);
            let jump_ratio = jump / scale;
            if (jump_ratio > cfg.outlier_jump_ratio || jump > cfg.outlier_abs_jump)
                && det.score < cfg.outlier_max_score
            {
                self.push_score(det.score * cfg.rejected_score_damping, cfg.score_history);
                return SlotUpdate::Rejected { jump, jump_ratio };
            }
        }

        let dt = clamp(elapsed_secs, MIN_DT_SECS, cfg.max_dt_secs);
        let palm_speed = jump / dt;
        let max_jump = cfg.adaptive_jump_clamp(palm_speed, det.score);
        let smoothed = self.filters.filter_landmarks(&det.landmarks, dt, max_jump);

        self.last_seen_at = Some(now_ms);
        self.raw_palm = Some(raw_palm);
        self.palm = Some(smoothed[WRIST].xy());
        self.raw = Some(complete_landmarks(&det.landmarks));
        self.smoothed = Some(smoothed);
        self.push_score(det.score, cfg.score_history);
        self.votes.push(det.handedness);
        self.handedness = if acquired {
            det.handedness
        } else {
            self.votes.resolve(self.handedness)
        };

        if acquired {
            SlotUpdate::Acquired
        } else {
            SlotUpdate::Updated
        }
    }

    fn snapshot(&self, now_ms: f64, cfg: &SlotTrackerConfig) -> Option<TrackedHand> {
        let landmarks = self.smoothed?;
        let stale_ms = self.stale_ms(now_ms)?;
        if stale_ms > cfg.hysteresis_ms {
            return None;
        }

        let staleness = if cfg.hysteresis_ms > 0.0 {
            clamp((stale_ms / cfg.hysteresis_ms) as f32, 0.0, 1.0)
        } else {
            0.0
        };
        let freshness = 1.0 - (1.0 - cfg.min_freshness) * staleness;
        let scores: Vec<f32> = self.scores.iter().copied().collect();
        let confidence = clamp(median(&scores) * freshness, 0.0, 1.0);

        Some(TrackedHand {
            slot_id: self.id,
            handedness: self.handedness,
            confidence,
            stale_ms,
            lost: stale_ms > cfg.lost_after_ms,
            landmarks,
            raw_landmarks: self.raw.unwrap_or(landmarks),
            palm: landmarks[WRIST].xy(),
            index_tip: landmarks[INDEX_TIP].xy(),
            bbox: bounding_box(&landmarks),
        })
    }
}

// ============================================================================
// ASSIGNMENT
// ============================================================================

/// Slot for a lone detection: nearest known palm; a slot without history
/// only wins when no slot has one (slot 0 by default).
pub fn assign_single(slot_palms: [Option<Point2>; SLOT_COUNT], det_palm: Point2) -> usize {
    match (slot_palms[0], slot_palms[1]) {
        (Some(a), Some(b)) => {
            if distance2d(b, det_palm) < distance2d(a, det_palm) {
                1
            } else {
                0
            }
        }
        (None, Some(_)) => 1,
        _ => 0,
    }
}

/// Slot indices for (det0, det1) minimising total palm displacement over the
/// two possible pairings. Unknown slot positions cost `unknown_cost`.
pub fn assign_pair(
    slot_palms: [Option<Point2>; SLOT_COUNT],
    det_palms: [Point2; 2],
    unknown_cost: f32,
) -> [usize; 2] {
    let cost = |slot: usize, det: usize| {
        slot_palms[slot]
            .map(|p| distance2d(p, det_palms[det]))
            .unwrap_or(unknown_cost)
    };
    let direct = cost(0, 0) + cost(1, 1);
    let swapped = cost(0, 1) + cost(1, 0);
    if swapped < direct {
        [1, 0]
    } else {
        [0, 1]
    }
}

// ============================================================================
// MAIN TRACKER
// ============================================================================

pub struct SlotTracker {
    pub config: SlotTrackerConfig,
    slots: [Slot; SLOT_COUNT],
}

impl SlotTracker {
    pub fn new(config: SlotTrackerConfig) -> Self {
        let slots = std::array::from_fn(|id| Slot::new(id, &config));
        Self { config, slots }
    }

    /// Process one frame of detections; returns up to two hands sorted by
    /// slot id.
    pub fn update(&mut self, detections: &[Detection], now_ms: f64) -> Vec<TrackedHand> {
        let mut usable: Vec<&Detection> = detections
            .iter()
            .filter(|d| !d.landmarks.is_empty())
            .collect();
        let max_hands = self.config.max_hands.clamp(1, SLOT_COUNT);
        if usable.len() > max_hands {
            debug!(
                "{} detections in one frame, keeping the {} highest scores",
                usable.len(),
                max_hands
            );
            usable.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            usable.truncate(max_hands);
        }

        let palms = [self.slots[0].palm, self.slots[1].palm];
        let assignments: Vec<(usize, &Detection)> = match usable.as_slice() {
            [] => Vec::new(),
            [det] => {
                let det_palm = palm_point(&det.landmarks).unwrap_or_default();
                vec![(assign_single(palms, det_palm), *det)]
            }
            [a, b, ..] => {
                let det_palms = [
                    palm_point(&a.landmarks).unwrap_or_default(),
                    palm_point(&b.landmarks).unwrap_or_default(),
                ];
                let [slot_a, slot_b] =
                    assign_pair(palms, det_palms, self.config.unknown_assignment_cost);
                vec![(slot_a, *a), (slot_b, *b)]
            }
        };

        for (slot_idx, det) in assignments {
            let slot = &mut self.slots[slot_idx];
            match slot.apply(det, now_ms, &self.config) {
                SlotUpdate::Acquired => info!(
                    "✋ Slot {} acquired: {} hand, score={:.2}",
                    slot.id,
                    slot.handedness.as_str(),
                    det.score
                ),
                SlotUpdate::Rejected { jump, jump_ratio } => debug!(
                    "Slot {} rejected flicker: jump={:.3} ({:.1}x scale), score={:.2}",
                    slot.id, jump, jump_ratio, det.score
                ),
                SlotUpdate::Updated | SlotUpdate::Skipped => {}
            }
        }

        let hands = self.hands(now_ms);
        for slot in &mut self.slots {
            let reported = hands.iter().any(|h| h.slot_id == slot.id);
            if slot.reported && !reported {
                info!(
                    "👋 Slot {} released after {:.0}ms without detection",
                    slot.id,
                    slot.stale_ms(now_ms).unwrap_or(0.0)
                );
            }
            slot.reported = reported;
        }
        hands
    }

    /// Current output without feeding a frame
    pub fn hands(&self, now_ms: f64) -> Vec<TrackedHand> {
        self.slots
            .iter()
            .filter_map(|s| s.snapshot(now_ms, &self.config))
            .collect()
    }

    pub fn live_count(&self, now_ms: f64) -> usize {
        self.slots
            .iter()
            .filter(|s| s.is_live(now_ms, self.config.hysteresis_ms))
            .count()
    }

    /// Clear filters and histories of both slots
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point3;

    /// Flat synthetic hand with its wrist at (x, y); fingers point up,
    /// middle knuckle 0.05 above the wrist.
    fn hand(x: f32, y: f32) -> Vec<Point3> {
        let mut points = vec![Point3::new(x, y, 0.0)];
        for finger in 0..5 {
            for joint in 1..=4 {
                points.push(Point3::new(
                    x - 0.06 + finger as f32 * 0.03,
                    y - joint as f32 * 0.05,
                    0.0,
                ));
            }
        }
        points
    }

    fn det(x: f32, y: f32, score: f32, handedness: Handedness) -> Detection {
        Detection {
            landmarks: hand(x, y),
            handedness,
            score,
        }
    }

    fn tracker() -> SlotTracker {
        SlotTracker::new(SlotTrackerConfig::default())
    }

    #[test]
    fn test_single_detection_defaults_to_slot_zero() {
        let mut t = tracker();
        let hands = t.update(&[det(0.5, 0.7, 0.9, Handedness::Right)], 0.0);
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].slot_id, 0);
        assert!(!hands[0].lost);
        assert_eq!(hands[0].stale_ms, 0.0);
    }

    #[test]
    fn test_two_detections_sorted_by_slot() {
        let mut t = tracker();
        let hands = t.update(
            &[
                det(0.3, 0.7, 0.9, Handedness::Left),
                det(0.7, 0.7, 0.9, Handedness::Right),
            ],
            0.0,
        );
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].slot_id, 0);
        assert_eq!(hands[1].slot_id, 1);
        assert_eq!(hands[0].handedness, Handedness::Left);
    }

    #[test]
    fn test_pair_assignment_minimises_total_cost() {
        // det0 is nearest to slot 0 on its own, but the swapped pairing has
        // lower total displacement.
        let palms = [Some(Point2::new(0.40, 0.5)), Some(Point2::new(0.60, 0.5))];
        let dets = [Point2::new(0.52, 0.5), Point2::new(0.30, 0.5)];
        // direct: |0.40-0.52| + |0.60-0.30| = 0.42 ; swapped: 0.10 + 0.08 = 0.18
        assert_eq!(assign_pair(palms, dets, 0.4), [1, 0]);
    }

    #[test]
    fn test_crossing_hands_keep_identity() {
        // Hands pass each other horizontally at different heights.
        let mut t = tracker();
        for frame in 0..12 {
            let now = frame as f64 * 33.0;
            let left_x = 0.35 + frame as f32 * 0.02;
            let right_x = 0.65 - frame as f32 * 0.02;
            let left = det(left_x, 0.55, 0.95, Handedness::Left);
            let right = det(right_x, 0.80, 0.95, Handedness::Right);
            // alternate report order so identity cannot come from indices
            let dets = if frame % 2 == 0 {
                vec![left, right]
            } else {
                vec![right, left]
            };
            let hands = t.update(&dets, now);
            assert_eq!(hands.len(), 2);
            assert!(
                (hands[0].raw_landmarks[WRIST].y - 0.55).abs() < 1e-6,
                "slot 0 swapped to the other hand at frame {frame}"
            );
        }
        let hands = t.hands(11.0 * 33.0);
        assert_eq!(hands[0].handedness, Handedness::Left);
        assert_eq!(hands[1].handedness, Handedness::Right);
        assert!(hands[0].raw_landmarks[WRIST].x > hands[1].raw_landmarks[WRIST].x);
    }

    #[test]
    fn test_single_detection_goes_to_nearest_slot() {
        let palms = [Some(Point2::new(0.2, 0.5)), Some(Point2::new(0.8, 0.5))];
        assert_eq!(assign_single(palms, Point2::new(0.75, 0.5)), 1);
        assert_eq!(assign_single(palms, Point2::new(0.25, 0.5)), 0);
        assert_eq!(assign_single([None, None], Point2::new(0.9, 0.5)), 0);
        assert_eq!(assign_single([None, Some(Point2::new(0.1, 0.1))], Point2::new(0.9, 0.5)), 1);
    }

    #[test]
    fn test_low_confidence_teleport_is_rejected() {
        let mut t = tracker();
        t.update(&[det(0.2, 0.7, 0.9, Handedness::Right)], 0.0);
        t.update(&[det(0.21, 0.7, 0.9, Handedness::Right)], 33.0);

        // jump of 0.6 with a weak score: flicker
        let hands = t.update(&[det(0.81, 0.7, 0.6, Handedness::Right)], 66.0);
        assert_eq!(hands.len(), 1);
        assert!((hands[0].stale_ms - 33.0).abs() < 1e-9, "slot must age");
        assert!(hands[0].raw_landmarks[WRIST].x < 0.3);
    }

    #[test]
    fn test_rejected_flicker_lowers_confidence() {
        let mut t = tracker();
        t.update(&[det(0.2, 0.7, 0.9, Handedness::Right)], 0.0);
        let before = t.hands(33.0)[0].confidence;

        // rejected, but its score is folded in at half weight: median of [0.9, 0.3]
        let hands = t.update(&[det(0.8, 0.7, 0.6, Handedness::Right)], 33.0);
        let after = hands[0].confidence;
        let freshness = 1.0 - 0.5 * (33.0 / 250.0) as f32;
        assert!(after < before, "before={before} after={after}");
        assert!((after - 0.6 * freshness).abs() < 1e-5, "after={after}");
    }

    #[test]
    fn test_max_hands_keeps_best_detection() {
        let mut t = SlotTracker::new(SlotTrackerConfig {
            max_hands: 1,
            ..SlotTrackerConfig::default()
        });
        let hands = t.update(
            &[
                det(0.7, 0.7, 0.7, Handedness::Left),
                det(0.3, 0.7, 0.9, Handedness::Right),
            ],
            0.0,
        );
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].handedness, Handedness::Right);
        assert!((hands[0].raw_landmarks[WRIST].x - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_confident_teleport_is_accepted() {
        let mut t = tracker();
        t.update(&[det(0.2, 0.7, 0.95, Handedness::Right)], 0.0);
        let hands = t.update(&[det(0.8, 0.7, 0.95, Handedness::Right)], 33.0);
        assert_eq!(hands[0].stale_ms, 0.0);
        assert!((hands[0].raw_landmarks[WRIST].x - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_hysteresis_and_lost_flag() {
        let mut t = tracker();
        t.update(&[det(0.5, 0.7, 0.9, Handedness::Right)], 0.0);

        let hands = t.update(&[], 30.0);
        assert_eq!(hands.len(), 1);
        assert!(!hands[0].lost);

        let hands = t.update(&[], 100.0);
        assert_eq!(hands.len(), 1);
        assert!(hands[0].lost, "stale beyond 42ms is flagged lost");
        assert!(hands[0].confidence < 0.9);

        let hands = t.update(&[], 251.0);
        assert!(hands.is_empty(), "gone after the hysteresis window");
        assert_eq!(t.live_count(251.0), 0);
    }

    #[test]
    fn test_confidence_decays_with_staleness() {
        let mut t = tracker();
        t.update(&[det(0.5, 0.7, 0.8, Handedness::Right)], 0.0);
        let fresh = t.hands(0.0)[0].confidence;
        let stale = t.hands(250.0)[0].confidence;
        assert!((fresh - 0.8).abs() < 1e-6);
        assert!((stale - 0.4).abs() < 1e-5, "half confidence at the window edge");
    }

    #[test]
    fn test_handedness_vote_resists_single_flip() {
        let mut t = tracker();
        for i in 0..4 {
            t.update(&[det(0.5, 0.7, 0.9, Handedness::Left)], i as f64 * 33.0);
        }
        let hands = t.update(&[det(0.5, 0.7, 0.9, Handedness::Right)], 132.0);
        assert_eq!(hands[0].handedness, Handedness::Left);
    }

    #[test]
    fn test_reacquire_after_expiry_restarts_filters() {
        let mut t = tracker();
        t.update(&[det(0.2, 0.7, 0.6, Handedness::Right)], 0.0);
        // long gap, weak score, far away: would be flicker if still live
        let hands = t.update(&[det(0.8, 0.7, 0.6, Handedness::Right)], 1000.0);
        assert_eq!(hands.len(), 1);
        assert!((hands[0].landmarks[WRIST].x - 0.8).abs() < 1e-6, "cold start");
    }

    #[test]
    fn test_short_landmark_list_is_tolerated() {
        let mut t = tracker();
        let mut d = det(0.5, 0.7, 0.9, Handedness::Right);
        d.landmarks.truncate(6);
        let hands = t.update(&[d], 0.0);
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].landmarks[20], hands[0].landmarks[5]);

        let empty = Detection {
            landmarks: Vec::new(),
            handedness: Handedness::Right,
            score: 0.9,
        };
        assert_eq!(t.update(&[empty], 10.0).len(), 1, "empty detection ignored");
    }

    #[test]
    fn test_reset_clears_slots() {
        let mut t = tracker();
        t.update(&[det(0.5, 0.7, 0.9, Handedness::Right)], 0.0);
        t.reset();
        assert!(t.hands(1.0).is_empty());
    }

    #[test]
    fn test_adaptive_jump_clamp_bounds() {
        let cfg = SlotTrackerConfig::default();
        assert!((cfg.adaptive_jump_clamp(0.0, 1.0) - 0.12).abs() < 1e-6);
        assert_eq!(cfg.adaptive_jump_clamp(100.0, 0.2), 0.31);
        assert!(cfg.adaptive_jump_clamp(2.0, 0.5) > cfg.adaptive_jump_clamp(0.0, 1.0));
    }
}
