// src/pipeline/orchestrator.rs
//
// Per-frame glue from tracker output to gesture-level results.
//
// Flow per TrackerFrame:
//   dominant hand ─> GestureEngine ─┬─ calibrating: CalibrationSession
//                                   └─ otherwise:   events + throw release
//   index tip ─> hand ThrowVelocityTracker (every frame a hand is present)
//
// The pointer (mouse debug) path keeps its own throw tracker.

use super::dominant::pick_dominant_hand;
use super::event_bus::{EventBus, PipelineEvent};
use super::metrics::PipelineMetrics;
use crate::gestures::{
    CalibrationSession, CalibrationUpdate, GestureEngine, GestureFrame, GestureInput,
    GestureThresholds,
};
use crate::motion::{LaunchVector, ThrowVelocityTracker};
use crate::tracking::TrackerFrame;
use crate::types::{Config, Point2, ThrowConfig};
use serde::Serialize;
use tracing::{debug, info};

const EVENT_BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingHint {
    /// Dominant hand is still reported but missed recent detections
    Flicker,
    /// No hand for longer than the tracking grace window
    HandLost,
}

impl TrackingHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingHint::Flicker => "flicker",
            TrackingHint::HandLost => "hand_lost",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TrackingHint::Flicker => "Lost your hand for a moment, stay in front of the camera",
            TrackingHint::HandLost => "Hand lost, move closer and open your palm",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub timestamp_ms: f64,
    pub dominant_slot: Option<usize>,
    /// Index fingertip in screen space (mirrored when configured)
    pub pointer: Option<Point2>,
    pub gesture: GestureFrame,
    pub hint: Option<TrackingHint>,
    /// Present while a calibration session is running or just completed
    pub calibration: Option<CalibrationUpdate>,
    /// Launch vector when a pinch was released this frame
    pub launch: Option<LaunchVector>,
}

pub struct GesturePipeline {
    engine: GestureEngine,
    calibration: CalibrationSession,
    hand_throw: ThrowVelocityTracker,
    pointer_throw: ThrowVelocityTracker,
    pointer_active: bool,
    throw_config: ThrowConfig,
    mirror: bool,
    grace_ms: f64,
    last_hand_seen_ms: Option<f64>,
    pinch_started_ms: Option<f64>,
    bus: EventBus,
    metrics: PipelineMetrics,
}

impl GesturePipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            engine: GestureEngine::new(config.gestures),
            calibration: CalibrationSession::default(),
            hand_throw: ThrowVelocityTracker::from_config(&config.throw),
            pointer_throw: ThrowVelocityTracker::from_config(&config.throw),
            pointer_active: false,
            throw_config: config.throw.clone(),
            mirror: config.tracking.mirror,
            grace_ms: config.tracking.hysteresis_ms,
            last_hand_seen_ms: None,
            pinch_started_ms: None,
            bus: EventBus::new(EVENT_BUS_CAPACITY),
            metrics: PipelineMetrics::new(),
        }
    }

    pub fn process(&mut self, frame: &TrackerFrame) -> PipelineOutput {
        let now_ms = frame.timestamp_ms;
        self.metrics.inc(&self.metrics.frames_processed);
        self.metrics.set(
            &self.metrics.inference_latency_us,
            (frame.inference_latency_ms * 1000.0).max(0.0) as u64,
        );
        self.metrics
            .set(&self.metrics.inference_fps, u64::from(frame.inference_fps));

        let dominant = pick_dominant_hand(&frame.hands);
        let gesture = self.engine.update(dominant.map(GestureInput::from), now_ms);

        let mut hint = None;
        let mut pointer = None;
        match dominant {
            Some(hand) => {
                self.metrics.inc(&self.metrics.frames_with_hand);
                self.last_hand_seen_ms = Some(now_ms);
                if hand.lost {
                    self.metrics.inc(&self.metrics.flicker_frames);
                    hint = Some(TrackingHint::Flicker);
                }
                let x = if self.mirror {
                    1.0 - hand.index_tip.x
                } else {
                    hand.index_tip.x
                };
                pointer = Some(Point2::new(x, hand.index_tip.y));
                self.hand_throw.push(x, hand.index_tip.y, now_ms);
            }
            None => {
                let lost = self
                    .last_hand_seen_ms
                    .map(|seen| now_ms - seen > self.grace_ms)
                    .unwrap_or(true);
                if lost {
                    hint = Some(TrackingHint::HandLost);
                }
            }
        }

        let mut output = PipelineOutput {
            timestamp_ms: now_ms,
            dominant_slot: dominant.map(|h| h.slot_id),
            pointer,
            gesture,
            hint,
            calibration: None,
            launch: None,
        };

        if self.calibration.is_running() {
            let update = self.calibration.update(dominant, &output.gesture, now_ms);
            if update.completed {
                if let Some(thresholds) = update.result {
                    self.engine.set_thresholds(thresholds);
                    self.emit(PipelineEvent::CalibrationCompleted {
                        timestamp_ms: now_ms,
                        thresholds,
                    });
                }
            }
            output.calibration = Some(update);
            return output;
        }

        let slot_id = output.dominant_slot;
        output.launch = self.dispatch_gesture_events(&output.gesture, slot_id, now_ms);
        output
    }

    fn dispatch_gesture_events(
        &mut self,
        gesture: &GestureFrame,
        slot_id: Option<usize>,
        now_ms: f64,
    ) -> Option<LaunchVector> {
        let events = gesture.events;
        let slot_id = slot_id.unwrap_or(0);

        if gesture.pinch && self.pinch_started_ms.is_none() {
            self.pinch_started_ms = Some(now_ms);
        }

        if events.fist_hold {
            self.hand_throw.reset();
            self.emit(PipelineEvent::FistHold {
                timestamp_ms: now_ms,
                slot_id,
            });
        }
        if events.open_palm_hold {
            self.emit(PipelineEvent::OpenPalmHold {
                timestamp_ms: now_ms,
                slot_id,
            });
        }
        if events.pinch_tap {
            self.emit(PipelineEvent::PinchTap {
                timestamp_ms: now_ms,
                slot_id,
            });
        }
        if events.pinch_hold_start {
            self.emit(PipelineEvent::PinchHoldStarted {
                timestamp_ms: now_ms,
                slot_id,
            });
        }

        if !events.pinch_end {
            return None;
        }

        let duration_ms = self
            .pinch_started_ms
            .take()
            .map(|started| now_ms - started)
            .unwrap_or(0.0);
        self.emit(PipelineEvent::PinchEnded {
            timestamp_ms: now_ms,
            duration_ms,
        });

        let launch = self
            .hand_throw
            .estimate(now_ms, self.throw_config.hand_speed_scale);
        self.hand_throw.reset();
        debug!(
            "Released after {:.0}ms: vx={:.2} vy={:.2}",
            duration_ms, launch.vx, launch.vy
        );
        self.emit(PipelineEvent::Released {
            timestamp_ms: now_ms,
            launch,
            from_pointer: false,
        });
        Some(launch)
    }

    fn emit(&mut self, event: PipelineEvent) {
        self.metrics.record_event(&event);
        self.bus.publish(event);
    }

    // ========================================================================
    // CALIBRATION
    // ========================================================================

    pub fn start_calibration(&mut self, now_ms: f64) {
        self.calibration.start(now_ms);
        self.engine.reset();
        self.hand_throw.reset();
        self.pinch_started_ms = None;
        self.emit(PipelineEvent::CalibrationStarted {
            timestamp_ms: now_ms,
        });
    }

    pub fn stop_calibration(&mut self) {
        self.calibration.stop();
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibration.is_running()
    }

    // ========================================================================
    // POINTER (MOUSE DEBUG)
    // ========================================================================

    pub fn pointer_down(&mut self, x: f32, y: f32, now_ms: f64) {
        self.pointer_active = true;
        self.pointer_throw.reset();
        self.pointer_throw.push(x, y, now_ms);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) {
        if self.pointer_active {
            self.pointer_throw.push(x, y, now_ms);
        }
    }

    pub fn pointer_up(&mut self, now_ms: f64) -> Option<LaunchVector> {
        if !self.pointer_active {
            return None;
        }
        self.pointer_active = false;
        let launch = self
            .pointer_throw
            .estimate(now_ms, self.throw_config.pointer_speed_scale);
        self.pointer_throw.reset();
        self.emit(PipelineEvent::Released {
            timestamp_ms: now_ms,
            launch,
            from_pointer: true,
        });
        Some(launch)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn drain_events(&mut self) -> Vec<PipelineEvent> {
        self.bus.drain()
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        self.engine.thresholds()
    }

    pub fn set_thresholds(&mut self, thresholds: GestureThresholds) {
        self.engine.set_thresholds(thresholds);
    }

    /// Drop gesture and throw state, e.g. when the tracker restarts
    pub fn reset(&mut self) {
        self.engine.reset();
        self.hand_throw.reset();
        self.pointer_throw.reset();
        self.pointer_active = false;
        self.pinch_started_ms = None;
        self.last_hand_seen_ms = None;
        info!("Gesture pipeline reset");
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestures::CalibrationStage;
    use crate::landmarks::{bounding_box, complete_landmarks, INDEX_TIP, THUMB_TIP, WRIST};
    use crate::tracking::TrackedHand;
    use crate::types::{Handedness, Point3};

    const OPEN: [(f32, f32); 21] = [
        (0.5, 0.82),
        (0.44, 0.74),
        (0.4, 0.66),
        (0.35, 0.61),
        (0.28, 0.57),
        (0.45, 0.66),
        (0.45, 0.58),
        (0.47, 0.49),
        (0.52, 0.38),
        (0.51, 0.66),
        (0.51, 0.57),
        (0.52, 0.48),
        (0.53, 0.37),
        (0.57, 0.67),
        (0.57, 0.59),
        (0.58, 0.51),
        (0.6, 0.42),
        (0.62, 0.69),
        (0.63, 0.62),
        (0.64, 0.55),
        (0.66, 0.48),
    ];

    fn tracked(pinch: bool, dx: f32, lost: bool) -> TrackedHand {
        let mut points: Vec<Point3> = OPEN
            .iter()
            .map(|&(x, y)| Point3::new(x + dx, y, 0.0))
            .collect();
        if pinch {
            points[THUMB_TIP] = Point3::new(0.48 + dx, 0.46, 0.0);
            points[INDEX_TIP] = Point3::new(0.5 + dx, 0.45, 0.0);
        }
        let landmarks = complete_landmarks(&points);
        TrackedHand {
            slot_id: 0,
            handedness: Handedness::Right,
            confidence: 0.95,
            stale_ms: if lost { 60.0 } else { 0.0 },
            lost,
            landmarks,
            raw_landmarks: landmarks,
            palm: landmarks[WRIST].xy(),
            index_tip: landmarks[INDEX_TIP].xy(),
            bbox: bounding_box(&landmarks),
        }
    }

    fn frame(timestamp_ms: f64, hands: Vec<TrackedHand>) -> TrackerFrame {
        TrackerFrame {
            timestamp_ms,
            inference_fps: 24,
            inference_latency_ms: 2.0,
            hands,
        }
    }

    fn pipeline() -> GesturePipeline {
        let mut config = Config::default();
        config.tracking.mirror = false;
        GesturePipeline::new(&config)
    }

    #[test]
    fn test_pinch_release_emits_tap_and_launch() {
        let mut p = pipeline();
        for (i, t) in [0.0, 40.0, 80.0].iter().enumerate() {
            p.process(&frame(*t, vec![tracked(true, i as f32 * 0.01, false)]));
        }
        let mut launch = None;
        for i in 0..6 {
            let t = 120.0 + i as f64 * 40.0;
            let hand = tracked(false, 0.03 + i as f32 * 0.01, false);
            let out = p.process(&frame(t, vec![hand]));
            launch = launch.or(out.launch);
        }

        let launch = launch.expect("release produces a launch vector");
        assert!(launch.vx > 0.0, "hand moved right, vx={}", launch.vx);

        let names: Vec<&str> = p.drain_events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["pinch_tap", "pinch_ended", "released"]);
        let summary = p.metrics().summary();
        assert_eq!(summary.pinch_taps, 1);
        assert_eq!(summary.releases, 1);
        assert_eq!(summary.frames_processed, 9);
    }

    #[test]
    fn test_mirror_flips_pointer() {
        let mut config = Config::default();
        config.tracking.mirror = true;
        let mut p = GesturePipeline::new(&config);
        let out = p.process(&frame(0.0, vec![tracked(false, 0.0, false)]));
        let pointer = out.pointer.expect("pointer from index tip");
        assert!((pointer.x - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_tracking_hints() {
        let mut p = pipeline();
        let out = p.process(&frame(0.0, vec![tracked(false, 0.0, true)]));
        assert_eq!(out.hint, Some(TrackingHint::Flicker));

        let out = p.process(&frame(100.0, vec![]));
        assert_eq!(out.hint, None, "inside the grace window");
        assert_eq!(out.gesture.label.as_str(), "NO_HAND");

        let out = p.process(&frame(400.0, vec![]));
        assert_eq!(out.hint, Some(TrackingHint::HandLost));
    }

    #[test]
    fn test_calibration_replaces_thresholds() {
        let mut p = pipeline();
        p.start_calibration(0.0);
        assert!(p.is_calibrating());

        let mut t = 0.0;
        let mut step = |p: &mut GesturePipeline, pinch: bool| {
            let out = p.process(&frame(t, vec![tracked(pinch, 0.0, false)]));
            t += 50.0;
            out
        };

        for _ in 0..42 {
            step(&mut p, false);
        }
        let mut completed = None;
        for pinch in [true, false, true] {
            for _ in 0..12 {
                let out = step(&mut p, pinch);
                if let Some(update) = out.calibration.filter(|u| u.completed) {
                    completed = Some(update);
                }
            }
        }

        let update = completed.expect("calibration completes after two pinches");
        assert_eq!(update.pinch_count, 2);
        assert_eq!(update.stage, CalibrationStage::Done);
        assert!(!p.is_calibrating());

        let thresholds = *p.thresholds();
        assert_ne!(thresholds, GestureThresholds::default());
        assert!(thresholds.pinch_enter >= 0.2 && thresholds.pinch_enter < thresholds.pinch_exit);

        let names: Vec<&str> = p.drain_events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["calibration_started", "calibration_completed"]);
    }

    #[test]
    fn test_fist_hold_clears_throw_samples() {
        let mut p = pipeline();
        let mut fist = tracked(false, 0.0, false);
        let curled = [
            (THUMB_TIP, 0.41, 0.76),
            (INDEX_TIP, 0.5, 0.74),
            (12, 0.51, 0.74),
            (16, 0.52, 0.75),
            (20, 0.53, 0.76),
        ];
        for (idx, x, y) in curled {
            fist.landmarks[idx] = Point3::new(x, y, 0.0);
        }
        p.process(&frame(0.0, vec![fist.clone()]));
        p.process(&frame(40.0, vec![fist.clone()]));
        p.process(&frame(450.0, vec![fist]));
        let names: Vec<&str> = p.drain_events().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["fist_hold"]);
        assert!(p.hand_throw.is_empty());
    }

    #[test]
    fn test_pointer_throw() {
        let mut p = pipeline();
        assert!(p.pointer_up(0.0).is_none(), "no release without a press");

        p.pointer_down(0.2, 0.5, 0.0);
        p.pointer_move(0.3, 0.45, 16.0);
        p.pointer_move(0.4, 0.4, 32.0);
        let launch = p.pointer_up(48.0).expect("launch on release");
        assert!(launch.vx > 0.0 && launch.vy < 0.0);

        match p.drain_events().as_slice() {
            [PipelineEvent::Released { from_pointer, .. }] => assert!(*from_pointer),
            other => panic!("unexpected events {other:?}"),
        }
    }
}
