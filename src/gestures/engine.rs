// src/gestures/engine.rs
//
// Per-hand gesture state machine.
//
// Pinch:
//   - Signal is the thumb-index gap over palm size, EMA-smoothed together
//     with its rate of change
//   - Enter/exit band widens when tracking is unsteady (low confidence or
//     stale), exit always kept above enter
//   - Both edges need consecutive confirming frames; entry is also gated on
//     the ratio no longer collapsing fast
// Open palm / fist:
//   - Latched after 2 matching frames (3 when tracking is uncertain), hold
//     event fires once per continuous latch
//
// All timing is driven by the caller's timestamps; no internal clock.

use super::pose::{classify_pose, PoseConfig, PoseReading};
use super::thresholds::GestureThresholds;
use crate::landmarks::{HandLandmarks, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, THUMB_TIP, WRIST};
use crate::math::{clamp, distance3d};
use crate::tracking::TrackedHand;
use crate::types::Point3;
use serde::Serialize;
use tracing::{debug, info};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct GestureEngineConfig {
    /// Weight of the previous value in the ratio and ratio-velocity EMAs
    pub ratio_smoothing: f32,
    pub min_palm_size: f32,

    // Stability = confidence * w_c + freshness * w_f, floored
    pub stability_confidence_weight: f32,
    pub stability_freshness_weight: f32,
    /// Staleness at which freshness reaches zero
    pub stability_stale_ms: f64,
    pub min_stability: f32,
    /// Band scale-up reached at `min_stability`
    pub max_threshold_widening: f32,

    /// Pinch entry is held off while the ratio closes faster than this
    /// (ratio change per frame)
    pub max_closing_velocity: f32,
    /// Opening faster than this (ratio change per frame) counts as a release frame
    pub max_opening_velocity: f32,
    pub pinch_debounce_frames: u32,

    pub pose_debounce_frames: u32,
    pub uncertain_pose_debounce_frames: u32,
    /// Below this hand confidence poses need the longer debounce
    pub uncertain_confidence: f32,
    /// Above this staleness poses need the longer debounce
    pub uncertain_stale_ms: f64,

    // Output confidence = hand confidence * weight + bonus
    pub confidence_weight: f32,
    pub gesture_bonus: f32,
    pub idle_bonus: f32,

    pub pose: PoseConfig,
}

impl Default for GestureEngineConfig {
    fn default() -> Self {
        Self {
            ratio_smoothing: 0.62,
            min_palm_size: 0.02,
            stability_confidence_weight: 0.72,
            stability_freshness_weight: 0.28,
            stability_stale_ms: 260.0,
            min_stability: 0.42,
            max_threshold_widening: 0.2, // +20% at min stability
            max_closing_velocity: 1.24,
            max_opening_velocity: 2.36,
            pinch_debounce_frames: 2,
            pose_debounce_frames: 2,
            uncertain_pose_debounce_frames: 3,
            uncertain_confidence: 0.55,
            uncertain_stale_ms: 60.0,
            confidence_weight: 0.75,
            gesture_bonus: 0.2,
            idle_bonus: 0.1,
            pose: PoseConfig::default(),
        }
    }
}

// ============================================================================
// TYPES
// ============================================================================

/// What the engine needs from a tracked hand
#[derive(Debug, Clone, Copy)]
pub struct GestureInput<'a> {
    pub landmarks: &'a [Point3],
    pub confidence: f32,
    pub stale_ms: f64,
}

impl<'a> From<&'a TrackedHand> for GestureInput<'a> {
    fn from(hand: &'a TrackedHand) -> Self {
        Self {
            landmarks: &hand.landmarks,
            confidence: hand.confidence,
            stale_ms: hand.stale_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureLabel {
    NoHand,
    Idle,
    Pinch,
    PinchHold,
    OpenPalm,
    Fist,
}

impl GestureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::NoHand => "NO_HAND",
            GestureLabel::Idle => "IDLE",
            GestureLabel::Pinch => "PINCH",
            GestureLabel::PinchHold => "PINCH_HOLD",
            GestureLabel::OpenPalm => "OPEN_PALM",
            GestureLabel::Fist => "FIST",
        }
    }
}

/// Edge-triggered events, each true for exactly one frame per transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GestureEvents {
    pub pinch_tap: bool,
    pub pinch_hold_start: bool,
    pub pinch_end: bool,
    pub open_palm_hold: bool,
    pub fist_hold: bool,
}

impl GestureEvents {
    pub fn any(&self) -> bool {
        self.pinch_tap
            || self.pinch_hold_start
            || self.pinch_end
            || self.open_palm_hold
            || self.fist_hold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GestureFrame {
    pub hand_present: bool,
    pub pinch: bool,
    pub open_palm: bool,
    pub fist: bool,
    /// Smoothed pinch ratio
    pub pinch_ratio: f32,
    pub confidence: f32,
    pub label: GestureLabel,
    /// Time since the pinch latched; 0 unless a pinch is active
    pub pinch_duration_ms: f64,
    pub events: GestureEvents,
}

impl GestureFrame {
    fn no_hand(events: GestureEvents) -> Self {
        Self {
            hand_present: false,
            pinch: false,
            open_palm: false,
            fist: false,
            pinch_ratio: 0.0,
            confidence: 0.0,
            label: GestureLabel::NoHand,
            pinch_duration_ms: 0.0,
            events,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct PinchState {
    active: bool,
    started_at: f64,
    hold_emitted: bool,
    enter_streak: u32,
    exit_streak: u32,
}

/// Debounced latch for a static pose with a one-shot hold timer
#[derive(Debug, Clone, Default)]
struct PoseLatch {
    streak: u32,
    latched_at: Option<f64>,
    hold_emitted: bool,
}

impl PoseLatch {
    /// Returns true on the frame the hold event fires.
    fn update(&mut self, matches: bool, required_frames: u32, hold_ms: f64, now_ms: f64) -> bool {
        if !matches {
            *self = Self::default();
            return false;
        }

        self.streak = self.streak.saturating_add(1);
        if self.latched_at.is_none() && self.streak >= required_frames {
            self.latched_at = Some(now_ms);
        }
        match self.latched_at {
            Some(since) if !self.hold_emitted && now_ms - since >= hold_ms => {
                self.hold_emitted = true;
                true
            }
            _ => false,
        }
    }

    fn is_latched(&self) -> bool {
        self.latched_at.is_some()
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct GestureEngine {
    config: GestureEngineConfig,
    thresholds: GestureThresholds,

    ratio_ema: Option<f32>,
    velocity_ema: f32,
    last_raw_ratio: f32,

    pinch: PinchState,
    open_palm: PoseLatch,
    fist: PoseLatch,
}

impl GestureEngine {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self::with_config(thresholds, GestureEngineConfig::default())
    }

    pub fn with_config(thresholds: GestureThresholds, config: GestureEngineConfig) -> Self {
        Self {
            config,
            thresholds: thresholds.sanitized(),
            ratio_ema: None,
            velocity_ema: 0.0,
            last_raw_ratio: 0.0,
            pinch: PinchState::default(),
            open_palm: PoseLatch::default(),
            fist: PoseLatch::default(),
        }
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    pub fn set_thresholds(&mut self, thresholds: GestureThresholds) {
        self.thresholds = thresholds.sanitized();
        info!(
            "🎚️  Gesture thresholds set: enter={:.3} exit={:.3}",
            self.thresholds.pinch_enter, self.thresholds.pinch_exit
        );
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.active
    }

    /// Clear all state without emitting events
    pub fn reset(&mut self) {
        self.ratio_ema = None;
        self.velocity_ema = 0.0;
        self.last_raw_ratio = 0.0;
        self.pinch = PinchState::default();
        self.open_palm = PoseLatch::default();
        self.fist = PoseLatch::default();
    }

    /// Stability in [min_stability, 1] from hand confidence and staleness
    pub fn stability(&self, confidence: f32, stale_ms: f64) -> f32 {
        let cfg = &self.config;
        let staleness = if cfg.stability_stale_ms > 0.0 {
            clamp((stale_ms / cfg.stability_stale_ms) as f32, 0.0, 1.0)
        } else {
            0.0
        };
        clamp(
            confidence * cfg.stability_confidence_weight
                + (1.0 - staleness) * cfg.stability_freshness_weight,
            cfg.min_stability,
            1.0,
        )
    }

    /// Pinch (enter, exit) ratios for the given tracking quality
    pub fn adapted_band(&self, confidence: f32, stale_ms: f64) -> (f32, f32) {
        let cfg = &self.config;
        let instability = 1.0 - self.stability(confidence, stale_ms);
        let span = (1.0 - cfg.min_stability).max(f32::EPSILON);
        let scale = 1.0 + instability / span * cfg.max_threshold_widening;
        self.thresholds.widened(scale)
    }

    pub fn update(&mut self, input: Option<GestureInput<'_>>, now_ms: f64) -> GestureFrame {
        let Some((hand, lm)) = input.and_then(|h| full_hand(h.landmarks).map(|lm| (h, lm))) else {
            return self.lose_hand();
        };

        let mut events = GestureEvents::default();
        let palm_size = distance3d(lm[WRIST], lm[MIDDLE_MCP]).max(self.config.min_palm_size);
        let raw_ratio = distance3d(lm[THUMB_TIP], lm[INDEX_TIP]) / palm_size;
        let ratio = self.smooth_ratio(raw_ratio);
        let (enter, exit) = self.adapted_band(hand.confidence, hand.stale_ms);

        self.update_pinch(ratio, enter, exit, now_ms, &mut events);

        let reading = if !self.pinch.active && ratio >= enter {
            classify_pose(lm, palm_size, &self.config.pose)
        } else {
            PoseReading::default()
        };
        let required = if hand.confidence < self.config.uncertain_confidence
            || hand.stale_ms > self.config.uncertain_stale_ms
        {
            self.config.uncertain_pose_debounce_frames
        } else {
            self.config.pose_debounce_frames
        };
        events.open_palm_hold = self.open_palm.update(
            reading.open_palm,
            required,
            self.thresholds.open_palm_hold_ms,
            now_ms,
        );
        events.fist_hold = self
            .fist
            .update(reading.fist, required, self.thresholds.fist_hold_ms, now_ms);

        let pinch = self.pinch.active;
        let open_palm = self.open_palm.is_latched();
        let fist = self.fist.is_latched();

        if events.open_palm_hold {
            debug!("🖐️  Open palm hold");
        }
        if events.fist_hold {
            debug!("✊ Fist hold");
        }

        let bonus = if pinch || open_palm || fist {
            self.config.gesture_bonus
        } else {
            self.config.idle_bonus
        };

        GestureFrame {
            hand_present: true,
            pinch,
            open_palm,
            fist,
            pinch_ratio: ratio,
            confidence: clamp(hand.confidence * self.config.confidence_weight + bonus, 0.0, 1.0),
            label: self.label(open_palm, fist),
            pinch_duration_ms: if pinch {
                now_ms - self.pinch.started_at
            } else {
                0.0
            },
            events,
        }
    }

    fn lose_hand(&mut self) -> GestureFrame {
        let events = GestureEvents {
            pinch_end: self.pinch.active,
            ..GestureEvents::default()
        };
        if self.pinch.active {
            debug!("🤏 Pinch ended: hand lost");
        }
        self.reset();
        GestureFrame::no_hand(events)
    }

    /// Velocity is the per-frame change of the raw ratio, independent of dt.
    fn smooth_ratio(&mut self, raw: f32) -> f32 {
        let keep = self.config.ratio_smoothing;
        let ratio = match self.ratio_ema {
            None => {
                self.velocity_ema = 0.0;
                raw
            }
            Some(previous) => {
                let velocity = raw - self.last_raw_ratio;
                self.velocity_ema = self.velocity_ema * keep + velocity * (1.0 - keep);
                previous * keep + raw * (1.0 - keep)
            }
        };
        self.ratio_ema = Some(ratio);
        self.last_raw_ratio = raw;
        ratio
    }

    fn update_pinch(
        &mut self,
        ratio: f32,
        enter: f32,
        exit: f32,
        now_ms: f64,
        events: &mut GestureEvents,
    ) {
        let cfg = &self.config;
        let state = &mut self.pinch;

        if !state.active {
            let closing = -self.velocity_ema;
            if ratio < enter && closing < cfg.max_closing_velocity {
                state.enter_streak += 1;
            } else {
                state.enter_streak = 0;
            }
            if state.enter_streak >= cfg.pinch_debounce_frames {
                *state = PinchState {
                    active: true,
                    started_at: now_ms,
                    ..PinchState::default()
                };
                debug!("🤏 Pinch started: ratio={:.3} enter={:.3}", ratio, enter);
            }
        } else {
            let opening = self.velocity_ema;
            if ratio > exit || opening > cfg.max_opening_velocity {
                state.exit_streak += 1;
            } else {
                state.exit_streak = 0;
            }
            if state.exit_streak >= cfg.pinch_debounce_frames {
                let duration = now_ms - state.started_at;
                events.pinch_tap =
                    !state.hold_emitted && duration <= self.thresholds.pinch_tap_max_ms;
                events.pinch_end = true;
                debug!(
                    "🤏 Pinch ended after {:.0}ms{}",
                    duration,
                    if events.pinch_tap { " (tap)" } else { "" }
                );
                *state = PinchState::default();
                return;
            }
        }

        if state.active
            && !state.hold_emitted
            && now_ms - state.started_at >= self.thresholds.pinch_hold_ms
        {
            state.hold_emitted = true;
            events.pinch_hold_start = true;
            debug!("🤏 Pinch hold started");
        }
    }

    fn label(&self, open_palm: bool, fist: bool) -> GestureLabel {
        if self.pinch.active {
            if self.pinch.hold_emitted {
                GestureLabel::PinchHold
            } else {
                GestureLabel::Pinch
            }
        } else if open_palm {
            GestureLabel::OpenPalm
        } else if fist {
            GestureLabel::Fist
        } else {
            GestureLabel::Idle
        }
    }
}

/// The first 21 landmarks as a fixed array, or None when the hand is partial
fn full_hand(landmarks: &[Point3]) -> Option<&HandLandmarks> {
    landmarks
        .get(..LANDMARK_COUNT)
        .and_then(|head| <&HandLandmarks>::try_from(head).ok())
}

// ============================================================================
// TESTS
// ============================================================================
