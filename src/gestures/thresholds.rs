// src/gestures/thresholds.rs
//
// User-tunable gesture thresholds. Pinch uses an enter/exit band; the
// engine widens the band per frame when tracking is unsteady.

use serde::{Deserialize, Serialize};

/// Smallest gap kept between the enter and exit ratios
pub const MIN_HYSTERESIS_BAND: f32 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Pinch ratio (thumb-index gap / palm size) below which a pinch starts
    pub pinch_enter: f32,
    /// Pinch ratio above which an active pinch ends
    pub pinch_exit: f32,
    /// Longest pinch that still counts as a tap
    pub pinch_tap_max_ms: f64,
    pub pinch_hold_ms: f64,
    pub open_palm_hold_ms: f64,
    pub fist_hold_ms: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            pinch_enter: 0.35,
            pinch_exit: 0.48,
            pinch_tap_max_ms: 260.0,
            pinch_hold_ms: 350.0,
            open_palm_hold_ms: 600.0,
            fist_hold_ms: 400.0,
        }
    }
}

impl GestureThresholds {
    /// Copy with unusable values replaced by defaults and the pinch band
    /// forced open (`exit >= enter + MIN_HYSTERESIS_BAND`).
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let positive_ms = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        let pinch_enter = if self.pinch_enter.is_finite() && self.pinch_enter > 0.0 {
            self.pinch_enter
        } else {
            defaults.pinch_enter
        };
        let pinch_exit = if self.pinch_exit.is_finite() {
            self.pinch_exit
        } else {
            defaults.pinch_exit
        }
        .max(pinch_enter + MIN_HYSTERESIS_BAND);

        Self {
            pinch_enter,
            pinch_exit,
            pinch_tap_max_ms: positive_ms(self.pinch_tap_max_ms, defaults.pinch_tap_max_ms),
            pinch_hold_ms: positive_ms(self.pinch_hold_ms, defaults.pinch_hold_ms),
            open_palm_hold_ms: positive_ms(self.open_palm_hold_ms, defaults.open_palm_hold_ms),
            fist_hold_ms: positive_ms(self.fist_hold_ms, defaults.fist_hold_ms),
        }
    }

    /// Pinch band scaled by `scale` (>= 1 widens), exit kept above enter.
    pub fn widened(&self, scale: f32) -> (f32, f32) {
        let enter = self.pinch_enter * scale;
        let exit = (self.pinch_exit * scale).max(enter + MIN_HYSTERESIS_BAND);
        (enter, exit)
    }
}
