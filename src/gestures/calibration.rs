// src/gestures/calibration.rs
//
// Guided calibration: hold an open palm, then pinch twice. The pinch ratios
// observed at the two pinch onsets set the user's enter/exit band.
//
// Stages:
//   Idle ──start──> OpenPalm ──2s continuous──> Pinch ──2 onsets──> Done

use super::engine::GestureFrame;
use super::thresholds::GestureThresholds;
use crate::math::{clamp, median};
use crate::tracking::TrackedHand;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// Continuous open palm required in the first stage
    pub open_palm_ms: f64,
    pub required_pinches: usize,
    /// A pinch only counts when hand confidence is above this
    pub min_confidence: f32,
    /// and staleness below this
    pub max_stale_ms: f64,
    /// enter = clamp(median * enter_scale, min_enter, max_enter)
    pub enter_scale: f32,
    pub min_enter: f32,
    pub max_enter: f32,
    /// exit = clamp(enter * exit_scale, enter + min_band, max_exit)
    pub exit_scale: f32,
    pub min_band: f32,
    pub max_exit: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            open_palm_ms: 2000.0,
            required_pinches: 2,
            min_confidence: 0.35,
            max_stale_ms: 240.0,
            enter_scale: 1.25,
            min_enter: 0.2,
            max_enter: 0.45,
            exit_scale: 1.28,
            min_band: 0.05,
            max_exit: 0.62,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStage {
    Idle,
    OpenPalm,
    Pinch,
    Done,
}

impl CalibrationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationStage::Idle => "idle",
            CalibrationStage::OpenPalm => "open_palm",
            CalibrationStage::Pinch => "pinch",
            CalibrationStage::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalibrationUpdate {
    pub stage: CalibrationStage,
    /// Progress within the current stage, [0, 1]
    pub progress: f32,
    pub pinch_count: usize,
    pub completed: bool,
    pub result: Option<GestureThresholds>,
}

/// Thresholds derived from the pinch ratios recorded at each onset
pub fn derive_thresholds(ratios: &[f32], cfg: &CalibrationConfig) -> GestureThresholds {
    let base = median(ratios);
    let pinch_enter = clamp(base * cfg.enter_scale, cfg.min_enter, cfg.max_enter);
    let pinch_exit = clamp(
        pinch_enter * cfg.exit_scale,
        pinch_enter + cfg.min_band,
        cfg.max_exit,
    );
    GestureThresholds {
        pinch_enter,
        pinch_exit,
        ..GestureThresholds::default()
    }
}

pub struct CalibrationSession {
    config: CalibrationConfig,
    running: bool,
    stage: CalibrationStage,
    stage_started_at: f64,
    progress: f32,
    pinch_ratios: Vec<f32>,
    was_qualifying: bool,
    result: Option<GestureThresholds>,
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

impl CalibrationSession {
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            running: false,
            stage: CalibrationStage::Idle,
            stage_started_at: 0.0,
            progress: 0.0,
            pinch_ratios: Vec::new(),
            was_qualifying: false,
            result: None,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.running = true;
        self.stage = CalibrationStage::OpenPalm;
        self.stage_started_at = now_ms;
        self.progress = 0.0;
        self.pinch_ratios.clear();
        self.was_qualifying = false;
        self.result = None;
        info!("🎯 Calibration started: hold an open palm");
    }

    /// Halt at the current stage; a computed result is kept.
    pub fn stop(&mut self) {
        if self.running {
            info!("🎯 Calibration stopped at stage {}", self.stage.as_str());
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stage(&self) -> CalibrationStage {
        self.stage
    }

    pub fn result(&self) -> Option<GestureThresholds> {
        self.result
    }

    pub fn update(
        &mut self,
        hand: Option<&TrackedHand>,
        gesture: &GestureFrame,
        now_ms: f64,
    ) -> CalibrationUpdate {
        if !self.running || self.stage == CalibrationStage::Done {
            return self.snapshot();
        }

        match self.stage {
            CalibrationStage::OpenPalm => self.update_open_palm(gesture, now_ms),
            CalibrationStage::Pinch => self.update_pinch(hand, gesture),
            CalibrationStage::Idle | CalibrationStage::Done => {}
        }
        self.snapshot()
    }

    fn update_open_palm(&mut self, gesture: &GestureFrame, now_ms: f64) {
        if !gesture.open_palm {
            if self.progress > 0.0 {
                debug!(
                    "Calibration open palm interrupted at {:.0}%",
                    self.progress * 100.0
                );
            }
            self.stage_started_at = now_ms;
            self.progress = 0.0;
            return;
        }

        let elapsed = now_ms - self.stage_started_at;
        self.progress = clamp((elapsed / self.config.open_palm_ms) as f32, 0.0, 1.0);
        if elapsed >= self.config.open_palm_ms {
            self.stage = CalibrationStage::Pinch;
            self.stage_started_at = now_ms;
            self.progress = 0.0;
            self.was_qualifying = false;
            info!(
                "🎯 Calibration: open palm done, pinch {} times",
                self.config.required_pinches
            );
        }
    }

    fn update_pinch(&mut self, hand: Option<&TrackedHand>, gesture: &GestureFrame) {
        let cfg = &self.config;
        let qualifying = gesture.pinch
            && hand
                .map(|h| h.confidence > cfg.min_confidence && h.stale_ms < cfg.max_stale_ms)
                .unwrap_or(false);

        if qualifying && !self.was_qualifying {
            self.pinch_ratios.push(gesture.pinch_ratio);
            debug!(
                "Calibration pinch {}/{} at ratio {:.3}",
                self.pinch_ratios.len(),
                self.config.required_pinches,
                gesture.pinch_ratio
            );
        }
        self.was_qualifying = qualifying;

        let required = self.config.required_pinches.max(1);
        self.progress = clamp(self.pinch_ratios.len() as f32 / required as f32, 0.0, 1.0);

        if self.pinch_ratios.len() >= required {
            let thresholds = derive_thresholds(&self.pinch_ratios, &self.config);
            info!(
                "✅ Calibration complete: enter={:.3} exit={:.3}",
                thresholds.pinch_enter, thresholds.pinch_exit
            );
            self.result = Some(thresholds);
            self.stage = CalibrationStage::Done;
            self.running = false;
        }
    }

    fn snapshot(&self) -> CalibrationUpdate {
        let done = self.stage == CalibrationStage::Done;
        CalibrationUpdate {
            stage: self.stage,
            progress: if done { 1.0 } else { self.progress },
            pinch_count: self.pinch_ratios.len(),
            completed: done,
            result: self.result,
        }
    }
}
