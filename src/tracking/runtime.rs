// src/tracking/runtime.rs
//
// Per-frame driver around a detection source and the slot tracker.
// The host calls `tick` from its render loop; inference is paced to the
// quality preset's fps and measured (rolling fps, wall-clock latency).

use super::slot_tracker::{SlotTracker, SlotTrackerConfig, TrackedHand, SLOT_COUNT};
use crate::types::{Detection, TrackingConfig};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, error, info};

const FPS_WINDOW_MS: f64 = 1000.0;

/// Model options handed to the detection source once, when the runtime is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectorOptions {
    pub max_hands: usize,
    pub min_detection_confidence: f32,
    pub min_presence_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl DetectorOptions {
    pub fn from_tracking(config: &TrackingConfig) -> Self {
        Self {
            max_hands: config.max_hands.clamp(1, SLOT_COUNT),
            min_detection_confidence: config.min_detection_confidence,
            min_presence_confidence: config.min_presence_confidence,
            min_tracking_confidence: config.min_tracking_confidence,
        }
    }
}

/// Boundary to the landmark model. Implementations return the raw
/// detections for the frame captured at `now_ms`.
pub trait DetectionSource {
    fn detect(&mut self, now_ms: f64) -> Result<Vec<Detection>>;

    fn configure(&mut self, _options: &DetectorOptions) {}

    fn name(&self) -> &str {
        "detector"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackerFrame {
    pub timestamp_ms: f64,
    /// Frames processed in the trailing second
    pub inference_fps: u32,
    /// Wall-clock time spent in detect + track for this frame
    pub inference_latency_ms: f64,
    /// 0-2 hands sorted by slot id
    pub hands: Vec<TrackedHand>,
}

pub struct HandTrackingRuntime<S: DetectionSource> {
    source: S,
    tracker: SlotTracker,
    target_fps: u32,
    min_detection_confidence: f32,
    running: bool,
    last_inference_ms: Option<f64>,
    inference_times: VecDeque<f64>,
    frames_processed: u64,
}

impl<S: DetectionSource> HandTrackingRuntime<S> {
    pub fn new(mut source: S, config: &TrackingConfig) -> Self {
        let quality = config.quality.settings();
        let options = DetectorOptions::from_tracking(config);
        debug!("{} configured with {:?}", source.name(), options);
        source.configure(&options);
        Self {
            source,
            tracker: SlotTracker::new(SlotTrackerConfig::from_tracking(config)),
            target_fps: quality.inference_fps.max(1),
            min_detection_confidence: config.min_detection_confidence,
            running: false,
            last_inference_ms: None,
            inference_times: VecDeque::new(),
            frames_processed: 0,
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.tracker.reset();
        self.last_inference_ms = None;
        self.inference_times.clear();
        info!(
            "▶️  Hand tracking started ({} @ {} fps)",
            self.source.name(),
            self.target_fps
        );
    }

    pub fn stop(&mut self) {
        if self.running {
            info!(
                "⏹️  Hand tracking stopped after {} frames",
                self.frames_processed
            );
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Drop slot state; the next detections are acquired cold.
    pub fn reset_tracking(&mut self) {
        self.tracker.reset();
    }

    pub fn tracker(&self) -> &SlotTracker {
        &self.tracker
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Run one scheduled tick. Returns `Ok(None)` when stopped or when the
    /// inference interval has not elapsed yet. A detector error stops the
    /// runtime; the caller decides whether to restart.
    pub fn tick(&mut self, now_ms: f64) -> Result<Option<TrackerFrame>> {
        if !self.running {
            return Ok(None);
        }

        let interval_ms = 1000.0 / f64::from(self.target_fps);
        if let Some(last) = self.last_inference_ms {
            if now_ms - last < interval_ms {
                return Ok(None);
            }
        }
        self.last_inference_ms = Some(now_ms);

        let started = Instant::now();
        let mut detections = match self.source.detect(now_ms) {
            Ok(detections) => detections,
            Err(err) => {
                self.running = false;
                error!("❌ {} failed, tracking stopped: {:#}", self.source.name(), err);
                return Err(err).with_context(|| {
                    format!("{} failed at t={:.0}ms", self.source.name(), now_ms)
                });
            }
        };
        detections.retain(|d| d.score >= self.min_detection_confidence);

        let hands = self.tracker.update(&detections, now_ms);
        let inference_latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.frames_processed += 1;
        let inference_fps = self.record_inference(now_ms);

        Ok(Some(TrackerFrame {
            timestamp_ms: now_ms,
            inference_fps,
            inference_latency_ms,
            hands,
        }))
    }

    fn record_inference(&mut self, now_ms: f64) -> u32 {
        self.inference_times.push_back(now_ms);
        let cutoff = now_ms - FPS_WINDOW_MS;
        while self
            .inference_times
            .front()
            .map(|&t| t < cutoff)
            .unwrap_or(false)
        {
            self.inference_times.pop_front();
        }
        self.inference_times.len() as u32
    }
}
