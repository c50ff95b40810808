// src/pipeline/metrics.rs
//
// Counters and timings for the gesture pipeline. Cheap to clone; clones
// share the same counters so the host can read them while frames run.

use super::event_bus::PipelineEvent;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub frames_processed: Arc<AtomicU64>,
    pub frames_with_hand: Arc<AtomicU64>,
    pub flicker_frames: Arc<AtomicU64>,
    pub pinch_taps: Arc<AtomicU64>,
    pub pinch_holds: Arc<AtomicU64>,
    pub pinch_ends: Arc<AtomicU64>,
    pub open_palm_holds: Arc<AtomicU64>,
    pub fist_holds: Arc<AtomicU64>,
    pub releases: Arc<AtomicU64>,
    pub calibrations_completed: Arc<AtomicU64>,
    pub inference_latency_us: Arc<AtomicU64>,
    pub inference_fps: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            frames_processed: Arc::new(AtomicU64::new(0)),
            frames_with_hand: Arc::new(AtomicU64::new(0)),
            flicker_frames: Arc::new(AtomicU64::new(0)),
            pinch_taps: Arc::new(AtomicU64::new(0)),
            pinch_holds: Arc::new(AtomicU64::new(0)),
            pinch_ends: Arc::new(AtomicU64::new(0)),
            open_palm_holds: Arc::new(AtomicU64::new(0)),
            fist_holds: Arc::new(AtomicU64::new(0)),
            releases: Arc::new(AtomicU64::new(0)),
            calibrations_completed: Arc::new(AtomicU64::new(0)),
            inference_latency_us: Arc::new(AtomicU64::new(0)),
            inference_fps: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set(&self, gauge: &AtomicU64, value: u64) {
        gauge.store(value, Ordering::Relaxed);
    }

    pub fn record_event(&self, event: &PipelineEvent) {
        let counter = match event {
            PipelineEvent::PinchTap { .. } => &self.pinch_taps,
            PipelineEvent::PinchHoldStarted { .. } => &self.pinch_holds,
            PipelineEvent::PinchEnded { .. } => &self.pinch_ends,
            PipelineEvent::OpenPalmHold { .. } => &self.open_palm_holds,
            PipelineEvent::FistHold { .. } => &self.fist_holds,
            PipelineEvent::Released { .. } => &self.releases,
            PipelineEvent::CalibrationCompleted { .. } => &self.calibrations_completed,
            PipelineEvent::CalibrationStarted { .. } => return,
        };
        self.inc(counter);
    }

    /// Frames per wall-clock second since the metrics were created
    pub fn fps(&self) -> f64 {
        let frames = self.frames_processed.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        let frames = self.frames_processed.load(Ordering::Relaxed);
        let with_hand = self.frames_with_hand.load(Ordering::Relaxed);
        MetricsSummary {
            frames_processed: frames,
            frames_with_hand: with_hand,
            hand_presence_ratio: if frames > 0 {
                with_hand as f64 / frames as f64
            } else {
                0.0
            },
            flicker_frames: self.flicker_frames.load(Ordering::Relaxed),
            pinch_taps: self.pinch_taps.load(Ordering::Relaxed),
            pinch_holds: self.pinch_holds.load(Ordering::Relaxed),
            pinch_ends: self.pinch_ends.load(Ordering::Relaxed),
            open_palm_holds: self.open_palm_holds.load(Ordering::Relaxed),
            fist_holds: self.fist_holds.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            calibrations_completed: self.calibrations_completed.load(Ordering::Relaxed),
            last_inference_latency_us: self.inference_latency_us.load(Ordering::Relaxed),
            last_inference_fps: self.inference_fps.load(Ordering::Relaxed),
            fps: self.fps(),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub frames_processed: u64,
    pub frames_with_hand: u64,
    pub hand_presence_ratio: f64,
    pub flicker_frames: u64,
    pub pinch_taps: u64,
    pub pinch_holds: u64,
    pub pinch_ends: u64,
    pub open_palm_holds: u64,
    pub fist_holds: u64,
    pub releases: u64,
    pub calibrations_completed: u64,
    pub last_inference_latency_us: u64,
    pub last_inference_fps: u64,
    pub fps: f64,
    pub elapsed_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = PipelineMetrics::new();
        let handle = metrics.clone();
        metrics.inc(&metrics.frames_processed);
        handle.inc(&handle.frames_processed);
        assert_eq!(metrics.summary().frames_processed, 2);
    }

    #[test]
    fn test_events_map_to_counters() {
        let metrics = PipelineMetrics::new();
        metrics.record_event(&PipelineEvent::PinchTap {
            timestamp_ms: 0.0,
            slot_id: 0,
        });
        metrics.record_event(&PipelineEvent::CalibrationStarted { timestamp_ms: 0.0 });
        let summary = metrics.summary();
        assert_eq!(summary.pinch_taps, 1);
        assert_eq!(summary.calibrations_completed, 0);
    }

    #[test]
    fn test_summary_serializes() {
        let metrics = PipelineMetrics::new();
        metrics.inc(&metrics.frames_processed);
        metrics.inc(&metrics.frames_with_hand);
        let json = serde_json::to_value(metrics.summary()).unwrap();
        assert_eq!(json["hand_presence_ratio"], 1.0);
    }
}
