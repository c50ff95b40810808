// src/lib.rs
//
// Stabilised two-hand tracking and debounced gesture events from per-frame
// hand landmark detections.

pub mod config;
pub mod filtering;
pub mod gestures;
pub mod landmarks;
pub mod math;
pub mod motion;
pub mod pipeline;
pub mod tracking;
pub mod types;

pub use gestures::{
    CalibrationSession, GestureEngine, GestureFrame, GestureLabel, GestureThresholds,
};
pub use motion::{LaunchVector, ThrowVelocityTracker};
pub use pipeline::{GesturePipeline, PipelineEvent, PipelineOutput, TrackingHint};
pub use tracking::{
    DetectionSource, DetectorOptions, HandTrackingRuntime, SlotTracker, SyntheticHandSource,
    TrackedHand, TrackerFrame,
};
pub use types::{Config, Detection, Handedness, Point2, Point3};
