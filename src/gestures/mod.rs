// src/gestures/mod.rs

pub mod calibration;
pub mod engine;
pub mod pose;
pub mod thresholds;

pub use calibration::{
    derive_thresholds, CalibrationConfig, CalibrationSession, CalibrationStage, CalibrationUpdate,
};
pub use engine::{
    GestureEngine, GestureEngineConfig, GestureEvents, GestureFrame, GestureInput, GestureLabel,
};
pub use pose::{classify_pose, FingerStates, PoseConfig, PoseReading};
pub use thresholds::{GestureThresholds, MIN_HYSTERESIS_BAND};
