// src/types.rs

use crate::gestures::GestureThresholds;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracking: TrackingConfig,
    pub gestures: GestureThresholds,
    pub throw: ThrowConfig,
    pub logging: LoggingConfig,
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// How long a slot keeps being reported after its last accepted detection
    pub hysteresis_ms: f64,
    /// Staleness after which a still-reported hand is flagged `lost`
    pub lost_after_ms: f64,
    /// Hands the detector looks for and the tracker keeps (1 or 2)
    pub max_hands: usize,
    /// Detections scoring below this are dropped before tracking
    pub min_detection_confidence: f32,
    /// Forwarded to the landmark model
    pub min_presence_confidence: f32,
    /// Forwarded to the landmark model
    pub min_tracking_confidence: f32,
    pub quality: QualityPreset,
    /// Mirror x before feeding pointer samples (selfie camera)
    pub mirror: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            hysteresis_ms: 250.0,
            lost_after_ms: 42.0,
            max_hands: 2,
            min_detection_confidence: 0.55,
            min_presence_confidence: 0.5,
            min_tracking_confidence: 0.5,
            quality: QualityPreset::Low,
            mirror: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualitySettings {
    pub width: u32,
    pub height: u32,
    pub inference_fps: u32,
}

impl QualityPreset {
    pub fn settings(&self) -> QualitySettings {
        match self {
            Self::Low => QualitySettings {
                width: 640,
                height: 360,
                inference_fps: 24,
            },
            Self::Medium => QualitySettings {
                width: 960,
                height: 540,
                inference_fps: 27,
            },
            Self::High => QualitySettings {
                width: 1280,
                height: 720,
                inference_fps: 30,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowConfig {
    /// Ring buffer capacity
    pub max_samples: usize,
    /// Samples older than this (relative to the newest push / estimate) are pruned
    pub window_ms: f64,
    pub hand_speed_scale: f32,
    pub pointer_speed_scale: f32,
}

impl Default for ThrowConfig {
    fn default() -> Self {
        Self {
            max_samples: 14,
            window_ms: 280.0,
            hand_speed_scale: 1.35,
            pointer_speed_scale: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub duration_secs: f64,
    /// Host render tick rate driving the tracker
    pub render_hz: u32,
    pub calibrate_first: bool,
    /// Extra per-frame timestamp noise added by the synthetic source
    pub frame_jitter_ms: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            duration_secs: 6.0,
            render_hz: 60,
            calibrate_first: false,
            frame_jitter_ms: 0.0,
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Normalized screen-space point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Normalized landmark coordinate; `z` is depth relative to the wrist
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> Point2 {
        Point2 {
            x: self.x,
            y: self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// ============================================================================
// DETECTOR BOUNDARY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// One raw per-frame hand observation from the landmark model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Normally 21 points; shorter vectors are tolerated downstream
    pub landmarks: Vec<Point3>,
    pub handedness: Handedness,
    /// Detector confidence in [0, 1]
    pub score: f32,
}
