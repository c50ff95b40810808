// src/config.rs

use crate::types::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config.sanitized())
    }

    /// Repair values that would break runtime invariants.
    pub fn sanitized(mut self) -> Self {
        let thresholds = self.gestures.sanitized();
        if thresholds != self.gestures {
            warn!(
                "⚠️  Gesture thresholds adjusted: enter {:.3}→{:.3}, exit {:.3}→{:.3}",
                self.gestures.pinch_enter,
                thresholds.pinch_enter,
                self.gestures.pinch_exit,
                thresholds.pinch_exit
            );
            self.gestures = thresholds;
        }

        if self.tracking.hysteresis_ms <= 0.0 {
            warn!(
                "⚠️  hysteresis_ms={} is not positive, using default",
                self.tracking.hysteresis_ms
            );
            self.tracking.hysteresis_ms = 250.0;
        }
        if !(1..=2).contains(&self.tracking.max_hands) {
            let clamped = self.tracking.max_hands.clamp(1, 2);
            warn!(
                "⚠️  max_hands={} out of range, using {}",
                self.tracking.max_hands, clamped
            );
            self.tracking.max_hands = clamped;
        }
        if self.tracking.lost_after_ms < 0.0 {
            self.tracking.lost_after_ms = 42.0;
        }
        if self.throw.max_samples < 2 {
            warn!(
                "⚠️  throw.max_samples={} too small, using 2",
                self.throw.max_samples
            );
            self.throw.max_samples = 2;
        }
        if self.replay.render_hz == 0 {
            self.replay.render_hz = 60;
        }
        self
    }
}
