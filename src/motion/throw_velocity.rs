// src/motion/throw_velocity.rs
//
// Release velocity for thrown objects from a short trail of pointer/hand
// positions. Weighted least squares over the recent window (newest samples
// dominate), blended with the last-step velocity for responsiveness.

use crate::math::clamp;
use crate::types::{Point2, ThrowConfig};
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct ThrowEstimatorConfig {
    /// Sample weight = base + age^2, age in [0, 1] from oldest to newest
    pub weight_base: f32,
    pub regression_share: f32,
    pub instant_share: f32,
    /// Floor for the last-step dt (seconds)
    pub min_instant_dt_secs: f32,
    pub max_speed: f32,
    /// Below this speed the launch gets an upward bias
    pub min_toss_speed: f32,
    pub toss_bias: f32,
    /// Launch used when fewer than two samples are available
    pub default_launch: LaunchVector,
}

impl Default for ThrowEstimatorConfig {
    fn default() -> Self {
        Self {
            weight_base: 0.35,
            regression_share: 0.68,
            instant_share: 0.32,
            min_instant_dt_secs: 0.016,
            max_speed: 3.2,
            min_toss_speed: 0.25,
            toss_bias: 0.33,
            default_launch: LaunchVector { vx: 0.0, vy: -0.36 },
        }
    }
}

/// Velocity in normalized screen units per second (y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LaunchVector {
    pub vx: f32,
    pub vy: f32,
}

impl LaunchVector {
    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ThrowSample {
    point: Point2,
    timestamp_ms: f64,
}

pub struct ThrowVelocityTracker {
    samples: VecDeque<ThrowSample>,
    max_samples: usize,
    window_ms: f64,
    estimator: ThrowEstimatorConfig,
}

impl ThrowVelocityTracker {
    pub fn new(max_samples: usize, window_ms: f64) -> Self {
        let max_samples = max_samples.max(2);
        Self {
            samples: VecDeque::with_capacity(max_samples + 1),
            max_samples,
            window_ms,
            estimator: ThrowEstimatorConfig::default(),
        }
    }

    pub fn from_config(config: &ThrowConfig) -> Self {
        Self::new(config.max_samples, config.window_ms)
    }

    pub fn with_estimator(mut self, estimator: ThrowEstimatorConfig) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn push(&mut self, x: f32, y: f32, timestamp_ms: f64) {
        self.samples.push_back(ThrowSample {
            point: Point2::new(x, y),
            timestamp_ms,
        });
        while self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
        self.prune(timestamp_ms);
    }

    pub fn estimate(&mut self, now_ms: f64, speed_scale: f32) -> LaunchVector {
        self.prune(now_ms);
        let est = &self.estimator;
        if self.samples.len() < 2 {
            return est.default_launch;
        }

        let regression = self.regression_velocity();
        let instant = self.instant_velocity();
        let mut vx = (regression.vx * est.regression_share + instant.vx * est.instant_share)
            * speed_scale;
        let mut vy = (regression.vy * est.regression_share + instant.vy * est.instant_share)
            * speed_scale;

        let speed = vx.hypot(vy);
        if speed > est.max_speed {
            let k = est.max_speed / speed;
            vx *= k;
            vy *= k;
        }
        if speed < est.min_toss_speed {
            vy -= est.toss_bias;
        }

        LaunchVector {
            vx: clamp(vx, -est.max_speed, est.max_speed),
            vy: clamp(vy, -est.max_speed, est.max_speed),
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop samples older than the window, always keeping the newest two.
    fn prune(&mut self, now_ms: f64) {
        let cutoff = now_ms - self.window_ms;
        while self.samples.len() > 2
            && self
                .samples
                .front()
                .map(|s| s.timestamp_ms < cutoff)
                .unwrap_or(false)
        {
            self.samples.pop_front();
        }
    }

    /// Closed-form weighted least squares slope of x(t) and y(t)
    fn regression_velocity(&self) -> LaunchVector {
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return LaunchVector::default();
        };
        let first_ms = first.timestamp_ms;
        let span_ms = (last.timestamp_ms - first_ms).max(1.0);

        let mut sum_w = 0.0f64;
        let mut sum_wt = 0.0f64;
        let mut sum_wtt = 0.0f64;
        let mut sum_wx = 0.0f64;
        let mut sum_wxt = 0.0f64;
        let mut sum_wy = 0.0f64;
        let mut sum_wyt = 0.0f64;

        for sample in &self.samples {
            let t = (sample.timestamp_ms - first_ms) / 1000.0;
            let age = (sample.timestamp_ms - first_ms) / span_ms;
            let w = f64::from(self.estimator.weight_base) + age * age;
            let x = f64::from(sample.point.x);
            let y = f64::from(sample.point.y);
            sum_w += w;
            sum_wt += w * t;
            sum_wtt += w * t * t;
            sum_wx += w * x;
            sum_wxt += w * x * t;
            sum_wy += w * y;
            sum_wyt += w * y * t;
        }

        let denominator = sum_w * sum_wtt - sum_wt * sum_wt;
        if denominator.abs() < 1e-6 {
            return self.instant_velocity();
        }
        LaunchVector {
            vx: ((sum_w * sum_wxt - sum_wt * sum_wx) / denominator) as f32,
            vy: ((sum_w * sum_wyt - sum_wt * sum_wy) / denominator) as f32,
        }
    }

    fn instant_velocity(&self) -> LaunchVector {
        let n = self.samples.len();
        if n < 2 {
            return LaunchVector::default();
        }
        let last = self.samples[n - 1];
        let prev = self.samples[n - 2];
        let dt = (((last.timestamp_ms - prev.timestamp_ms) / 1000.0) as f32)
            .max(self.estimator.min_instant_dt_secs);
        LaunchVector {
            vx: (last.point.x - prev.point.x) / dt,
            vy: (last.point.y - prev.point.y) / dt,
        }
    }
}

impl Default for ThrowVelocityTracker {
    fn default() -> Self {
        Self::from_config(&ThrowConfig::default())
    }
}
