// src/filtering/one_euro.rs
//
// One Euro filter: adaptive low-pass for a single noisy scalar.
// Smooth when the signal is nearly static, low-lag when it moves fast.

use std::f32::consts::PI;

/// Smallest time step accepted, avoids divide-by-near-zero blowups
pub const MIN_DT_SECS: f32 = 1.0 / 120.0;

#[derive(Debug, Clone, Default)]
struct LowPassFilter {
    value: Option<f32>,
}

impl LowPassFilter {
    fn filter(&mut self, next: f32, alpha: f32) -> f32 {
        let value = match self.value {
            Some(prev) => alpha * next + (1.0 - alpha) * prev,
            None => next,
        };
        self.value = Some(value);
        value
    }

    fn reset(&mut self) {
        self.value = None;
    }
}

/// Smoothing factor for a first-order low-pass at `cutoff` Hz
fn smoothing_factor(dt: f32, cutoff: f32) -> f32 {
    let tau = 1.0 / (2.0 * PI * cutoff);
    1.0 / (1.0 + tau / dt)
}

#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    /// Cutoff (Hz) at rest - lower = smoother when static
    min_cutoff: f32,
    /// Cutoff gain per unit of filtered speed - higher = less lag when fast
    beta: f32,
    /// Fixed cutoff (Hz) of the derivative filter
    d_cutoff: f32,

    value_filter: LowPassFilter,
    derivative_filter: LowPassFilter,
    previous_raw: Option<f32>,
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f32, beta: f32, d_cutoff: f32) -> Self {
        Self {
            min_cutoff,
            beta,
            d_cutoff,
            value_filter: LowPassFilter::default(),
            derivative_filter: LowPassFilter::default(),
            previous_raw: None,
        }
    }

    /// Filter one sample. `dt` is the elapsed time in seconds since the
    /// previous sample; the first sample after construction or `reset()`
    /// passes through unchanged.
    pub fn filter(&mut self, next: f32, dt: f32) -> f32 {
        let dt = dt.max(MIN_DT_SECS);
        let Some(previous) = self.previous_raw else {
            self.previous_raw = Some(next);
            return self.value_filter.filter(next, 1.0);
        };

        let derivative = (next - previous) / dt;
        self.previous_raw = Some(next);

        let filtered_derivative = self
            .derivative_filter
            .filter(derivative, smoothing_factor(dt, self.d_cutoff));
        let cutoff = self.min_cutoff + self.beta * filtered_derivative.abs();
        self.value_filter.filter(next, smoothing_factor(dt, cutoff))
    }

    pub fn reset(&mut self) {
        self.value_filter.reset();
        self.derivative_filter.reset();
        self.previous_raw = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.previous_raw.is_some()
    }
}

impl Default for OneEuroFilter {
    /// Tuned for normalized landmark coordinates at 24-30 fps
    fn default() -> Self {
        Self::new(1.25, 0.12, 1.0)
    }
}
