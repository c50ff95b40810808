// src/motion/mod.rs

pub mod throw_velocity;

pub use throw_velocity::{LaunchVector, ThrowEstimatorConfig, ThrowVelocityTracker};
