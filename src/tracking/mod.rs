// src/tracking/mod.rs

mod handedness_vote;
pub mod runtime;
pub mod slot_tracker;
pub mod synthetic;

pub use handedness_vote::{resolve_handedness, HandednessVote};
pub use runtime::{DetectionSource, DetectorOptions, HandTrackingRuntime, TrackerFrame};
pub use slot_tracker::{SlotTracker, SlotTrackerConfig, TrackedHand, SLOT_COUNT};
pub use synthetic::SyntheticHandSource;
