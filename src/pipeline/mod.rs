// src/pipeline/mod.rs

pub mod dominant;
pub mod event_bus;
pub mod metrics;
pub mod orchestrator;

pub use dominant::pick_dominant_hand;
pub use event_bus::{EventBus, PipelineEvent};
pub use metrics::{MetricsSummary, PipelineMetrics};
pub use orchestrator::{GesturePipeline, PipelineOutput, TrackingHint};
