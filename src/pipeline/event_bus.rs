// src/pipeline/event_bus.rs
//
// Bounded queue of gesture-level events. The pipeline publishes, the host
// drains once per frame; game logic never reaches into engine state.

use crate::gestures::GestureThresholds;
use crate::motion::LaunchVector;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    PinchTap {
        timestamp_ms: f64,
        slot_id: usize,
    },

    PinchHoldStarted {
        timestamp_ms: f64,
        slot_id: usize,
    },

    PinchEnded {
        timestamp_ms: f64,
        duration_ms: f64,
    },

    OpenPalmHold {
        timestamp_ms: f64,
        slot_id: usize,
    },

    FistHold {
        timestamp_ms: f64,
        slot_id: usize,
    },

    /// A held object was let go (pinch release or pointer up)
    Released {
        timestamp_ms: f64,
        launch: LaunchVector,
        from_pointer: bool,
    },

    CalibrationStarted {
        timestamp_ms: f64,
    },

    CalibrationCompleted {
        timestamp_ms: f64,
        thresholds: GestureThresholds,
    },
}

impl PipelineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineEvent::PinchTap { .. } => "pinch_tap",
            PipelineEvent::PinchHoldStarted { .. } => "pinch_hold_started",
            PipelineEvent::PinchEnded { .. } => "pinch_ended",
            PipelineEvent::OpenPalmHold { .. } => "open_palm_hold",
            PipelineEvent::FistHold { .. } => "fist_hold",
            PipelineEvent::Released { .. } => "released",
            PipelineEvent::CalibrationStarted { .. } => "calibration_started",
            PipelineEvent::CalibrationCompleted { .. } => "calibration_completed",
        }
    }
}

pub struct EventBus {
    events: VecDeque<PipelineEvent>,
    max_pending: usize,
    dropped: u64,
}

impl EventBus {
    pub fn new(max_pending: usize) -> Self {
        let max_pending = max_pending.max(1);
        Self {
            events: VecDeque::with_capacity(max_pending),
            max_pending,
            dropped: 0,
        }
    }

    pub fn publish(&mut self, event: PipelineEvent) {
        if self.events.len() >= self.max_pending {
            if let Some(oldest) = self.events.pop_front() {
                self.dropped += 1;
                warn!(
                    "Event bus full ({} events), dropping oldest ({})",
                    self.max_pending,
                    oldest.name()
                );
            }
        }
        self.events.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<PipelineEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.events.len()
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap(t: f64) -> PipelineEvent {
        PipelineEvent::PinchTap {
            timestamp_ms: t,
            slot_id: 0,
        }
    }

    #[test]
    fn test_drain_preserves_order() {
        let mut bus = EventBus::new(8);
        bus.publish(tap(1.0));
        bus.publish(PipelineEvent::CalibrationStarted { timestamp_ms: 2.0 });
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], tap(1.0));
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops_oldest() {
        let mut bus = EventBus::new(2);
        for t in 0..3 {
            bus.publish(tap(t as f64));
        }
        assert_eq!(bus.dropped_count(), 1);
        assert_eq!(bus.drain(), vec![tap(1.0), tap(2.0)]);
    }

    #[test]
    fn test_events_serialize_with_type_tag() {
        let json = serde_json::to_string(&tap(5.0)).unwrap();
        assert!(json.contains("\"type\":\"pinch_tap\""), "{json}");
    }
}
