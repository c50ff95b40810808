// src/pipeline/dominant.rs

use crate::tracking::TrackedHand;

/// Hand that drives gestures: highest confidence, ties go to the lower slot.
pub fn pick_dominant_hand(hands: &[TrackedHand]) -> Option<&TrackedHand> {
    hands.iter().fold(None, |best: Option<&TrackedHand>, hand| match best {
        Some(b)
            if b.confidence > hand.confidence
                || (b.confidence == hand.confidence && b.slot_id <= hand.slot_id) =>
        {
            Some(b)
        }
        _ => Some(hand),
    })
}
