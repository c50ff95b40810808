// src/tracking/handedness_vote.rs
//
// Fixed-capacity ring of recent handedness labels with a running tally.
// Stops single noisy frames from flapping a slot between Left and Right.

use crate::types::Handedness;
use std::collections::VecDeque;

/// Majority vote over a tally; ties keep `previous`.
pub fn resolve_handedness(left: usize, right: usize, previous: Handedness) -> Handedness {
    if left > right {
        Handedness::Left
    } else if right > left {
        Handedness::Right
    } else {
        previous
    }
}

#[derive(Debug, Clone)]
pub struct HandednessVote {
    ring: VecDeque<Handedness>,
    capacity: usize,
    left: usize,
    right: usize,
}

impl HandednessVote {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: VecDeque::with_capacity(capacity),
            capacity,
            left: 0,
            right: 0,
        }
    }

    pub fn push(&mut self, label: Handedness) {
        if self.ring.len() == self.capacity {
            if let Some(evicted) = self.ring.pop_front() {
                self.untally(evicted);
            }
        }
        self.ring.push_back(label);
        match label {
            Handedness::Left => self.left += 1,
            Handedness::Right => self.right += 1,
        }
    }

    fn untally(&mut self, label: Handedness) {
        match label {
            Handedness::Left => self.left = self.left.saturating_sub(1),
            Handedness::Right => self.right = self.right.saturating_sub(1),
        }
    }

    pub fn resolve(&self, previous: Handedness) -> Handedness {
        resolve_handedness(self.left, self.right, previous)
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn clear(&mut self) {
        self.ring.clear();
        self.left = 0;
        self.right = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Handedness::{Left, Right};

    #[test]
    fn test_majority_wins() {
        let mut vote = HandednessVote::new(10);
        for label in [Right, Right, Left, Right] {
            vote.push(label);
        }
        assert_eq!(vote.resolve(Left), Right);
    }

    #[test]
    fn test_tie_keeps_previous() {
        let mut vote = HandednessVote::new(10);
        vote.push(Left);
        vote.push(Right);
        assert_eq!(vote.resolve(Left), Left);
        assert_eq!(vote.resolve(Right), Right);
        assert_eq!(resolve_handedness(0, 0, Left), Left);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut vote = HandednessVote::new(3);
        for label in [Left, Left, Left, Right, Right] {
            vote.push(label);
        }
        // ring now holds [Left, Right, Right]
        assert_eq!(vote.len(), 3);
        assert_eq!(vote.resolve(Left), Right);
    }

    #[test]
    fn test_clear() {
        let mut vote = HandednessVote::new(4);
        vote.push(Left);
        vote.clear();
        assert!(vote.is_empty());
        assert_eq!(vote.resolve(Right), Right);
    }
}
