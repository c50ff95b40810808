// src/landmarks.rs
//
// Hand landmark topology (21-point hand model) and geometry derived from it.

use crate::math::planar_distance;
use crate::types::{BoundingBox, Point2, Point3};

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Skeleton edges for consumers that draw the hand
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),
    (THUMB_CMC, THUMB_MCP),
    (THUMB_MCP, THUMB_IP),
    (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),
    (INDEX_MCP, INDEX_PIP),
    (INDEX_PIP, INDEX_DIP),
    (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP),
    (MIDDLE_MCP, MIDDLE_PIP),
    (MIDDLE_PIP, MIDDLE_DIP),
    (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),
    (RING_MCP, RING_PIP),
    (RING_PIP, RING_DIP),
    (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP),
    (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

pub type HandLandmarks = [Point3; LANDMARK_COUNT];

// ============================================================================
// DERIVED GEOMETRY
// ============================================================================

/// Palm anchor point. The wrist is the most stable landmark of the model.
pub fn palm_point(landmarks: &[Point3]) -> Option<Point2> {
    landmarks.get(WRIST).map(|p| p.xy())
}

/// Planar wrist-to-middle-knuckle distance, floored at `min_scale`.
pub fn hand_scale(landmarks: &[Point3], min_scale: f32) -> f32 {
    match (landmarks.get(WRIST), landmarks.get(MIDDLE_MCP)) {
        (Some(wrist), Some(middle)) => planar_distance(*wrist, *middle).max(min_scale),
        _ => min_scale,
    }
}

pub fn bounding_box(landmarks: &[Point3]) -> BoundingBox {
    if landmarks.is_empty() {
        return BoundingBox::default();
    }
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for p in landmarks {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Expand a possibly short landmark list to the full 21 points. A missing
/// index repeats the previous point (origin if nothing precedes it).
pub fn complete_landmarks(landmarks: &[Point3]) -> HandLandmarks {
    let mut out = [Point3::default(); LANDMARK_COUNT];
    for i in 0..LANDMARK_COUNT {
        out[i] = match landmarks.get(i) {
            Some(p) => *p,
            None if i > 0 => out[i - 1],
            None => Point3::default(),
        };
    }
    out
}
