// src/gestures/pose.rs
//
// Static hand pose classification from finger extension.
// A finger is extended when its tip is clearly farther from the wrist than
// its middle joint; the thumb is judged against the index knuckle instead.

use crate::landmarks::{
    HandLandmarks, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, PINKY_MCP,
    PINKY_PIP, PINKY_TIP, RING_MCP, RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP, WRIST,
};
use crate::math::distance3d;
use crate::types::Point3;

#[derive(Debug, Clone)]
pub struct PoseConfig {
    /// tip-to-wrist must exceed pip-to-wrist by this factor
    pub finger_tip_margin: f32,
    /// pip-to-wrist must exceed mcp-to-wrist by this factor
    pub finger_pip_margin: f32,
    /// thumb tip must be this much farther from the index knuckle than the IP joint
    pub thumb_tip_margin: f32,
    pub open_palm_min_fingers: usize,
    pub fist_max_fingers: usize,
    /// Mean fingertip-to-wrist distance of a fist, in palm sizes
    pub fist_max_reach: f32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            finger_tip_margin: 1.04,
            finger_pip_margin: 0.96,
            thumb_tip_margin: 1.05,
            open_palm_min_fingers: 4,
            fist_max_fingers: 1,
            fist_max_reach: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    pub fn extended_count(&self) -> usize {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
            .iter()
            .filter(|&&e| e)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseReading {
    pub fingers: FingerStates,
    pub open_palm: bool,
    pub fist: bool,
}

pub fn finger_extended(
    tip: Point3,
    pip: Point3,
    mcp: Point3,
    wrist: Point3,
    cfg: &PoseConfig,
) -> bool {
    let tip_distance = distance3d(tip, wrist);
    let pip_distance = distance3d(pip, wrist);
    let mcp_distance = distance3d(mcp, wrist);
    tip_distance > pip_distance * cfg.finger_tip_margin
        && pip_distance > mcp_distance * cfg.finger_pip_margin
}

pub fn thumb_extended(
    tip: Point3,
    ip: Point3,
    index_mcp: Point3,
    wrist: Point3,
    cfg: &PoseConfig,
) -> bool {
    distance3d(tip, index_mcp) > distance3d(ip, index_mcp) * cfg.thumb_tip_margin
        && distance3d(tip, wrist) > distance3d(ip, wrist)
}

pub fn finger_states(lm: &HandLandmarks, cfg: &PoseConfig) -> FingerStates {
    let wrist = lm[WRIST];
    FingerStates {
        thumb: thumb_extended(lm[THUMB_TIP], lm[THUMB_IP], lm[INDEX_MCP], wrist, cfg),
        index: finger_extended(lm[INDEX_TIP], lm[INDEX_PIP], lm[INDEX_MCP], wrist, cfg),
        middle: finger_extended(lm[MIDDLE_TIP], lm[MIDDLE_PIP], lm[MIDDLE_MCP], wrist, cfg),
        ring: finger_extended(lm[RING_TIP], lm[RING_PIP], lm[RING_MCP], wrist, cfg),
        pinky: finger_extended(lm[PINKY_TIP], lm[PINKY_PIP], lm[PINKY_MCP], wrist, cfg),
    }
}

/// Mean distance of the four fingertips (thumb excluded) to the wrist
pub fn mean_tip_to_wrist(lm: &HandLandmarks) -> f32 {
    let wrist = lm[WRIST];
    [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP]
        .iter()
        .map(|&i| distance3d(lm[i], wrist))
        .sum::<f32>()
        / 4.0
}

pub fn classify_pose(lm: &HandLandmarks, palm_size: f32, cfg: &PoseConfig) -> PoseReading {
    let fingers = finger_states(lm, cfg);
    let extended = fingers.extended_count();
    PoseReading {
        fingers,
        open_palm: extended >= cfg.open_palm_min_fingers,
        fist: extended <= cfg.fist_max_fingers
            && mean_tip_to_wrist(lm) < palm_size * cfg.fist_max_reach,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::complete_landmarks;

    fn open_hand() -> HandLandmarks {
        complete_landmarks(&[
            Point3::new(0.5, 0.82, 0.0),
            Point3::new(0.44, 0.74, 0.0),
            Point3::new(0.4, 0.66, 0.0),
            Point3::new(0.35, 0.61, 0.0),
            Point3::new(0.28, 0.57, 0.0),
            Point3::new(0.45, 0.66, 0.0),
            Point3::new(0.45, 0.58, 0.0),
            Point3::new(0.47, 0.49, 0.0),
            Point3::new(0.52, 0.38, 0.0),
            Point3::new(0.51, 0.66, 0.0),
            Point3::new(0.51, 0.57, 0.0),
            Point3::new(0.52, 0.48, 0.0),
            Point3::new(0.53, 0.37, 0.0),
            Point3::new(0.57, 0.67, 0.0),
            Point3::new(0.57, 0.59, 0.0),
            Point3::new(0.58, 0.51, 0.0),
            Point3::new(0.6, 0.42, 0.0),
            Point3::new(0.62, 0.69, 0.0),
            Point3::new(0.63, 0.62, 0.0),
            Point3::new(0.64, 0.55, 0.0),
            Point3::new(0.66, 0.48, 0.0),
        ])
    }

    fn fist_hand() -> HandLandmarks {
        let mut lm = open_hand();
        lm[THUMB_TIP] = Point3::new(0.41, 0.76, 0.0);
        lm[INDEX_TIP] = Point3::new(0.5, 0.74, 0.0);
        lm[MIDDLE_TIP] = Point3::new(0.51, 0.74, 0.0);
        lm[RING_TIP] = Point3::new(0.52, 0.75, 0.0);
        lm[PINKY_TIP] = Point3::new(0.53, 0.76, 0.0);
        lm
    }

    const PALM: f32 = 0.16;

    #[test]
    fn test_open_hand_has_all_fingers_extended() {
        let reading = classify_pose(&open_hand(), PALM, &PoseConfig::default());
        assert_eq!(reading.fingers.extended_count(), 5);
        assert!(reading.open_palm);
        assert!(!reading.fist);
    }

    #[test]
    fn test_fist_has_no_fingers_extended() {
        let reading = classify_pose(&fist_hand(), PALM, &PoseConfig::default());
        assert_eq!(reading.fingers, FingerStates::default());
        assert!(reading.fist);
        assert!(!reading.open_palm);
    }

    #[test]
    fn test_curled_but_far_hand_is_not_a_fist() {
        // same curl, but a palm size so small the fingertips look far away
        let reading = classify_pose(&fist_hand(), 0.02, &PoseConfig::default());
        assert!(!reading.fist, "fingertips beyond reach limit");
    }

    #[test]
    fn test_mean_tip_to_wrist() {
        let d = mean_tip_to_wrist(&fist_hand());
        assert!((d - 0.075).abs() < 0.01, "got {d}");
    }
}
