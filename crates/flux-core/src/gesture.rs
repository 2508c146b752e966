//! Geometric hand-pose classifier.
//!
//! Every threshold is scaled by the hand's apparent size (wrist to middle MCP)
//! so detection works at any camera distance and resolution. The functions are
//! pure: one hand's landmarks in, facts about that hand out.

use crate::landmarks::*;

const HAND_SIZE_FALLBACK: f32 = 0.1;
const FIST_RADIUS_SCALE: f32 = 0.9;
const FIST_MIN_CLOSED_TIPS: usize = 4;
const PINCH_SCALE: f32 = 0.35;

/// Per-finger extension test parameters: landmark indices plus the
/// tip/MCP distance ratio and the vertical margin over the PIP joint.
#[derive(Clone, Copy, Debug)]
struct FingerTest {
    tip: usize,
    pip: usize,
    mcp: usize,
    ratio: f32,
    y_margin: f32,
}

const fn finger(tip: usize, pip: usize, mcp: usize, ratio: f32, y_margin: f32) -> FingerTest {
    FingerTest {
        tip,
        pip,
        mcp,
        ratio,
        y_margin,
    }
}

// Counting thresholds: index, middle, ring, pinky.
const COUNT_FINGERS: [FingerTest; 4] = [
    finger(INDEX_TIP, INDEX_PIP, INDEX_MCP, 1.08, 0.018),
    finger(MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP, 1.08, 0.018),
    finger(RING_TIP, RING_PIP, RING_MCP, 1.06, 0.017),
    finger(PINKY_TIP, PINKY_PIP, PINKY_MCP, 1.04, 0.017),
];
const COUNT_THUMB: (f32, f32) = (0.12, 0.35);

// Open-hand thresholds are slightly looser per finger but need all five.
const OPEN_FINGERS: [FingerTest; 4] = [
    finger(INDEX_TIP, INDEX_PIP, INDEX_MCP, 1.06, 0.015),
    finger(MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP, 1.06, 0.015),
    finger(RING_TIP, RING_PIP, RING_MCP, 1.04, 0.014),
    finger(PINKY_TIP, PINKY_PIP, PINKY_MCP, 1.02, 0.014),
];
const OPEN_THUMB: (f32, f32) = (0.08, 0.28);

/// Discrete right-hand gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    #[default]
    None,
    Fist,
    Point,
    Duo,
    Tri,
    Quad,
    Open,
    Pinch,
}

impl Gesture {
    /// Category for a finger count when no pinch is present.
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Gesture::Fist,
            1 => Gesture::Point,
            2 => Gesture::Duo,
            3 => Gesture::Tri,
            4 => Gesture::Quad,
            _ => Gesture::Open,
        }
    }
}

/// Everything the classifier derives from one hand in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandReading {
    /// Extended fingers, forced to 0 when `is_fist`.
    pub finger_count: u8,
    pub gesture: Gesture,
    pub is_fist: bool,
    pub is_pinch: bool,
    pub is_open: bool,
    /// Wrist to middle MCP in normalized units; larger means closer to the camera.
    pub hand_size: f32,
}

/// Wrist to middle-finger MCP, falling back to a nominal size for degenerate input.
pub fn hand_size(hand: &HandLandmarks) -> f32 {
    let size = hand.get(WRIST).distance(hand.get(MIDDLE_MCP));
    if size > 0.0 {
        size
    } else {
        HAND_SIZE_FALLBACK
    }
}

/// Image-space handedness inferred from knuckle order.
pub fn infer_handedness(hand: &HandLandmarks) -> Handedness {
    if hand.get(INDEX_MCP).x < hand.get(PINKY_MCP).x {
        Handedness::Right
    } else {
        Handedness::Left
    }
}

fn finger_extended(hand: &HandLandmarks, test: &FingerTest) -> bool {
    let wrist = hand.get(WRIST);
    let tip = hand.get(test.tip);
    let above_pip = tip.y < hand.get(test.pip).y - test.y_margin;
    let reaches = wrist.distance(tip) > wrist.distance(hand.get(test.mcp)) * test.ratio;
    above_pip && reaches
}

fn thumb_extended_with(hand: &HandLandmarks, size: f32, offset_scale: f32, spread_scale: f32) -> bool {
    let tip = hand.get(THUMB_TIP);
    let dir = tip.x - hand.get(THUMB_IP).x;
    let threshold = size * offset_scale;
    let outward = match infer_handedness(hand) {
        Handedness::Right => dir < -threshold,
        Handedness::Left => dir > threshold,
    };
    // A thumb resting on the palm can still point sideways; require real spread.
    outward && tip.distance(hand.get(THUMB_MCP)) >= size * spread_scale
}

/// Thumb extension using the counting thresholds.
pub fn thumb_extended(hand: &HandLandmarks) -> bool {
    thumb_extended_with(hand, hand_size(hand), COUNT_THUMB.0, COUNT_THUMB.1)
}

pub fn count_fingers(hand: &HandLandmarks) -> u8 {
    let fingers = COUNT_FINGERS
        .iter()
        .filter(|t| finger_extended(hand, t))
        .count() as u8;
    fingers + thumb_extended(hand) as u8
}

pub fn is_fist(hand: &HandLandmarks) -> bool {
    let wrist = hand.get(WRIST);
    let radius = hand_size(hand) * FIST_RADIUS_SCALE;
    let closed = FINGERTIPS
        .iter()
        .filter(|&&tip| wrist.distance(hand.get(tip)) < radius)
        .count();
    closed >= FIST_MIN_CLOSED_TIPS
}

pub fn is_pinch(hand: &HandLandmarks) -> bool {
    hand.get(THUMB_TIP).distance(hand.get(INDEX_TIP)) < hand_size(hand) * PINCH_SCALE
}

pub fn is_open_hand(hand: &HandLandmarks) -> bool {
    OPEN_FINGERS.iter().all(|t| finger_extended(hand, t))
        && thumb_extended_with(hand, hand_size(hand), OPEN_THUMB.0, OPEN_THUMB.1)
}

/// Classify one hand. Fist wins over the extension count; pinch wins over every category.
pub fn classify(hand: &HandLandmarks) -> HandReading {
    let fist = is_fist(hand);
    let pinch = is_pinch(hand);
    let finger_count = if fist { 0 } else { count_fingers(hand) };
    let gesture = if pinch {
        Gesture::Pinch
    } else {
        Gesture::from_count(finger_count)
    };
    HandReading {
        finger_count,
        gesture,
        is_fist: fist,
        is_pinch: pinch,
        is_open: is_open_hand(hand),
        hand_size: hand_size(hand),
    }
}

/// Classify raw points, treating malformed input as "no hand".
pub fn classify_points(points: &[Landmark]) -> HandReading {
    match HandLandmarks::try_from(points) {
        Ok(hand) => classify(&hand),
        Err(e) => {
            log::warn!("ignoring hand: {e}");
            HandReading::default()
        }
    }
}
