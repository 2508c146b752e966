// Synthetic hands for host-side tests.
//
// Image space, y down. The base hand faces the camera with the index knuckle
// left of the pinky knuckle, which the classifier infers as a right hand.
// `mirror` flips it into a left hand.

#![allow(dead_code)]

use flux_core::landmarks::*;
use flux_core::{HandLandmarks, Handedness, Landmark, LandmarkBatch};

const MCP_Y: f32 = 0.6;
const FINGER_X: [f32; 4] = [0.44, 0.48, 0.52, 0.56];
const FINGER_BASE: [usize; 4] = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

#[derive(Clone, Copy, PartialEq)]
enum Pose {
    Extended,
    Curled,
    Fist,
}

fn finger_y(pose: Pose) -> [f32; 3] {
    match pose {
        Pose::Extended => [0.5, 0.45, 0.4],
        Pose::Curled => [0.54, 0.57, 0.60],
        Pose::Fist => [0.55, 0.6, 0.66],
    }
}

fn build(fingers: [Pose; 4], thumb_out: bool) -> HandLandmarks {
    let mut pts = [Landmark::default(); 21];
    pts[WRIST] = Landmark::new(0.5, 0.8, 0.0);
    pts[1] = Landmark::new(0.43, 0.75, 0.0);
    pts[THUMB_MCP] = Landmark::new(0.40, 0.70, 0.0);
    if thumb_out {
        pts[THUMB_IP] = Landmark::new(0.36, 0.66, 0.0);
        pts[THUMB_TIP] = Landmark::new(0.31, 0.62, 0.0);
    } else {
        pts[THUMB_IP] = Landmark::new(0.42, 0.68, 0.0);
        pts[THUMB_TIP] = Landmark::new(0.46, 0.66, 0.0);
    }
    for (f, pose) in fingers.iter().enumerate() {
        let mcp = FINGER_BASE[f];
        let x = FINGER_X[f];
        pts[mcp] = Landmark::new(x, MCP_Y, 0.0);
        for (k, y) in finger_y(*pose).iter().enumerate() {
            pts[mcp + 1 + k] = Landmark::new(x, *y, 0.0);
        }
    }
    HandLandmarks(pts)
}

/// Raise `n` fingers: index, middle, ring, pinky, then the thumb.
/// `n >= 1` keeps the index up, so no pinch is read.
pub fn fingers(n: u8) -> HandLandmarks {
    let mut poses = [Pose::Curled; 4];
    for pose in poses.iter_mut().take(n.min(4) as usize) {
        *pose = Pose::Extended;
    }
    build(poses, n >= 5)
}

pub fn open_hand() -> HandLandmarks {
    fingers(5)
}

/// Tight fist. The tucked thumb also touches the index tip, so it reads as a pinch too.
pub fn fist() -> HandLandmarks {
    build([Pose::Fist; 4], false)
}

pub fn mirror(hand: &HandLandmarks) -> HandLandmarks {
    hand.mirrored()
}

pub fn flat(hand: &HandLandmarks) -> Vec<f32> {
    hand.points().iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

/// Batch holding only the user's left hand (selfie camera: tracker label "Right").
pub fn left_only(hand: HandLandmarks) -> LandmarkBatch {
    let mut batch = LandmarkBatch::empty();
    batch.push(hand, Handedness::Right);
    batch
}

/// Batch holding only the user's right hand (tracker label "Left").
pub fn right_only(hand: HandLandmarks) -> LandmarkBatch {
    let mut batch = LandmarkBatch::empty();
    batch.push(hand, Handedness::Left);
    batch
}

pub fn both(left: HandLandmarks, right: HandLandmarks) -> LandmarkBatch {
    let mut batch = LandmarkBatch::empty();
    batch.push(left, Handedness::Right);
    batch.push(right, Handedness::Left);
    batch
}
