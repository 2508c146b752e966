//! Hand landmark input types.
//!
//! Landmarks arrive from the hand tracker as 21 points per hand in normalized
//! image space (x right, y down, both in \[0, 1\]; z is depth relative to the
//! wrist). A [`LandmarkBatch`] holds every hand seen in one camera frame.

use smallvec::SmallVec;
use thiserror::Error;

pub const LANDMARK_COUNT: usize = 21;
/// Floats per hand in the flat wire layout (`x, y, z` per landmark).
pub const FLOATS_PER_HAND: usize = LANDMARK_COUNT * 3;

pub const WRIST: usize = 0;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
/// Wrist plus the four finger MCPs; their mean is the palm center.
pub const PALM_POINTS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("expected {expected} landmark floats, got {got}")]
    BadLength { expected: usize, got: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("unknown handedness label {0:?}")]
    UnknownLabel(String),
}

/// Exactly 21 validated landmarks for one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarks(pub [Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    #[inline]
    pub fn get(&self, index: usize) -> &Landmark {
        &self.0[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.0
    }

    /// Mean of the wrist and the four finger MCPs.
    pub fn palm_center(&self) -> (f32, f32) {
        let (sx, sy) = PALM_POINTS
            .iter()
            .fold((0.0, 0.0), |(sx, sy), &i| (sx + self.0[i].x, sy + self.0[i].y));
        let n = PALM_POINTS.len() as f32;
        (sx / n, sy / n)
    }

    /// Flip horizontally in image space (`x -> 1 - x`).
    pub fn mirrored(&self) -> Self {
        let mut out = self.0;
        for p in &mut out {
            p.x = 1.0 - p.x;
        }
        Self(out)
    }
}

impl TryFrom<&[Landmark]> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(points: &[Landmark]) -> Result<Self, Self::Error> {
        let arr: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::BadLength {
                expected: LANDMARK_COUNT,
                got: points.len(),
            })?;
        if let Some(index) = arr.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(Self(arr))
    }
}

impl TryFrom<&[f32]> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(flat: &[f32]) -> Result<Self, Self::Error> {
        if flat.len() != FLOATS_PER_HAND {
            return Err(LandmarkError::BadLength {
                expected: FLOATS_PER_HAND,
                got: flat.len(),
            });
        }
        let points: SmallVec<[Landmark; LANDMARK_COUNT]> = flat
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect();
        HandLandmarks::try_from(points.as_slice())
    }
}

/// Handedness as reported by the tracker (image-space label, not the user's hand).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn from_label(label: &str) -> Result<Self, LandmarkError> {
        match label {
            "Left" | "left" => Ok(Handedness::Left),
            "Right" | "right" => Ok(Handedness::Right),
            other => Err(LandmarkError::UnknownLabel(other.to_string())),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedHand {
    pub landmarks: HandLandmarks,
    pub handedness: Handedness,
}

/// All hands detected in one camera frame. Empty means "no hands".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkBatch {
    pub hands: SmallVec<[DetectedHand; 2]>,
}

impl LandmarkBatch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, landmarks: HandLandmarks, handedness: Handedness) {
        self.hands.push(DetectedHand {
            landmarks,
            handedness,
        });
    }

    /// Parse the flat wire layout: `labels.len()` hands, 63 floats each.
    pub fn from_flat<S: AsRef<str>>(flat: &[f32], labels: &[S]) -> Result<Self, LandmarkError> {
        let expected = labels.len() * FLOATS_PER_HAND;
        if flat.len() != expected {
            return Err(LandmarkError::BadLength {
                expected,
                got: flat.len(),
            });
        }
        let mut batch = Self::empty();
        for (chunk, label) in flat.chunks_exact(FLOATS_PER_HAND).zip(labels) {
            let handedness = Handedness::from_label(label.as_ref())?;
            batch.push(HandLandmarks::try_from(chunk)?, handedness);
        }
        Ok(batch)
    }

    /// First hand with the given tracker label.
    pub fn find(&self, handedness: Handedness) -> Option<&HandLandmarks> {
        self.hands
            .iter()
            .find(|h| h.handedness == handedness)
            .map(|h| &h.landmarks)
    }
}
