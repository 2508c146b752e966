//! Hand state aggregation.
//!
//! `HandTracker` routes each detected hand to a role (left or right, from the
//! user's point of view), classifies it, runs the debounce channels and builds
//! an immutable [`HandState`] snapshot that the simulation reads once per tick.

use crate::debounce::Debouncer;
use crate::gesture::{classify, Gesture};
use crate::landmarks::{Handedness, HandLandmarks, LandmarkBatch, INDEX_TIP};
use crate::params::{text_config_for, TextConfig, TrackerParams};
use crate::world::WorldMapper;
use glam::Vec2;

/// What the left hand is currently asking for. Changes are reported to the
/// listener registered with [`HandTracker::on_left_action_change`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LeftAction {
    #[default]
    None,
    Burst,
    Sphere,
    Text(&'static str),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandState {
    pub left_present: bool,
    pub left_fingers: u8,
    pub left_fist: bool,
    pub left_pinch: bool,
    pub left_open: bool,
    pub left_burst: bool,
    /// Last known left palm; kept when the hand leaves so bursts and the sphere stay anchored.
    pub left_palm_world: Vec2,
    /// Apparent hand size, larger when the palm is near the camera.
    pub left_palm_depth: Option<f32>,
    pub left_config: Option<TextConfig>,
    pub right_present: bool,
    pub right_fingers: u8,
    pub right_gesture: Gesture,
    pub right_pinch: bool,
    pub right_open: bool,
    pub right_palm_world: Option<Vec2>,
    pub right_index_world: Option<Vec2>,
    pub left_action: LeftAction,
}

type ActionListener = Box<dyn FnMut(&LeftAction)>;

pub struct HandTracker {
    params: TrackerParams,
    left: Debouncer<(u8, bool)>,
    left_pinch: Debouncer<bool>,
    left_open: Debouncer<bool>,
    right: Debouncer<Gesture>,
    left_palm_world: Vec2,
    prev_action: LeftAction,
    listener: Option<ActionListener>,
}

impl HandTracker {
    pub fn new(params: TrackerParams) -> Self {
        let n = params.stable_frames;
        Self {
            left: Debouncer::new((0, false), n),
            left_pinch: Debouncer::new(false, n),
            left_open: Debouncer::new(false, n),
            right: Debouncer::new(Gesture::None, n),
            left_palm_world: Vec2::ZERO,
            prev_action: LeftAction::None,
            listener: None,
            params,
        }
    }

    /// Register the single left-action listener, replacing any previous one.
    pub fn on_left_action_change(&mut self, f: impl FnMut(&LeftAction) + 'static) {
        self.listener = Some(Box::new(f));
    }

    pub fn left_action(&self) -> LeftAction {
        self.prev_action
    }

    /// Split a batch into (left, right) hands from the user's point of view.
    /// When a role appears twice the later hand wins.
    fn route<'a>(&self, batch: &'a LandmarkBatch) -> (Option<&'a HandLandmarks>, Option<&'a HandLandmarks>) {
        let mut left = None;
        let mut right = None;
        for hand in &batch.hands {
            let role = if self.params.mirror_handedness {
                hand.handedness.opposite()
            } else {
                hand.handedness
            };
            match role {
                Handedness::Left => left = Some(&hand.landmarks),
                Handedness::Right => right = Some(&hand.landmarks),
            }
        }
        (left, right)
    }

    pub fn ingest(&mut self, batch: &LandmarkBatch, mapper: &impl WorldMapper) -> HandState {
        let (left_hand, right_hand) = self.route(batch);
        let mut state = HandState::default();

        match left_hand {
            Some(hand) => {
                let reading = classify(hand);
                let (px, py) = hand.palm_center();
                self.left_palm_world = mapper.to_world(px, py);
                state.left_present = true;
                state.left_palm_depth = Some(reading.hand_size);
                self.left.observe((reading.finger_count, reading.is_fist));
                self.left_pinch.observe(reading.is_pinch);
                self.left_open.observe(reading.is_open);
            }
            None => {
                self.left.force((0, false));
                self.left_pinch.force(false);
                self.left_open.force(false);
            }
        }
        let (left_fingers, left_fist) = *self.left.committed();
        state.left_fingers = left_fingers;
        state.left_fist = left_fist;
        state.left_pinch = *self.left_pinch.committed();
        state.left_open = *self.left_open.committed();
        state.left_palm_world = self.left_palm_world;

        match right_hand {
            Some(hand) => {
                let reading = classify(hand);
                let (px, py) = hand.palm_center();
                let tip = hand.get(INDEX_TIP);
                state.right_present = true;
                state.right_fingers = reading.finger_count;
                state.right_palm_world = Some(mapper.to_world(px, py));
                state.right_index_world = Some(mapper.to_world(tip.x, tip.y));
                self.right.observe(reading.gesture);
            }
            None => self.right.force(Gesture::None),
        }
        state.right_gesture = *self.right.committed();
        state.right_pinch = state.right_gesture == Gesture::Pinch;
        state.right_open = state.right_gesture == Gesture::Open;

        state.left_burst = state.left_fist || state.left_pinch;
        state.left_config = if state.left_present && !state.left_burst && !state.left_open {
            text_config_for(self.params.text_configs, state.left_fingers)
        } else {
            None
        };
        state.left_action = if state.left_burst {
            LeftAction::Burst
        } else if state.left_open {
            LeftAction::Sphere
        } else if let Some(cfg) = state.left_config {
            LeftAction::Text(cfg.label)
        } else {
            LeftAction::None
        };

        if state.left_action != self.prev_action {
            log::debug!("left action {:?} -> {:?}", self.prev_action, state.left_action);
            self.prev_action = state.left_action;
            if let Some(listener) = self.listener.as_mut() {
                listener(&state.left_action);
            }
        }
        state
    }
}

impl Default for HandTracker {
    fn default() -> Self {
        Self::new(TrackerParams::default())
    }
}
