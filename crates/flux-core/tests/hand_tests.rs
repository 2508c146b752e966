// Host-side tests for hand routing, debounced state and left-action events.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use flux_core::constants::STABLE_FRAMES;
use flux_core::{
    Gesture, HandPipeline, HandTracker, LandmarkBatch, LeftAction, TrackerParams, World, WorldMapper,
};

fn world() -> World {
    World::new(1600.0, 900.0)
}

fn recording_tracker() -> (HandTracker, Rc<RefCell<Vec<LeftAction>>>) {
    let mut tracker = HandTracker::new(TrackerParams::default());
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    tracker.on_left_action_change(move |action| sink.borrow_mut().push(*action));
    (tracker, log)
}

fn feed(tracker: &mut HandTracker, batch: &LandmarkBatch, frames: u32) -> flux_core::HandState {
    let w = world();
    let mut state = tracker.ingest(batch, &w);
    for _ in 1..frames {
        state = tracker.ingest(batch, &w);
    }
    state
}

#[test]
fn open_left_hand_requests_the_sphere() {
    let (mut tracker, log) = recording_tracker();
    let state = feed(&mut tracker, &left_only(open_hand()), STABLE_FRAMES);
    assert!(state.left_present);
    assert!(state.left_open);
    assert!(state.left_config.is_none());
    assert_eq!(state.left_action, LeftAction::Sphere);
    assert_eq!(*log.borrow(), vec![LeftAction::Sphere]);
}

#[test]
fn held_fist_fires_exactly_one_burst() {
    let (mut tracker, log) = recording_tracker();
    let state = feed(&mut tracker, &left_only(fist()), 30);
    assert!(state.left_fist);
    assert!(state.left_burst);
    assert_eq!(state.left_fingers, 0);
    let bursts = log.borrow().iter().filter(|a| **a == LeftAction::Burst).count();
    assert_eq!(bursts, 1);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn nothing_commits_before_the_stable_frame_count() {
    let (mut tracker, log) = recording_tracker();
    let state = feed(&mut tracker, &left_only(fingers(2)), STABLE_FRAMES - 1);
    assert_eq!(state.left_fingers, 0);
    assert_eq!(state.left_action, LeftAction::None);
    assert!(log.borrow().is_empty());

    let state = tracker.ingest(&left_only(fingers(2)), &world());
    assert_eq!(state.left_fingers, 2);
    assert_eq!(state.left_config.map(|c| c.label), Some("FLUX"));
    assert_eq!(state.left_action, LeftAction::Text("FLUX"));
}

#[test]
fn losing_the_left_hand_resets_immediately_and_keeps_the_palm() {
    let (mut tracker, log) = recording_tracker();
    let held = feed(&mut tracker, &left_only(fingers(1)), STABLE_FRAMES);
    assert_eq!(held.left_action, LeftAction::Text("HELLO"));

    let gone = tracker.ingest(&LandmarkBatch::empty(), &world());
    assert!(!gone.left_present);
    assert_eq!(gone.left_fingers, 0);
    assert!(!gone.left_burst && !gone.left_open);
    assert_eq!(gone.left_config, None);
    assert_eq!(gone.left_palm_depth, None);
    assert_eq!(gone.left_palm_world, held.left_palm_world);
    assert_eq!(gone.left_action, LeftAction::None);
    assert_eq!(*log.borrow(), vec![LeftAction::Text("HELLO"), LeftAction::None]);
}

#[test]
fn palm_maps_into_world_space() {
    let (mut tracker, _) = recording_tracker();
    let state = tracker.ingest(&left_only(open_hand()), &world());
    let expected = world().to_world(0.5, 0.64);
    assert!((state.left_palm_world - expected).length() < 1e-3);
    let depth = state.left_palm_depth.unwrap();
    assert!((depth - 0.201).abs() < 1e-3);
}

#[test]
fn selfie_labels_are_mirrored_into_roles() {
    let (mut tracker, _) = recording_tracker();
    // Tracker label "Left" is the user's right hand.
    let state = feed(&mut tracker, &right_only(fingers(2)), STABLE_FRAMES);
    assert!(state.right_present);
    assert!(!state.left_present);
    assert_eq!(state.right_gesture, Gesture::Duo);
    assert_eq!(state.right_fingers, 2);
    assert!(state.right_index_world.is_some());
    assert!(state.right_palm_world.is_some());
}

#[test]
fn unmirrored_tracker_uses_labels_as_is() {
    let mut tracker = HandTracker::new(TrackerParams {
        mirror_handedness: false,
        ..TrackerParams::default()
    });
    let state = feed(&mut tracker, &right_only(open_hand()), STABLE_FRAMES);
    assert!(state.left_present);
    assert!(state.left_open);
    assert!(!state.right_present);
}

#[test]
fn right_gesture_flags_follow_the_committed_gesture() {
    let (mut tracker, _) = recording_tracker();
    let state = feed(&mut tracker, &both(fingers(3), open_hand()), STABLE_FRAMES);
    assert_eq!(state.right_gesture, Gesture::Open);
    assert!(state.right_open);
    assert!(!state.right_pinch);
    assert_eq!(state.left_action, LeftAction::Text("AWESOME"));

    let state = feed(&mut tracker, &both(fingers(3), fist()), STABLE_FRAMES);
    assert_eq!(state.right_gesture, Gesture::Pinch);
    assert!(state.right_pinch);
    assert!(!state.right_open);

    let state = tracker.ingest(&left_only(fingers(3)), &world());
    assert_eq!(state.right_gesture, Gesture::None);
    assert!(state.right_index_world.is_none());
    assert!(state.right_palm_world.is_none());
}

#[test]
fn open_and_burst_suppress_the_text_config() {
    let (mut tracker, _) = recording_tracker();
    let state = feed(&mut tracker, &left_only(fingers(4)), STABLE_FRAMES);
    assert_eq!(state.left_action, LeftAction::Text("GOODBYE"));

    let state = feed(&mut tracker, &left_only(fist()), STABLE_FRAMES);
    assert!(state.left_config.is_none());
    assert_eq!(state.left_action, LeftAction::Burst);
}

#[test]
fn pipeline_counts_batches_not_pumps() {
    let (mut pipeline, sender) = HandPipeline::new(HandTracker::default());
    for _ in 0..STABLE_FRAMES {
        assert!(sender.send(left_only(open_hand())));
    }
    let state = pipeline.pump(&world());
    assert!(state.left_open);
    assert_eq!(state.left_action, LeftAction::Sphere);

    // No new batches: the snapshot is unchanged.
    let again = pipeline.pump(&world()).clone();
    assert_eq!(&again, pipeline.latest());
    assert!(again.left_open);
}

#[test]
fn pipeline_listener_is_reachable_through_the_tracker() {
    let (mut pipeline, sender) = HandPipeline::new(HandTracker::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    pipeline
        .tracker_mut()
        .on_left_action_change(move |a| sink.borrow_mut().push(*a));
    let clone = sender.clone();
    for _ in 0..STABLE_FRAMES {
        clone.send(left_only(fist()));
    }
    pipeline.pump(&world());
    assert_eq!(*seen.borrow(), vec![LeftAction::Burst]);
}
