// Host-side tests for the geometric hand classifier.

mod common;

use common::*;
use flux_core::gesture::*;
use flux_core::landmarks::*;
use flux_core::{HandLandmarks, Landmark, LandmarkBatch, LandmarkError};

#[test]
fn raised_fingers_are_counted_for_both_hands() {
    for n in 1..=5u8 {
        let right = fingers(n);
        let left = mirror(&right);
        assert_eq!(count_fingers(&right), n, "right hand with {n} fingers");
        assert_eq!(count_fingers(&left), n, "left hand with {n} fingers");
    }
}

#[test]
fn fist_forces_zero_fingers_regardless_of_handedness() {
    for hand in [fist(), mirror(&fist())] {
        let reading = classify(&hand);
        assert!(reading.is_fist);
        assert_eq!(reading.finger_count, 0);
    }
}

#[test]
fn thumb_extension_is_mirror_symmetric() {
    for n in 0..=5u8 {
        let hand = fingers(n);
        assert_eq!(thumb_extended(&hand), thumb_extended(&mirror(&hand)), "pose {n}");
    }
    assert!(thumb_extended(&open_hand()));
    assert!(!thumb_extended(&fingers(4)));
}

#[test]
fn handedness_follows_knuckle_order() {
    assert_eq!(infer_handedness(&open_hand()), Handedness::Right);
    assert_eq!(infer_handedness(&mirror(&open_hand())), Handedness::Left);
}

#[test]
fn hand_size_is_wrist_to_middle_knuckle() {
    let size = hand_size(&open_hand());
    let expected = (0.02f32 * 0.02 + 0.2 * 0.2).sqrt();
    assert!((size - expected).abs() < 1e-5);
}

#[test]
fn open_hand_needs_all_five() {
    assert!(is_open_hand(&open_hand()));
    assert!(is_open_hand(&mirror(&open_hand())));
    assert!(!is_open_hand(&fingers(4)));
    assert!(!is_open_hand(&fist()));
}

#[test]
fn categories_follow_finger_count() {
    let expected = [
        (1, Gesture::Point),
        (2, Gesture::Duo),
        (3, Gesture::Tri),
        (4, Gesture::Quad),
        (5, Gesture::Open),
    ];
    for (n, gesture) in expected {
        assert_eq!(classify(&fingers(n)).gesture, gesture);
    }
}

#[test]
fn pinch_wins_over_every_category() {
    let reading = classify(&fist());
    assert!(reading.is_pinch);
    assert_eq!(reading.gesture, Gesture::Pinch);

    // Curled index resting on the tucked thumb.
    let reading = classify(&fingers(0));
    assert!(reading.is_pinch);
    assert_eq!(reading.gesture, Gesture::Pinch);
    assert!(!reading.is_fist);
}

#[test]
fn raised_index_is_not_a_pinch() {
    for n in 1..=5u8 {
        assert!(!is_pinch(&fingers(n)), "pose {n}");
    }
}

#[test]
fn malformed_points_read_as_no_hand() {
    let short = vec![Landmark::new(0.5, 0.5, 0.0); 20];
    assert_eq!(classify_points(&short), HandReading::default());

    let mut bad = open_hand().points().to_vec();
    bad[7].y = f32::NAN;
    assert_eq!(classify_points(&bad), HandReading::default());
    assert_eq!(classify_points(&[]).gesture, Gesture::None);

    let good = open_hand().points().to_vec();
    assert_eq!(classify_points(&good).gesture, Gesture::Open);
}

#[test]
fn degenerate_hand_falls_back_to_nominal_size() {
    let hand = HandLandmarks([Landmark::new(0.5, 0.5, 0.0); 21]);
    assert!((hand_size(&hand) - 0.1).abs() < 1e-6);
    // Every tip sits on the wrist.
    assert!(is_fist(&hand));
    assert_eq!(classify(&hand).finger_count, 0);
}

#[test]
fn flat_batches_parse_and_validate() {
    let mut data = flat(&open_hand());
    data.extend(flat(&fist()));
    let batch = LandmarkBatch::from_flat(&data, &["Left", "Right"]).unwrap();
    assert_eq!(batch.hands.len(), 2);
    assert_eq!(batch.hands[0].handedness, Handedness::Left);
    assert_eq!(batch.find(Handedness::Right), Some(&fist()));

    let err = LandmarkBatch::from_flat(&data[..100], &["Left", "Right"]).unwrap_err();
    assert_eq!(
        err,
        LandmarkError::BadLength {
            expected: 2 * FLOATS_PER_HAND,
            got: 100
        }
    );

    let err = LandmarkBatch::from_flat(&data[..FLOATS_PER_HAND], &["Middle"]).unwrap_err();
    assert!(matches!(err, LandmarkError::UnknownLabel(_)));

    let empty = LandmarkBatch::from_flat::<&str>(&[], &[]).unwrap();
    assert!(empty.hands.is_empty());
}

#[test]
fn non_finite_flat_hand_is_rejected() {
    let mut data = flat(&open_hand());
    data[3 * INDEX_TIP + 1] = f32::INFINITY;
    let err = HandLandmarks::try_from(data.as_slice()).unwrap_err();
    assert_eq!(err, LandmarkError::NonFinite { index: INDEX_TIP });
}

#[test]
fn palm_center_averages_wrist_and_knuckles() {
    let (x, y) = open_hand().palm_center();
    assert!((x - 0.5).abs() < 1e-6);
    assert!((y - 0.64).abs() < 1e-6);
}
