// Host-side tests for the temporal debouncer.

use flux_core::constants::STABLE_FRAMES;
use flux_core::{Debouncer, Gesture};

#[test]
fn commits_exactly_on_the_nth_matching_update() {
    let mut d = Debouncer::new(0u8, STABLE_FRAMES);
    for i in 1..STABLE_FRAMES {
        assert_eq!(*d.observe(3), 0, "committed early on update {i}");
        assert_eq!(d.count(), i);
    }
    assert_eq!(*d.observe(3), 3);
    assert_eq!(*d.committed(), 3);
}

#[test]
fn alternating_input_never_commits() {
    let mut d = Debouncer::new(Gesture::None, STABLE_FRAMES);
    for i in 0..200 {
        let raw = if i % 2 == 0 { Gesture::Duo } else { Gesture::Tri };
        assert_eq!(*d.observe(raw), Gesture::None);
        assert_eq!(d.count(), 1);
    }
}

#[test]
fn committed_value_is_sticky_through_flicker() {
    let mut d = Debouncer::new(false, 3);
    for _ in 0..3 {
        d.observe(true);
    }
    assert!(*d.committed());
    d.observe(false);
    d.observe(false);
    assert!(*d.committed());
    assert!(!*d.candidate());
    d.observe(false);
    assert!(!*d.committed());
}

#[test]
fn interrupted_run_starts_over() {
    let mut d = Debouncer::new(0u8, 4);
    d.observe(2);
    d.observe(2);
    d.observe(2);
    d.observe(1);
    d.observe(2);
    d.observe(2);
    d.observe(2);
    assert_eq!(*d.committed(), 0);
    d.observe(2);
    assert_eq!(*d.committed(), 2);
}

#[test]
fn force_resets_to_neutral_as_if_stable() {
    let mut d = Debouncer::new((0u8, false), STABLE_FRAMES);
    for _ in 0..STABLE_FRAMES {
        d.observe((0, true));
    }
    assert_eq!(*d.committed(), (0, true));

    d.force((0, false));
    assert_eq!(*d.committed(), (0, false));
    assert_eq!(*d.candidate(), (0, false));
    assert_eq!(d.count(), d.threshold());

    // Neutral stays committed and keeps counting.
    d.observe((0, false));
    assert_eq!(*d.committed(), (0, false));
    assert_eq!(d.count(), STABLE_FRAMES + 1);
}

#[test]
fn threshold_of_one_commits_immediately() {
    let mut d = Debouncer::new(0i32, 1);
    assert_eq!(*d.observe(7), 7);
    assert_eq!(*d.observe(-2), -2);
}
