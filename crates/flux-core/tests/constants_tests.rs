// Host-side tests for tuning constants and their relationships.

use flux_core::constants::*;
use flux_core::params::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn integration_constants_are_stable() {
    // Spring must pull and damping must bleed energy.
    assert!(LERP_FACTOR > 0.0 && LERP_FACTOR < 1.0);
    assert!(DAMPING > 0.0 && DAMPING < 1.0);
    assert!(DAMPING + BURST_DAMPING_BONUS <= 1.0);
    assert!(BURST_DAMPING_MAX < 1.0);
    assert!(DIST_EPSILON > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn sphere_ranges_are_ordered() {
    assert!(SPHERE_MIN_SCREEN_RATIO < SPHERE_MAX_SCREEN_RATIO);
    assert!(SPHERE_MAX_SCREEN_RATIO <= 1.0);
    assert!(SPHERE_DEPTH_NEAR < SPHERE_DEPTH_FAR);
    assert!(SPHERE_RADIUS_LERP > 0.0 && SPHERE_RADIUS_LERP <= 1.0);
    let light = SPHERE_LIGHT;
    let len = (light[0] * light[0] + light[1] * light[1] + light[2] * light[2]).sqrt();
    assert!((len - 1.0).abs() < 0.05, "light direction should be roughly unit length");
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn force_radii_and_timings_are_positive() {
    for v in [
        SCATTER_RADIUS,
        SCATTER_FORCE,
        PINCH_FORCE,
        OPEN_BURST_RADIUS,
        OPEN_BURST_FORCE,
        PULL_RADIUS,
        PULL_FORCE,
        SWIRL_FORCE,
        SHOCKWAVE_FORCE,
        FIST_BURST_FORCE,
        BURST_PULSE_FORCE,
        BURST_SWIRL_FORCE,
    ] {
        assert!(v > 0.0);
    }
    assert!(BURST_DURATION_MS > 0.0);
    assert!(ATTRACT_DURATION_MS > BURST_DURATION_MS);
    assert!(STABLE_FRAMES >= 1);
    assert!(CAMERA_NEAR < CAMERA_Z && CAMERA_Z < CAMERA_FAR);
}

#[test]
fn text_configs_have_unique_finger_counts() {
    let mut counts: Vec<u8> = DEFAULT_TEXT_CONFIGS.iter().map(|c| c.finger_count).collect();
    counts.sort_unstable();
    counts.dedup();
    assert_eq!(counts.len(), DEFAULT_TEXT_CONFIGS.len());
    assert!(counts.iter().all(|c| (1..=4).contains(c)));
    assert_eq!(text_config_for(DEFAULT_TEXT_CONFIGS, 3).map(|c| c.label), Some("AWESOME"));
    assert_eq!(text_config_for(DEFAULT_TEXT_CONFIGS, 0), None);
    assert_eq!(text_config_for(DEFAULT_TEXT_CONFIGS, 5), None);
}

#[test]
fn hex_colors_unpack_to_unit_rgb() {
    let c = hex_to_rgb(0x00ff88);
    assert_eq!(c.x, 0.0);
    assert_eq!(c.y, 1.0);
    assert!((c.z - 136.0 / 255.0).abs() < 1e-6);
    assert_eq!(DEFAULT_TEXT_CONFIGS[0].color_rgb(), hex_to_rgb(0x00ffff));
}

#[test]
fn default_params_mirror_the_constants() {
    let sim = SimParams::default();
    assert_eq!(sim.particle_count, PARTICLE_COUNT);
    assert_eq!(sim.damping, DAMPING);
    assert_eq!(sim.burst_duration_ms, BURST_DURATION_MS);
    let tracker = TrackerParams::default();
    assert_eq!(tracker.stable_frames, STABLE_FRAMES);
    assert!(tracker.mirror_handedness);
}

#[test]
fn camera_frames_the_world_plane() {
    use flux_core::{Camera, World, WorldMapper};
    let aspect = 16.0 / 9.0;
    let world = World::from_camera(CAMERA_FOV_DEG, CAMERA_Z, aspect);
    let expected_h = 2.0 * (CAMERA_FOV_DEG.to_radians() * 0.5).tan() * CAMERA_Z;
    assert!((world.height - expected_h).abs() < 1e-3);
    assert!((world.width - expected_h * aspect).abs() < 1e-3);

    let cam_world = Camera::for_aspect(aspect).world();
    assert!((cam_world.height - world.height).abs() < 1e-2);

    // Image corners land on the world edges, y flipped.
    let tl = world.to_world(0.0, 0.0);
    assert!((tl.x + world.width * 0.5).abs() < 1e-3);
    assert!((tl.y - world.height * 0.5).abs() < 1e-3);
    let c = world.to_world(0.5, 0.5);
    assert!(c.length() < 1e-4);
}
