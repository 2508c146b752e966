// Host-side tuning constants for the browser front end

// DOM
pub const CANVAS_ID: &str = "flux-canvas";

// Frame clear color (near-black with a blue cast)
pub const CLEAR_R: f64 = 0.0;
pub const CLEAR_G: f64 = 0.004;
pub const CLEAR_B: f64 = 0.02;

// Point sprites: sizes are in CSS pixels at the camera distance, scaled by devicePixelRatio
pub const MAX_POINT_PX: f32 = 64.0;
pub const SPARK_SIZE_SCALE: f32 = 1.0;
pub const RIBBON_SIZE_SCALE: f32 = 1.6;

// Action chime
pub const CHIME_COOLDOWN_SEC: f64 = 0.75;
pub const CHIME_DURATION_SEC: f64 = 0.5;
pub const CHIME_ATTACK_SEC: f64 = 0.01;
pub const CHIME_LEVEL: f32 = 0.18;
// Base pitch for each kind of left-hand action (Hz)
pub const CHIME_BURST_HZ: f32 = 196.0;
pub const CHIME_SPHERE_HZ: f32 = 392.0;
pub const CHIME_TEXT_HZ: f32 = 523.25;
// Second partial, as a ratio of the base pitch
pub const CHIME_PARTIAL_RATIO: f32 = 1.5;
