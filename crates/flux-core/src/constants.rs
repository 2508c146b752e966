// Shared simulation/gesture tuning constants used by the core and the web frontend.
//
// Forces and radii are in scene units (roughly CSS pixels at the default
// camera distance); times are milliseconds unless noted.

// Particle pool
pub const PARTICLE_COUNT: usize = 22_000;
pub const PARTICLE_SIZE: f32 = 2.4;

// Spring-to-target integration
pub const LERP_FACTOR: f32 = 0.16;
pub const DAMPING: f32 = 0.82;
pub const BURST_DAMPING_BONUS: f32 = 0.08;
pub const BURST_DAMPING_MAX: f32 = 0.9;
pub const DIST_EPSILON: f32 = 0.001;

// Right-hand local forces
pub const SCATTER_RADIUS: f32 = 110.0;
pub const SCATTER_FORCE: f32 = 55.0;
pub const PINCH_SCATTER_RADIUS_SCALE: f32 = 1.35;
pub const FIST_SCATTER_FORCE_SCALE: f32 = 1.4;
pub const PINCH_FORCE: f32 = 95.0;
pub const OPEN_BURST_RADIUS: f32 = 200.0;
pub const OPEN_BURST_FORCE: f32 = 90.0;
pub const PULL_RADIUS: f32 = 150.0;
pub const PULL_FORCE: f32 = 26.0;
pub const SWIRL_FORCE: f32 = 20.0;
pub const SHOCKWAVE_FORCE: f32 = 26.0;
pub const SHOCKWAVE_OMEGA: f32 = 9.0; // rad/s
pub const SHOCKWAVE_K: f32 = 0.12; // rad per scene unit

// Left-hand burst overlay
pub const FIST_BURST_FORCE: f32 = 320.0;
pub const BURST_RADIUS_SCALE: f32 = 0.7; // of min(world w, h)
pub const BURST_DURATION_MS: f64 = 1000.0;
pub const BURST_PULSE_FORCE: f32 = 170.0;
pub const BURST_SWIRL_FORCE: f32 = 42.0;
pub const BURST_SPHERE_EXPAND: f32 = 1.8;

// Debounce
pub const STABLE_FRAMES: u32 = 4;

// Attract window
pub const ATTRACT_DURATION_MS: f64 = 1200.0;
pub const ATTRACT_WOBBLE: f32 = 14.0;

// Nebula snow field
pub const SNOW_SPEED: f32 = 56.0;
pub const SNOW_SWAY: f32 = 14.0;
pub const SNOW_DRIFT: f32 = 12.0;
pub const SNOW_BOB: f32 = 4.5;

// Sphere sizing: radius range as a fraction of world height, palm depth remap
pub const SPHERE_MIN_SCREEN_RATIO: f32 = 0.35;
pub const SPHERE_MAX_SCREEN_RATIO: f32 = 0.85;
pub const SPHERE_RADIUS_LERP: f32 = 0.12;
pub const SPHERE_DEPTH_NEAR: f32 = 0.08; // hand size (normalized) when far from camera
pub const SPHERE_DEPTH_FAR: f32 = 0.24; // hand size when close to camera
pub const SPHERE_PINCH_REACH: f32 = 2.2; // collapse radius in sphere radii
pub const SPHERE_ROT_RATE_X: f32 = 2.0; // rad/s
pub const SPHERE_ROT_RATE_Y: f32 = 3.5;
pub const SPHERE_ROT_RATE_Z: f32 = 1.1;
pub const SPHERE_BASE_COLOR: u32 = 0xffd000;
pub const SPHERE_LIGHT: [f32; 3] = [0.32, 0.18, 0.93];

// Glyph raster
pub const GLYPH_CANVAS_WIDTH: u32 = 1700;
pub const GLYPH_CANVAS_HEIGHT: u32 = 540;
pub const GLYPH_FONT: &str = "bold 190px Orbitron, monospace";
pub const GLYPH_ALPHA_THRESHOLD: u8 = 30;
pub const GLYPH_SAMPLE_STRIDE: usize = 7;
pub const GLYPH_FIT_SCALE: f32 = 1.1;
pub const GLYPH_Y_STRETCH: f32 = 1.35;
pub const GLYPH_JITTER: f32 = 2.4;

// Camera (matches the renderer's perspective)
pub const CAMERA_FOV_DEG: f32 = 55.0;
pub const CAMERA_Z: f32 = 720.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 3000.0;

// Burst sparks
pub const SPARK_COUNT: usize = 1400;
pub const SPARK_DRAG: f32 = 0.92;
pub const SPARK_MAX_DT_SEC: f32 = 0.05;

// Sphere ribbons
pub const RIBBON_COUNT: usize = 3;
pub const RIBBON_SEGMENTS: usize = 360;

// Burst palette (hex RGB)
pub const BURST_PALETTE: [u32; 5] = [0xffe34d, 0x35ff9a, 0x36b4ff, 0xb400ff, 0xff4fd8];
