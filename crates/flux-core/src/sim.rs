//! The particle simulation: mode machine, target shaping and force integration.
//!
//! `Simulation::tick` runs once per display frame. It first resolves the mode
//! from the latest [`HandState`], then moves every particle toward its target
//! with a damped spring while local hand forces push it around. There is no
//! interaction between particles, so a tick is O(N).

use glam::{Vec2, Vec3};
use rand::prelude::*;

use crate::constants::*;
use crate::gesture::Gesture;
use crate::hand::HandState;
use crate::params::{hex_to_rgb, SimParams, TextConfig};
use crate::particles::{Dirty, ParticleBuffers};
use crate::ribbons::RibbonSet;
use crate::sparks::SparkField;
use crate::targets::{fill_text_targets, nebula_targets, GlyphCache, GlyphRasterizer, TargetSet};
use crate::world::World;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Nebula,
    Text,
    Sphere,
    Attract,
}

/// A timed radial burst layered over whatever mode is active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstState {
    pub start_ms: f64,
    pub until_ms: f64,
    pub origin: Vec2,
}

impl BurstState {
    pub fn is_live(&self, now_ms: f64) -> bool {
        now_ms < self.until_ms
    }

    /// `cos(progress * pi/2)`: 1 at the start, 0 at the end.
    pub fn envelope(&self, now_ms: f64) -> f32 {
        let span = (self.until_ms - self.start_ms).max(f64::EPSILON);
        let progress = ((now_ms - self.start_ms) / span).clamp(0.0, 1.0) as f32;
        (progress * std::f32::consts::FRAC_PI_2).cos()
    }
}

/// Sphere radius smoothing; the range follows the world height.
#[derive(Clone, Copy, Debug)]
struct SphereSizing {
    radius: f32,
    target: f32,
    min: f32,
    max: f32,
}

impl SphereSizing {
    fn for_world(world: World) -> Self {
        let min = world.height * SPHERE_MIN_SCREEN_RATIO * 0.5;
        Self {
            radius: min,
            target: min,
            min,
            max: world.height * SPHERE_MAX_SCREEN_RATIO * 0.5,
        }
    }

    fn rescale(&mut self, world: World) {
        self.min = world.height * SPHERE_MIN_SCREEN_RATIO * 0.5;
        self.max = world.height * SPHERE_MAX_SCREEN_RATIO * 0.5;
        self.radius = self.radius.clamp(self.min, self.max);
        self.target = self.target.clamp(self.min, self.max);
    }

    /// Near palm (large hand) -> large sphere. Unknown depth -> midpoint.
    fn follow(&mut self, depth: Option<f32>) {
        self.target = match depth {
            Some(d) => {
                let t = ((d - SPHERE_DEPTH_NEAR) / (SPHERE_DEPTH_FAR - SPHERE_DEPTH_NEAR)).clamp(0.0, 1.0);
                self.min + t * (self.max - self.min)
            }
            None => (self.min + self.max) * 0.5,
        };
        self.radius += (self.target - self.radius) * SPHERE_RADIUS_LERP;
    }
}

/// Burst values sampled once per tick.
#[derive(Clone, Copy, Debug)]
struct BurstFrame {
    center: Vec2,
    envelope: f32,
    radius: f32,
}

/// Sphere rotation and scale sampled once per tick.
#[derive(Clone, Copy, Debug)]
struct SphereFrame {
    center: Vec2,
    radius: f32,
    /// Unscaled radius; the pinch collapse reach ignores the burst expansion.
    base_radius: f32,
    sin_cos_x: (f32, f32),
    sin_cos_y: (f32, f32),
    sin_cos_z: (f32, f32),
}

impl SphereFrame {
    fn rotate(&self, p: Vec3) -> Vec3 {
        let (sy, cy) = self.sin_cos_y;
        let (sx, cx) = self.sin_cos_x;
        let (sz, cz) = self.sin_cos_z;
        let rx = p.x * cy + p.z * sy;
        let rz = -p.x * sy + p.z * cy;
        let ry = p.y * cx - rz * sx;
        let rz = p.y * sx + rz * cx;
        Vec3::new(rx * cz - ry * sz, rx * sz + ry * cz, rz)
    }
}

/// Apply one damped spring step plus an external velocity kick.
#[inline]
pub fn step_particle(pos: &mut Vec3, vel: &mut Vec3, target: Vec3, force: Vec3, lerp: f32, damping: f32) {
    *vel += (target - *pos) * lerp;
    *vel += force;
    *vel *= damping;
    *pos += *vel;
}

/// Damped spring step toward `target` with no external force.
#[inline]
pub fn spring_step(pos: &mut Vec3, vel: &mut Vec3, target: Vec3, lerp: f32, damping: f32) {
    step_particle(pos, vel, target, Vec3::ZERO, lerp, damping);
}

/// Linear falloff `(1 - dist/radius) * force` inside `radius`, zero outside.
#[inline]
fn falloff(dist: f32, radius: f32, force: f32) -> f32 {
    if dist < radius {
        (1.0 - dist / radius) * force
    } else {
        0.0
    }
}

/// Planar push from the right hand for the committed gesture.
fn right_hand_force(pos: Vec3, hands: &HandState, time: f32) -> Vec3 {
    let Some(index) = hands.right_index_world else {
        return Vec3::ZERO;
    };
    let d = pos.truncate() - index;
    let dist = d.length() + DIST_EPSILON;
    let dir = d / dist;
    let tangent = Vec2::new(-dir.y, dir.x);
    let push = match hands.right_gesture {
        Gesture::Open => {
            let origin = hands.right_palm_world.unwrap_or(index);
            let od = pos.truncate() - origin;
            let odist = od.length() + DIST_EPSILON;
            od / odist * falloff(odist, OPEN_BURST_RADIUS, OPEN_BURST_FORCE)
        }
        Gesture::Duo => -dir * falloff(dist, PULL_RADIUS, PULL_FORCE),
        Gesture::Tri => tangent * falloff(dist, PULL_RADIUS, SWIRL_FORCE),
        Gesture::Quad => {
            let wave = (time * SHOCKWAVE_OMEGA - dist * SHOCKWAVE_K).sin();
            dir * wave * falloff(dist, PULL_RADIUS, SHOCKWAVE_FORCE)
        }
        Gesture::Pinch => dir * falloff(dist, SCATTER_RADIUS * PINCH_SCATTER_RADIUS_SCALE, PINCH_FORCE),
        Gesture::Fist => dir * falloff(dist, SCATTER_RADIUS, SCATTER_FORCE * FIST_SCATTER_FORCE_SCALE),
        Gesture::Point | Gesture::None => dir * falloff(dist, SCATTER_RADIUS, SCATTER_FORCE),
    };
    push.extend(0.0)
}

/// Ripple a nebula target around the right index finger. The offset decays
/// as `exp(-0.015 * dist)` and never exceeds 32 units.
pub fn nebula_ripple(target: Vec3, index: Vec2, gesture: Gesture, time: f32) -> Vec3 {
    let d = target.truncate() - index;
    let dist = d.length() + DIST_EPSILON;
    let dir = d / dist;
    let falloff = (-dist * 0.015).exp();
    let (amp, swirl) = match gesture {
        Gesture::Duo => (-14.0, 0.0),
        Gesture::Pinch => (22.0, 0.0),
        Gesture::Quad => (18.0, 0.0),
        Gesture::Tri => (6.0, 26.0),
        _ => (10.0, 0.0),
    };
    let wave = (dist * 0.08 - time * 9.0).sin() * amp;
    let mut offset = dir * wave * falloff;
    if swirl != 0.0 {
        offset += Vec2::new(-dir.y, dir.x) * swirl * falloff;
    }
    target + offset.extend(0.0)
}

/// Falling-snow position for a nebula particle. Height wraps modulo the world
/// height; the result stays within `SNOW_BOB` of the world's vertical bounds.
pub fn snow_target(base: Vec3, seed: f32, offset: f32, world: World, time: f32) -> Vec3 {
    let fall_speed = SNOW_SPEED * (0.55 + seed * 0.9);
    let fall = (time * fall_speed + offset).rem_euclid(world.height.max(DIST_EPSILON));
    let sway = (time * (0.8 + seed * 0.7) + seed * 9.0).sin() * SNOW_SWAY;
    let drift = (time * 0.6 + seed * 5.0).cos() * (SNOW_SWAY * 0.35);
    Vec3::new(
        base.x + sway + drift,
        world.height * 0.5 - fall + (time * 1.6 + seed * 6.0).sin() * SNOW_BOB,
        (time * 0.5 + seed * 7.0).sin() * SNOW_DRIFT,
    )
}

pub struct Simulation {
    params: SimParams,
    world: World,
    rng: StdRng,
    buffers: ParticleBuffers,
    targets: TargetSet,
    glyphs: GlyphCache,
    mode: Mode,
    current_text: TextConfig,
    burst: Option<BurstState>,
    prev_left_burst: bool,
    attract_until: Option<f64>,
    sphere: SphereSizing,
    sparks: SparkField,
    ribbons: RibbonSet,
}

impl Simulation {
    pub fn new(params: SimParams, world: World, rasterizer: Box<dyn GlyphRasterizer>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut buffers = ParticleBuffers::new(params.particle_count, &mut rng);
        let targets = TargetSet::new(params.particle_count, world, &mut buffers.snow_offsets, &mut rng);
        let sparks = SparkField::new(params.spark_count, &mut rng);
        let current_text = params.text_configs.first().copied().unwrap_or(TextConfig {
            finger_count: 0,
            label: "",
            color: 0xffffff,
        });
        let mut sim = Self {
            world,
            rng,
            buffers,
            targets,
            glyphs: GlyphCache::new(rasterizer),
            mode: Mode::Nebula,
            current_text,
            burst: None,
            prev_left_burst: false,
            attract_until: None,
            sphere: SphereSizing::for_world(world),
            sparks,
            ribbons: RibbonSet::new(),
            params,
        };
        sim.enter_nebula();
        sim
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn world(&self) -> World {
        self.world
    }

    pub fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }

    /// Current NEBULA/TEXT targets (the sphere lattice is separate).
    pub fn targets(&self) -> &[Vec3] {
        &self.targets.base
    }

    pub fn target_set(&self) -> &TargetSet {
        &self.targets
    }

    pub fn burst(&self) -> Option<&BurstState> {
        self.burst.as_ref()
    }

    pub fn sparks(&self) -> &SparkField {
        &self.sparks
    }

    pub fn ribbons(&self) -> &RibbonSet {
        &self.ribbons
    }

    pub fn sphere_radius(&self) -> f32 {
        self.sphere.radius
    }

    pub fn sphere_radius_range(&self) -> (f32, f32) {
        (self.sphere.min, self.sphere.max)
    }

    pub fn current_text(&self) -> &TextConfig {
        &self.current_text
    }

    pub fn take_dirty(&mut self) -> Dirty {
        self.buffers.take_dirty()
    }

    /// Pull everything to the left palm for a short while.
    pub fn attract(&mut self, now_ms: f64) {
        self.attract_until = Some(now_ms + ATTRACT_DURATION_MS);
        if self.mode != Mode::Attract {
            log::debug!("mode {:?} -> Attract", self.mode);
            self.mode = Mode::Attract;
            self.apply_size_profile(Mode::Attract);
        }
    }

    /// Adopt new world extents and rebuild every world-dependent target now.
    pub fn resize(&mut self, world: World) {
        self.world = world;
        self.sphere.rescale(world);
        self.targets.nebula = nebula_targets(
            self.buffers.len(),
            world,
            &mut self.buffers.snow_offsets,
            &mut self.rng,
        );
        match self.mode {
            Mode::Nebula => self.enter_nebula(),
            Mode::Text => self.fill_text(),
            Mode::Sphere | Mode::Attract => {}
        }
    }

    pub fn tick(&mut self, now_ms: f64, hands: &HandState) {
        let time = (now_ms * 0.001) as f32;

        self.resolve_mode(now_ms, hands);
        if self.mode == Mode::Sphere {
            self.sphere.follow(hands.left_palm_depth);
        }

        if let Some(burst) = self.burst {
            if now_ms > burst.until_ms {
                self.burst = None;
                self.restore_mode_profile();
            }
        }

        let burst_frame = self.burst.filter(|b| b.is_live(now_ms)).map(|b| BurstFrame {
            center: b.origin,
            envelope: b.envelope(now_ms),
            radius: (self.world.min_extent() * BURST_RADIUS_SCALE).max(1.0),
        });
        let damping = if burst_frame.is_some() {
            (self.params.damping + BURST_DAMPING_BONUS).min(BURST_DAMPING_MAX)
        } else {
            self.params.damping
        };

        if self.mode == Mode::Sphere {
            self.ribbons.update(time, hands.left_palm_world, self.sphere.radius);
        } else {
            self.ribbons.hide();
        }
        self.sparks.update(time, now_ms, self.params.burst_duration_ms);

        let sphere_frame = (self.mode == Mode::Sphere).then(|| {
            let expand = burst_frame.map_or(1.0, |b| 1.0 + b.envelope * BURST_SPHERE_EXPAND);
            SphereFrame {
                center: burst_frame.map_or(hands.left_palm_world, |b| b.center),
                radius: self.sphere.radius * expand,
                base_radius: self.sphere.radius,
                sin_cos_x: (time * SPHERE_ROT_RATE_X).sin_cos(),
                sin_cos_y: (time * SPHERE_ROT_RATE_Y).sin_cos(),
                sin_cos_z: (time * SPHERE_ROT_RATE_Z).sin_cos(),
            }
        });

        self.integrate(time, hands, burst_frame, sphere_frame, damping);
        self.buffers.mark_positions();
        if sphere_frame.is_some() {
            self.buffers.mark_colors();
        }
    }

    fn integrate(
        &mut self,
        time: f32,
        hands: &HandState,
        burst: Option<BurstFrame>,
        sphere: Option<SphereFrame>,
        damping: f32,
    ) {
        let mode = self.mode;
        let world = self.world;
        let lerp = self.params.lerp_factor;
        let light = Vec3::from(SPHERE_LIGHT);
        let sphere_base = hex_to_rgb(SPHERE_BASE_COLOR);
        let right_forces = matches!(mode, Mode::Text | Mode::Nebula);
        let b = &mut self.buffers;

        for i in 0..b.positions.len() {
            let seed = b.seeds[i];
            let pos = b.positions[i];
            let mut target = self.targets.base[i];

            if mode == Mode::Nebula {
                target = snow_target(target, seed, b.snow_offsets[i], world, time);
                if let Some(index) = hands.right_index_world {
                    target = nebula_ripple(target, index, hands.right_gesture, time);
                }
            }

            if mode == Mode::Attract {
                let palm = hands.left_palm_world;
                target = Vec3::new(palm.x, palm.y + (time * 12.0 + seed * 10.0).sin() * ATTRACT_WOBBLE, 0.0);
            }

            if let Some(s) = sphere {
                let r = s.rotate(self.targets.sphere[i]);
                target = Vec3::new(s.center.x + r.x * s.radius, s.center.y + r.y * s.radius, r.z * s.radius);

                let ndotl = r.dot(light).max(0.0);
                let rim = 1.0 - r.z.abs();
                b.colors[i] = if self.targets.seams[i] {
                    Vec3::splat(0.08 + rim * 0.08)
                } else {
                    let intensity = (0.45 + ndotl * 0.65 + rim * rim * 0.35).min(1.0);
                    (sphere_base * intensity).min(Vec3::ONE)
                };
            }

            if burst.is_some() && sphere.is_none() {
                target = pos;
            }

            let mut force = Vec3::ZERO;

            if let (Some(s), true) = (sphere, hands.right_pinch) {
                let to_palm = hands.left_palm_world.extend(0.0) - pos;
                let dist = to_palm.length() + DIST_EPSILON;
                let reach = (s.base_radius * SPHERE_PINCH_REACH).max(DIST_EPSILON);
                let pull = ((1.0 - (dist / reach).min(1.0)) * PINCH_FORCE).min(dist);
                force += to_palm / dist * pull;
            }

            if let Some(bf) = burst {
                let d = pos - bf.center.extend(0.0);
                let dist = d.length() + DIST_EPSILON;
                let fall = (1.0 - dist / bf.radius).max(0.0);
                let push = fall
                    * (FIST_BURST_FORCE * (0.45 + bf.envelope * 0.55) + BURST_PULSE_FORCE * bf.envelope);
                force += d / dist * push;
                let swirl = BURST_SWIRL_FORCE * fall * bf.envelope;
                force += Vec3::new(-d.y / dist, d.x / dist, 0.0) * swirl;
            }

            if right_forces {
                force += right_hand_force(pos, hands, time);
            }

            step_particle(&mut b.positions[i], &mut b.velocities[i], target, force, lerp, damping);
        }
    }

    fn resolve_mode(&mut self, now_ms: f64, hands: &HandState) {
        if let Some(cfg) = hands.left_config {
            if cfg.label != self.current_text.label {
                self.current_text = cfg;
                if self.mode == Mode::Text {
                    self.fill_text();
                }
                self.set_colors(cfg.color, 4.0);
            }
        }

        if hands.left_burst {
            if !self.prev_left_burst {
                self.start_burst(now_ms, hands.left_palm_world);
            }
            self.apply_burst_profile();
            self.prev_left_burst = true;
            return;
        }
        self.prev_left_burst = false;

        match self.attract_until {
            Some(until) if now_ms < until => return,
            Some(_) => self.attract_until = None,
            None => {}
        }

        if hands.left_open {
            if self.mode != Mode::Sphere {
                self.set_mode(Mode::Sphere);
                self.apply_sphere_colors();
                self.apply_size_profile(Mode::Sphere);
            }
        } else if hands.left_config.is_some() {
            if self.mode != Mode::Text {
                self.set_mode(Mode::Text);
                self.fill_text();
                self.set_colors(self.current_text.color, 4.0);
                self.apply_size_profile(Mode::Text);
            }
        } else if self.mode != Mode::Nebula {
            // Right open and "nothing" both land here.
            self.set_mode(Mode::Nebula);
            self.enter_nebula();
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        log::debug!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    fn start_burst(&mut self, now_ms: f64, origin: Vec2) {
        log::debug!("burst at ({:.1}, {:.1})", origin.x, origin.y);
        self.burst = Some(BurstState {
            start_ms: now_ms,
            until_ms: now_ms + self.params.burst_duration_ms,
            origin,
        });
        self.apply_burst_profile();
        self.sparks.spawn(origin, self.sphere.radius, now_ms, &mut self.rng);
    }

    fn restore_mode_profile(&mut self) {
        match self.mode {
            Mode::Sphere => {
                self.apply_sphere_colors();
                self.apply_size_profile(Mode::Sphere);
            }
            Mode::Text => {
                self.set_colors(self.current_text.color, 4.0);
                self.apply_size_profile(Mode::Text);
            }
            Mode::Nebula => {
                self.apply_nebula_colors();
                self.apply_size_profile(Mode::Nebula);
            }
            Mode::Attract => {
                self.apply_nebula_colors();
                self.apply_size_profile(Mode::Attract);
            }
        }
    }

    fn enter_nebula(&mut self) {
        self.targets.use_nebula();
        self.apply_nebula_colors();
        self.apply_size_profile(Mode::Nebula);
    }

    fn fill_text(&mut self) {
        let pool = self.glyphs.pool(self.current_text.label);
        if !fill_text_targets(&mut self.targets.base, pool, self.world, &mut self.rng) {
            log::warn!("no glyph points for {:?}", self.current_text.label);
        }
    }

    fn set_colors(&mut self, hex: u32, boost: f32) {
        let color = (hex_to_rgb(hex) * boost).min(Vec3::ONE);
        self.buffers.fill_colors(color);
    }

    fn apply_nebula_colors(&mut self) {
        let b = &mut self.buffers;
        for (c, s) in b.colors.iter_mut().zip(&b.seeds) {
            *c = Vec3::splat(0.96 + s * 0.04);
        }
        b.mark_colors();
    }

    fn apply_sphere_colors(&mut self) {
        let lit = (hex_to_rgb(SPHERE_BASE_COLOR) * 1.6).min(Vec3::ONE);
        let b = &mut self.buffers;
        for (c, &seam) in b.colors.iter_mut().zip(&self.targets.seams) {
            *c = if seam { Vec3::splat(0.1) } else { lit };
        }
        b.mark_colors();
    }

    fn apply_burst_profile(&mut self) {
        let b = &mut self.buffers;
        for i in 0..b.len() {
            let seed = b.seeds[i];
            let slot = ((seed * BURST_PALETTE.len() as f32) as usize).min(BURST_PALETTE.len() - 1);
            let flare = 1.1 + seed * 0.9;
            b.colors[i] = (hex_to_rgb(BURST_PALETTE[slot]) * flare).min(Vec3::ONE);
            b.sizes[i] = 6.2 + seed * 4.6;
            b.boosts[i] = 4.8 + seed * 0.6;
        }
        b.mark_colors();
        b.mark_profile();
    }

    fn apply_size_profile(&mut self, mode: Mode) {
        let b = &mut self.buffers;
        for i in 0..b.len() {
            let seed = b.seeds[i];
            let (size, boost) = match mode {
                Mode::Nebula if seed > 0.92 => (5.2 + seed * 1.6, 1.8),
                Mode::Nebula => (2.2 + seed * 1.1, 1.8),
                Mode::Sphere => (3.8 + seed * 1.4, 3.6),
                Mode::Text | Mode::Attract => (4.2 + seed * 1.6, 4.0),
            };
            b.sizes[i] = size;
            b.boosts[i] = boost;
        }
        b.mark_profile();
    }
}
