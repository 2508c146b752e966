//! Secondary spark pool thrown out from a burst origin.

use glam::{Vec2, Vec3};
use rand::prelude::*;

use crate::constants::*;
use crate::params::hex_to_rgb;

#[derive(Clone, Debug)]
pub struct SparkField {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    base_colors: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub sizes: Vec<f32>,
    /// Per-spark opacity; the renderer multiplies it into the color.
    pub alphas: Vec<f32>,
    seeds: Vec<f32>,
    active: bool,
    start_ms: f64,
    last_ms: f64,
}

impl SparkField {
    pub fn new(count: usize, rng: &mut StdRng) -> Self {
        let seeds: Vec<f32> = (0..count).map(|_| rng.gen::<f32>()).collect();
        let sizes = seeds.iter().map(|s| 4.2 + s * 6.5).collect();
        Self {
            positions: vec![Vec3::ZERO; count],
            velocities: vec![Vec3::ZERO; count],
            base_colors: vec![Vec3::ZERO; count],
            colors: vec![Vec3::ZERO; count],
            sizes,
            alphas: vec![0.0; count],
            seeds,
            active: false,
            start_ms: 0.0,
            last_ms: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Throw every spark outward from `origin`; spread and speed scale with the sphere radius.
    pub fn spawn(&mut self, origin: Vec2, sphere_radius: f32, now_ms: f64, rng: &mut StdRng) {
        self.active = true;
        self.start_ms = now_ms;
        self.last_ms = now_ms;
        let spread = (sphere_radius * 0.12).max(8.0);
        let base_speed = (sphere_radius * 1.4).max(160.0);
        let lift = (sphere_radius * 0.6).max(60.0);
        for i in 0..self.len() {
            self.seeds[i] = rng.gen::<f32>();
            let palette = BURST_PALETTE[rng.gen_range(0..BURST_PALETTE.len())];
            self.base_colors[i] = hex_to_rgb(palette);
            self.sizes[i] = 4.0 + rng.gen::<f32>() * 7.5;
            self.alphas[i] = 1.0;
            self.positions[i] = Vec3::new(
                origin.x + (rng.gen::<f32>() - 0.5) * spread,
                origin.y + (rng.gen::<f32>() - 0.5) * spread,
                (rng.gen::<f32>() - 0.5) * spread * 0.6,
            );
            // Uniform direction on the unit sphere.
            let theta = rng.gen::<f32>() * std::f32::consts::TAU;
            let z = rng.gen::<f32>() * 2.0 - 1.0;
            let root = (1.0 - z * z).max(0.0).sqrt();
            let dir = Vec3::new(root * theta.cos(), root * theta.sin(), z);
            let speed = base_speed * (0.6 + rng.gen::<f32>() * 0.7);
            self.velocities[i] = dir * speed + Vec3::new(0.0, lift, 0.0);
        }
    }

    /// Advance by wall-clock time; sparks die out over `duration_ms`.
    pub fn update(&mut self, time: f32, now_ms: f64, duration_ms: f64) {
        if !self.active {
            self.last_ms = now_ms;
            return;
        }
        let life = 1.0 - ((now_ms - self.start_ms) / duration_ms.max(f64::EPSILON)) as f32;
        if life <= 0.0 {
            self.active = false;
            self.alphas.fill(0.0);
            self.last_ms = now_ms;
            return;
        }
        let dt = (((now_ms - self.last_ms) / 1000.0) as f32).clamp(0.0, SPARK_MAX_DT_SEC);
        self.last_ms = now_ms;
        let fade_base = life * life;
        for i in 0..self.len() {
            let seed = self.seeds[i];
            let swirl = (seed - 0.5) * 28.0;
            let v = &mut self.velocities[i];
            v.x += (time * 3.0 + seed * 6.0).sin() * swirl * dt;
            v.z += (time * 2.6 + seed * 5.0).cos() * swirl * dt;
            v.y += (18.0 + seed * 14.0) * dt;
            self.positions[i] += *v * dt;
            *v *= SPARK_DRAG;

            let twinkle = 0.65 + 0.35 * (time * 10.0 + seed * 12.0).sin();
            let color_scale = (0.6 + fade_base * 0.8 + twinkle * 0.3).min(1.6);
            self.alphas[i] = fade_base * (0.45 + seed * 0.55);
            self.colors[i] = self.base_colors[i] * color_scale;
        }
    }

    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}
