//! Parallel per-particle buffers.
//!
//! Index `i` is the same logical particle for the whole run; buffers are sized
//! once and never reordered.

use glam::Vec3;
use rand::prelude::*;

use crate::constants::PARTICLE_SIZE;

const SPAWN_HALF_WIDTH: f32 = 200.0;
const SPAWN_HALF_HEIGHT: f32 = 100.0;

/// Which renderer-visible buffers changed since the last [`ParticleBuffers::take_dirty`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dirty {
    pub positions: bool,
    pub colors: bool,
    pub sizes: bool,
    pub boosts: bool,
}

impl Dirty {
    pub fn all() -> Self {
        Self {
            positions: true,
            colors: true,
            sizes: true,
            boosts: true,
        }
    }

    pub fn any(&self) -> bool {
        self.positions || self.colors || self.sizes || self.boosts
    }
}

#[derive(Clone, Debug)]
pub struct ParticleBuffers {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub sizes: Vec<f32>,
    pub boosts: Vec<f32>,
    /// Stable per-particle random in `[0, 1)`.
    pub seeds: Vec<f32>,
    pub snow_offsets: Vec<f32>,
    dirty: Dirty,
}

impl ParticleBuffers {
    pub fn new(count: usize, rng: &mut StdRng) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut seeds = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * SPAWN_HALF_WIDTH * 2.0,
                (rng.gen::<f32>() - 0.5) * SPAWN_HALF_HEIGHT * 2.0,
                0.0,
            ));
            seeds.push(rng.gen::<f32>());
        }
        Self {
            positions,
            velocities: vec![Vec3::ZERO; count],
            colors: vec![Vec3::ONE; count],
            sizes: vec![PARTICLE_SIZE; count],
            boosts: vec![1.0; count],
            seeds,
            snow_offsets: vec![0.0; count],
            dirty: Dirty::all(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn mark_colors(&mut self) {
        self.dirty.colors = true;
    }

    pub fn mark_profile(&mut self) {
        self.dirty.sizes = true;
        self.dirty.boosts = true;
    }

    pub fn mark_positions(&mut self) {
        self.dirty.positions = true;
    }

    /// Return and clear the pending upload flags.
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    /// `x, y, z` per particle.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// `r, g, b` per particle.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn sizes_flat(&self) -> &[f32] {
        &self.sizes
    }

    pub fn boosts_flat(&self) -> &[f32] {
        &self.boosts
    }

    pub fn fill_colors(&mut self, color: Vec3) {
        self.colors.fill(color);
        self.dirty.colors = true;
    }
}
