//! Startup configuration for the tracker and simulation.
//!
//! Everything here is fixed once the app is running; the structs only exist so
//! tests and alternative hosts can build smaller or differently tuned scenes.

use crate::constants::*;
use glam::Vec3;

/// A left-hand finger count that spells a word with the particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextConfig {
    pub finger_count: u8,
    pub label: &'static str,
    pub color: u32,
}

impl TextConfig {
    pub fn color_rgb(&self) -> Vec3 {
        hex_to_rgb(self.color)
    }
}

pub const DEFAULT_TEXT_CONFIGS: &[TextConfig] = &[
    TextConfig {
        finger_count: 1,
        label: "HELLO",
        color: 0x00ffff,
    },
    TextConfig {
        finger_count: 2,
        label: "FLUX",
        color: 0xffff00,
    },
    TextConfig {
        finger_count: 3,
        label: "AWESOME",
        color: 0xff00ff,
    },
    TextConfig {
        finger_count: 4,
        label: "GOODBYE",
        color: 0x00ff88,
    },
];

/// First config whose finger count matches exactly.
pub fn text_config_for(configs: &[TextConfig], fingers: u8) -> Option<TextConfig> {
    configs.iter().find(|c| c.finger_count == fingers).copied()
}

#[derive(Clone, Debug)]
pub struct TrackerParams {
    pub stable_frames: u32,
    /// Selfie cameras report handedness mirrored: label "Left" is the user's right hand.
    pub mirror_handedness: bool,
    pub text_configs: &'static [TextConfig],
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            stable_frames: STABLE_FRAMES,
            mirror_handedness: true,
            text_configs: DEFAULT_TEXT_CONFIGS,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimParams {
    pub particle_count: usize,
    pub spark_count: usize,
    pub lerp_factor: f32,
    pub damping: f32,
    pub burst_duration_ms: f64,
    pub text_configs: &'static [TextConfig],
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            spark_count: SPARK_COUNT,
            lerp_factor: LERP_FACTOR,
            damping: DAMPING,
            burst_duration_ms: BURST_DURATION_MS,
            text_configs: DEFAULT_TEXT_CONFIGS,
        }
    }
}

#[inline]
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}
