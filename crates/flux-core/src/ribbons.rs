//! Glowing rings that orbit the sphere while it is shown.

use glam::{Vec2, Vec3};

use crate::constants::*;
use crate::params::hex_to_rgb;

/// Shape parameters of one ring. Angles in radians, rates in rad/s,
/// amplitudes as fractions of the sphere radius.
#[derive(Clone, Copy, Debug)]
struct RingShape {
    color: u32,
    /// Point size used by the renderer for the glow pass.
    point_size: f32,
    radius_scale: f32,
    phase_rate: f32,
    phase_offset: f32,
    wave_lobes: f32,
    wave_rate: f32,
    wave_amp: f32,
    lift_lobes: f32,
    lift_rate: f32,
    lift_amp: f32,
    lift_sine: bool,
    pulse_base: f32,
    pulse_amp: f32,
    pulse_lobes: f32,
    pulse_rate: f32,
}

const RINGS: [RingShape; RIBBON_COUNT] = [
    RingShape {
        color: 0xb400ff,
        point_size: 8.0,
        radius_scale: 1.0,
        phase_rate: 2.6,
        phase_offset: 0.0,
        wave_lobes: 4.0,
        wave_rate: -3.4,
        wave_amp: 0.12,
        lift_lobes: 2.0,
        lift_rate: 1.8,
        lift_amp: 0.3,
        lift_sine: false,
        pulse_base: 2.4,
        pulse_amp: 0.6,
        pulse_lobes: 3.0,
        pulse_rate: 2.4,
    },
    RingShape {
        color: 0x00a8ff,
        point_size: 7.0,
        radius_scale: 0.92,
        phase_rate: -2.1,
        phase_offset: std::f32::consts::PI * 0.35,
        wave_lobes: 5.0,
        wave_rate: 2.6,
        wave_amp: 0.09,
        lift_lobes: 3.0,
        lift_rate: -1.6,
        lift_amp: 0.22,
        lift_sine: false,
        pulse_base: 2.2,
        pulse_amp: 0.6,
        pulse_lobes: 4.0,
        pulse_rate: -2.0,
    },
    RingShape {
        color: 0x00ff6a,
        point_size: 6.5,
        radius_scale: 1.05,
        phase_rate: 1.7,
        phase_offset: std::f32::consts::PI * 0.8,
        wave_lobes: 6.0,
        wave_rate: 2.2,
        wave_amp: 0.08,
        lift_lobes: 3.0,
        lift_rate: 1.4,
        lift_amp: 0.26,
        lift_sine: true,
        pulse_base: 2.1,
        pulse_amp: 0.55,
        pulse_lobes: 5.0,
        pulse_rate: 2.2,
    },
];

#[derive(Clone, Debug)]
pub struct Ribbon {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub point_size: f32,
}

#[derive(Clone, Debug)]
pub struct RibbonSet {
    pub rings: Vec<Ribbon>,
    visible: bool,
}

impl Default for RibbonSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RibbonSet {
    pub fn new() -> Self {
        let rings = RINGS
            .iter()
            .map(|shape| Ribbon {
                positions: vec![Vec3::ZERO; RIBBON_SEGMENTS],
                colors: vec![Vec3::ZERO; RIBBON_SEGMENTS],
                point_size: shape.point_size,
            })
            .collect();
        Self {
            rings,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Rebuild every ring around `center` for a sphere of `radius`.
    pub fn update(&mut self, time: f32, center: Vec2, radius: f32) {
        self.visible = true;
        let base_radius = radius * 1.2;
        let tilt_x = (time * 0.55).sin() * 0.45;
        let tilt_z = (time * 0.35).cos() * 0.35;
        let (sin_x, cos_x) = tilt_x.sin_cos();
        let (sin_z, cos_z) = tilt_z.sin_cos();

        for (ring, shape) in self.rings.iter_mut().zip(RINGS.iter()) {
            let phase = time * shape.phase_rate + shape.phase_offset;
            let tint = hex_to_rgb(shape.color);
            for i in 0..RIBBON_SEGMENTS {
                let angle = i as f32 / RIBBON_SEGMENTS as f32 * std::f32::consts::TAU;
                let wave = (angle * shape.wave_lobes + time * shape.wave_rate).sin() * radius * shape.wave_amp;
                let lift_arg = angle * shape.lift_lobes + time * shape.lift_rate;
                let lift = if shape.lift_sine { lift_arg.sin() } else { lift_arg.cos() } * radius * shape.lift_amp;
                let r = base_radius * shape.radius_scale + wave;
                let (x, y, z) = ((angle + phase).cos() * r, lift, (angle + phase).sin() * r);

                // Tilt about X, then about Z.
                let ry = y * cos_x - z * sin_x;
                let rz = y * sin_x + z * cos_x;
                let rx = x * cos_z - ry * sin_z;
                let ry = x * sin_z + ry * cos_z;

                ring.positions[i] = Vec3::new(center.x + rx, center.y + ry, rz);
                let pulse = shape.pulse_base
                    + shape.pulse_amp * (angle * shape.pulse_lobes + time * shape.pulse_rate).sin();
                ring.colors[i] = tint * pulse;
            }
        }
    }
}
