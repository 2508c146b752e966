//! Scene-space extents and the perspective camera that frames them.
//!
//! The particle scene lives on the `z = 0` plane in front of a fixed camera.
//! `World` is the visible size of that plane, which is what landmark positions
//! and all target builders are scaled against.

use crate::constants::*;
use glam::{Mat4, Vec2, Vec3};

/// Maps normalized image coordinates (x right, y down) into scene units.
pub trait WorldMapper {
    fn to_world(&self, nx: f32, ny: f32) -> Vec2;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Visible plane at distance `z` for a vertical field of view in degrees.
    pub fn from_camera(fov_deg: f32, z: f32, aspect: f32) -> Self {
        let height = 2.0 * (fov_deg.to_radians() * 0.5).tan() * z;
        Self {
            width: height * aspect,
            height,
        }
    }

    pub fn min_extent(&self) -> f32 {
        self.width.min(self.height)
    }
}

impl Default for World {
    fn default() -> Self {
        World::from_camera(CAMERA_FOV_DEG, CAMERA_Z, 16.0 / 9.0)
    }
}

impl WorldMapper for World {
    fn to_world(&self, nx: f32, ny: f32) -> Vec2 {
        Vec2::new((nx - 0.5) * self.width, (0.5 - ny) * self.height)
    }
}

/// Right-handed perspective camera looking down -Z at the scene plane.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn for_aspect(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_NEAR,
            zfar: CAMERA_FAR,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Extents of the `z = 0` plane as seen by this camera.
    pub fn world(&self) -> World {
        World::from_camera(
            self.fovy_radians.to_degrees(),
            (self.eye - self.target).length(),
            self.aspect,
        )
    }
}
