//! Orbit camera around the sculpture.

use std::f32::consts::PI;

use glam::{Mat4, Vec2, Vec3};

/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 45.0;
/// Initial eye position.
pub const START_POSITION: Vec3 = Vec3::new(0.0, 5.0, 20.0);
/// Closest allowed zoom.
pub const MIN_DISTANCE: f32 = 10.0;
/// Farthest allowed zoom.
pub const MAX_DISTANCE: f32 = 30.0;
/// Largest angle between the view direction and straight down (+Y is 0).
pub const MAX_POLAR_ANGLE: f32 = PI / 1.5;

const NEAR: f32 = 0.1;
const FAR: f32 = 200.0;

/// Orbit camera for viewing the sculpture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Elevation above the XZ plane in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
}

impl Camera {
    /// Camera at [`START_POSITION`] looking at the origin.
    pub fn new() -> Self {
        Self::looking_from(START_POSITION, Vec3::ZERO)
    }

    /// Camera placed at `eye`, orbiting `target`.
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-3);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            target,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Rotate by a pointer drag in pixels.
    pub fn orbit(&mut self, drag: Vec2) {
        self.yaw -= drag.x * 0.005;
        self.pitch += drag.y * 0.005;
        // Polar angle from +Y is PI/2 - pitch.
        let min_pitch = PI / 2.0 - MAX_POLAR_ANGLE;
        let max_pitch = PI / 2.0 - 0.01;
        self.pitch = self.pitch.clamp(min_pitch, max_pitch);
    }

    /// Dolly in (positive scroll) or out.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * 0.8).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection for the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR)
    }

    /// World-space size of the visible rectangle at the target distance.
    pub fn viewport_size(&self, aspect: f32) -> Vec2 {
        let height = 2.0 * self.distance * (FOV_Y_DEGREES.to_radians() / 2.0).tan();
        Vec2::new(height * aspect, height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
