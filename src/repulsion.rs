//! Pointer repulsion for ornaments.
//!
//! Each ornament samples a radial push field centred on the pointer. There is no
//! interaction between ornaments and no state carried between frames.

use glam::{Vec2, Vec3};

use crate::config::{REPULSION_FORCE_SCALE, REPULSION_REACH};

/// Radial push field around the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    /// Distance at which the force drops to zero.
    pub reach: f32,
    /// Force multiplier.
    pub force_scale: f32,
}

impl Repulsion {
    pub fn new(reach: f32, force_scale: f32) -> Self {
        Self { reach, force_scale }
    }

    /// Magnitude of the push on an entity at `distance` from the pointer.
    #[inline]
    pub fn force(&self, distance: f32, weight: f32) -> f32 {
        (self.reach - distance).max(0.0) * weight * self.force_scale
    }

    /// Offset that pushes `base` directly away from `pointer`.
    ///
    /// Returns zero outside the reach, and also when `base` sits exactly on the
    /// pointer, where the push direction is undefined.
    pub fn displacement(&self, base: Vec3, pointer: Vec3, weight: f32) -> Vec3 {
        let offset = base - pointer;
        let force = self.force(offset.length(), weight);
        if force <= 0.0 {
            return Vec3::ZERO;
        }
        match offset.try_normalize() {
            Some(direction) => direction * force,
            None => Vec3::ZERO,
        }
    }

    /// `base` moved by its displacement.
    #[inline]
    pub fn resolve(&self, base: Vec3, pointer: Vec3, weight: f32) -> Vec3 {
        base + self.displacement(base, pointer, weight)
    }
}

impl Default for Repulsion {
    fn default() -> Self {
        Self::new(REPULSION_REACH, REPULSION_FORCE_SCALE)
    }
}

/// Project a pointer in normalized device coordinates onto the `z = 0` plane.
///
/// `viewport` is the world-space size of the visible area at the camera's
/// focus distance, so NDC `(1, 1)` maps to its top-right corner.
pub fn pointer_to_world(ndc: Vec2, viewport: Vec2) -> Vec3 {
    Vec3::new(ndc.x * viewport.x / 2.0, ndc.y * viewport.y / 2.0, 0.0)
}
