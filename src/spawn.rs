//! Random sampling helpers used by the layout generator.
//!
//! Every helper consumes uniform draws `U` in `[0, 1)` in a fixed order, so a
//! mocked generator that always yields zero produces a predictable layout.

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Source of uniform draws for layout generation.
///
/// Production code uses a time-seeded [`SmallRng`]; tests can wrap any other
/// [`Rng`] (for example `rand::rngs::mock::StepRng`) with [`SpawnContext::with_rng`].
pub struct SpawnContext<R: Rng = SmallRng> {
    rng: R,
}

impl SpawnContext<SmallRng> {
    /// Context seeded from the wall clock: different every program execution.
    pub fn from_time() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    /// Context with a fixed seed, reproducible within one build.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> SpawnContext<R> {
    /// Wrap an arbitrary random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// One uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Uniform angle in `[0, 2π)`.
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.unit() * TAU
    }

    /// Uniform index into a collection of `len` items.
    pub fn index(&mut self, len: usize) -> usize {
        let i = (self.unit() * len as f32) as usize;
        i.min(len.saturating_sub(1))
    }

    // ========== Position helpers ==========

    /// Point inside a sphere of the given radius.
    ///
    /// The radius is uniform (`r = U * radius`), not the cube-root volume
    /// correction, so the cloud is denser towards its centre. The direction is
    /// uniform on the sphere (`phi = acos(2U - 1)`).
    pub fn chaos_point(&mut self, radius: f32) -> Vec3 {
        let r = self.unit() * radius;
        let theta = self.angle();
        let phi = (2.0 * self.unit() - 1.0).acos();

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Point inside a Y-axis cone centred on the origin.
    ///
    /// The cone's base sits at `y = -height / 2` and its apex at `y = height / 2`.
    /// The disk radius uses `sqrt(U)` for uniform-in-area sampling at each height.
    pub fn cone_point(&mut self, height: f32, base_radius: f32) -> Vec3 {
        let h = self.unit() * height;
        let radius_at_h = (1.0 - h / height) * base_radius;
        let angle = self.angle();
        let dist = self.unit().sqrt() * radius_at_h;

        Vec3::new(angle.cos() * dist, h - height / 2.0, angle.sin() * dist)
    }

    /// Point on the slanted surface of the same cone as [`cone_point`](Self::cone_point).
    pub fn cone_surface_point(&mut self, height: f32, base_radius: f32) -> Vec3 {
        let h = self.unit() * height;
        let radius_at_h = (1.0 - h / height) * base_radius;
        let angle = self.angle();

        Vec3::new(angle.cos() * radius_at_h, h - height / 2.0, angle.sin() * radius_at_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_chaos_point_bounds() {
        let mut ctx = SpawnContext::seeded(7);
        for _ in 0..1000 {
            let pos = ctx.chaos_point(15.0);
            assert!(pos.length() <= 15.0 + 0.001);
        }
    }

    #[test]
    fn test_cone_point_bounds() {
        let mut ctx = SpawnContext::seeded(11);
        for _ in 0..1000 {
            let pos = ctx.cone_point(10.0, 5.0);
            assert!(pos.y >= -5.0 && pos.y <= 5.0);
            let allowed = (1.0 - (pos.y + 5.0) / 10.0) * 5.0;
            let radial = (pos.x * pos.x + pos.z * pos.z).sqrt();
            assert!(radial <= allowed + 0.001);
        }
    }

    #[test]
    fn test_zero_draws() {
        let mut ctx = SpawnContext::with_rng(StepRng::new(0, 0));
        assert_eq!(ctx.unit(), 0.0);
        assert_eq!(ctx.chaos_point(1.0), Vec3::ZERO);

        let cone = ctx.cone_point(10.0, 5.0);
        assert_eq!(cone, Vec3::new(0.0, -5.0, 0.0));

        let surface = ctx.cone_surface_point(10.0, 5.0);
        assert_eq!(surface, Vec3::new(5.0, -5.0, 0.0));
    }

    #[test]
    fn test_index_in_range() {
        let mut ctx = SpawnContext::seeded(3);
        for _ in 0..500 {
            assert!(ctx.index(4) < 4);
        }
        let mut zero = SpawnContext::with_rng(StepRng::new(0, 0));
        assert_eq!(zero.index(4), 0);
    }
}
