//! Layout generation: the chaos and formed positions of every entity.
//!
//! Layouts are generated once per session and never mutated afterwards. Each
//! entity owns a pair of positions; the interpolation driver only ever reads
//! them and blends between the two.

use glam::Vec3;
use rand::Rng;

use crate::config::{positive, CHAOS_RADIUS, TREE_HEIGHT, TREE_RADIUS};
use crate::error::ConfigError;
use crate::foliage::FoliageVertex;
use crate::spawn::SpawnContext;
use crate::visuals::{hex_to_linear, ORNAMENT_PALETTE};

/// Dimensions of the two configurations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeShape {
    /// Radius of the chaos sphere.
    pub chaos_radius: f32,
    /// Height of the formed cone, centred vertically on the origin.
    pub height: f32,
    /// Radius of the cone's base.
    pub base_radius: f32,
}

impl TreeShape {
    pub fn new(chaos_radius: f32, height: f32, base_radius: f32) -> Self {
        Self {
            chaos_radius,
            height,
            base_radius,
        }
    }

    /// Radius of the cone at a given world-space height.
    ///
    /// Returns a negative value above the apex and more than the base radius
    /// below the base; callers check the vertical extent separately.
    pub fn radius_at(&self, y: f32) -> f32 {
        (1.0 - (y + self.height / 2.0) / self.height) * self.base_radius
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        positive("chaos_radius", self.chaos_radius)?;
        positive("tree_height", self.height)?;
        positive("tree_radius", self.base_radius)
    }
}

impl Default for TreeShape {
    fn default() -> Self {
        Self::new(CHAOS_RADIUS, TREE_HEIGHT, TREE_RADIUS)
    }
}

/// Chaos and target positions of the foliage particles.
#[derive(Debug, Clone)]
pub struct FoliageLayout {
    chaos: Vec<Vec3>,
    target: Vec<Vec3>,
}

impl FoliageLayout {
    /// Sample `count` particles: chaos inside the sphere, target inside the cone.
    pub fn generate<R: Rng>(
        count: u32,
        shape: &TreeShape,
        ctx: &mut SpawnContext<R>,
    ) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::ZeroFoliageCount);
        }
        shape.validate()?;

        let mut chaos = Vec::with_capacity(count as usize);
        let mut target = Vec::with_capacity(count as usize);
        for _ in 0..count {
            chaos.push(ctx.chaos_point(shape.chaos_radius));
            target.push(ctx.cone_point(shape.height, shape.base_radius));
        }

        Ok(Self { chaos, target })
    }

    pub fn len(&self) -> usize {
        self.chaos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chaos.is_empty()
    }

    pub fn chaos(&self) -> &[Vec3] {
        &self.chaos
    }

    pub fn target(&self) -> &[Vec3] {
        &self.target
    }

    /// Iterate over `(chaos, target)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.chaos.iter().copied().zip(self.target.iter().copied())
    }

    /// Interleave both position sets for a one-time vertex buffer upload.
    pub fn vertices(&self) -> Vec<FoliageVertex> {
        self.pairs()
            .map(|(chaos, target)| FoliageVertex::new(chaos, target))
            .collect()
    }
}

/// Ornament category. Determines mesh, size and how strongly the pointer pushes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentKind {
    /// Wrapped box: large, heavy, barely moves.
    Gift,
    /// Glossy bauble.
    Ball,
    /// Small emissive bulb, scatters easily.
    Light,
}

impl OrnamentKind {
    /// All kinds, in instance-table order.
    pub const ALL: [OrnamentKind; 3] = [OrnamentKind::Gift, OrnamentKind::Ball, OrnamentKind::Light];

    /// Repulsion sensitivity.
    pub fn weight(self) -> f32 {
        match self {
            OrnamentKind::Gift => 0.1,
            OrnamentKind::Ball => 0.4,
            OrnamentKind::Light => 0.8,
        }
    }

    /// Base visual size. Unique per kind.
    pub fn scale(self) -> f32 {
        match self {
            OrnamentKind::Gift => 0.4,
            OrnamentKind::Ball => 0.2,
            OrnamentKind::Light => 0.08,
        }
    }

    /// Recover the kind from a scale class, if it is one of the three constants.
    pub fn from_scale(scale: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.scale() == scale)
    }

    /// Position of this kind in [`OrnamentKind::ALL`].
    pub fn slot(self) -> usize {
        match self {
            OrnamentKind::Gift => 0,
            OrnamentKind::Ball => 1,
            OrnamentKind::Light => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OrnamentKind::Gift => "gift",
            OrnamentKind::Ball => "ball",
            OrnamentKind::Light => "light",
        }
    }

    /// Weighted draw: 30% gift, 35% ball, 35% light.
    ///
    /// The second draw only happens when the first one did not pick a gift.
    fn draw<R: Rng>(ctx: &mut SpawnContext<R>) -> Self {
        if ctx.unit() > 0.7 {
            OrnamentKind::Gift
        } else if ctx.unit() > 0.5 {
            OrnamentKind::Ball
        } else {
            OrnamentKind::Light
        }
    }
}

/// A single ornament.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ornament {
    pub chaos: Vec3,
    pub target: Vec3,
    /// Linear RGB.
    pub color: Vec3,
    pub kind: OrnamentKind,
}

impl Ornament {
    /// Repulsion sensitivity of this ornament.
    pub fn weight(&self) -> f32 {
        self.kind.weight()
    }

    /// Visual size of this ornament; also identifies its kind.
    pub fn scale_class(&self) -> f32 {
        self.kind.scale()
    }
}

/// All ornaments, plus their partition into kinds.
#[derive(Debug, Clone)]
pub struct OrnamentLayout {
    ornaments: Vec<Ornament>,
    /// Global indices per kind, ordered as [`OrnamentKind::ALL`].
    partition: [Vec<u32>; 3],
}

impl OrnamentLayout {
    /// Sample `count` ornaments: chaos inside the sphere, target on the cone surface.
    pub fn generate<R: Rng>(
        count: u32,
        shape: &TreeShape,
        ctx: &mut SpawnContext<R>,
    ) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::ZeroOrnamentCount);
        }
        shape.validate()?;

        let ornaments = (0..count)
            .map(|_| {
                let kind = OrnamentKind::draw(ctx);
                let chaos = ctx.chaos_point(shape.chaos_radius);
                let target = ctx.cone_surface_point(shape.height, shape.base_radius);
                let color = hex_to_linear(ORNAMENT_PALETTE[ctx.index(ORNAMENT_PALETTE.len())]);
                Ornament {
                    chaos,
                    target,
                    color,
                    kind,
                }
            })
            .collect();

        Ok(Self::from_ornaments(ornaments))
    }

    /// Build a layout from explicit ornaments.
    pub fn from_ornaments(ornaments: Vec<Ornament>) -> Self {
        let mut partition: [Vec<u32>; 3] = Default::default();
        for (i, ornament) in ornaments.iter().enumerate() {
            partition[ornament.kind.slot()].push(i as u32);
        }
        Self {
            ornaments,
            partition,
        }
    }

    pub fn len(&self) -> usize {
        self.ornaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ornaments.is_empty()
    }

    pub fn ornaments(&self) -> &[Ornament] {
        &self.ornaments
    }

    /// Global indices of the ornaments of one kind, in generation order.
    pub fn indices(&self, kind: OrnamentKind) -> &[u32] {
        &self.partition[kind.slot()]
    }

    /// Number of ornaments of one kind.
    pub fn count(&self, kind: OrnamentKind) -> usize {
        self.partition[kind.slot()].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_radius_at_taper() {
        let shape = TreeShape::default();
        assert_eq!(shape.radius_at(-5.0), 5.0);
        assert_eq!(shape.radius_at(5.0), 0.0);
        assert!((shape.radius_at(0.0) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_kind_probabilities_with_zero_draws() {
        // U = 0 fails both thresholds.
        let mut ctx = SpawnContext::with_rng(StepRng::new(0, 0));
        assert_eq!(OrnamentKind::draw(&mut ctx), OrnamentKind::Light);
    }

    #[test]
    fn test_kind_from_scale() {
        for kind in OrnamentKind::ALL {
            assert_eq!(OrnamentKind::from_scale(kind.scale()), Some(kind));
        }
        assert_eq!(OrnamentKind::from_scale(0.3), None);
    }

    #[test]
    fn test_partition_preserves_order() {
        let make = |kind| Ornament {
            chaos: Vec3::ZERO,
            target: Vec3::ZERO,
            color: Vec3::ONE,
            kind,
        };
        let layout = OrnamentLayout::from_ornaments(vec![
            make(OrnamentKind::Ball),
            make(OrnamentKind::Gift),
            make(OrnamentKind::Ball),
            make(OrnamentKind::Light),
        ]);

        assert_eq!(layout.indices(OrnamentKind::Gift), &[1]);
        assert_eq!(layout.indices(OrnamentKind::Ball), &[0, 2]);
        assert_eq!(layout.indices(OrnamentKind::Light), &[3]);
    }

    #[test]
    fn test_zero_count_fails_fast() {
        let mut ctx = SpawnContext::seeded(1);
        let shape = TreeShape::default();
        assert!(matches!(
            FoliageLayout::generate(0, &shape, &mut ctx),
            Err(ConfigError::ZeroFoliageCount)
        ));
        assert!(matches!(
            OrnamentLayout::generate(0, &shape, &mut ctx),
            Err(ConfigError::ZeroOrnamentCount)
        ));
    }
}
