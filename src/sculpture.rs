//! The sculpture's owned state and its per-frame contract.
//!
//! ```ignore
//! let mut sculpture = Sculpture::initialize(SculptureConfig::default())?;
//! loop {
//!     let input = FrameInput { state, pointer, time: clock.elapsed() };
//!     let commands = sculpture.advance(&input, clock.delta());
//!     renderer.submit(&commands);
//! }
//! sculpture.teardown();
//! ```

use glam::Vec3;
use rand::Rng;

use crate::config::SculptureConfig;
use crate::error::ConfigError;
use crate::foliage::FoliageUniforms;
use crate::layout::{FoliageLayout, OrnamentKind, OrnamentLayout};
use crate::ornaments::{OrnamentBatch, OrnamentField};
use crate::progress::{Progress, TreeState};
use crate::spawn::SpawnContext;

/// Everything the sculpture reads from the outside world in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Configuration the user asked for.
    pub state: TreeState,
    /// Pointer projected onto the `z = 0` plane, in world units.
    pub pointer: Vec3,
    /// Seconds since the session started.
    pub time: f32,
}

/// What the renderer must write this frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderCommands<'a> {
    pub foliage: FoliageUniforms,
    /// One batch per kind, in [`OrnamentKind::ALL`] order.
    pub ornaments: [OrnamentBatch<'a>; 3],
}

/// Generated layouts plus the animation state driven by [`advance`](Sculpture::advance).
pub struct Sculpture {
    config: SculptureConfig,
    foliage: FoliageLayout,
    ornaments: OrnamentLayout,
    foliage_progress: Progress,
    ornament_progress: Progress,
    field: OrnamentField,
    frames: u64,
}

impl Sculpture {
    /// Validate `config` and generate both layouts from a time-seeded source.
    pub fn initialize(config: SculptureConfig) -> Result<Self, ConfigError> {
        Self::initialize_with(config, &mut SpawnContext::from_time())
    }

    /// Like [`initialize`](Self::initialize), drawing from the given context.
    pub fn initialize_with<R: Rng>(
        config: SculptureConfig,
        ctx: &mut SpawnContext<R>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let foliage = FoliageLayout::generate(config.foliage_count, &config.shape, ctx)?;
        let ornaments = OrnamentLayout::generate(config.ornament_count, &config.shape, ctx)?;
        let field = OrnamentField::new(&ornaments);

        log::info!(
            "Generated {} foliage points and {} ornaments ({} gifts, {} balls, {} lights)",
            foliage.len(),
            ornaments.len(),
            ornaments.count(OrnamentKind::Gift),
            ornaments.count(OrnamentKind::Ball),
            ornaments.count(OrnamentKind::Light),
        );

        Ok(Self {
            foliage_progress: Progress::new(config.foliage_rate),
            ornament_progress: Progress::new(config.ornament_rate),
            config,
            foliage,
            ornaments,
            field,
            frames: 0,
        })
    }

    /// Advance one frame.
    ///
    /// Both progress values step towards `input.state`, then the ornament
    /// tables are rebuilt. Foliage positions are left to the shader.
    pub fn advance(&mut self, input: &FrameInput, dt: f32) -> RenderCommands<'_> {
        let foliage = self.foliage_progress.step(input.state, dt);
        let ornaments = self.ornament_progress.step(input.state, dt);

        self.field.update(
            &self.ornaments,
            ornaments,
            input.pointer,
            input.time,
            &self.config.repulsion,
        );
        self.frames += 1;

        RenderCommands {
            foliage: FoliageUniforms::new(foliage, input.time),
            ornaments: self.field.batches(),
        }
    }

    /// End the session.
    pub fn teardown(self) {
        log::info!(
            "Sculpture torn down after {} frames (foliage {:.3}, ornaments {:.3})",
            self.frames,
            self.foliage_progress.value(),
            self.ornament_progress.value(),
        );
    }

    pub fn config(&self) -> &SculptureConfig {
        &self.config
    }

    pub fn foliage(&self) -> &FoliageLayout {
        &self.foliage
    }

    pub fn ornaments(&self) -> &OrnamentLayout {
        &self.ornaments
    }

    pub fn foliage_progress(&self) -> f32 {
        self.foliage_progress.value()
    }

    pub fn ornament_progress(&self) -> f32 {
        self.ornament_progress.value()
    }

    /// Frames advanced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
