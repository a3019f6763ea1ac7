//! # Evergreen
//!
//! A particle tree sculpture. Thirty thousand foliage points and a hundred and
//! fifty ornaments drift as a spherical cloud until asked to form, then glide
//! into a cone-shaped tree. Ornaments shy away from the pointer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use evergreen::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     evergreen::run(SculptureConfig::default().with_foliage_count(50_000))
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Layouts
//!
//! Every element owns two fixed positions generated once at startup: a chaos
//! position inside a sphere and a target position on the tree.
//! [`FoliageLayout`] and [`OrnamentLayout`] hold them.
//!
//! ### Progress
//!
//! A [`TreeState`] toggle selects where the sculpture is heading. Each layer
//! has its own [`Progress`] value that eases towards the state's target with
//! exponential smoothing, so foliage and ornaments arrive at different times.
//!
//! ### Frames
//!
//! [`Sculpture::advance`] takes a [`FrameInput`] and a delta time and returns
//! [`RenderCommands`]: the foliage shader parameters plus per-kind ornament
//! instance tables. Rendering itself lives behind [`run`].
//!
//! ```ignore
//! let mut sculpture = Sculpture::initialize(SculptureConfig::default())?;
//! let commands = sculpture.advance(
//!     &FrameInput { state: TreeState::Formed, pointer: Vec3::ZERO, time: 0.0 },
//!     1.0 / 60.0,
//! );
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade. The binary installs
//! `env_logger`, so `RUST_LOG=debug` shows adapter and layout details.

mod app;
pub mod config;
pub mod error;
pub mod foliage;
mod gpu;
pub mod input;
pub mod layout;
pub mod ornaments;
pub mod progress;
pub mod repulsion;
pub mod sculpture;
pub mod spawn;
pub mod time;
pub mod visuals;

pub use app::run;
pub use config::SculptureConfig;
pub use error::{AppError, ConfigError, GpuError};
pub use glam::{Vec2, Vec3};
pub use gpu::{Camera, Mesh, MeshVertex};
pub use layout::{FoliageLayout, Ornament, OrnamentKind, OrnamentLayout, TreeShape};
pub use progress::{Progress, TreeState};
pub use repulsion::Repulsion;
pub use sculpture::{FrameInput, RenderCommands, Sculpture};
pub use spawn::SpawnContext;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use evergreen::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::SculptureConfig;
    pub use crate::error::{AppError, ConfigError};
    pub use crate::input::{Input, KeyCode, MouseButton};
    pub use crate::layout::{OrnamentKind, TreeShape};
    pub use crate::progress::TreeState;
    pub use crate::repulsion::Repulsion;
    pub use crate::sculpture::{FrameInput, RenderCommands, Sculpture};
    pub use crate::spawn::SpawnContext;
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3};
}
