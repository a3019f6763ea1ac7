//! Sculpture configuration.
//!
//! The defaults below are the shipped look of the sculpture. [`SculptureConfig`]
//! exists so tests and benchmarks can shrink the layers; the viewer always runs
//! with `SculptureConfig::default()`.
//!
//! ```ignore
//! let config = SculptureConfig::new()
//!     .with_foliage_count(1_000)
//!     .with_ornament_count(20);
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use crate::layout::TreeShape;
use crate::repulsion::Repulsion;

/// Number of foliage particles.
pub const FOLIAGE_COUNT: u32 = 30_000;
/// Number of ornaments.
pub const ORNAMENT_COUNT: u32 = 150;
/// Radius of the sphere the chaos cloud is sampled from.
pub const CHAOS_RADIUS: f32 = 15.0;
/// Height of the formed tree.
pub const TREE_HEIGHT: f32 = 10.0;
/// Base radius of the formed tree.
pub const TREE_RADIUS: f32 = 5.0;
/// Smoothing rate of the foliage progress (per second).
pub const FOLIAGE_RATE: f32 = 2.5;
/// Smoothing rate of the ornament progress (per second).
///
/// Slower than foliage so ornaments settle after the needles.
pub const ORNAMENT_RATE: f32 = 2.0;
/// Distance from the pointer beyond which ornaments are not pushed.
pub const REPULSION_REACH: f32 = 5.0;
/// Multiplier applied to the repulsion force.
pub const REPULSION_FORCE_SCALE: f32 = 0.5;

/// Settings for one sculpture session.
#[derive(Debug, Clone, PartialEq)]
pub struct SculptureConfig {
    pub foliage_count: u32,
    pub ornament_count: u32,
    pub shape: TreeShape,
    pub foliage_rate: f32,
    pub ornament_rate: f32,
    pub repulsion: Repulsion,
}

impl SculptureConfig {
    /// Create a configuration with the shipped defaults.
    pub fn new() -> Self {
        Self {
            foliage_count: FOLIAGE_COUNT,
            ornament_count: ORNAMENT_COUNT,
            shape: TreeShape::default(),
            foliage_rate: FOLIAGE_RATE,
            ornament_rate: ORNAMENT_RATE,
            repulsion: Repulsion::default(),
        }
    }

    /// Set the number of foliage particles.
    pub fn with_foliage_count(mut self, count: u32) -> Self {
        self.foliage_count = count;
        self
    }

    /// Set the number of ornaments.
    pub fn with_ornament_count(mut self, count: u32) -> Self {
        self.ornament_count = count;
        self
    }

    /// Set the chaos sphere and tree cone dimensions.
    pub fn with_shape(mut self, shape: TreeShape) -> Self {
        self.shape = shape;
        self
    }

    /// Set the smoothing rates of the foliage and ornament layers.
    pub fn with_rates(mut self, foliage: f32, ornaments: f32) -> Self {
        self.foliage_rate = foliage;
        self.ornament_rate = ornaments;
        self
    }

    /// Set the pointer repulsion field.
    pub fn with_repulsion(mut self, repulsion: Repulsion) -> Self {
        self.repulsion = repulsion;
        self
    }

    /// Check every setting, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.foliage_count == 0 {
            return Err(ConfigError::ZeroFoliageCount);
        }
        if self.ornament_count == 0 {
            return Err(ConfigError::ZeroOrnamentCount);
        }

        self.shape.validate()?;
        positive("foliage_rate", self.foliage_rate)?;
        positive("ornament_rate", self.ornament_rate)?;
        positive("repulsion_reach", self.repulsion.reach)?;
        // A zero scale disables repulsion, which is allowed.
        if !(self.repulsion.force_scale.is_finite() && self.repulsion.force_scale >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "repulsion_force_scale",
                value: self.repulsion.force_scale,
            });
        }
        Ok(())
    }
}

impl Default for SculptureConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject values that are not finite and strictly positive.
pub(crate) fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SculptureConfig::default();
        assert_eq!(config.foliage_count, 30_000);
        assert_eq!(config.ornament_count, 150);
        assert_eq!(config.shape.chaos_radius, 15.0);
        assert_eq!(config.shape.height, 10.0);
        assert_eq!(config.shape.base_radius, 5.0);
        assert_eq!(config.foliage_rate, 2.5);
        assert_eq!(config.ornament_rate, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let config = SculptureConfig::new().with_foliage_count(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroFoliageCount));

        let config = SculptureConfig::new().with_ornament_count(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroOrnamentCount));
    }

    #[test]
    fn test_bad_rates_rejected() {
        let config = SculptureConfig::new().with_rates(0.0, 2.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "foliage_rate", .. })
        ));

        let config = SculptureConfig::new().with_rates(2.5, f32::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "ornament_rate", .. })
        ));
    }

    #[test]
    fn test_zero_force_scale_allowed() {
        let config = SculptureConfig::new().with_repulsion(Repulsion {
            reach: 5.0,
            force_scale: 0.0,
        });
        assert!(config.validate().is_ok());
    }
}
