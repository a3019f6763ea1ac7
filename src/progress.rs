//! Interpolation driver: per-layer progress between chaos (0) and formed (1).
//!
//! Progress follows a one-pole exponential smoothing law rather than a
//! fixed-duration tween. Each frame moves the value a fraction `dt * rate` of
//! the remaining distance towards the target, so it takes roughly `5 / rate`
//! seconds to get within 1% and keeps running (as a no-op) once converged.
//!
//! ```ignore
//! let mut foliage = Progress::new(FOLIAGE_RATE);
//! foliage.step(TreeState::Formed, time.delta());
//! ```

/// Which configuration the sculpture is heading towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TreeState {
    /// Diffuse random cloud.
    #[default]
    Chaos,
    /// Cone-shaped tree.
    Formed,
}

impl TreeState {
    /// Progress value this state pulls towards.
    pub fn target_value(self) -> f32 {
        match self {
            TreeState::Chaos => 0.0,
            TreeState::Formed => 1.0,
        }
    }

    /// The other state.
    pub fn toggled(self) -> Self {
        match self {
            TreeState::Chaos => TreeState::Formed,
            TreeState::Formed => TreeState::Chaos,
        }
    }

    /// Label for the action that would switch away from this state.
    pub fn action_label(self) -> &'static str {
        match self {
            TreeState::Chaos => "Form the Tree",
            TreeState::Formed => "Release Chaos",
        }
    }
}

/// One smoothing step: `p + (target - p) * k` with `k = dt * rate`.
///
/// `k` is clamped to `[0, 1]`, so a stalled frame (huge `dt`) lands exactly on
/// the target instead of overshooting past it, and a negative `dt` is a no-op.
/// At the fixed points (`p == target`) the result is `target` exactly.
#[inline]
pub fn interpolation_step(progress: f32, target: f32, dt: f32, rate: f32) -> f32 {
    let k = (dt * rate).clamp(0.0, 1.0);
    if k.is_nan() {
        return progress;
    }
    progress + (target - progress) * k
}

/// Progress of one visual layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    value: f32,
    rate: f32,
}

impl Progress {
    /// Start fully in chaos.
    pub fn new(rate: f32) -> Self {
        Self { value: 0.0, rate }
    }

    /// Current value in `[0, 1]`.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Smoothing rate in 1/seconds.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Advance one frame towards `state`. Returns the new value.
    pub fn step(&mut self, state: TreeState, dt: f32) -> f32 {
        self.value = interpolation_step(self.value, state.target_value(), dt, self.rate);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_points_are_exact() {
        for dt in [0.0, 1.0 / 144.0, 1.0 / 60.0, 0.25, 3.0, 1e6] {
            assert_eq!(interpolation_step(1.0, 1.0, dt, 2.5), 1.0);
            assert_eq!(interpolation_step(0.0, 0.0, dt, 2.0), 0.0);
        }
    }

    #[test]
    fn test_stalled_frame_does_not_overshoot() {
        // dt * rate = 25: unclamped this would land at 25.
        assert_eq!(interpolation_step(0.0, 1.0, 10.0, 2.5), 1.0);
        assert_eq!(interpolation_step(1.0, 0.0, 10.0, 2.5), 0.0);
    }

    #[test]
    fn test_negative_dt_is_noop() {
        assert_eq!(interpolation_step(0.4, 1.0, -0.1, 2.5), 0.4);
    }

    #[test]
    fn test_single_step_value() {
        let p = interpolation_step(0.0, 1.0, 0.1, 2.5);
        assert!((p - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_is_involution() {
        for state in [TreeState::Chaos, TreeState::Formed] {
            assert_eq!(state.toggled().toggled(), state);
            assert_ne!(state.toggled(), state);
        }
        assert_eq!(TreeState::default(), TreeState::Chaos);
    }

    #[test]
    fn test_progress_heads_back_to_chaos() {
        let mut progress = Progress::new(2.0);
        for _ in 0..120 {
            progress.step(TreeState::Formed, 1.0 / 60.0);
        }
        let formed = progress.value();
        progress.step(TreeState::Chaos, 1.0 / 60.0);
        assert!(progress.value() < formed);
    }
}
