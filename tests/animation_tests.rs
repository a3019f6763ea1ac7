//! Integration tests for the per-frame animation contract.
//!
//! Covers progress smoothing, ornament repulsion and the full
//! `Sculpture::advance` path without a GPU.

use evergreen::progress::interpolation_step;
use evergreen::{
    FrameInput, Ornament, OrnamentKind, Repulsion, Sculpture, SculptureConfig, SpawnContext, TreeState,
    Vec3,
};

fn sculpture(seed: u64) -> Sculpture {
    let config = SculptureConfig::new()
        .with_foliage_count(256)
        .with_ornament_count(40);
    Sculpture::initialize_with(config, &mut SpawnContext::seeded(seed)).unwrap()
}

fn frame(state: TreeState, pointer: Vec3, time: f32) -> FrameInput {
    FrameInput {
        state,
        pointer,
        time,
    }
}

const FAR_AWAY: Vec3 = Vec3::new(1_000.0, 1_000.0, 0.0);

// ============================================================================
// Progress smoothing
// ============================================================================

#[test]
fn test_fixed_points() {
    for dt in [0.0, 1.0 / 60.0, 0.25, 10.0] {
        assert_eq!(interpolation_step(0.0, 0.0, dt, 2.5), 0.0);
        assert_eq!(interpolation_step(1.0, 1.0, dt, 2.5), 1.0);
    }
}

#[test]
fn test_monotonic_convergence_to_formed() {
    let mut p = 0.0_f32;
    for _ in 0..2_000 {
        let next = interpolation_step(p, 1.0, 1.0 / 60.0, 2.5);
        assert!(next >= p);
        assert!(next <= 1.0);
        if 1.0 - p > 1e-4 {
            assert!(next > p, "stalled at {p}");
        }
        p = next;
    }
}

#[test]
fn test_monotonic_convergence_to_chaos() {
    let mut p = 1.0_f32;
    for _ in 0..2_000 {
        let next = interpolation_step(p, 0.0, 1.0 / 60.0, 2.0);
        assert!(next <= p);
        assert!(next >= 0.0);
        p = next;
    }
    assert!(p < 1e-3);
}

#[test]
fn test_five_seconds_at_sixty_fps_is_nearly_formed() {
    let mut p = 0.0_f32;
    for _ in 0..300 {
        p = interpolation_step(p, 1.0, 1.0 / 60.0, 2.5);
    }
    assert!(p > 0.99, "progress {p}");
}

#[test]
fn test_reversal_mid_transition() {
    let mut s = sculpture(1);
    for i in 0..30 {
        s.advance(&frame(TreeState::Formed, FAR_AWAY, i as f32 / 60.0), 1.0 / 60.0);
    }
    let peak = s.foliage_progress();
    assert!(peak > 0.0 && peak < 1.0);

    s.advance(&frame(TreeState::Chaos, FAR_AWAY, 0.5), 1.0 / 60.0);
    assert!(s.foliage_progress() < peak);
}

// ============================================================================
// Repulsion
// ============================================================================

#[test]
fn test_repulsion_guard_at_zero_distance() {
    let field = Repulsion::default();
    let at = Vec3::new(2.0, -1.0, 0.0);
    for weight in [0.1, 0.4, 0.8] {
        let resolved = field.resolve(at, at, weight);
        assert!(resolved.is_finite());
        assert_eq!(resolved, at);
    }
}

#[test]
fn test_repulsion_only_pushes_outward() {
    let field = Repulsion::default();
    let pointer = Vec3::ZERO;
    for i in 1..50 {
        let base = Vec3::new(i as f32 * 0.1, 0.3, -0.2);
        let resolved = field.resolve(base, pointer, 0.8);
        assert!(resolved.length() >= base.length() - 1e-6);
    }
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_large_step_lands_on_targets() {
    let mut s = sculpture(2);
    let ornaments = s.ornaments().ornaments().to_vec();

    // k = dt * rate is clamped to 1, so one long frame reaches the target.
    let commands = s.advance(&frame(TreeState::Formed, FAR_AWAY, 0.0), 1.0);
    assert_eq!(commands.foliage.progress, 1.0);
    for batch in commands.ornaments {
        for (instance, index) in batch.instances.iter().zip(kind_indices(&ornaments, batch.kind)) {
            assert!((instance.position() - ornaments[index].target).length() < 1e-4);
        }
    }
}

fn kind_indices(ornaments: &[Ornament], kind: OrnamentKind) -> Vec<usize> {
    ornaments
        .iter()
        .enumerate()
        .filter(|(_, o)| o.kind == kind)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_chaos_frame_keeps_ornaments_at_chaos() {
    let mut s = sculpture(3);
    let ornaments = s.ornaments().ornaments().to_vec();
    let commands = s.advance(&frame(TreeState::Chaos, FAR_AWAY, 0.0), 1.0 / 60.0);

    assert_eq!(commands.foliage.progress, 0.0);
    let total: usize = commands.ornaments.iter().map(|b| b.instances.len()).sum();
    assert_eq!(total, ornaments.len());
    for batch in commands.ornaments {
        for (instance, index) in batch.instances.iter().zip(kind_indices(&ornaments, batch.kind)) {
            assert!((instance.position() - ornaments[index].chaos).length() < 1e-4);
        }
    }
}

#[test]
fn test_pointer_on_ornament_keeps_frame_finite() {
    let mut s = sculpture(4);
    let pointer = s.ornaments().ornaments()[0].chaos;
    let commands = s.advance(&frame(TreeState::Chaos, pointer, 1.5), 1.0 / 60.0);
    for batch in commands.ornaments {
        for instance in batch.instances {
            assert!(instance.model.iter().flatten().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn test_foliage_settles_before_ornaments() {
    let mut s = sculpture(5);
    for i in 0..60 {
        s.advance(&frame(TreeState::Formed, FAR_AWAY, i as f32 / 60.0), 1.0 / 60.0);
    }
    assert!(s.foliage_progress() > s.ornament_progress());
    assert_eq!(s.frames(), 60);
}
