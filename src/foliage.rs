//! Foliage layer: 30k needles blended on the GPU.
//!
//! Chaos and target positions are uploaded once as an instance-rate vertex
//! buffer. Every frame only [`FoliageUniforms`] changes; the vertex shader in
//! [`FOLIAGE_WGSL`] performs the blend, the sway and the colour hash.
//!
//! The host functions in this module mirror the shader math. They are used by
//! tests and by offline consumers that need the same positions on the CPU; the
//! interactive path never calls them per needle.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::visuals::{FOLIAGE_BASE_COLOR, FOLIAGE_TIP_COLOR, FOLIAGE_TIP_MIX};

/// Amplitude of the sideways sway once the tree is formed.
pub const SWAY_AMPLITUDE: f32 = 0.1;
/// Angular speed of the sway, in radians per second.
pub const SWAY_SPEED: f32 = 0.5;
/// Point size numerator: pixels at one world unit of view depth.
pub const POINT_SIZE: f32 = 12.0;

/// One needle, as laid out in the vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FoliageVertex {
    pub chaos: [f32; 3],
    pub target: [f32; 3],
}

impl FoliageVertex {
    pub fn new(chaos: Vec3, target: Vec3) -> Self {
        Self {
            chaos: chaos.to_array(),
            target: target.to_array(),
        }
    }

    /// Vertex buffer layout: one vertex per needle instance.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FoliageVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Per-frame parameters of the foliage shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FoliageUniforms {
    /// Foliage progress in `[0, 1]`.
    pub progress: f32,
    /// Seconds since the session started.
    pub time: f32,
    pub _padding: [f32; 2],
}

impl FoliageUniforms {
    pub fn new(progress: f32, time: f32) -> Self {
        Self {
            progress,
            time,
            _padding: [0.0; 2],
        }
    }
}

/// Needle position at `progress`, including the formed-state sway.
pub fn blend_position(chaos: Vec3, target: Vec3, progress: f32, time: f32) -> Vec3 {
    let mut pos = chaos.lerp(target, progress);
    let phase = time * SWAY_SPEED + pos.y;
    pos.x += phase.sin() * SWAY_AMPLITUDE * progress;
    pos.z += phase.cos() * SWAY_AMPLITUDE * progress;
    pos
}

/// Stable per-needle hash in `[0, 1]`, keyed on the chaos position only.
///
/// Depends on nothing that changes over time, so a needle keeps its tint
/// through the whole transition.
pub fn color_hash(chaos: Vec3) -> f32 {
    let x = (chaos.x * 12.9898 + chaos.y * 78.233).sin() * 43758.5453;
    x - x.floor()
}

/// Needle tint: emerald shading towards gold.
pub fn needle_color(chaos: Vec3) -> Vec3 {
    FOLIAGE_BASE_COLOR.lerp(FOLIAGE_TIP_COLOR, color_hash(chaos) * FOLIAGE_TIP_MIX)
}

/// Needle opacity; the tree is brighter once formed.
pub fn opacity(progress: f32) -> f32 {
    0.6 + 0.4 * progress
}

/// Point diameter in pixels for a needle at `view_depth` world units from the camera.
pub fn point_size(view_depth: f32, position: Vec3, time: f32) -> f32 {
    (POINT_SIZE / view_depth.max(1e-3)) * (1.0 + 0.5 * (time + position.x * 10.0).sin())
}

/// WGSL for the foliage pass.
///
/// Bind group 0 holds the shared scene uniforms, group 1 the [`FoliageUniforms`].
/// Each needle is drawn as a 6-vertex quad sized like a point sprite.
pub const FOLIAGE_WGSL: &str = r#"
struct Scene {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    camera_pos: vec4<f32>,
    viewport: vec4<f32>,
};

struct Foliage {
    progress: f32,
    time: f32,
    _padding: vec2<f32>,
};

@group(0) @binding(0) var<uniform> scene: Scene;
@group(1) @binding(0) var<uniform> foliage: Foliage;

const SWAY_AMPLITUDE: f32 = 0.1;
const SWAY_SPEED: f32 = 0.5;
const POINT_SIZE: f32 = 12.0;
const BASE_COLOR: vec3<f32> = vec3<f32>(0.0, 0.3, 0.25);
const TIP_COLOR: vec3<f32> = vec3<f32>(1.0, 0.84, 0.0);
const TIP_MIX: f32 = 0.2;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) opacity: f32,
    @location(2) uv: vec2<f32>,
};

fn color_hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(12.9898, 78.233))) * 43758.5453);
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) chaos_pos: vec3<f32>,
    @location(1) target_pos: vec3<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let corner = quad_vertices[vertex_index];
    let p = foliage.progress;

    var pos = mix(chaos_pos, target_pos, p);
    let phase = foliage.time * SWAY_SPEED + pos.y;
    pos.x += sin(phase) * SWAY_AMPLITUDE * p;
    pos.z += cos(phase) * SWAY_AMPLITUDE * p;

    let view_pos = scene.view * vec4<f32>(pos, 1.0);
    var clip_pos = scene.view_proj * vec4<f32>(pos, 1.0);

    // Diameter in pixels -> half extent in NDC is size / viewport.
    let pulse = 1.0 + 0.5 * sin(foliage.time + pos.x * 10.0);
    let size_px = (POINT_SIZE / max(-view_pos.z, 0.001)) * pulse;
    clip_pos.x += corner.x * size_px / scene.viewport.x * clip_pos.w;
    clip_pos.y += corner.y * size_px / scene.viewport.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = mix(BASE_COLOR, TIP_COLOR, color_hash(chaos_pos.xy) * TIP_MIX);
    out.opacity = 0.6 + 0.4 * p;
    out.uv = corner;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // uv spans [-1, 1]; r is the distance from the sprite centre in [0, 0.5] at the rim.
    let r = length(in.uv) * 0.5;
    if r > 0.5 {
        discard;
    }
    let strength = 1.0 - r * 2.0;
    return vec4<f32>(in.color, strength * in.opacity);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_at_chaos_is_plain_chaos() {
        let chaos = Vec3::new(3.0, -2.0, 7.0);
        let target = Vec3::new(0.5, 1.0, -0.5);
        // Sway is scaled by progress, so at 0 nothing moves.
        assert_eq!(blend_position(chaos, target, 0.0, 12.3), chaos);
    }

    #[test]
    fn test_blend_at_formed_sways_around_target() {
        let chaos = Vec3::new(3.0, -2.0, 7.0);
        let target = Vec3::new(0.5, 1.0, -0.5);
        let pos = blend_position(chaos, target, 1.0, 4.0);
        assert_eq!(pos.y, target.y);
        let sway = Vec3::new(pos.x - target.x, 0.0, pos.z - target.z).length();
        assert!((sway - SWAY_AMPLITUDE).abs() < 1e-5);
    }

    #[test]
    fn test_color_hash_is_stable_and_bounded() {
        let chaos = Vec3::new(-4.2, 1.7, 9.9);
        let a = color_hash(chaos);
        let b = color_hash(chaos);
        assert_eq!(a, b);
        assert!((0.0..=1.0).contains(&a));

        // Only x and y participate.
        assert_eq!(color_hash(Vec3::new(-4.2, 1.7, -3.0)), a);
    }

    #[test]
    fn test_needle_color_stays_near_emerald() {
        for i in 0..100 {
            let chaos = Vec3::new(i as f32 * 0.37, i as f32 * -0.11, 0.0);
            let c = needle_color(chaos);
            assert!(c.x >= 0.0 && c.x <= FOLIAGE_TIP_MIX + 1e-6);
            assert!(c.y >= 0.3 - 1e-6);
        }
    }

    #[test]
    fn test_opacity_range() {
        assert!((opacity(0.0) - 0.6).abs() < 1e-6);
        assert!((opacity(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_layout_is_16_bytes() {
        assert_eq!(std::mem::size_of::<FoliageUniforms>(), 16);
        assert_eq!(std::mem::size_of::<FoliageVertex>(), 24);
    }
}
