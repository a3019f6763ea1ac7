//! Ornament layer: host-side blend, repulsion and instance tables.
//!
//! At 150 entities the whole pipeline (blend, repulsion, breathing scale, spin)
//! runs on the CPU every frame and is written into one compact table per
//! [`OrnamentKind`], ready to be copied into an instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::layout::{OrnamentKind, OrnamentLayout};
use crate::repulsion::Repulsion;

/// Angular speed of the ornament spin, in radians per second.
pub const SPIN_SPEED: f32 = 0.5;
/// Relative amplitude of the breathing pulse.
pub const PULSE_AMPLITUDE: f32 = 0.2;

/// One ornament instance as the renderer consumes it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct OrnamentInstance {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
    /// Linear RGB, alpha unused.
    pub color: [f32; 4],
}

impl OrnamentInstance {
    pub fn new(model: Mat4, color: Vec3) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
        }
    }

    /// World-space translation of this instance.
    pub fn position(&self) -> Vec3 {
        Mat4::from_cols_array_2d(&self.model).w_axis.truncate()
    }

    /// Instance buffer layout, locations 2-6 (0 and 1 belong to the mesh).
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OrnamentInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Instances of one kind for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct OrnamentBatch<'a> {
    pub kind: OrnamentKind,
    pub instances: &'a [OrnamentInstance],
}

/// Scale of ornament `index` at `time`: a slow pulse around its scale class.
pub fn breathing_scale(scale_class: f32, index: u32, time: f32) -> f32 {
    scale_class * ((1.0 - PULSE_AMPLITUDE) + PULSE_AMPLITUDE * (time + index as f32).sin())
}

/// Spin about Y; even indices turn one way, odd the other.
pub fn spin_angle(index: u32, time: f32) -> f32 {
    let direction = if index % 2 == 0 { 1.0 } else { -1.0 };
    time * direction * SPIN_SPEED
}

/// Full transform of ornament `index` at its final (repelled) position.
pub fn ornament_transform(index: u32, position: Vec3, scale_class: f32, time: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::splat(breathing_scale(scale_class, index, time)),
        Quat::from_rotation_y(spin_angle(index, time)),
        position,
    )
}

/// Per-kind instance tables, rewritten every frame.
#[derive(Debug, Clone)]
pub struct OrnamentField {
    tables: [Vec<OrnamentInstance>; 3],
}

impl OrnamentField {
    /// Allocate tables sized to the layout's partition.
    pub fn new(layout: &OrnamentLayout) -> Self {
        let tables = OrnamentKind::ALL.map(|kind| vec![OrnamentInstance::zeroed(); layout.count(kind)]);
        Self { tables }
    }

    /// Recompute every instance for this frame.
    ///
    /// Blend between chaos and target at `progress`, push away from `pointer`,
    /// then apply the breathing scale and spin.
    pub fn update(
        &mut self,
        layout: &OrnamentLayout,
        progress: f32,
        pointer: Vec3,
        time: f32,
        repulsion: &Repulsion,
    ) {
        let ornaments = layout.ornaments();
        for kind in OrnamentKind::ALL {
            let table = &mut self.tables[kind.slot()];
            for (slot, &index) in table.iter_mut().zip(layout.indices(kind)) {
                let ornament = &ornaments[index as usize];
                let base = ornament.chaos.lerp(ornament.target, progress);
                let position = repulsion.resolve(base, pointer, ornament.weight());
                let model = ornament_transform(index, position, ornament.scale_class(), time);
                *slot = OrnamentInstance::new(model, ornament.color);
            }
        }
    }

    /// Instances of one kind.
    pub fn batch(&self, kind: OrnamentKind) -> OrnamentBatch<'_> {
        OrnamentBatch {
            kind,
            instances: &self.tables[kind.slot()],
        }
    }

    /// All three batches, in [`OrnamentKind::ALL`] order.
    pub fn batches(&self) -> [OrnamentBatch<'_>; 3] {
        OrnamentKind::ALL.map(|kind| self.batch(kind))
    }
}

/// WGSL for the ornament pass.
///
/// Mesh vertices arrive at locations 0-1 and [`OrnamentInstance`] at 2-6.
/// `fs_lit` shades gifts and balls with an ambient term plus a gold key light
/// and an emerald fill; `fs_unlit` draws the lights as flat emissive colour.
pub const ORNAMENT_WGSL: &str = r#"
struct Scene {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    camera_pos: vec4<f32>,
    viewport: vec4<f32>,
};

@group(0) @binding(0) var<uniform> scene: Scene;

const AMBIENT: f32 = 0.4;
const KEY_LIGHT_POS: vec3<f32> = vec3<f32>(10.0, 10.0, 10.0);
const KEY_LIGHT_COLOR: vec3<f32> = vec3<f32>(1.0, 0.68, 0.0);
const KEY_LIGHT_INTENSITY: f32 = 1.6;
const FILL_LIGHT_POS: vec3<f32> = vec3<f32>(-10.0, 20.0, 10.0);
const FILL_LIGHT_COLOR: vec3<f32> = vec3<f32>(0.0, 0.074, 0.05);
const FILL_LIGHT_INTENSITY: f32 = 1.5;
const SHININESS: f32 = 48.0;
const SPECULAR: f32 = 0.6;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(instance.model_0, instance.model_1, instance.model_2, instance.model_3);
    let world = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = scene.view_proj * world;
    out.world_pos = world.xyz;
    // Uniform scale + rotation only, so the model matrix is fine for normals.
    out.normal = normalize((model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.color = instance.color.rgb;
    return out;
}

fn point_light(albedo: vec3<f32>, light_pos: vec3<f32>, light_color: vec3<f32>, world_pos: vec3<f32>, n: vec3<f32>, v: vec3<f32>) -> vec3<f32> {
    let l = normalize(light_pos - world_pos);
    let h = normalize(l + v);
    let diffuse = max(dot(n, l), 0.0);
    let specular = pow(max(dot(n, h), 0.0), SHININESS) * SPECULAR;
    return (albedo * diffuse + vec3<f32>(specular)) * light_color;
}

@fragment
fn fs_lit(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.normal);
    let v = normalize(scene.camera_pos.xyz - in.world_pos);

    var rgb = in.color * AMBIENT;
    rgb += point_light(in.color, KEY_LIGHT_POS, KEY_LIGHT_COLOR, in.world_pos, n, v) * KEY_LIGHT_INTENSITY;
    rgb += point_light(in.color, FILL_LIGHT_POS, FILL_LIGHT_COLOR, in.world_pos, n, v) * FILL_LIGHT_INTENSITY;
    return vec4<f32>(rgb, 1.0);
}

@fragment
fn fs_unlit(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Ornament;

    fn single(kind: OrnamentKind, chaos: Vec3, target: Vec3) -> OrnamentLayout {
        OrnamentLayout::from_ornaments(vec![Ornament {
            chaos,
            target,
            color: Vec3::new(1.0, 0.0, 0.0),
            kind,
        }])
    }

    #[test]
    fn test_breathing_scale_range() {
        for i in 0..50 {
            let s = breathing_scale(0.4, i, i as f32 * 0.3);
            assert!(s >= 0.4 * 0.6 - 1e-6 && s <= 0.4 + 1e-6);
        }
    }

    #[test]
    fn test_spin_alternates() {
        assert!(spin_angle(0, 2.0) > 0.0);
        assert!(spin_angle(1, 2.0) < 0.0);
        assert_eq!(spin_angle(4, 2.0), -spin_angle(7, 2.0));
    }

    #[test]
    fn test_update_blends_without_pointer_influence() {
        let layout = single(
            OrnamentKind::Gift,
            Vec3::new(40.0, 0.0, 0.0),
            Vec3::new(60.0, 0.0, 0.0),
        );
        let mut field = OrnamentField::new(&layout);
        // Pointer far away: no repulsion.
        field.update(&layout, 0.5, Vec3::ZERO, 0.0, &Repulsion::default());

        let batch = field.batch(OrnamentKind::Gift);
        assert_eq!(batch.instances.len(), 1);
        let pos = batch.instances[0].position();
        assert!((pos - Vec3::new(50.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(batch.instances[0].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_update_applies_repulsion() {
        let layout = single(OrnamentKind::Light, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let mut field = OrnamentField::new(&layout);
        field.update(&layout, 0.0, Vec3::ZERO, 0.0, &Repulsion::default());

        // (5 - 1) * 0.8 * 0.5 = 1.6 pushed along +X.
        let pos = field.batch(OrnamentKind::Light).instances[0].position();
        assert!((pos - Vec3::new(2.6, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_pointer_on_ornament_stays_finite() {
        let at = Vec3::new(0.5, 0.5, 0.0);
        let layout = single(OrnamentKind::Ball, at, at);
        let mut field = OrnamentField::new(&layout);
        field.update(&layout, 1.0, at, 3.0, &Repulsion::default());

        let instance = field.batch(OrnamentKind::Ball).instances[0];
        assert!(instance.model.iter().flatten().all(|v| v.is_finite()));
        assert!((instance.position() - at).length() < 1e-5);
    }

    #[test]
    fn test_batches_follow_partition() {
        let layout = single(OrnamentKind::Ball, Vec3::ZERO, Vec3::ONE);
        let field = OrnamentField::new(&layout);
        let batches = field.batches();
        assert_eq!(batches[0].instances.len(), 0);
        assert_eq!(batches[1].instances.len(), 1);
        assert_eq!(batches[2].instances.len(), 0);
        assert_eq!(batches[1].kind, OrnamentKind::Ball);
    }
}
