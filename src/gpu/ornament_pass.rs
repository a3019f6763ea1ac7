//! Instanced mesh pass for the ornaments.
//!
//! One mesh and one instance buffer per [`OrnamentKind`]. Gifts and balls go
//! through the lit pipeline, lights through the unlit one.

use wgpu::util::DeviceExt;

use super::mesh::{Mesh, MeshVertex};
use super::DEPTH_FORMAT;
use crate::layout::{OrnamentKind, OrnamentLayout};
use crate::ornaments::{OrnamentBatch, OrnamentInstance, ORNAMENT_WGSL};

struct KindBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    capacity: usize,
    /// Instances written this frame.
    live: u32,
}

/// GPU state for the ornament layer.
pub struct OrnamentPass {
    lit_pipeline: wgpu::RenderPipeline,
    unlit_pipeline: wgpu::RenderPipeline,
    kinds: [KindBuffers; 3],
}

impl OrnamentPass {
    pub fn new(
        device: &wgpu::Device,
        scene_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        layout: &OrnamentLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ornament Shader"),
            source: wgpu::ShaderSource::Wgsl(ORNAMENT_WGSL.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ornament Pipeline Layout"),
            bind_group_layouts: &[scene_layout],
            push_constant_ranges: &[],
        });

        let lit_pipeline = create_pipeline(device, &pipeline_layout, &shader, "fs_lit", surface_format);
        let unlit_pipeline = create_pipeline(device, &pipeline_layout, &shader, "fs_unlit", surface_format);

        let kinds = OrnamentKind::ALL.map(|kind| {
            let mesh = Mesh::for_kind(kind);
            // Never zero-sized, so an empty category still has a bindable buffer.
            let capacity = layout.count(kind).max(1);
            KindBuffers {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Ornament Mesh Vertex Buffer ({})", kind.name())),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Ornament Mesh Index Buffer ({})", kind.name())),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: mesh.index_count(),
                instance_buffer: device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("Ornament Instance Buffer ({})", kind.name())),
                    size: (capacity * std::mem::size_of::<OrnamentInstance>()) as wgpu::BufferAddress,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }),
                capacity,
                live: 0,
            }
        });

        Self {
            lit_pipeline,
            unlit_pipeline,
            kinds,
        }
    }

    /// Copy this frame's instance tables to the GPU.
    pub fn update(&mut self, queue: &wgpu::Queue, batches: &[OrnamentBatch<'_>]) {
        for batch in batches {
            let buffers = &mut self.kinds[batch.kind.slot()];
            let instances = &batch.instances[..batch.instances.len().min(buffers.capacity)];
            buffers.live = instances.len() as u32;
            if !instances.is_empty() {
                queue.write_buffer(&buffers.instance_buffer, 0, bytemuck::cast_slice(instances));
            }
        }
    }

    /// Record the draws. The scene bind group must already be set at index 0.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        for kind in OrnamentKind::ALL {
            let buffers = &self.kinds[kind.slot()];
            if buffers.live == 0 {
                continue;
            }
            let pipeline = match kind {
                OrnamentKind::Light => &self.unlit_pipeline,
                OrnamentKind::Gift | OrnamentKind::Ball => &self.lit_pipeline,
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, buffers.instance_buffer.slice(..));
            render_pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..buffers.index_count, 0, 0..buffers.live);
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(fragment_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::layout(), OrnamentInstance::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
