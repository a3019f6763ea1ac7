//! Triangle meshes for the ornament kinds.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::layout::OrnamentKind;

/// Mesh vertex: position and normal, locations 0 and 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Mesh used for one ornament kind: box for gifts, spheres otherwise.
    pub fn for_kind(kind: OrnamentKind) -> Self {
        match kind {
            OrnamentKind::Gift => Self::cube(1.0),
            OrnamentKind::Ball => Self::uv_sphere(1.0, 16, 16),
            OrnamentKind::Light => Self::uv_sphere(1.0, 8, 8),
        }
    }

    /// Axis-aligned cube with edge length `size`, flat-shaded (24 vertices).
    pub fn cube(size: f32) -> Self {
        let s = size / 2.0;
        // (normal, tangent u, tangent v) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u16;
            for (du, dv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = (normal + u * du + v * dv) * s;
                vertices.push(MeshVertex::new(position, normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Latitude/longitude sphere.
    ///
    /// `width_segments` slices around Y, `height_segments` stacks pole to pole.
    pub fn uv_sphere(radius: f32, width_segments: u16, height_segments: u16) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::new();
        for y in 0..=height_segments {
            let v = y as f32 / height_segments as f32;
            let phi = v * PI;
            for x in 0..=width_segments {
                let u = x as f32 / width_segments as f32;
                let theta = u * TAU;
                let normal = Vec3::new(
                    -theta.cos() * phi.sin(),
                    phi.cos(),
                    theta.sin() * phi.sin(),
                );
                vertices.push(MeshVertex::new(normal * radius, normal));
            }
        }

        let row = width_segments + 1;
        let mut indices = Vec::new();
        for y in 0..height_segments {
            for x in 0..width_segments {
                let a = y * row + x + 1;
                let b = y * row + x;
                let c = (y + 1) * row + x;
                let d = (y + 1) * row + x + 1;
                if y != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if y != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts_and_extent() {
        let cube = Mesh::cube(1.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.index_count(), 36);
        for v in &cube.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.abs().max_element() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let sphere = Mesh::uv_sphere(2.0, 16, 16);
        assert_eq!(sphere.vertices.len(), 17 * 17);
        for v in &sphere.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 2.0).abs() < 1e-4);
        }
        let max = sphere.vertices.len() as u16;
        assert!(sphere.indices.iter().all(|&i| i < max));
        assert_eq!(sphere.indices.len() % 3, 0);
    }

    #[test]
    fn test_light_mesh_is_coarser_than_ball() {
        let ball = Mesh::for_kind(OrnamentKind::Ball);
        let light = Mesh::for_kind(OrnamentKind::Light);
        assert!(light.index_count() < ball.index_count());
    }
}
