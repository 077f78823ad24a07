//! Mesh component and vertex data structures
//!
//! Provides mesh data structures and the two primitives the scene is built
//! from: a UV sphere and a subdivided plane. Both follow the vertex order,
//! UV layout and winding of the common web geometry classes so textures
//! authored for them map the same way.

use crate::graphics::texture::HeightMap;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Vertex data structure for GPU rendering
///
/// This struct is tightly packed for efficient GPU transfer using bytemuck.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],
    /// Surface normal vector (normalized)
    pub normal: [f32; 3],
    /// Texture coordinates (UV mapping)
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex with the given attributes
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Get the vertex attribute layout for wgpu
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Mesh component containing vertex and index data
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex data for the mesh
    pub vertices: Vec<Vertex>,
    /// Index data for triangle assembly
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from vertices and indices
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Create a UV sphere mesh
    ///
    /// `u` runs around the Y axis, `v` runs from the north pole (v = 1) to
    /// the south pole (v = 0). The degenerate triangles touching the poles
    /// are omitted.
    ///
    /// # Arguments
    /// * `radius` - Radius of the sphere
    /// * `width_segments` - Number of longitude divisions (minimum 3)
    /// * `height_segments` - Number of latitude divisions (minimum 2)
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices =
            Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let theta = v * PI;

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * PI * 2.0;

                let x = -radius * phi.cos() * theta.sin();
                let y = radius * theta.cos();
                let z = radius * phi.sin() * theta.sin();

                let normal = Vec3::new(x, y, z).normalize_or_zero();
                vertices.push(Vertex::new([x, y, z], normal.into(), [u, 1.0 - v]));
            }
        }

        let row = width_segments + 1;
        let mut indices = Vec::with_capacity((width_segments * (height_segments - 1) * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Create a subdivided plane in the XY plane facing +Z
    ///
    /// The plane is centered at the origin. UV (0, 1) sits at the top-left
    /// corner.
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let grid_x = width_segments.max(1);
        let grid_y = height_segments.max(1);
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;

        let mut vertices = Vec::with_capacity(((grid_x + 1) * (grid_y + 1)) as usize);
        for iy in 0..=grid_y {
            let y = iy as f32 * segment_height - height * 0.5;
            for ix in 0..=grid_x {
                let x = ix as f32 * segment_width - width * 0.5;
                vertices.push(Vertex::new(
                    [x, -y, 0.0],
                    [0.0, 0.0, 1.0],
                    [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
                ));
            }
        }

        let row = grid_x + 1;
        let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = (ix + 1) + row * (iy + 1);
                let d = (ix + 1) + row * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { vertices, indices }
    }

    /// Push every vertex along its normal by `height * scale + bias`
    ///
    /// `uv_repeat` scales the UVs before sampling, with repeat wrapping.
    /// Normals are recomputed afterwards.
    pub fn displace(&mut self, height_map: &HeightMap, scale: f32, bias: f32, uv_repeat: Vec2) {
        for vertex in &mut self.vertices {
            let uv = Vec2::from(vertex.uv) * uv_repeat;
            let offset = height_map.sample_uv(uv) * scale + bias;
            let position = Vec3::from(vertex.position) + Vec3::from(vertex.normal) * offset;
            vertex.position = position.into();
        }
        self.recompute_normals();
    }

    /// Replace normals with area-weighted face normals averaged per vertex
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            let face = (pb - pa).cross(pc - pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            // Keep the old normal for vertices no triangle references
            if let Some(normal) = normal.try_normalize() {
                vertex.normal = normal.into();
            }
        }
    }
}
