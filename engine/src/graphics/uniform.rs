//! GPU uniform buffer types
//!
//! Provides uniform buffer structures that match the WGSL shader definitions.
//! These structures are used to pass data from the CPU to the GPU.

use crate::graphics::lighting::SceneLights;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Per-frame uniform buffer data
///
/// This struct matches the FrameUniform struct in the WGSL shader.
/// Vectors are padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FrameUniform {
    /// Combined view-projection matrix
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// Unit vector towards the directional light
    pub light_direction: [f32; 4],
    /// Directional colour times intensity
    pub light_color: [f32; 4],
    /// Ambient colour times intensity
    pub ambient_color: [f32; 4],
}

impl FrameUniform {
    pub fn new(view_proj: Mat4, camera_position: Vec3, lights: &SceneLights) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: camera_position.extend(1.0).into(),
            light_direction: lights.direction.extend(0.0).into(),
            light_color: lights.directional.extend(1.0).into(),
            ambient_color: lights.ambient.extend(1.0).into(),
        }
    }
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Vec3::ZERO, &SceneLights::default())
    }
}

/// Object uniform buffer data
///
/// This struct matches the ObjectUniform struct in the WGSL shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ObjectUniform {
    /// Model matrix for world transformation
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix
    pub normal_matrix: [[f32; 4]; 4],
}

impl ObjectUniform {
    /// Create a new object uniform
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
        }
    }
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

/// Helper trait for creating GPU buffers from uniform types
pub trait UniformBuffer: Pod {
    /// Create a GPU buffer containing this uniform data
    fn create_buffer(&self, device: &wgpu::Device, label: Option<&str>) -> wgpu::Buffer {
        use wgpu::util::DeviceExt;

        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label,
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Update an existing buffer with new data
    fn update_buffer(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[*self]));
    }
}

impl UniformBuffer for FrameUniform {}
impl UniformBuffer for ObjectUniform {}
impl UniformBuffer for crate::graphics::material::MaterialUniform {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_uniform_size() {
        use std::mem;
        // Matrix plus four vec4s
        assert_eq!(mem::size_of::<FrameUniform>(), 128);
    }

    #[test]
    fn test_object_uniform_size() {
        use std::mem;
        assert_eq!(mem::size_of::<ObjectUniform>(), 128);
    }

    #[test]
    fn test_frame_uniform_carries_lights() {
        let lights = SceneLights {
            direction: Vec3::X,
            directional: Vec3::splat(3.0),
            ambient: Vec3::splat(1.5),
        };
        let uniform = FrameUniform::new(Mat4::IDENTITY, Vec3::new(0.0, 2.4, 0.0), &lights);
        assert_eq!(uniform.light_direction, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(uniform.light_color, [3.0, 3.0, 3.0, 1.0]);
        assert_eq!(uniform.ambient_color, [1.5, 1.5, 1.5, 1.0]);
        assert_eq!(uniform.camera_position, [0.0, 2.4, 0.0, 1.0]);
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let uniform = ObjectUniform::new(model);
        assert_eq!(uniform.model, model.to_cols_array_2d());
        assert!((uniform.normal_matrix[0][0] - 0.5).abs() < 1e-6);
    }
}
