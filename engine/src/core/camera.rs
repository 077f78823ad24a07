//! Camera component and utilities
//!
//! Provides the perspective camera used by the scene and view matrix
//! calculation from transforms.

use crate::config::CameraConfig;
use crate::core::entity::GlobalTransform;
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Camera component that defines projection parameters for rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov_y_radians: f32,
    /// Aspect ratio (width / height)
    pub aspect_ratio: f32,
    /// Near clipping plane distance
    pub z_near: f32,
    /// Far clipping plane distance
    pub z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a perspective camera
    ///
    /// # Arguments
    /// * `fov_y_degrees` - Vertical field of view in degrees
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance
    /// * `z_far` - Far clipping plane distance
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_radians: fov_y_degrees.to_radians(),
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self::perspective(config.fov_y_degrees, aspect_ratio, config.z_near, config.z_far)
    }

    /// Calculate the projection matrix for this camera
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, self.aspect_ratio, self.z_near, self.z_far)
    }

    /// Calculate the view matrix from a camera's global transform
    ///
    /// The view matrix is the inverse of the camera's world transform
    pub fn view_matrix(camera_transform: &GlobalTransform) -> Mat4 {
        camera_transform.matrix.inverse()
    }

    /// Calculate the combined view-projection matrix
    pub fn view_projection_matrix(&self, camera_transform: &GlobalTransform) -> Mat4 {
        self.projection_matrix() * Self::view_matrix(camera_transform)
    }

    /// Update the aspect ratio (useful when window resizes)
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}
