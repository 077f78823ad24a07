//! Light components and their reduction into shader inputs

use crate::core::entity::{GlobalTransform, World};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parallel light shining from the entity's position towards `target`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// Linear RGB
    pub color: [f32; 3],
    pub intensity: f32,
    pub target: Vec3,
}

impl DirectionalLight {
    pub fn new(color: [f32; 3], intensity: f32) -> Self {
        Self {
            color,
            intensity,
            target: Vec3::ZERO,
        }
    }

    /// Unit vector pointing from the lit surface towards the light
    pub fn direction_to_light(&self, light_position: Vec3) -> Vec3 {
        (light_position - self.target).try_normalize().unwrap_or(Vec3::Y)
    }

    pub fn radiance(&self) -> Vec3 {
        Vec3::from(self.color) * self.intensity
    }
}

/// Light applied uniformly to every surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: [f32; 3], intensity: f32) -> Self {
        Self { color, intensity }
    }

    pub fn radiance(&self) -> Vec3 {
        Vec3::from(self.color) * self.intensity
    }
}

/// Lights of a frame, ready for the frame uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLights {
    pub direction: Vec3,
    pub directional: Vec3,
    pub ambient: Vec3,
}

impl Default for SceneLights {
    fn default() -> Self {
        Self {
            direction: Vec3::Y,
            directional: Vec3::ZERO,
            ambient: Vec3::ZERO,
        }
    }
}

impl SceneLights {
    /// Gather lights from the world
    ///
    /// Ambient lights add up. Only the first directional light is used.
    pub fn collect(world: &World) -> Self {
        let mut lights = Self::default();

        for (_, ambient) in world.query::<&AmbientLight>().iter() {
            lights.ambient += ambient.radiance();
        }

        if let Some((_, (light, transform))) = world
            .query::<(&DirectionalLight, &GlobalTransform)>()
            .iter()
            .next()
        {
            lights.direction = light.direction_to_light(transform.position());
            lights.directional = light.radiance();
        }

        lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Transform;

    #[test]
    fn test_direction_points_at_light() {
        let light = DirectionalLight::new([1.0; 3], 3.0);
        assert_eq!(light.direction_to_light(Vec3::new(4.0, 0.0, 0.0)), Vec3::X);
        assert_eq!(light.radiance(), Vec3::splat(3.0));
    }

    #[test]
    fn test_collect_lights() {
        let mut world = World::new();
        world.spawn((AmbientLight::new([1.0; 3], 1.5),));
        world.spawn((
            DirectionalLight::new([1.0, 0.5, 0.0], 2.0),
            Transform::from_position(Vec3::new(4.0, 0.0, 0.0)),
            GlobalTransform::from_matrix(glam::Mat4::from_translation(Vec3::new(4.0, 0.0, 0.0))),
        ));

        let lights = SceneLights::collect(&world);
        assert_eq!(lights.ambient, Vec3::splat(1.5));
        assert_eq!(lights.directional, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(lights.direction, Vec3::X);
    }

    #[test]
    fn test_empty_world_is_dark() {
        let lights = SceneLights::collect(&World::new());
        assert_eq!(lights.ambient, Vec3::ZERO);
        assert_eq!(lights.directional, Vec3::ZERO);
    }
}
