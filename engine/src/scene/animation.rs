use crate::config::AnimationConfig;
use crate::core::entity::{Entity, EulerRotation, World};
use tracing::trace;

/// Spins the scene group about X while enabled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneAnimation {
    pub enabled: bool,
    /// Radians per second
    pub speed: f32,
}

impl SceneAnimation {
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self {
            enabled: config.enabled,
            speed: config.speed,
        }
    }

    /// Advance the group's rotation by `speed * delta_seconds`
    ///
    /// Returns whether the rotation changed. The caller is responsible for
    /// syncing euler rotations and the hierarchy afterwards.
    pub fn advance(&self, world: &mut World, root: Entity, delta_seconds: f32) -> bool {
        if !self.enabled || delta_seconds <= 0.0 {
            return false;
        }

        match world.query_one_mut::<&mut EulerRotation>(root) {
            Ok(euler) => {
                euler.0.x += self.speed * delta_seconds;
                trace!(rotation_x = euler.0.x, "Advanced scene group");
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_root(world: &mut World) -> Entity {
        world.spawn_with_transform((EulerRotation::default(),))
    }

    #[test]
    fn test_advance_scales_with_delta() {
        let mut world = World::new();
        let root = spawn_root(&mut world);
        let animation = SceneAnimation::from_config(&AnimationConfig::default());

        assert!(animation.advance(&mut world, root, 0.5));
        assert!(animation.advance(&mut world, root, 1.5));

        let rotation = world.get::<EulerRotation>(root).unwrap().0;
        assert!((rotation.x - 0.6).abs() < 1e-6);
        assert_eq!(rotation.y, 0.0);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn test_disabled_animation_holds_still() {
        let mut world = World::new();
        let root = spawn_root(&mut world);
        let animation = SceneAnimation {
            enabled: false,
            speed: 0.3,
        };

        assert!(!animation.advance(&mut world, root, 10.0));
        assert_eq!(world.get::<EulerRotation>(root).unwrap().0.x, 0.0);
    }

    #[test]
    fn test_entity_without_rotation() {
        let mut world = World::new();
        let plain = world.spawn_with_transform((crate::core::entity::Name::new("plain"),));
        let animation = SceneAnimation::from_config(&AnimationConfig::default());
        assert!(!animation.advance(&mut world, plain, 1.0));
    }
}
