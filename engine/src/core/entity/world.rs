//! World wrapper providing helper methods for entity management

use super::components::{EulerRotation, GlobalTransform, Transform};
use hecs::Entity;
use tracing::debug;

/// Wrapper around hecs::World providing additional helper methods
pub struct World {
    inner: hecs::World,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn a new entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Get a reference to a component on an entity
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Query a single entity for a mutable component reference
    pub fn query_one_mut<Q: hecs::Query>(
        &mut self,
        entity: Entity,
    ) -> Result<Q::Item<'_>, hecs::QueryOneError> {
        self.inner.query_one_mut::<Q>(entity)
    }

    /// Insert a component into an entity
    pub fn insert_one(
        &mut self,
        entity: Entity,
        component: impl hecs::Component,
    ) -> Result<(), hecs::NoSuchEntity> {
        self.inner.insert_one(entity, component)
    }

    /// Query entities with specific components
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query()
    }

    /// Query entities with specific components (mutable)
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<'_, Q> {
        self.inner.query_mut()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> u32 {
        self.inner.len()
    }

    /// Spawn an entity and make sure it carries `Transform` and `GlobalTransform`
    pub fn spawn_with_transform(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        let entity = self.spawn(components);

        if self.get::<Transform>(entity).is_err() {
            let _ = self.insert_one(entity, Transform::default());
            debug!(entity = ?entity, "Auto-added Transform component");
        }

        if self.get::<GlobalTransform>(entity).is_err() {
            let _ = self.insert_one(entity, GlobalTransform::default());
            debug!(entity = ?entity, "Auto-added GlobalTransform component");
        }

        entity
    }

    /// Fold every [`EulerRotation`] into its entity's quaternion
    pub fn sync_euler_rotations(&mut self) {
        for (_, (euler, transform)) in self
            .inner
            .query_mut::<(&EulerRotation, &mut Transform)>()
        {
            transform.rotation = euler.to_quat();
        }
    }

    /// Get mutable access to the inner hecs::World for advanced operations
    pub fn inner_mut(&mut self) -> &mut hecs::World {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::components::Parent;
    use glam::{Quat, Vec3};

    #[test]
    fn test_world_spawn() {
        let mut world = World::new();
        let entity = world.spawn((Transform::default(),));
        assert!(world.get::<Transform>(entity).is_ok());
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn test_spawn_with_transform() {
        let mut world = World::new();

        let entity = world.spawn_with_transform(());

        assert!(world.get::<Transform>(entity).is_ok());
        assert!(world.get::<GlobalTransform>(entity).is_ok());
    }

    #[test]
    fn test_spawn_with_transform_existing() {
        let mut world = World::new();

        let custom_transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let entity = world.spawn_with_transform((custom_transform,));

        let transform = world.get::<Transform>(entity).unwrap();
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        drop(transform);

        assert!(world.get::<GlobalTransform>(entity).is_ok());
    }

    #[test]
    fn test_entity_hierarchy() {
        let mut world = World::new();

        let parent = world.spawn((Transform::default(), GlobalTransform::default()));
        let child = world.spawn((
            Transform::default(),
            GlobalTransform::default(),
            Parent(parent),
        ));

        let parent_ref = world.get::<Parent>(child).unwrap();
        assert_eq!(parent_ref.0, parent);
    }

    #[test]
    fn test_sync_euler_rotations() {
        let mut world = World::new();
        let entity = world.spawn((Transform::default(), EulerRotation::new(0.0, 0.0, 1.0)));
        let untouched = world.spawn((Transform::default(),));

        world.sync_euler_rotations();

        let rotation = world.get::<Transform>(entity).unwrap().rotation;
        assert!(rotation.abs_diff_eq(Quat::from_rotation_z(1.0), 1e-6));
        assert_eq!(
            world.get::<Transform>(untouched).unwrap().rotation,
            Quat::IDENTITY
        );
    }
}
