//! Hierarchy system for updating global transforms based on parent relationships

use super::components::{GlobalTransform, Parent, Transform};
use super::world::World;
use std::collections::HashSet;
use tracing::{error, trace};

/// Update the hierarchy system, calculating global transforms from local transforms
/// and parent relationships using breadth-first traversal.
pub fn update_hierarchy_system(world: &mut World) {
    let mut queue = Vec::with_capacity(64);
    let mut visited = HashSet::with_capacity(64);
    let mut next_level = Vec::new();

    let inner = world.inner_mut();

    // Root entities: Transform but no Parent
    let mut root_updates = Vec::new();
    for (entity, transform) in inner.query::<&Transform>().without::<&Parent>().iter() {
        root_updates.push((entity, transform.to_matrix()));
        visited.insert(entity);
    }

    for (entity, world_matrix) in &root_updates {
        write_global(inner, *entity, *world_matrix);
    }

    queue.extend(root_updates);
    trace!(root_count = queue.len(), "Starting hierarchy update");

    while !queue.is_empty() {
        let mut child_updates = Vec::new();

        for (parent_entity, parent_world_matrix) in queue.drain(..) {
            for (child_entity, parent) in inner.query::<&Parent>().iter() {
                if parent.0 != parent_entity {
                    continue;
                }

                if visited.contains(&child_entity) {
                    error!(
                        parent = ?parent_entity,
                        child = ?child_entity,
                        "Cyclic parent-child relationship detected"
                    );
                    continue;
                }
                visited.insert(child_entity);

                let child_world_matrix = match inner.get::<&Transform>(child_entity) {
                    Ok(child_transform) => parent_world_matrix * child_transform.to_matrix(),
                    Err(_) => parent_world_matrix,
                };

                child_updates.push((child_entity, child_world_matrix));
                next_level.push((child_entity, child_world_matrix));
            }
        }

        for (child_entity, child_world_matrix) in child_updates {
            write_global(inner, child_entity, child_world_matrix);
        }

        std::mem::swap(&mut queue, &mut next_level);
    }

    trace!(processed_count = visited.len(), "Hierarchy update completed");
}

fn write_global(inner: &mut hecs::World, entity: hecs::Entity, matrix: glam::Mat4) {
    match inner.query_one_mut::<&mut GlobalTransform>(entity) {
        Ok(global) => global.matrix = matrix,
        Err(_) => {
            let _ = inner.insert_one(entity, GlobalTransform::from_matrix(matrix));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_root_global_matches_local() {
        let mut world = World::new();
        let root = world.spawn((Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),));

        update_hierarchy_system(&mut world);

        let global = world.get::<GlobalTransform>(root).unwrap();
        assert_eq!(global.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_child_inherits_parent_rotation() {
        let mut world = World::new();
        let parent = world.spawn((
            Transform {
                rotation: Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
                ..Default::default()
            },
            GlobalTransform::default(),
        ));
        let child = world.spawn((
            Transform::from_position(Vec3::new(0.0, 2.0, 0.0)),
            GlobalTransform::default(),
            Parent(parent),
        ));

        update_hierarchy_system(&mut world);

        // Rotating +Y by 90 degrees about X lands on +Z
        let position = world.get::<GlobalTransform>(child).unwrap().position();
        assert!(position.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), 1e-5));
    }

    #[test]
    fn test_grandchild_chain() {
        let mut world = World::new();
        let a = world.spawn((Transform::from_position(Vec3::X),));
        let b = world.spawn((Transform::from_position(Vec3::X), Parent(a)));
        let c = world.spawn((Transform::from_position(Vec3::X), Parent(b)));

        update_hierarchy_system(&mut world);

        let position = world.get::<GlobalTransform>(c).unwrap().position();
        assert_eq!(position, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_cycle_is_skipped() {
        let mut world = World::new();
        let a = world.spawn((Transform::default(),));
        let b = world.spawn((Transform::default(),));
        world.insert_one(a, Parent(b)).unwrap();
        world.insert_one(b, Parent(a)).unwrap();

        // Neither entity is a root, so nothing is reachable and nothing panics
        update_hierarchy_system(&mut world);
        assert!(world.get::<GlobalTransform>(a).is_err());
    }
}
