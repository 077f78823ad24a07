//! Debug controls driving the scene, plus the animation toggle

use glam::Vec3;
use planet_engine::config::SceneConfig;
use planet_engine::core::entity::{
    update_hierarchy_system, EulerRotation, GlobalTransform, Transform, World,
};
use planet_engine::graphics::AssetRegistry;
use planet_engine::scene::{PlanetHandles, PlanetScene, SceneAnimation, SceneControls, Side};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

struct Fixture {
    world: World,
    handles: PlanetHandles,
    controls: SceneControls,
    animation: SceneAnimation,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SceneConfig::default();
    config.assets.root = dir.path().to_path_buf();

    let mut world = World::new();
    let mut assets = AssetRegistry::new();
    let handles = PlanetScene::build(
        &mut world,
        &mut assets,
        &config,
        &mut ChaCha8Rng::seed_from_u64(9),
    );
    let controls = SceneControls::new(&handles, &config);
    let animation = SceneAnimation::from_config(&config.animation);

    Fixture {
        world,
        handles,
        controls,
        animation,
    }
}

impl Fixture {
    fn apply(&mut self) -> usize {
        let applied = self
            .controls
            .apply(&mut self.world, &self.handles, &mut self.animation);
        self.world.sync_euler_rotations();
        update_hierarchy_system(&mut self.world);
        applied
    }

    fn camera_forward(&self) -> Vec3 {
        let global = *self.world.get::<GlobalTransform>(self.handles.camera).unwrap();
        global.matrix.transform_vector3(Vec3::NEG_Z)
    }
}

#[test]
fn test_initial_values_mirror_scene() {
    let f = fixture();
    assert!(!f.controls.panel_visible());
    assert!(f.controls.animate_scene());
    assert_eq!(f.controls.camera_position(), Vec3::new(0.0, 2.4, 0.0));
    assert_eq!(f.controls.look_at(), Vec3::new(0.0, 0.0, -3.0));
    assert_eq!(f.controls.mountain_count(), 8);
    assert_eq!(f.controls.mountain_label(0), Some("Mountain 0"));
    assert_eq!(
        f.controls.mountain_rotation_x(3),
        Some(f.handles.layout[3].left.rotation.x)
    );
    assert!(!f.controls.has_pending());
}

#[test]
fn test_planet_rotation_slider() {
    let mut f = fixture();
    f.controls.set_planet_rotation_z(9.0);
    assert_eq!(f.controls.planet_rotation_z(), 6.0);
    assert_eq!(f.apply(), 1);

    let rotation = f.world.get::<EulerRotation>(f.handles.planet).unwrap().0;
    assert_eq!(rotation.z, 6.0);
}

#[test]
fn test_mountain_slider_rotates_left_panel_only() {
    let mut f = fixture();
    let right_before = f.world.get::<EulerRotation>(f.handles.mountains[2][1]).unwrap().0;

    f.controls.set_mountain_rotation_x(2, 1.0);
    f.apply();

    let left = f.handles.mountain(2, Side::Left).unwrap();
    assert_eq!(f.world.get::<EulerRotation>(left).unwrap().0.x, 1.0);
    let right_after = f.world.get::<EulerRotation>(f.handles.mountains[2][1]).unwrap().0;
    assert_eq!(right_before, right_after);
}

#[test]
fn test_out_of_range_slot_is_ignored() {
    let mut f = fixture();
    f.controls.set_mountain_rotation_x(99, 1.0);
    assert!(!f.controls.has_pending());
}

#[test]
fn test_moving_camera_keeps_orientation() {
    let mut f = fixture();
    let forward_before = f.camera_forward();

    f.controls.set_camera_position(Vec3::new(1.0, 3.0, 0.5));
    f.apply();

    let transform = *f.world.get::<Transform>(f.handles.camera).unwrap();
    assert_eq!(transform.position, Vec3::new(1.0, 3.0, 0.5));
    assert!(f.camera_forward().abs_diff_eq(forward_before, 1e-5));
}

#[test]
fn test_look_at_reaims_from_current_position() {
    let mut f = fixture();
    f.controls.set_camera_position(Vec3::new(1.0, 2.0, 0.0));
    f.controls.set_look_at(Vec3::new(1.0, 2.0, 5.0));
    assert_eq!(f.apply(), 2);

    assert!(f.camera_forward().abs_diff_eq(Vec3::Z, 1e-5));
}

#[test]
fn test_look_at_values_are_clamped() {
    let mut f = fixture();
    f.controls.set_look_at(Vec3::new(-5.0, 20.0, 3.333));
    let target = f.controls.look_at();
    assert_eq!(target.x, 0.0);
    assert_eq!(target.y, 10.0);
    assert!((target.z - 3.33).abs() < 1e-5);
}

#[test]
fn test_untouched_look_at_component_keeps_initial_value() {
    let mut f = fixture();
    // Initial z of -3 sits below the slider minimum
    f.controls.set_look_at(Vec3::new(2.0, 0.0, -3.0));
    assert_eq!(f.controls.look_at(), Vec3::new(2.0, 0.0, -3.0));
}

#[test]
fn test_animation_toggle() {
    let mut f = fixture();
    f.controls.set_animate_scene(false);
    f.apply();
    assert!(!f.animation.enabled);

    assert!(!f.animation.advance(&mut f.world, f.handles.root, 1.0));
    assert_eq!(f.world.get::<EulerRotation>(f.handles.root).unwrap().0.x, 0.0);

    f.controls.set_animate_scene(true);
    f.apply();
    assert!(f.animation.advance(&mut f.world, f.handles.root, 2.0));
    let x = f.world.get::<EulerRotation>(f.handles.root).unwrap().0.x;
    assert!((x - 0.6).abs() < 1e-6);
}

#[test]
fn test_animation_moves_group_children() {
    let mut f = fixture();
    let left = f.handles.mountain(0, Side::Left).unwrap();
    let before = f.world.get::<GlobalTransform>(left).unwrap().position();

    f.animation.advance(&mut f.world, f.handles.root, 1.0);
    f.apply();

    let after = f.world.get::<GlobalTransform>(left).unwrap().position();
    assert!(!after.abs_diff_eq(before, 1e-3));
    // Rotation about X keeps the lateral offset and the ring radius
    assert!((after.x - before.x).abs() < 1e-5);
    assert!((after.length() - before.length()).abs() < 1e-4);
}
