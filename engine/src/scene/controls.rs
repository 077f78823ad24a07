//! GUI-independent model behind the debug panel
//!
//! The overlay edits a [`SceneControls`] through its setters; every accepted
//! edit is queued as a [`ControlChange`] and written into the world on the
//! next [`SceneControls::apply`].

use crate::config::SceneConfig;
use crate::core::entity::{EulerRotation, Transform, World};
use crate::scene::animation::SceneAnimation;
use crate::scene::placement::Side;
use crate::scene::planet::PlanetHandles;
use glam::Vec3;
use std::f32::consts::TAU;
use tracing::{debug, warn};

/// Range and granularity of one numeric control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: Option<f32>,
}

impl SliderSpec {
    pub const fn new(label: &'static str, min: f32, max: f32, step: Option<f32>) -> Self {
        Self {
            label,
            min,
            max,
            step,
        }
    }

    /// Snap `value` to the step grid, then clamp it into range
    pub fn apply(&self, value: f32) -> f32 {
        let snapped = match self.step {
            Some(step) if step > 0.0 => (value / step).round() * step,
            _ => value,
        };
        snapped.clamp(self.min, self.max)
    }
}

pub const PLANET_ROTATION_Z: SliderSpec = SliderSpec::new("z", -6.0, 6.0, Some(0.001));
pub const MOUNTAIN_ROTATION_X: SliderSpec = SliderSpec::new("rotation.x", -TAU, TAU, None);
pub const CAMERA_X: SliderSpec = SliderSpec::new("x", 0.0, 6.0, Some(0.01));
pub const CAMERA_Y: SliderSpec = SliderSpec::new("y", 0.0, 6.0, Some(0.01));
pub const CAMERA_Z: SliderSpec = SliderSpec::new("z", -1.0, 3.0, Some(0.001));
pub const LOOK_AT_X: SliderSpec = SliderSpec::new("lookAtX", 0.0, 10.0, Some(0.01));
pub const LOOK_AT_Y: SliderSpec = SliderSpec::new("lookAtY", 0.0, 10.0, Some(0.01));
pub const LOOK_AT_Z: SliderSpec = SliderSpec::new("lookAtZ", 0.0, 10.0, Some(0.01));

/// Camera sliders in display order
pub const CAMERA_POSITION: [SliderSpec; 3] = [CAMERA_X, CAMERA_Y, CAMERA_Z];
pub const CAMERA_LOOK_AT: [SliderSpec; 3] = [LOOK_AT_X, LOOK_AT_Y, LOOK_AT_Z];

pub const MOUNTAINS_FOLDER: &str = "Mountains Rotation X";
pub const CAMERA_FOLDER: &str = "Camera";
pub const ANIMATE_LABEL: &str = "animateScene";

/// Slider label of a mountain slot: its angle on the ring in radians
pub fn mountain_label(slot: usize, pair_count: usize) -> String {
    let increment = std::f64::consts::TAU / pair_count.max(1) as f64;
    format!("Mountain {}", increment * slot as f64)
}

/// An edit waiting to be written into the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlChange {
    PlanetRotationZ(f32),
    MountainRotationX { slot: usize, value: f32 },
    CameraPosition(Vec3),
    LookAt(Vec3),
    AnimateScene(bool),
}

/// Current values of every debug control
#[derive(Debug, Clone)]
pub struct SceneControls {
    planet_rotation_z: f32,
    mountain_rotation_x: Vec<f32>,
    mountain_labels: Vec<String>,
    camera_position: Vec3,
    look_at: Vec3,
    animate_scene: bool,
    panel_visible: bool,
    pending: Vec<ControlChange>,
}

impl SceneControls {
    /// Seed the controls from the freshly built scene
    pub fn new(handles: &PlanetHandles, config: &SceneConfig) -> Self {
        let count = handles.layout.len();
        Self {
            planet_rotation_z: config.planet.initial_rotation_z,
            mountain_rotation_x: handles
                .layout
                .iter()
                .map(|slot| slot.left.rotation.x)
                .collect(),
            mountain_labels: (0..count).map(|i| mountain_label(i, count)).collect(),
            camera_position: Vec3::from(config.camera.position),
            look_at: Vec3::from(config.camera.look_at),
            animate_scene: config.animation.enabled,
            panel_visible: !config.gui.start_hidden,
            pending: Vec::new(),
        }
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn toggle_panel(&mut self) {
        self.panel_visible = !self.panel_visible;
        debug!(visible = self.panel_visible, "Toggled debug panel");
    }

    pub fn planet_rotation_z(&self) -> f32 {
        self.planet_rotation_z
    }

    pub fn set_planet_rotation_z(&mut self, value: f32) {
        let value = PLANET_ROTATION_Z.apply(value);
        if value != self.planet_rotation_z {
            self.planet_rotation_z = value;
            self.pending.push(ControlChange::PlanetRotationZ(value));
        }
    }

    pub fn mountain_count(&self) -> usize {
        self.mountain_rotation_x.len()
    }

    pub fn mountain_label(&self, slot: usize) -> Option<&str> {
        self.mountain_labels.get(slot).map(String::as_str)
    }

    pub fn mountain_rotation_x(&self, slot: usize) -> Option<f32> {
        self.mountain_rotation_x.get(slot).copied()
    }

    pub fn set_mountain_rotation_x(&mut self, slot: usize, value: f32) {
        let value = MOUNTAIN_ROTATION_X.apply(value);
        let Some(current) = self.mountain_rotation_x.get_mut(slot) else {
            warn!(slot, "No mountain slot to rotate");
            return;
        };
        if value != *current {
            *current = value;
            self.pending
                .push(ControlChange::MountainRotationX { slot, value });
        }
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    /// Move the camera without re-aiming it
    pub fn set_camera_position(&mut self, position: Vec3) {
        let position = apply_changed(&CAMERA_POSITION, self.camera_position, position);
        if position != self.camera_position {
            self.camera_position = position;
            self.pending.push(ControlChange::CameraPosition(position));
        }
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Re-aim the camera at `target` from wherever it currently is
    pub fn set_look_at(&mut self, target: Vec3) {
        let target = apply_changed(&CAMERA_LOOK_AT, self.look_at, target);
        if target != self.look_at {
            self.look_at = target;
            self.pending.push(ControlChange::LookAt(target));
        }
    }

    pub fn animate_scene(&self) -> bool {
        self.animate_scene
    }

    pub fn set_animate_scene(&mut self, enabled: bool) {
        if enabled != self.animate_scene {
            self.animate_scene = enabled;
            self.pending.push(ControlChange::AnimateScene(enabled));
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Write queued edits into the world, in the order they were made
    ///
    /// Returns the number of edits applied. Euler rotations and the
    /// hierarchy still need syncing afterwards.
    pub fn apply(
        &mut self,
        world: &mut World,
        handles: &PlanetHandles,
        animation: &mut SceneAnimation,
    ) -> usize {
        let changes: Vec<ControlChange> = self.pending.drain(..).collect();
        for change in &changes {
            debug!(change = ?change, "Applying control change");
            match *change {
                ControlChange::PlanetRotationZ(value) => {
                    if let Ok(euler) = world.query_one_mut::<&mut EulerRotation>(handles.planet) {
                        euler.0.z = value;
                    }
                }
                ControlChange::MountainRotationX { slot, value } => {
                    let Some(entity) = handles.mountain(slot, Side::Left) else {
                        continue;
                    };
                    if let Ok(euler) = world.query_one_mut::<&mut EulerRotation>(entity) {
                        euler.0.x = value;
                    }
                }
                ControlChange::CameraPosition(position) => {
                    if let Ok(transform) = world.query_one_mut::<&mut Transform>(handles.camera) {
                        transform.position = position;
                    }
                }
                ControlChange::LookAt(target) => {
                    if let Ok(transform) = world.query_one_mut::<&mut Transform>(handles.camera) {
                        transform.look_at(target, Vec3::Y);
                    }
                }
                ControlChange::AnimateScene(enabled) => {
                    animation.enabled = enabled;
                }
            }
        }
        changes.len()
    }
}

/// Constrain only the components that changed; untouched ones may sit outside
/// their slider range, like the initial look-at target does
fn apply_changed(specs: &[SliderSpec; 3], current: Vec3, value: Vec3) -> Vec3 {
    let mut out = current.to_array();
    for ((slot, spec), (old, new)) in out
        .iter_mut()
        .zip(specs)
        .zip(current.to_array().into_iter().zip(value.to_array()))
    {
        if new != old {
            *slot = spec.apply(new);
        }
    }
    Vec3::from_array(out)
}
