//! The sunset planet scene: layout, construction, controls and animation

pub mod animation;
pub mod controls;
pub mod placement;
pub mod planet;

pub use animation::SceneAnimation;
pub use controls::{ControlChange, SceneControls, SliderSpec};
pub use placement::{scatter_mountains, MountainPanel, MountainSlot, Side};
pub use planet::{scene_rng, MountainTag, PlanetHandles, PlanetScene, SceneRoot};
