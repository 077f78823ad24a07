//! Sunset planet engine
//!
//! This crate builds and renders the sunset planet scene with wgpu: a
//! transparent textured planet, a ring of displaced mountain panels and a
//! sunset backdrop, lit by one directional and one ambient light.

pub mod app;
pub mod config;
pub mod core;
pub mod graphics;
pub mod input;
pub mod scene;
pub mod shaders;
pub mod windowing;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{
        update_hierarchy_system, Entity, EulerRotation, GlobalTransform, Name, Parent, Transform,
        Visible, World,
    };

    // Camera and timing
    pub use crate::core::camera::Camera;
    pub use crate::core::time::{FrameClock, FrameTime};

    // Math types
    pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

    // Graphics types
    pub use crate::graphics::{
        AmbientLight, AssetRegistry, DirectionalLight, Material, Mesh, MeshId, RenderContext,
        Renderer, Vertex,
    };

    // Scene types
    pub use crate::scene::{
        MountainSlot, PlanetHandles, PlanetScene, SceneAnimation, SceneControls, Side, SliderSpec,
    };

    // Config types
    pub use crate::config::{ConfigError, SceneConfig};

    // App types
    pub use crate::app::{EngineApp, EngineBuilder, Overlay, OverlayFrame};

    // Input types
    pub use crate::input::InputState;

    pub use wgpu;
    pub use winit;
}

const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn";

/// Initialize logging for the engine
///
/// `RUST_LOG` wins over `filter`, which wins over the built-in default.
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(filter: Option<&str>) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter.unwrap_or(DEFAULT_LOG_FILTER).into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_logging_twice() {
        super::init_logging(None);
        super::init_logging(Some("debug"));
    }
}
