//! Graphics module
//!
//! Provides rendering functionality including meshes, textures, materials,
//! lights, render pipelines, and the main renderer.

pub mod assets;
pub mod context;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod pipeline;
pub mod render_target;
pub mod renderer;
pub mod texture;
pub mod uniform;

// Re-export commonly used types
pub use assets::{AssetRegistry, MaterialId, MeshId, TextureId};
pub use context::{RenderContext, RenderError};
pub use lighting::{AmbientLight, DirectionalLight, SceneLights};
pub use material::{Material, MaterialUniform, Shading};
pub use mesh::{Mesh, Vertex};
pub use pipeline::{PipelineKey, SceneLayouts, ScenePipelines};
pub use render_target::RenderTarget;
pub use renderer::{DrawItem, Renderer};
pub use texture::{HeightMap, TextureData, TextureError, TextureSource};
pub use uniform::{FrameUniform, ObjectUniform, UniformBuffer};
