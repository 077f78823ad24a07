//! CPU-side asset registry
//!
//! Meshes, materials and decoded textures are registered by name while the
//! scene is built. Entities refer to them through [`MeshId`] and
//! [`MaterialId`] components; the renderer uploads what it needs on first use.

use crate::graphics::material::Material;
use crate::graphics::mesh::Mesh;
use crate::graphics::texture::{ColorSpace, SamplerOptions, TextureData, TextureSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Component to associate an entity with a mesh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MeshId(pub String);

impl MeshId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Component to associate an entity with a material
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MaterialId(pub String);

impl MaterialId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Name of a registered texture
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TextureId(pub String);

impl TextureId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Substitute texels for textures that fail to load
pub struct Fallback;

impl Fallback {
    pub const WHITE: [u8; 4] = [255, 255, 255, 255];
    /// Unperturbed tangent-space normal
    pub const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];
}

/// A decoded texture plus how it is sampled
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub data: TextureData,
    pub color_space: ColorSpace,
    pub sampler: SamplerOptions,
}

/// Name-keyed store of everything the renderer can draw
#[derive(Debug, Default)]
pub struct AssetRegistry {
    meshes: HashMap<String, Mesh>,
    materials: HashMap<String, Material>,
    textures: HashMap<String, TextureAsset>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> MeshId {
        let name = name.into();
        debug!(
            mesh_name = %name,
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            "Registered mesh"
        );
        if self.meshes.insert(name.clone(), mesh).is_some() {
            warn!(mesh_name = %name, "Replaced existing mesh");
        }
        MeshId(name)
    }

    pub fn add_material(&mut self, name: impl Into<String>, material: Material) -> MaterialId {
        let name = name.into();
        debug!(material_name = %name, "Registered material");
        self.materials.insert(name.clone(), material);
        MaterialId(name)
    }

    /// Decode and register a texture, falling back to a 1x1 `fallback` texel
    pub fn load_texture(
        &mut self,
        name: impl Into<String>,
        source: &TextureSource,
        fallback: [u8; 4],
    ) -> TextureId {
        let data = TextureData::load_or(source, fallback);
        self.add_texture(
            name,
            TextureAsset {
                data,
                color_space: source.color_space,
                sampler: source.sampler,
            },
        )
    }

    pub fn add_texture(&mut self, name: impl Into<String>, texture: TextureAsset) -> TextureId {
        let name = name.into();
        self.textures.insert(name.clone(), texture);
        TextureId(name)
    }

    pub fn mesh(&self, id: &MeshId) -> Option<&Mesh> {
        self.meshes.get(&id.0)
    }

    pub fn material(&self, id: &MaterialId) -> Option<&Material> {
        self.materials.get(&id.0)
    }

    pub fn texture(&self, id: &TextureId) -> Option<&TextureAsset> {
        self.textures.get(&id.0)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
