//! Material component for mesh rendering
//!
//! A material is a small description of how a surface is shaded: a base
//! colour, optional texture maps referenced by [`TextureId`], and the flags
//! the renderer uses to pick a pipeline.

use crate::graphics::assets::TextureId;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Lighting model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Shading {
    /// Ambient + directional diffuse with a roughness-controlled highlight
    #[default]
    Standard,
    /// Base colour only, lights ignored
    Unlit,
}

/// Material component defining surface properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub shading: Shading,
    /// Base colour in linear space (RGBA)
    pub color: [f32; 4],
    pub color_map: Option<TextureId>,
    /// Ambient occlusion, red channel
    pub ao_map: Option<TextureId>,
    /// Tangent-space normal map, OpenGL convention (+Y up)
    pub normal_map: Option<TextureId>,
    /// Opacity, green channel
    pub alpha_map: Option<TextureId>,
    /// Roughness, green channel
    pub roughness_map: Option<TextureId>,
    /// Metalness, blue channel
    pub metalness_map: Option<TextureId>,
    /// UV scale applied before every texture lookup
    pub uv_repeat: [f32; 2],
    pub roughness: f32,
    pub metalness: f32,
    /// Alpha blended and drawn after opaque geometry
    pub transparent: bool,
    /// Both faces rasterised
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shading: Shading::Standard,
            color: [1.0, 1.0, 1.0, 1.0],
            color_map: None,
            ao_map: None,
            normal_map: None,
            alpha_map: None,
            roughness_map: None,
            metalness_map: None,
            uv_repeat: [1.0, 1.0],
            roughness: 1.0,
            metalness: 0.0,
            transparent: false,
            double_sided: false,
        }
    }
}

impl Material {
    /// Lit material of a single linear colour
    pub fn standard(color: [f32; 4]) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Unlit material showing a texture as-is
    pub fn unlit(color_map: TextureId) -> Self {
        Self {
            shading: Shading::Unlit,
            color_map: Some(color_map),
            ..Default::default()
        }
    }

    /// Build from an sRGB colour, as colours are usually written
    pub fn from_srgb(rgb: [f32; 3]) -> Self {
        let [r, g, b] = rgb.map(srgb_to_linear);
        Self::standard([r, g, b, 1.0])
    }

    /// Every texture the material samples, in binding order
    pub fn textures(&self) -> [Option<&TextureId>; 6] {
        [
            self.color_map.as_ref(),
            self.ao_map.as_ref(),
            self.normal_map.as_ref(),
            self.alpha_map.as_ref(),
            self.roughness_map.as_ref(),
            self.metalness_map.as_ref(),
        ]
    }

    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        for (bit, map) in [
            (MaterialFlags::COLOR_MAP, &self.color_map),
            (MaterialFlags::AO_MAP, &self.ao_map),
            (MaterialFlags::NORMAL_MAP, &self.normal_map),
            (MaterialFlags::ALPHA_MAP, &self.alpha_map),
            (MaterialFlags::ROUGHNESS_MAP, &self.roughness_map),
            (MaterialFlags::METALNESS_MAP, &self.metalness_map),
        ] {
            if map.is_some() {
                flags |= bit;
            }
        }
        if self.shading == Shading::Unlit {
            flags |= MaterialFlags::UNLIT;
        }
        flags
    }
}

/// Bits of [`MaterialUniform::flags`], mirrored in the shader
pub struct MaterialFlags;

impl MaterialFlags {
    pub const COLOR_MAP: u32 = 1 << 0;
    pub const AO_MAP: u32 = 1 << 1;
    pub const NORMAL_MAP: u32 = 1 << 2;
    pub const ALPHA_MAP: u32 = 1 << 3;
    pub const ROUGHNESS_MAP: u32 = 1 << 4;
    pub const METALNESS_MAP: u32 = 1 << 5;
    pub const UNLIT: u32 = 1 << 6;
}

/// Convert one sRGB channel to linear
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Material data for GPU uniform buffer
///
/// This struct is aligned for GPU uniform buffer requirements
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MaterialUniform {
    /// Base color of the material (RGBA)
    pub color: [f32; 4],
    /// xy = UV repeat
    pub uv_repeat: [f32; 4],
    /// x = roughness, y = metalness
    pub params: [f32; 4],
    /// x = feature bits
    pub flags: [u32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        Self {
            color: material.color,
            uv_repeat: [material.uv_repeat[0], material.uv_repeat[1], 0.0, 0.0],
            params: [material.roughness, material.metalness, 0.0, 0.0],
            flags: [material.flags(), 0, 0, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_default() {
        let mat = Material::default();
        assert_eq!(mat.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(mat.roughness, 1.0);
        assert_eq!(mat.metalness, 0.0);
        assert_eq!(mat.flags(), 0);
    }

    #[test]
    fn test_srgb_green_to_linear() {
        let mat = Material::from_srgb([0.0, 128.0 / 255.0, 0.0]);
        assert!((mat.color[1] - 0.2158605).abs() < 1e-4);
        assert_eq!(mat.color[3], 1.0);
    }

    #[test]
    fn test_flags_follow_maps() {
        let mat = Material {
            color_map: Some(TextureId::new("color")),
            alpha_map: Some(TextureId::new("alpha")),
            ..Default::default()
        };
        assert_eq!(mat.flags(), MaterialFlags::COLOR_MAP | MaterialFlags::ALPHA_MAP);

        let unlit = Material::unlit(TextureId::new("sunset"));
        assert_eq!(unlit.flags(), MaterialFlags::COLOR_MAP | MaterialFlags::UNLIT);
    }

    #[test]
    fn test_material_uniform_conversion() {
        let mat = Material {
            uv_repeat: [6.0, 3.0],
            ..Material::standard([0.1, 0.2, 0.3, 0.4])
        };
        let uniform = MaterialUniform::from(&mat);
        assert_eq!(uniform.color, mat.color);
        assert_eq!(uniform.uv_repeat[..2], [6.0, 3.0]);
        assert_eq!(uniform.params[0], 1.0);
    }

    #[test]
    fn test_material_uniform_size() {
        use std::mem;
        // Ensure MaterialUniform is the expected size for GPU
        assert_eq!(mem::size_of::<MaterialUniform>(), 64);
    }
}
