//! Texture loading, CPU height maps and GPU texture creation
//!
//! Images are decoded with the `image` crate into RGBA8. Colour maps are
//! uploaded as sRGB, data maps (AO, normals, roughness, ...) as linear.
//! Sampling follows the web convention of a flipped Y axis: UV (0, 1) is the
//! top-left texel.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Errors that can occur while loading texture data
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

/// How texel values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColorSpace {
    /// Colour data, decoded from sRGB by the sampler
    Srgb,
    /// Non-colour data, sampled as stored
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WrapMode {
    Repeat,
    #[default]
    ClampToEdge,
}

impl From<WrapMode> for wgpu::AddressMode {
    fn from(mode: WrapMode) -> Self {
        match mode {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MagFilter {
    #[default]
    Linear,
    Nearest,
}

impl From<MagFilter> for wgpu::FilterMode {
    fn from(filter: MagFilter) -> Self {
        match filter {
            MagFilter::Linear => wgpu::FilterMode::Linear,
            MagFilter::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

/// Sampler state of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplerOptions {
    pub wrap: WrapMode,
    pub mag_filter: MagFilter,
}

/// A texture file plus how to sample it
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSource {
    pub path: PathBuf,
    pub color_space: ColorSpace,
    pub sampler: SamplerOptions,
}

impl TextureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            color_space: ColorSpace::Linear,
            sampler: SamplerOptions::default(),
        }
    }

    pub fn srgb(mut self) -> Self {
        self.color_space = ColorSpace::Srgb;
        self
    }

    pub fn repeat(mut self) -> Self {
        self.sampler.wrap = WrapMode::Repeat;
        self
    }

    pub fn nearest(mut self) -> Self {
        self.sampler.mag_filter = MagFilter::Nearest;
        self
    }
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// Decode an image file
    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path)
            .map_err(|source| TextureError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Self::from_rgba_image(image)
    }

    pub fn from_rgba_image(image: image::RgbaImage) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }

    /// 1x1 texture of a single colour
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    /// Load a texture, substituting a 1x1 `fallback` on failure
    pub fn load_or(source: &TextureSource, fallback: [u8; 4]) -> Self {
        match Self::load(&source.path) {
            Ok(data) => {
                debug!(
                    path = ?source.path,
                    width = data.width,
                    height = data.height,
                    "Loaded texture"
                );
                data
            }
            Err(e) => {
                warn!(error = %e, "Texture unavailable, using fallback");
                Self::solid(fallback)
            }
        }
    }
}

/// Single-channel height field sampled with repeat wrapping
#[derive(Debug, Clone)]
pub struct HeightMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl HeightMap {
    /// Build from the red channel of decoded pixels
    pub fn from_texture(data: &TextureData) -> Self {
        let values = data
            .rgba
            .chunks_exact(4)
            .map(|texel| texel[0] as f32 / 255.0)
            .collect();
        Self {
            width: data.width,
            height: data.height,
            values,
        }
    }

    pub fn load(path: &Path) -> Result<Self, TextureError> {
        TextureData::load(path).map(|data| Self::from_texture(&data))
    }

    /// Constant height everywhere
    pub fn flat(value: f32) -> Self {
        Self {
            width: 1,
            height: 1,
            values: vec![value],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn texel(&self, x: i64, y: i64) -> f32 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.values[y * self.width as usize + x]
    }

    /// Bilinear sample at a mesh UV (V pointing up, repeat wrapping)
    pub fn sample_uv(&self, uv: Vec2) -> f32 {
        let u = uv.x.rem_euclid(1.0);
        let v = (1.0 - uv.y).rem_euclid(1.0);

        // Texel centres sit at half-integer coordinates
        let x = u * self.width as f32 - 0.5;
        let y = v * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0) * (1.0 - fx) + self.texel(x0 + 1, y0) * fx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - fx) + self.texel(x0 + 1, y0 + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

/// A texture living on the GPU
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: SamplerOptions,
}

impl GpuTexture {
    /// Upload decoded pixels
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        data: &TextureData,
        color_space: ColorSpace,
        sampler: SamplerOptions,
    ) -> Self {
        let format = match color_space {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        };
        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &data.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Create a sampler for the given options
pub fn create_sampler(device: &wgpu::Device, options: SamplerOptions) -> wgpu::Sampler {
    let address_mode: wgpu::AddressMode = options.wrap.into();
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Material Sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: options.mag_filter.into(),
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> TextureData {
        let image = image::RgbaImage::from_fn(width, height, |x, _| {
            let r = (x * 255 / (width - 1)) as u8;
            image::Rgba([r, 0, 0, 255])
        });
        TextureData::from_rgba_image(image).unwrap()
    }

    #[test]
    fn test_solid_texture() {
        let data = TextureData::solid([1, 2, 3, 4]);
        assert_eq!((data.width, data.height), (1, 1));
        assert_eq!(data.rgba, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let image = image::RgbaImage::new(0, 4);
        assert!(matches!(
            TextureData::from_rgba_image(image),
            Err(TextureError::ZeroDimensions { .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let source = TextureSource::new("no/such/texture.png").srgb();
        let data = TextureData::load_or(&source, [255, 255, 255, 255]);
        assert_eq!((data.width, data.height), (1, 1));
    }

    #[test]
    fn test_height_map_reads_red_channel() {
        let map = HeightMap::from_texture(&gradient(2, 1));
        assert_eq!(map.dimensions(), (2, 1));
        // Texel centres: left texel at u = 0.25, right at u = 0.75
        assert!(map.sample_uv(Vec2::new(0.25, 0.5)).abs() < 1e-6);
        assert!((map.sample_uv(Vec2::new(0.75, 0.5)) - 1.0).abs() < 1e-6);
        assert!((map.sample_uv(Vec2::new(0.5, 0.5)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_height_map_wraps() {
        let map = HeightMap::from_texture(&gradient(4, 4));
        let a = map.sample_uv(Vec2::new(0.3, 0.2));
        let b = map.sample_uv(Vec2::new(1.3, -0.8));
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn test_height_map_flips_v() {
        // Top row bright, bottom row dark
        let image = image::RgbaImage::from_fn(1, 2, |_, y| {
            image::Rgba([if y == 0 { 255 } else { 0 }, 0, 0, 255])
        });
        let map = HeightMap::from_texture(&TextureData::from_rgba_image(image).unwrap());
        assert!((map.sample_uv(Vec2::new(0.5, 0.75)) - 1.0).abs() < 1e-6);
        assert!(map.sample_uv(Vec2::new(0.5, 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_source_builder() {
        let source = TextureSource::new("a.jpg").srgb().repeat().nearest();
        assert_eq!(source.color_space, ColorSpace::Srgb);
        assert_eq!(source.sampler.wrap, WrapMode::Repeat);
        assert_eq!(source.sampler.mag_filter, MagFilter::Nearest);
    }
}
