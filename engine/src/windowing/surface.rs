use crate::graphics::context::{RenderContext, RenderError};
use std::sync::Arc;
use tracing::{debug, info};
use wgpu::{Surface, SurfaceConfiguration};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Window size split into what the swapchain shows and what the scene renders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Swapchain size, physical pixels
    pub physical: (u32, u32),
    /// Off-screen scene size after capping the pixel ratio
    pub render: (u32, u32),
    /// Effective pixels per logical pixel
    pub pixel_ratio: f64,
}

impl SurfaceSize {
    /// Cap the display's pixel ratio at `max_pixel_ratio`
    ///
    /// The scene renders at `logical size * min(scale_factor, max_pixel_ratio)`,
    /// at least one pixel in each direction.
    pub fn from_window(
        physical: PhysicalSize<u32>,
        scale_factor: f64,
        max_pixel_ratio: f64,
    ) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        let pixel_ratio = scale_factor.min(max_pixel_ratio);
        let scale = pixel_ratio / scale_factor;
        let render = |extent: u32| ((extent as f64 * scale).round() as u32).max(1);

        Self {
            physical: (physical.width, physical.height),
            render: (render(physical.width), render(physical.height)),
            pixel_ratio,
        }
    }

    /// Minimised windows report a zero extent
    pub fn is_empty(&self) -> bool {
        self.physical.0 == 0 || self.physical.1 == 0
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.physical.0.max(1) as f32 / self.physical.1.max(1) as f32
    }
}

/// The main window and its swapchain
pub struct WindowSurface {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
    device: Arc<wgpu::Device>,
}

impl WindowSurface {
    /// Configure an already created surface for `window`
    pub fn new(
        window: Arc<Window>,
        surface: Surface<'static>,
        context: &RenderContext,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let config = context.create_surface_configuration(&surface, size.width, size.height)?;
        surface.configure(&context.device, &config);

        info!(
            window_id = ?window.id(),
            width = config.width,
            height = config.height,
            format = ?config.format,
            "Configured window surface"
        );

        Ok(Self {
            window,
            surface,
            config,
            device: Arc::clone(&context.device),
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Reconfigure the swapchain; zero sizes are ignored
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        debug!(
            width = new_size.width,
            height = new_size.height,
            "Resized window surface"
        );
    }

    /// Reconfigure with the current size after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn acquire(&self) -> Result<wgpu::SurfaceTexture, RenderError> {
        Ok(self.surface.get_current_texture()?)
    }

    pub fn is_minimized(&self) -> bool {
        let size = self.window.inner_size();
        size.width == 0 || size.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_density_display_renders_at_full_size() {
        let size = SurfaceSize::from_window(PhysicalSize::new(1280, 720), 1.0, 2.0);
        assert_eq!(size.render, (1280, 720));
        assert_eq!(size.pixel_ratio, 1.0);
    }

    #[test]
    fn test_high_density_display_is_capped() {
        // 1280x720 logical at 3x
        let size = SurfaceSize::from_window(PhysicalSize::new(3840, 2160), 3.0, 2.0);
        assert_eq!(size.physical, (3840, 2160));
        assert_eq!(size.render, (2560, 1440));
        assert_eq!(size.pixel_ratio, 2.0);
    }

    #[test]
    fn test_ratio_at_cap_is_untouched() {
        let size = SurfaceSize::from_window(PhysicalSize::new(2000, 1000), 2.0, 2.0);
        assert_eq!(size.render, (2000, 1000));
    }

    #[test]
    fn test_minimised_window() {
        let size = SurfaceSize::from_window(PhysicalSize::new(0, 0), 2.0, 2.0);
        assert!(size.is_empty());
        assert_eq!(size.render, (1, 1));
    }

    #[test]
    fn test_aspect_ratio() {
        let size = SurfaceSize::from_window(PhysicalSize::new(1600, 800), 1.0, 2.0);
        assert_eq!(size.aspect_ratio(), 2.0);
    }
}
