//! WebGPU render context management
//!
//! Provides the main rendering context that manages the WebGPU device,
//! queue, and adapter for rendering operations. The window surface is owned
//! by `WindowSurface`.

use std::sync::Arc;
use tracing::info;

/// Errors raised while setting up or driving the GPU
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Main rendering context for the engine
///
/// This struct owns the WebGPU resources needed for rendering:
/// - Device and queue for GPU operations
/// - Adapter for capabilities queries
pub struct RenderContext {
    /// WebGPU instance
    pub instance: wgpu::Instance,
    /// WebGPU device for creating GPU resources
    pub device: Arc<wgpu::Device>,
    /// Command queue for submitting GPU work
    pub queue: Arc<wgpu::Queue>,
    /// WebGPU adapter for capability queries
    adapter: wgpu::Adapter,
    /// Adapter information for debugging
    pub adapter_info: wgpu::AdapterInfo,
}

impl RenderContext {
    /// Create a new render context
    ///
    /// This will request a device from the provided instance.
    /// Surface creation and configuration is handled separately.
    pub async fn new(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, RenderError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            gpu_name = %adapter_info.name,
            backend = ?adapter_info.backend,
            "GPU adapter selected"
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: Some("Render Device"),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            instance,
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter,
            adapter_info,
        })
    }

    /// Create initial surface configuration for a given surface
    ///
    /// Prefers an sRGB format and vsync presentation.
    pub fn create_surface_configuration(
        &self,
        surface: &wgpu::Surface,
        width: u32,
        height: u32,
    ) -> Result<wgpu::SurfaceConfiguration, RenderError> {
        let surface_caps = surface.get_capabilities(&self.adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    /// Create a command encoder for recording GPU commands
    pub fn create_command_encoder(&self, label: Option<&str>) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label })
    }

    /// Submit command buffers to the GPU queue
    pub fn submit<I: IntoIterator<Item = wgpu::CommandBuffer>>(&self, command_buffers: I) {
        self.queue.submit(command_buffers);
    }
}
