//! Application management for the engine
//!
//! [`EngineApp`] owns the scene and drives it from winit's event loop. The
//! GPU side is created lazily on the first `resumed`, the scene itself is
//! built up front so it can be inspected without a window.

use crate::config::SceneConfig;
use crate::core::camera::Camera;
use crate::core::entity::{update_hierarchy_system, World};
use crate::core::time::FrameClock;
use crate::graphics::{AssetRegistry, RenderContext, RenderError, Renderer};
use crate::input::InputState;
use crate::scene::{scene_rng, PlanetHandles, PlanetScene, SceneAnimation, SceneControls};
use crate::windowing::{SurfaceSize, WindowSurface};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId},
};

/// Everything an overlay needs to record its draw calls for one frame
pub struct OverlayFrame<'a> {
    pub context: &'a RenderContext,
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Swapchain view, already holding the scene
    pub view: &'a wgpu::TextureView,
    pub window: &'a Window,
    pub delta_seconds: f32,
}

/// A GUI layer drawn on top of the scene
pub trait Overlay {
    /// Feed a window event to the GUI; returns true when the GUI consumed it
    /// and the scene should not see it
    fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool;

    /// Draw the GUI and push edits into `controls`
    fn draw(&mut self, frame: OverlayFrame<'_>, controls: &mut SceneControls);
}

/// Builds the overlay once the GPU and window exist
pub type OverlayFactory =
    Box<dyn FnOnce(&RenderContext, &Window, wgpu::TextureFormat, &SceneConfig) -> Box<dyn Overlay>>;

struct GpuState {
    context: Arc<RenderContext>,
    surface: WindowSurface,
    renderer: Renderer,
}

/// Main engine application struct that implements ApplicationHandler
pub struct EngineApp {
    pub world: World,
    pub assets: AssetRegistry,
    pub handles: PlanetHandles,
    pub controls: SceneControls,
    pub animation: SceneAnimation,
    pub input_state: InputState,

    config: SceneConfig,
    clock: FrameClock,
    gpu: Option<GpuState>,
    overlay_factory: Option<OverlayFactory>,
    overlay: Option<Box<dyn Overlay>>,
}

impl EngineApp {
    /// Build the scene described by `config`; no window is opened yet
    pub fn new(config: SceneConfig) -> Self {
        info!(title = %config.window.title, "Creating EngineApp");

        let mut world = World::new();
        let mut assets = AssetRegistry::new();
        let mut rng = scene_rng(config.mountains.seed);
        let handles = PlanetScene::build(&mut world, &mut assets, &config, &mut rng);
        let controls = SceneControls::new(&handles, &config);
        let animation = SceneAnimation::from_config(&config.animation);

        Self {
            world,
            assets,
            handles,
            controls,
            animation,
            input_state: InputState::new(),
            config,
            clock: FrameClock::new(),
            gpu: None,
            overlay_factory: None,
            overlay: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        info!("Initializing window and GPU");

        let (width, height) = self.config.window.size.unwrap_or((1280, 720));
        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
                return Ok(());
            }
        };

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&window))?;
        let context = Arc::new(pollster::block_on(RenderContext::new(
            instance,
            Some(&surface),
        ))?);
        let surface = WindowSurface::new(Arc::clone(&window), surface, &context)?;

        let size = self.surface_size(&window);
        let renderer = Renderer::new(Arc::clone(&context), surface.format(), size.render);
        self.set_camera_aspect(size.aspect_ratio());

        if let Some(factory) = self.overlay_factory.take() {
            let overlay = factory(
                context.as_ref(),
                window.as_ref(),
                surface.format(),
                &self.config,
            );
            self.overlay = Some(overlay);
        }

        info!(
            physical = ?size.physical,
            render = ?size.render,
            pixel_ratio = size.pixel_ratio,
            "Engine initialized"
        );

        self.gpu = Some(GpuState {
            context,
            surface,
            renderer,
        });
        self.clock = FrameClock::new();
        Ok(())
    }

    fn surface_size(&self, window: &Window) -> SurfaceSize {
        SurfaceSize::from_window(
            window.inner_size(),
            window.scale_factor(),
            self.config.window.max_pixel_ratio,
        )
    }

    fn set_camera_aspect(&mut self, aspect_ratio: f32) {
        for (_, camera) in self.world.query_mut::<&mut Camera>() {
            camera.set_aspect_ratio(aspect_ratio);
        }
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if new_size.width == 0 || new_size.height == 0 {
            debug!("Window minimised, skipping resize");
            return;
        }

        gpu.surface.resize(new_size);
        let size = SurfaceSize::from_window(
            new_size,
            gpu.surface.window.scale_factor(),
            self.config.window.max_pixel_ratio,
        );
        gpu.renderer.resize(size.render.0, size.render.1);
        info!(physical = ?size.physical, render = ?size.render, "Window resized");

        self.set_camera_aspect(size.aspect_ratio());
    }

    /// Advance the scene by one frame without touching the GPU
    pub fn update(&mut self, delta_seconds: f32) {
        for _ in 0..self.input_state.typed_count(&self.config.gui.toggle_key) {
            self.controls.toggle_panel();
        }

        self.animation
            .advance(&mut self.world, self.handles.root, delta_seconds);
        self.controls
            .apply(&mut self.world, &self.handles, &mut self.animation);

        self.world.sync_euler_rotations();
        update_hierarchy_system(&mut self.world);
        self.input_state.clear_frame_data();
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop, delta_seconds: f32) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if gpu.surface.is_minimized() {
            return;
        }

        let frame = match gpu.surface.acquire() {
            Ok(frame) => frame,
            Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                info!("Surface lost or outdated, reconfiguring");
                gpu.surface.reconfigure();
                return;
            }
            Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                error!("Out of GPU memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => {
                warn!(error = %e, "Skipping frame");
                return;
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu.context.create_command_encoder(Some("Frame Encoder"));

        let draws = gpu
            .renderer
            .render(&self.world, &self.assets, &mut encoder, &view);

        if let Some(overlay) = &mut self.overlay {
            overlay.draw(
                OverlayFrame {
                    context: &gpu.context,
                    encoder: &mut encoder,
                    view: &view,
                    window: &gpu.surface.window,
                    delta_seconds,
                },
                &mut self.controls,
            );
        }

        gpu.context.submit(std::iter::once(encoder.finish()));
        gpu.surface.window.pre_present_notify();
        frame.present();
        debug!(draws, "Frame presented");
    }
}

impl ApplicationHandler for EngineApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!(error = %e, "Failed to initialize GPU");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        if gpu.surface.window.id() != window_id {
            return;
        }

        let consumed = match &mut self.overlay {
            Some(overlay) => overlay.handle_window_event(&gpu.surface.window, &event),
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Main window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.handle_resize(physical_size);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                info!(scale_factor, "Scale factor changed");
                let new_size = gpu.surface.window.inner_size();
                self.handle_resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                let time = self.clock.tick();
                self.update(time.delta);
                self.render_frame(event_loop, time.delta);
            }
            WindowEvent::KeyboardInput { event, .. } if !consumed => {
                self.input_state.handle_keyboard_event(&event);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.surface.window.request_redraw();
        }
    }
}

/// Builder pattern for EngineApp configuration
pub struct EngineBuilder {
    config: SceneConfig,
    overlay_factory: Option<OverlayFactory>,
}

impl EngineBuilder {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            overlay_factory: None,
        }
    }

    /// Draw a GUI overlay created by `factory` once the window is up
    pub fn overlay<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(&RenderContext, &Window, wgpu::TextureFormat, &SceneConfig) -> Box<dyn Overlay>
            + 'static,
    {
        self.overlay_factory = Some(Box::new(factory));
        self
    }

    /// Build the EngineApp
    pub fn build(self) -> EngineApp {
        let mut app = EngineApp::new(self.config);
        app.overlay_factory = self.overlay_factory;
        app
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
