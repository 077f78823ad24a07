//! Debug panel drawn with ImGui
//!
//! Shows the scene controls as sliders and a checkbox. Hidden panels skip the
//! ImGui frame entirely.

use imgui::{Condition, TreeNodeFlags, Ui};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use planet_engine::app::{Overlay, OverlayFrame};
use planet_engine::config::SceneConfig;
use planet_engine::graphics::RenderContext;
use planet_engine::scene::controls::{
    SliderSpec, ANIMATE_LABEL, CAMERA_FOLDER, CAMERA_LOOK_AT, CAMERA_POSITION, MOUNTAINS_FOLDER,
    MOUNTAIN_ROTATION_X, PLANET_ROTATION_Z,
};
use planet_engine::scene::SceneControls;
use std::time::Duration;
use tracing::{debug, error, info};
use winit::event::{Event, WindowEvent};
use winit::window::Window;

const PANEL_TITLE: &str = "Debug";

/// ImGui overlay editing [`SceneControls`]
pub struct DebugPanel {
    imgui_context: imgui::Context,
    imgui_platform: WinitPlatform,
    imgui_renderer: Renderer,
    width: f32,
}

impl DebugPanel {
    pub fn new(
        render_context: &RenderContext,
        window: &Window,
        format: wgpu::TextureFormat,
        config: &SceneConfig,
    ) -> Self {
        info!(width = config.gui.width, "Initializing debug panel");

        let mut imgui_context = imgui::Context::create();
        imgui_context.set_ini_filename(None);

        let style = imgui_context.style_mut();
        style.window_rounding = 0.0;
        style.scrollbar_rounding = 0.0;

        let mut imgui_platform = WinitPlatform::new(&mut imgui_context);
        imgui_platform.attach_window(imgui_context.io_mut(), window, HiDpiMode::Default);

        let renderer_config = RendererConfig {
            texture_format: format,
            ..Default::default()
        };
        let imgui_renderer = Renderer::new(
            &mut imgui_context,
            &render_context.device,
            &render_context.queue,
            renderer_config,
        );

        Self {
            imgui_context,
            imgui_platform,
            imgui_renderer,
            width: config.gui.width,
        }
    }

    /// Boxed constructor matching the engine's overlay factory
    pub fn boxed(
        render_context: &RenderContext,
        window: &Window,
        format: wgpu::TextureFormat,
        config: &SceneConfig,
    ) -> Box<dyn Overlay> {
        Box::new(Self::new(render_context, window, format, config))
    }
}

impl Overlay for DebugPanel {
    fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let wrapped: Event<()> = Event::WindowEvent {
            window_id: window.id(),
            event: event.clone(),
        };
        self.imgui_platform
            .handle_event(self.imgui_context.io_mut(), window, &wrapped);

        // Typing into a slider's text field must not toggle the panel
        matches!(event, WindowEvent::KeyboardInput { .. })
            && self.imgui_context.io().want_text_input
    }

    fn draw(&mut self, frame: OverlayFrame<'_>, controls: &mut SceneControls) {
        if !controls.panel_visible() {
            return;
        }

        self.imgui_context
            .io_mut()
            .update_delta_time(Duration::from_secs_f32(frame.delta_seconds.max(1e-4)));
        if let Err(e) = self
            .imgui_platform
            .prepare_frame(self.imgui_context.io_mut(), frame.window)
        {
            error!(error = ?e, "ImGui prepare_frame failed");
            return;
        }

        let width = self.width;
        let ui = self.imgui_context.new_frame();
        let display_width = ui.io().display_size[0];
        ui.window(PANEL_TITLE)
            .size([width, 0.0], Condition::FirstUseEver)
            .position([(display_width - width).max(0.0), 0.0], Condition::FirstUseEver)
            .build(|| draw_controls(ui, controls));

        self.imgui_platform.prepare_render(ui, frame.window);
        let draw_data = self.imgui_context.render();

        let mut pass = frame
            .encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ImGui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

        if let Err(e) = self.imgui_renderer.render(
            draw_data,
            &frame.context.queue,
            &frame.context.device,
            &mut pass,
        ) {
            error!(error = ?e, "ImGui render failed");
        }
    }
}

fn slider(ui: &Ui, label: &str, spec: &SliderSpec, value: &mut f32) -> bool {
    let format = match spec.step {
        Some(step) if step < 0.01 => "%.3f",
        Some(_) => "%.2f",
        None => "%.4f",
    };
    ui.slider_config(label, spec.min, spec.max)
        .display_format(format)
        .build(value)
}

fn draw_controls(ui: &Ui, controls: &mut SceneControls) {
    let mut rotation_z = controls.planet_rotation_z();
    if slider(ui, PLANET_ROTATION_Z.label, &PLANET_ROTATION_Z, &mut rotation_z) {
        controls.set_planet_rotation_z(rotation_z);
    }

    if ui.collapsing_header(MOUNTAINS_FOLDER, TreeNodeFlags::empty()) {
        for slot in 0..controls.mountain_count() {
            let (Some(label), Some(mut value)) = (
                controls.mountain_label(slot).map(str::to_owned),
                controls.mountain_rotation_x(slot),
            ) else {
                continue;
            };
            if slider(ui, &label, &MOUNTAIN_ROTATION_X, &mut value) {
                debug!(slot, value, "Mountain slider moved");
                controls.set_mountain_rotation_x(slot, value);
            }
        }
    }

    if ui.collapsing_header(CAMERA_FOLDER, TreeNodeFlags::DEFAULT_OPEN) {
        let _id = ui.push_id(CAMERA_FOLDER);

        let mut position = controls.camera_position().to_array();
        let mut moved = false;
        for (spec, value) in CAMERA_POSITION.iter().zip(position.iter_mut()) {
            moved |= slider(ui, spec.label, spec, value);
        }
        if moved {
            controls.set_camera_position(position.into());
        }

        let mut target = controls.look_at().to_array();
        let mut aimed = false;
        for (spec, value) in CAMERA_LOOK_AT.iter().zip(target.iter_mut()) {
            aimed |= slider(ui, spec.label, spec, value);
        }
        if aimed {
            controls.set_look_at(target.into());
        }
    }

    let mut animate = controls.animate_scene();
    if ui.checkbox(ANIMATE_LABEL, &mut animate) {
        controls.set_animate_scene(animate);
    }
}
