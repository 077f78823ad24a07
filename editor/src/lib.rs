//! ImGui debug overlay for the sunset planet scene
//!
//! The engine stays GUI-free; this crate plugs into it through the
//! [`planet_engine::app::Overlay`] trait.

pub mod debug_panel;

pub use debug_panel::DebugPanel;
