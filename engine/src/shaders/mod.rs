//! Shader management and compilation
//!
//! Provides access to compiled shaders for the rendering pipeline.

/// Surface shader for every scene mesh
pub const STANDARD_SHADER: &str = include_str!("standard.wgsl");

/// Full-screen copy of the off-screen target onto the window surface
pub const BLIT_SHADER: &str = include_str!("blit.wgsl");
