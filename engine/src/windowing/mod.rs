//! Window surface management

pub mod surface;

pub use surface::{SurfaceSize, WindowSurface};
