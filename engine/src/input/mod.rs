//! Keyboard input

pub mod state;

pub use state::InputState;
