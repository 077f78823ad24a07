//! Core engine types: entities, camera and timing

pub mod camera;
pub mod entity;
pub mod time;
