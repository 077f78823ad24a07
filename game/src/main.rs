//! Sunset planet entry point
//!
//! Usage: `sunset_planet [config.json]`. Without an argument the path is
//! taken from `SUNSET_CONFIG`, otherwise the built-in defaults are used.

use planet_engine::prelude::*;
use std::path::PathBuf;
use tracing::{error, info};
use winit::event_loop::{ControlFlow, EventLoop};

#[cfg(feature = "editor")]
use planet_editor::DebugPanel;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match SceneConfig::from_args(std::env::args_os().nth(1).map(PathBuf::from)) {
        Ok(config) => config,
        Err(e) => {
            planet_engine::init_logging(None);
            error!(error = %e, "Invalid scene config");
            return Err(e.into());
        }
    };

    planet_engine::init_logging(config.log_filter.as_deref());
    info!("Starting sunset planet");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let builder = EngineBuilder::new(config);
    #[cfg(feature = "editor")]
    let builder = builder.overlay(DebugPanel::boxed);

    let mut app = builder.build();
    event_loop.run_app(&mut app)?;

    info!("Sunset planet exited");
    Ok(())
}
