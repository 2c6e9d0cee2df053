//! # Skyburst
//!
//! Headless firework show runner.
//!
//! Loads `skyburst.toml` (or the path given as the first argument), launches
//! fireworks from the configured triggers and steps the simulation for the
//! configured number of seconds.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod timing;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("skyburst=info".parse()?))
        .init();

    info!("Skyburst starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    app::run(config_path.as_deref())?;

    info!("Skyburst shutdown complete");
    Ok(())
}
