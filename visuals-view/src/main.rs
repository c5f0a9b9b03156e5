//! Application entry point for the preset viewer.
//!
//! This binary parses the command line, loads an optional scene file and
//! delegates all interactive logic and rendering to [`Viewer`].

mod painter_surface;
mod viewer;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use viewer::{PresetKind, Viewer};
use visuals_core::config::SceneFile;

#[derive(Parser, Debug)]
#[command(about = "Run a canvas animation preset in a native window")]
struct Args {
    /// Preset to start with.
    #[arg(long, value_enum, default_value = "lorenz")]
    preset: PresetKind,

    /// TOML scene file with `[lorenz]`, `[pendulum]` and `[flow_field]` overrides.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let scene = match &args.config {
        Some(path) => SceneFile::load(path)
            .with_context(|| format!("loading scene {}", path.display()))?,
        None => SceneFile::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_title("visuals"),
        ..Default::default()
    };

    eframe::run_native(
        "visuals",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(args.preset, scene)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with an error: {e}"))
}
