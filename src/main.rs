//! Runs the phase tracker against a scripted engine lifecycle and shows the
//! current phase.
//!
//! Example:
//!   cargo run -- --config assets/config/app_phase.ron --headless --frames 400

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use app_phase::{AppConfig, AppPhasePlugin};
use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive and monitor the application phase tracker", long_about = None)]
struct Args {
    /// RON config; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Run without a window (MinimalPlugins + logging).
    #[arg(long)]
    headless: bool,
    /// Override `script.exit_after_frames`.
    #[arg(long)]
    frames: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(frames) = args.frames {
        cfg.script.exit_after_frames = frames;
    }

    // The tracker has to exist before any plugin or system can observe it.
    phase_core::global::initialize_with(cfg.tracker.clone());

    let mut app = App::new();
    if args.headless {
        app.add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
            LogPlugin::default(),
        ));
    } else {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, spawn_camera);
    }
    app.add_plugins(AppPhasePlugin::new(cfg));

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("app exited with code {code}"),
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
