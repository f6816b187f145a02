#![cfg(feature = "debug")]

use app_phase::debug::PhaseOverlayText;
use app_phase::{AppConfig, AppPhasePlugin, ScriptStep};
use bevy::prelude::*;
use phase_core::Phase;

fn overlay_text(app: &mut App) -> String {
    let mut q = app.world_mut().query_filtered::<&Text, With<PhaseOverlayText>>();
    let text = q.iter(app.world()).next().expect("overlay text spawned");
    text.0.clone()
}

#[test]
fn overlay_tracks_current_phase() {
    let mut cfg = AppConfig::default();
    cfg.tracker.log_transitions = false;
    cfg.script.steps = vec![
        ScriptStep { frame: 1, phase: Phase::NotPlaying },
        ScriptStep { frame: 2, phase: Phase::Playing },
    ];
    cfg.script.exit_after_frames = 0;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(AppPhasePlugin::isolated(cfg));

    app.update();
    assert_eq!(overlay_text(&mut app), "The application is not running.");
    app.update();
    assert_eq!(overlay_text(&mut app), "Current phase: NotPlaying");
    app.update();
    assert_eq!(overlay_text(&mut app), "Current phase: Playing");
}

#[test]
fn overlay_disabled_spawns_nothing() {
    let mut cfg = AppConfig::default();
    cfg.monitor.overlay = false;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(AppPhasePlugin::isolated(cfg));
    app.update();
    let mut q = app.world_mut().query_filtered::<Entity, With<PhaseOverlayText>>();
    assert_eq!(q.iter(app.world()).count(), 0);
}
