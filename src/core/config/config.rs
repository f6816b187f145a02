use bevy::prelude::*;
use phase_core::{read_ron, ConfigError, Phase, TrackerConfig};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 120.0,
            title: "Application Phase Monitor".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Spawn the on-screen phase label (debug builds only).
    pub overlay: bool,
    pub log_repaints: bool,
}
impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            overlay: true,
            log_repaints: true,
        }
    }
}

/// One scripted lifecycle hook: request `phase` on Update run `frame`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub frame: u64,
    pub phase: Phase,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScriptConfig {
    pub steps: Vec<ScriptStep>,
    /// 0 disables the automatic exit.
    pub exit_after_frames: u64,
}
impl Default for ScriptConfig {
    fn default() -> Self {
        let step = |frame, phase| ScriptStep { frame, phase };
        Self {
            steps: vec![
                step(0, Phase::NotPlaying),
                step(60, Phase::BeforePlay),
                step(61, Phase::Playing),
                step(180, Phase::Paused),
                step(240, Phase::Playing),
                step(360, Phase::AfterPlay),
                step(361, Phase::NotPlaying),
            ],
            exit_after_frames: 420,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub tracker: TrackerConfig,
    pub monitor: MonitorConfig,
    pub script: ScriptConfig,
}

impl AppConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_ron(path)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        w.extend(self.tracker.validate());
        let steps = &self.script.steps;
        for pair in steps.windows(2) {
            if pair[1].frame < pair[0].frame {
                w.push(format!(
                    "script step for {} at frame {} listed after frame {}; steps run in frame order",
                    pair[1].phase, pair[1].frame, pair[0].frame
                ));
            }
        }
        for s in steps.iter().filter(|s| s.phase.is_sentinel()) {
            w.push(format!(
                "script step at frame {} targets Uninitialized; it will be ignored",
                s.frame
            ));
        }
        if self.script.exit_after_frames > 0 {
            if let Some(last) = steps.iter().map(|s| s.frame).max() {
                if last >= self.script.exit_after_frames {
                    w.push(format!(
                        "script.exit_after_frames {} is not after the last step (frame {last}); later steps never run",
                        self.script.exit_after_frames
                    ));
                }
            }
        }
        w
    }
}
