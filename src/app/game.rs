// This file is part of app_phase.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;
use phase_core::{PhaseCorePlugin, TrackerScope};

use crate::app::auto_close::AutoClosePlugin;
use crate::app::lifecycle::LifecycleScriptPlugin;
use crate::core::config::AppConfig;
use crate::core::system::system_order::PhaseFlowSet;
use crate::monitor::PhaseMonitorPlugin;

/// Tracker, scripted lifecycle hooks, monitor and auto-exit wired from one config.
pub struct AppPhasePlugin {
    pub config: AppConfig,
    pub scope: TrackerScope,
}

impl AppPhasePlugin {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            scope: TrackerScope::Global,
        }
    }

    pub fn isolated(config: AppConfig) -> Self {
        Self {
            config,
            scope: TrackerScope::Isolated,
        }
    }
}

impl Plugin for AppPhasePlugin {
    fn build(&self, app: &mut App) {
        for w in self.config.validate() {
            warn!("config: {w}");
        }
        let cfg = &self.config;
        app.insert_resource(cfg.clone())
            .configure_sets(Update, (PhaseFlowSet::Drive, PhaseFlowSet::Observe).chain())
            .add_plugins((
                PhaseCorePlugin {
                    scope: self.scope,
                    config: cfg.tracker.clone(),
                },
                LifecycleScriptPlugin {
                    script: cfg.script.clone(),
                },
                PhaseMonitorPlugin {
                    overlay: cfg.monitor.overlay,
                    log_repaints: cfg.monitor.log_repaints,
                },
                AutoClosePlugin,
            ));
    }
}
