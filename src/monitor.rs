//! Polling display surface for the current phase.
//!
//! Reads the tracker once per refresh and requests a repaint only when the
//! observed value changed. Until the tracker leaves `Uninitialized` the
//! application counts as not running.

use bevy::prelude::*;
use phase_core::{Phase, SharedPhaseTracker};

use crate::core::system::system_order::PhaseFlowSet;

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseMonitor {
    last_observed: Option<Phase>,
    refreshes: u64,
    repaints: u64,
    repaint_pending: bool,
}

impl PhaseMonitor {
    /// Returns true when the display must be redrawn.
    pub fn poll(&mut self, current: Phase) -> bool {
        self.refreshes += 1;
        let observed = (!current.is_sentinel()).then_some(current);
        if observed == self.last_observed {
            return false;
        }
        self.last_observed = observed;
        self.repaints += 1;
        self.repaint_pending = true;
        true
    }

    pub fn last_observed(&self) -> Option<Phase> {
        self.last_observed
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn repaints(&self) -> u64 {
        self.repaints
    }

    /// Clears and returns the pending repaint flag.
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.repaint_pending)
    }

    pub fn label(&self) -> String {
        match self.last_observed {
            Some(p) => format!("Current phase: {p}"),
            None => "The application is not running.".to_string(),
        }
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub(crate) struct MonitorSettings {
    log_repaints: bool,
}

pub struct PhaseMonitorPlugin {
    pub overlay: bool,
    pub log_repaints: bool,
}

impl Default for PhaseMonitorPlugin {
    fn default() -> Self {
        Self {
            overlay: true,
            log_repaints: true,
        }
    }
}

impl Plugin for PhaseMonitorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhaseMonitor>()
            .insert_resource(MonitorSettings {
                log_repaints: self.log_repaints,
            })
            .add_systems(Update, poll_phase_monitor.in_set(PhaseFlowSet::Observe));
        #[cfg(feature = "debug")]
        if self.overlay {
            app.add_plugins(crate::debug::PhaseOverlayPlugin);
        }
        #[cfg(not(feature = "debug"))]
        if self.overlay {
            debug!("phase overlay requested but the debug feature is off");
        }
    }
}

pub(crate) fn poll_phase_monitor(
    tracker: Res<SharedPhaseTracker>,
    settings: Res<MonitorSettings>,
    mut monitor: ResMut<PhaseMonitor>,
) {
    let current = tracker.phase();
    // refresh counters change every frame; only flag the resource on repaints
    if monitor.bypass_change_detection().poll(current) {
        monitor.set_changed();
        if settings.log_repaints {
            debug!(phase = %current, repaints = monitor.repaints(), "phase monitor repaint");
        }
    }
}
