//! Scripted engine lifecycle hooks.
//!
//! The engine reports phase changes at fixed moments (start, enter play,
//! pause, leave play). `LifecycleScript` replays such a sequence against the
//! tracker, one Update run per frame.

use bevy::prelude::*;
use phase_core::{Phase, SharedPhaseTracker};

use crate::core::config::{ScriptConfig, ScriptStep};
use crate::core::system::system_order::PhaseFlowSet;

#[derive(Resource, Debug, Clone, Default)]
pub struct LifecycleScript {
    steps: Vec<ScriptStep>,
    next: usize,
    frame: u64,
}

impl LifecycleScript {
    /// Steps are applied in frame order; equal frames keep their listed order.
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by_key(|s| s.frame);
        Self { steps, next: 0, frame: 0 }
    }

    pub fn from_config(cfg: &ScriptConfig) -> Self {
        Self::new(cfg.steps.clone())
    }

    /// Phases due on the current frame, then advances to the next frame.
    pub fn advance(&mut self) -> Vec<Phase> {
        let mut due = Vec::new();
        while let Some(step) = self.steps.get(self.next) {
            if step.frame > self.frame {
                break;
            }
            due.push(step.phase);
            self.next += 1;
        }
        self.frame += 1;
        due
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.steps.len()
    }
}

pub struct LifecycleScriptPlugin {
    pub script: ScriptConfig,
}

impl Plugin for LifecycleScriptPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(LifecycleScript::from_config(&self.script))
            .add_systems(Update, apply_lifecycle_script.in_set(PhaseFlowSet::Drive));
    }
}

pub fn apply_lifecycle_script(tracker: Res<SharedPhaseTracker>, mut script: ResMut<LifecycleScript>) {
    let frame = script.frame();
    let was_finished = script.is_finished();
    for phase in script.advance() {
        if phase.is_sentinel() {
            warn!(frame, "lifecycle script requested Uninitialized; ignored");
            continue;
        }
        if tracker.set_phase(phase).is_none() {
            debug!(frame, %phase, "lifecycle step did not change the phase");
        }
    }
    if !was_finished && script.is_finished() {
        debug!(frame, "lifecycle script finished");
    }
}
