//! Update ordering for phase driving and observation.
//! 1. Drive: lifecycle hooks request transitions (listeners fire inline)
//! 2. Observe: monitors poll the tracker and refresh their displays
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum PhaseFlowSet {
    Drive,
    Observe,
}
