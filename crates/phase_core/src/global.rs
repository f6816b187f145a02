//! The process-wide tracker.
//!
//! [`initialize`] must run once at startup before any consumer touches the
//! tracker. [`instance`] never creates a tracker on its own.

use crate::{SharedPhaseTracker, TrackerConfig};
use bevy::log::{debug, info};
use std::sync::OnceLock;

static TRACKER: OnceLock<SharedPhaseTracker> = OnceLock::new();

pub fn initialize() -> SharedPhaseTracker {
    initialize_with(TrackerConfig::default())
}

/// Creates the process-wide tracker. Later calls return the existing tracker
/// and ignore `config`.
pub fn initialize_with(config: TrackerConfig) -> SharedPhaseTracker {
    let mut created = false;
    let tracker = TRACKER.get_or_init(|| {
        created = true;
        SharedPhaseTracker::new(config)
    });
    if created {
        info!("initialized application phase tracker");
    } else {
        debug!("application phase tracker already initialized; reusing it");
    }
    tracker.clone()
}

pub fn try_instance() -> Option<SharedPhaseTracker> {
    TRACKER.get().cloned()
}

/// # Panics
/// When called before [`initialize`].
pub fn instance() -> SharedPhaseTracker {
    match TRACKER.get() {
        Some(t) => t.clone(),
        None => panic!("application phase tracker accessed before phase_core::global::initialize()"),
    }
}

pub fn is_initialized() -> bool {
    TRACKER.get().is_some()
}
