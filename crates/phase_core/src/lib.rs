mod config;
pub mod global;
mod journal;
mod listener;
mod phase;
mod shared;
mod tracker;

pub use config::*;
pub use journal::*;
pub use listener::{ArrivalCallback, Delivery, ListenerId, PhaseCallback};
pub use phase::*;
pub use shared::*;
pub use tracker::*;

use bevy::prelude::*;

/// Which tracker a [`PhaseCorePlugin`] binds to the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackerScope {
    /// The process-wide tracker from [`global::initialize_with`].
    #[default]
    Global,
    /// A private tracker owned by this app only.
    Isolated,
}

#[derive(Default)]
pub struct PhaseCorePlugin {
    pub scope: TrackerScope,
    pub config: TrackerConfig,
}

impl PhaseCorePlugin {
    pub fn global(config: TrackerConfig) -> Self {
        Self { scope: TrackerScope::Global, config }
    }

    pub fn isolated() -> Self {
        Self { scope: TrackerScope::Isolated, config: TrackerConfig::default() }
    }
}

impl Plugin for PhaseCorePlugin {
    fn build(&self, app: &mut App) {
        let tracker = match self.scope {
            TrackerScope::Global => global::initialize_with(self.config.clone()),
            TrackerScope::Isolated => SharedPhaseTracker::new(self.config.clone()),
        };
        let queue = tracker.open_forward_queue();
        app.insert_resource(tracker)
            .insert_resource(PhaseEventQueue(queue))
            .add_event::<PhaseChanged>()
            .add_systems(PostUpdate, forward_phase_changes);
    }
}

/// Frame-deferred mirror of a transition, forwarded once per frame.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChanged {
    pub from: Phase,
    pub to: Phase,
    pub sequence: u64,
}

/// This app's forwarding queue on the tracker; drained every `PostUpdate`.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PhaseEventQueue(pub ForwardQueueId);

fn forward_phase_changes(
    tracker: Res<SharedPhaseTracker>,
    queue: Res<PhaseEventQueue>,
    mut events: EventWriter<PhaseChanged>,
) {
    for r in tracker.take_forwarded(queue.0) {
        events.write(PhaseChanged { from: r.from, to: r.to, sequence: r.sequence });
    }
}

/// Registration shortcuts on `App`. They discard the `ListenerId`, so
/// listeners added here cannot be removed later; register through the
/// `SharedPhaseTracker` resource when removal is needed.
pub trait PhaseTrackerAppExt {
    fn set_app_phase(&mut self, phase: Phase) -> &mut Self;
    fn add_listener(&mut self, callback: impl Fn(Phase) + Send + Sync + 'static, delivery: Delivery) -> &mut Self;
    fn add_phase_listener(
        &mut self,
        target: Phase,
        callback: impl Fn() + Send + Sync + 'static,
        delivery: Delivery,
    ) -> &mut Self;
}

impl PhaseTrackerAppExt for App {
    fn set_app_phase(&mut self, phase: Phase) -> &mut Self {
        let tracker = self.world().resource::<SharedPhaseTracker>().clone();
        tracker.set_phase(phase);
        self
    }
    fn add_listener(&mut self, callback: impl Fn(Phase) + Send + Sync + 'static, delivery: Delivery) -> &mut Self {
        self.world().resource::<SharedPhaseTracker>().add_listener(callback, delivery);
        self
    }
    fn add_phase_listener(
        &mut self,
        target: Phase,
        callback: impl Fn() + Send + Sync + 'static,
        delivery: Delivery,
    ) -> &mut Self {
        self.world().resource::<SharedPhaseTracker>().add_phase_listener(target, callback, delivery);
        self
    }
}
