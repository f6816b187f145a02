use crate::journal::TransitionRecord;
use crate::listener::{ArrivalCallback, PhaseCallback};
use crate::{Delivery, FaultPolicy, ForwardQueueId, ListenerId, Phase, PhaseTracker, TrackerConfig};
use bevy::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to one tracker. All clones observe the same phase.
///
/// The lock is held only while listener tables are touched. Callbacks run
/// unlocked, so a callback may register listeners or request a nested
/// transition through its own clone of the handle.
///
/// Nothing orders `set_phase` calls made from different threads. Bevy hands
/// this out as a shared `Res`, so two parallel systems that both change the
/// phase may interleave their dispatches; order such systems explicitly
/// (for example with a chained system set).
#[derive(Resource, Clone, Debug, Default)]
pub struct SharedPhaseTracker {
    inner: Arc<Mutex<PhaseTracker>>,
}

impl SharedPhaseTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::from_tracker(PhaseTracker::new(config))
    }

    pub fn from_tracker(tracker: PhaseTracker) -> Self {
        Self { inner: Arc::new(Mutex::new(tracker)) }
    }

    fn lock(&self) -> MutexGuard<'_, PhaseTracker> {
        // listeners never run under the lock, poisoning carries no torn state
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True when both handles point at the same tracker.
    pub fn same_tracker(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    pub fn set_phase(&self, phase: Phase) -> Option<TransitionRecord> {
        let pending = self.lock().begin_transition(phase)?;
        let outcome = pending.run();
        let record = outcome.record.clone();
        let panic = outcome.panic;
        self.lock().record(record.clone());
        if let Some(payload) = panic {
            std::panic::resume_unwind(payload);
        }
        Some(record)
    }

    pub fn add_listener(&self, callback: impl Fn(Phase) + Send + Sync + 'static, delivery: Delivery) -> ListenerId {
        self.lock().add_listener(callback, delivery)
    }

    pub fn add_listener_arc(&self, callback: Arc<PhaseCallback>, delivery: Delivery) -> ListenerId {
        self.lock().add_listener_arc(callback, delivery)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.lock().remove_listener(id)
    }

    pub fn add_phase_listener(
        &self,
        target: Phase,
        callback: impl Fn() + Send + Sync + 'static,
        delivery: Delivery,
    ) -> Option<ListenerId> {
        self.lock().add_phase_listener(target, callback, delivery)
    }

    pub fn add_phase_listener_arc(
        &self,
        target: Phase,
        callback: Arc<ArrivalCallback>,
        delivery: Delivery,
    ) -> Option<ListenerId> {
        self.lock().add_phase_listener_arc(target, callback, delivery)
    }

    pub fn remove_phase_listener(&self, target: Phase, id: ListenerId) -> bool {
        self.lock().remove_phase_listener(target, id)
    }

    pub fn set_fault_policy(&self, policy: FaultPolicy) {
        self.lock().set_fault_policy(policy);
    }

    pub fn set_journal_capacity(&self, capacity: usize) {
        self.lock().set_journal_capacity(capacity);
    }

    pub fn last_transition(&self) -> Option<TransitionRecord> {
        self.lock().last_transition().cloned()
    }

    /// Copy of the journal, oldest first.
    pub fn journal(&self) -> Vec<TransitionRecord> {
        self.lock().journal().iter().cloned().collect()
    }

    pub fn transitions_since(&self, sequence: u64) -> Vec<TransitionRecord> {
        self.lock().journal().since(sequence)
    }

    pub fn open_forward_queue(&self) -> ForwardQueueId {
        self.lock().open_forward_queue()
    }

    pub fn close_forward_queue(&self, id: ForwardQueueId) -> bool {
        self.lock().close_forward_queue(id)
    }

    pub fn take_forwarded(&self, id: ForwardQueueId) -> Vec<TransitionRecord> {
        self.lock().take_forwarded(id)
    }

    pub fn transitions(&self) -> u64 {
        self.lock().transitions()
    }
}
