//! The application phase tracker.
//!
//! A transition runs in two steps. `PhaseTracker::begin_transition` updates
//! the phase, drains the one-shot lists and snapshots the persistent ones.
//! `PendingDispatch::run` then invokes the callbacks without touching the
//! tracker. This split lets the shared handle release its lock between the
//! steps so callbacks can re-enter the tracker.

use crate::journal::{ListenerFault, TransitionJournal, TransitionRecord};
use crate::listener::{ArrivalCallback, Entry, ListenerList, PhaseCallback};
use crate::{Delivery, FaultPolicy, ListenerId, Phase, TrackerConfig};
use bevy::log::{debug, error, info};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub struct PhaseTracker {
    current: Phase,
    next_listener: u64,
    sequence: u64,
    global: ListenerList<PhaseCallback>,
    global_once: ListenerList<PhaseCallback>,
    per_phase: [ListenerList<ArrivalCallback>; 5],
    per_phase_once: [ListenerList<ArrivalCallback>; 5],
    journal: TransitionJournal,
    next_queue: u64,
    forward_queues: Vec<(ForwardQueueId, Vec<TransitionRecord>)>,
    config: TrackerConfig,
}

/// Consumer-owned queue of finished transitions, independent of the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForwardQueueId(u64);

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl fmt::Debug for PhaseTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseTracker")
            .field("current", &self.current)
            .field("sequence", &self.sequence)
            .field("global", &self.global.len())
            .field("global_once", &self.global_once.len())
            .field("journal", &self.journal.len())
            .finish_non_exhaustive()
    }
}

impl PhaseTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            current: Phase::Uninitialized,
            next_listener: 0,
            sequence: 0,
            global: ListenerList::default(),
            global_once: ListenerList::default(),
            per_phase: std::array::from_fn(|_| ListenerList::default()),
            per_phase_once: std::array::from_fn(|_| ListenerList::default()),
            journal: TransitionJournal::with_capacity(config.journal_capacity),
            next_queue: 0,
            forward_queues: Vec::new(),
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.current
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn set_fault_policy(&mut self, policy: FaultPolicy) {
        self.config.fault_policy = policy;
    }

    fn mint_id(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }

    /// Registers `callback` for every future transition (or only the next one
    /// with [`Delivery::OneShot`]). Registering the same closure twice keeps
    /// both entries.
    pub fn add_listener(&mut self, callback: impl Fn(Phase) + Send + Sync + 'static, delivery: Delivery) -> ListenerId {
        self.add_listener_arc(Arc::new(callback), delivery)
    }

    pub fn add_listener_arc(&mut self, callback: Arc<PhaseCallback>, delivery: Delivery) -> ListenerId {
        let id = self.mint_id();
        match delivery {
            Delivery::Persistent => self.global.push(id, callback),
            Delivery::OneShot => self.global_once.push(id, callback),
        }
        debug!(listener = id.raw(), ?delivery, "phase listener added");
        id
    }

    /// Removes a persistent global listener. One-shot registrations are not
    /// affected; they clear themselves after firing.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.global.remove_first(id)
    }

    /// Registers `callback` to run on arrival in `target`. Returns `None` and
    /// registers nothing when `target` is the sentinel.
    pub fn add_phase_listener(
        &mut self,
        target: Phase,
        callback: impl Fn() + Send + Sync + 'static,
        delivery: Delivery,
    ) -> Option<ListenerId> {
        self.add_phase_listener_arc(target, Arc::new(callback), delivery)
    }

    pub fn add_phase_listener_arc(
        &mut self,
        target: Phase,
        callback: Arc<ArrivalCallback>,
        delivery: Delivery,
    ) -> Option<ListenerId> {
        let Some(slot) = target.slot() else {
            debug!("ignoring listener registration for sentinel phase");
            return None;
        };
        let id = self.mint_id();
        match delivery {
            Delivery::Persistent => self.per_phase[slot].push(id, callback),
            Delivery::OneShot => self.per_phase_once[slot].push(id, callback),
        }
        debug!(listener = id.raw(), %target, ?delivery, "arrival listener added");
        Some(id)
    }

    pub fn remove_phase_listener(&mut self, target: Phase, id: ListenerId) -> bool {
        match target.slot() {
            Some(slot) => self.per_phase[slot].remove_first(id),
            None => false,
        }
    }

    /// Number of registrations that would fire on a transition into `target`.
    pub fn pending_listeners(&self, target: Phase) -> usize {
        let per_phase = target.slot().map_or(0, |s| self.per_phase[s].len() + self.per_phase_once[s].len());
        self.global.len() + self.global_once.len() + per_phase
    }

    /// Moves to `phase` and notifies listeners. Returns `None` without any
    /// effect when `phase` is the current phase or the sentinel.
    ///
    /// Under [`FaultPolicy::Propagate`] a panicking listener aborts the rest
    /// of the dispatch and the panic resumes here after the transition has
    /// been journaled.
    pub fn set_phase(&mut self, phase: Phase) -> Option<TransitionRecord> {
        let pending = self.begin_transition(phase)?;
        let outcome = pending.run();
        Some(self.complete(outcome))
    }

    /// First half of a transition; see the module docs. Dropping the result
    /// without running and completing it loses the drained one-shots.
    pub(crate) fn begin_transition(&mut self, phase: Phase) -> Option<PendingDispatch> {
        if phase.is_sentinel() {
            debug!(current = %self.current, "ignoring transition to sentinel phase");
            return None;
        }
        if phase == self.current {
            return None;
        }
        let slot = phase.slot()?;
        let from = self.current;
        self.current = phase;
        self.sequence += 1;
        Some(PendingDispatch {
            sequence: self.sequence,
            from,
            to: phase,
            policy: self.config.fault_policy,
            global_once: self.global_once.drain(),
            phase_once: self.per_phase_once[slot].drain(),
            global: self.global.snapshot(),
            phase: self.per_phase[slot].snapshot(),
        })
    }

    /// Journals a finished dispatch. Resumes a propagated panic, if any.
    pub(crate) fn complete(&mut self, outcome: DispatchOutcome) -> TransitionRecord {
        let DispatchOutcome { record, panic } = outcome;
        self.record(record.clone());
        if let Some(payload) = panic {
            panic::resume_unwind(payload);
        }
        record
    }

    pub(crate) fn record(&mut self, record: TransitionRecord) {
        if self.config.log_transitions {
            info!(
                from = %record.from,
                to = %record.to,
                sequence = record.sequence,
                invoked = record.invoked,
                faults = record.faults.len(),
                "application phase changed"
            );
        }
        for (_, queue) in &mut self.forward_queues {
            queue.push(record.clone());
        }
        self.journal.push(record);
    }

    /// Every transition recorded from now on is queued for `take_forwarded`
    /// until the queue is closed. Unlike the journal the queue is unbounded,
    /// so its owner must drain it regularly.
    pub fn open_forward_queue(&mut self) -> ForwardQueueId {
        self.next_queue += 1;
        let id = ForwardQueueId(self.next_queue);
        self.forward_queues.push((id, Vec::new()));
        id
    }

    pub fn close_forward_queue(&mut self, id: ForwardQueueId) -> bool {
        let before = self.forward_queues.len();
        self.forward_queues.retain(|(q, _)| *q != id);
        self.forward_queues.len() != before
    }

    /// Drains the queue in sequence order. Empty for unknown ids.
    pub fn take_forwarded(&mut self, id: ForwardQueueId) -> Vec<TransitionRecord> {
        let mut taken = self
            .forward_queues
            .iter_mut()
            .find(|(q, _)| *q == id)
            .map(|(_, queue)| std::mem::take(queue))
            .unwrap_or_default();
        taken.sort_by_key(|r| r.sequence);
        taken
    }

    pub fn journal(&self) -> &TransitionJournal {
        &self.journal
    }

    pub fn last_transition(&self) -> Option<&TransitionRecord> {
        self.journal.last()
    }

    pub fn set_journal_capacity(&mut self, capacity: usize) {
        self.config.journal_capacity = capacity;
        self.journal.set_capacity(capacity);
    }

    /// Real transitions performed so far.
    pub fn transitions(&self) -> u64 {
        self.sequence
    }
}

/// Callbacks captured for one transition, detached from the tracker.
#[must_use = "a pending dispatch notifies nobody until it is run"]
pub(crate) struct PendingDispatch {
    sequence: u64,
    from: Phase,
    to: Phase,
    policy: FaultPolicy,
    global_once: Vec<Entry<PhaseCallback>>,
    phase_once: Vec<Entry<ArrivalCallback>>,
    global: Vec<Entry<PhaseCallback>>,
    phase: Vec<Entry<ArrivalCallback>>,
}

pub(crate) struct DispatchOutcome {
    pub(crate) record: TransitionRecord,
    pub(crate) panic: Option<Box<dyn Any + Send>>,
}

impl PendingDispatch {
    pub(crate) fn from_phase(&self) -> Phase {
        self.from
    }

    pub(crate) fn to_phase(&self) -> Phase {
        self.to
    }

    /// Invokes one-shot then persistent listeners, global before per-phase,
    /// each list in subscription order.
    pub(crate) fn run(self) -> DispatchOutcome {
        let to = self.to;
        let mut run = DispatchRun {
            policy: self.policy,
            to,
            record: TransitionRecord {
                sequence: self.sequence,
                from: self.from,
                to,
                invoked: 0,
                faults: Vec::new(),
                aborted: false,
            },
            panic: None,
        };
        for e in &self.global_once {
            if !run.invoke(e.id, || (e.callback)(to)) {
                return run.finish();
            }
        }
        for e in &self.phase_once {
            if !run.invoke(e.id, || (e.callback)()) {
                return run.finish();
            }
        }
        for e in &self.global {
            if !run.invoke(e.id, || (e.callback)(to)) {
                return run.finish();
            }
        }
        for e in &self.phase {
            if !run.invoke(e.id, || (e.callback)()) {
                return run.finish();
            }
        }
        run.finish()
    }
}

struct DispatchRun {
    policy: FaultPolicy,
    to: Phase,
    record: TransitionRecord,
    panic: Option<Box<dyn Any + Send>>,
}

impl DispatchRun {
    /// Returns `false` when dispatch must stop.
    fn invoke(&mut self, id: ListenerId, f: impl FnOnce()) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(()) => {
                self.record.invoked += 1;
                true
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(listener = id.raw(), phase = %self.to, policy = ?self.policy, "phase listener panicked: {message}");
                self.record.faults.push(ListenerFault { listener: id, message });
                match self.policy {
                    FaultPolicy::Isolate => true,
                    FaultPolicy::Propagate => {
                        self.record.aborted = true;
                        self.panic = Some(payload);
                        false
                    }
                }
            }
        }
    }

    fn finish(self) -> DispatchOutcome {
        DispatchOutcome { record: self.record, panic: self.panic }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
