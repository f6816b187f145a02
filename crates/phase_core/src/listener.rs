use crate::Phase;
use std::sync::Arc;

/// Handle returned on registration; the only identity used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// How long a registration stays active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delivery {
    /// Fires on every matching transition until removed.
    #[default]
    Persistent,
    /// Fires on the next matching transition, then is dropped.
    OneShot,
}

/// Global listener: receives the phase just entered.
pub type PhaseCallback = dyn Fn(Phase) + Send + Sync;
/// Per-phase listener: only fired on arrival in its target phase.
pub type ArrivalCallback = dyn Fn() + Send + Sync;

pub(crate) struct Entry<F: ?Sized> {
    pub(crate) id: ListenerId,
    pub(crate) callback: Arc<F>,
}

impl<F: ?Sized> Clone for Entry<F> {
    fn clone(&self) -> Self {
        Self { id: self.id, callback: Arc::clone(&self.callback) }
    }
}

/// Ordered listener storage. Iteration always happens over a snapshot or a
/// drained copy, never over the live vector.
pub(crate) struct ListenerList<F: ?Sized> {
    entries: Vec<Entry<F>>,
}

impl<F: ?Sized> Default for ListenerList<F> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<F: ?Sized> ListenerList<F> {
    pub(crate) fn push(&mut self, id: ListenerId, callback: Arc<F>) {
        self.entries.push(Entry { id, callback });
    }

    /// Removes the first entry carrying `id`. Returns whether one was found.
    pub(crate) fn remove_first(&mut self, id: ListenerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<Entry<F>> {
        self.entries.clone()
    }

    pub(crate) fn drain(&mut self) -> Vec<Entry<F>> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
