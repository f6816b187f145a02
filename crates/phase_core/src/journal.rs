use crate::{ListenerId, Phase};
use std::collections::VecDeque;

/// A listener that panicked while being notified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFault {
    pub listener: ListenerId,
    pub message: String,
}

/// Outcome of one real transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRecord {
    /// 1-based count of real transitions, assigned when the transition starts.
    pub sequence: u64,
    pub from: Phase,
    pub to: Phase,
    /// Callbacks that ran to completion.
    pub invoked: usize,
    pub faults: Vec<ListenerFault>,
    /// Dispatch stopped early because a fault was propagated.
    pub aborted: bool,
}

/// Bounded ring buffer of recent transitions, oldest evicted first.
#[derive(Debug, Clone)]
pub struct TransitionJournal {
    entries: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl TransitionJournal {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity.min(1024)), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }

    pub fn push(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TransitionRecord> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.entries.back()
    }

    /// Records with a sequence strictly greater than `sequence`, in sequence order.
    pub fn since(&self, sequence: u64) -> Vec<TransitionRecord> {
        let mut fresh: Vec<_> = self.entries.iter().filter(|r| r.sequence > sequence).cloned().collect();
        fresh.sort_by_key(|r| r.sequence);
        fresh
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
