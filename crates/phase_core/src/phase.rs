use serde::{Deserialize, Serialize};
use std::fmt;

/// Application lifecycle phase reported by the host engine.
///
/// `Uninitialized` is the sentinel the tracker starts in. It is never a legal
/// transition target, so once the first real phase is set it cannot be
/// observed again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Uninitialized,
    NotPlaying,
    Playing,
    BeforePlay,
    AfterPlay,
    Paused,
}

impl Phase {
    /// Every phase a transition may target, in declaration order.
    pub const OBSERVABLE: [Phase; 5] = [
        Phase::NotPlaying,
        Phase::Playing,
        Phase::BeforePlay,
        Phase::AfterPlay,
        Phase::Paused,
    ];

    pub fn is_sentinel(self) -> bool {
        matches!(self, Phase::Uninitialized)
    }

    /// Index into per-phase listener tables; `None` for the sentinel.
    pub(crate) fn slot(self) -> Option<usize> {
        match self {
            Phase::Uninitialized => None,
            Phase::NotPlaying => Some(0),
            Phase::Playing => Some(1),
            Phase::BeforePlay => Some(2),
            Phase::AfterPlay => Some(3),
            Phase::Paused => Some(4),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Uninitialized => "Uninitialized",
            Phase::NotPlaying => "NotPlaying",
            Phase::Playing => "Playing",
            Phase::BeforePlay => "BeforePlay",
            Phase::AfterPlay => "AfterPlay",
            Phase::Paused => "Paused",
        };
        f.write_str(s)
    }
}
