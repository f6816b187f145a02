//! Debug module: feature gated on-screen phase overlay.
//! Built only when compiled with `--features debug`.

#[cfg(feature = "debug")]
mod overlay;

#[cfg(feature = "debug")]
pub use overlay::{PhaseOverlayPlugin, PhaseOverlayText};
