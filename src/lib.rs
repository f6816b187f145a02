pub mod app;
pub mod core;
pub mod debug;
pub mod monitor;

// Curated re-exports
pub use crate::app::game::AppPhasePlugin;
pub use crate::app::lifecycle::{LifecycleScript, LifecycleScriptPlugin};
pub use crate::core::config::{AppConfig, MonitorConfig, ScriptConfig, ScriptStep, WindowConfig};
pub use crate::monitor::{PhaseMonitor, PhaseMonitorPlugin};
