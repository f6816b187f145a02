pub mod config;

pub use config::{AppConfig, MonitorConfig, ScriptConfig, ScriptStep, WindowConfig};
