use bevy::prelude::*;
use phase_core::*;

// Every test in this binary shares the process-wide tracker.

#[test]
fn initialize_is_idempotent() {
    let a = global::initialize();
    let b = global::initialize_with(TrackerConfig { journal_capacity: 1, ..Default::default() });
    assert!(a.same_tracker(&b));
    assert!(global::is_initialized());
    assert!(global::instance().same_tracker(&a));
    assert!(global::try_instance().is_some_and(|t| t.same_tracker(&a)));
}

#[test]
fn global_plugin_binds_the_process_tracker() {
    let tracker = global::initialize();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(PhaseCorePlugin::default());
    assert!(app.world().resource::<SharedPhaseTracker>().same_tracker(&tracker));
}
