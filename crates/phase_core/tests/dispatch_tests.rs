use phase_core::*;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(log: &Log, tag: impl Into<String>) {
    log.lock().unwrap().push(tag.into());
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn tracker() -> SharedPhaseTracker {
    SharedPhaseTracker::new(TrackerConfig { log_transitions: false, ..Default::default() })
}

#[test]
fn repeat_transition_is_noop() {
    let t = tracker();
    let log = new_log();
    let l = log.clone();
    t.add_listener(move |p| push(&l, format!("g:{p}")), Delivery::Persistent);
    assert!(t.set_phase(Phase::Playing).is_some());
    assert!(t.set_phase(Phase::Playing).is_none());
    assert_eq!(t.phase(), Phase::Playing);
    assert_eq!(entries(&log), vec!["g:Playing"]);
}

#[test]
fn sentinel_is_never_observed_again() {
    let t = tracker();
    let log = new_log();
    let l = log.clone();
    t.add_listener(move |p| push(&l, p.to_string()), Delivery::Persistent);
    assert!(t.set_phase(Phase::Uninitialized).is_none());
    assert_eq!(t.phase(), Phase::Uninitialized);
    for p in Phase::OBSERVABLE {
        t.set_phase(p);
        assert!(t.set_phase(Phase::Uninitialized).is_none());
        assert_eq!(t.phase(), p);
    }
    assert_eq!(entries(&log).len(), Phase::OBSERVABLE.len());
}

#[test]
fn listeners_fire_in_subscription_order() {
    let t = tracker();
    let log = new_log();
    for tag in ["L1", "L2", "L3"] {
        let l = log.clone();
        t.add_listener(move |_| push(&l, tag), Delivery::Persistent);
    }
    for tag in ["P1", "P2", "P3"] {
        let l = log.clone();
        t.add_phase_listener(Phase::BeforePlay, move || push(&l, tag), Delivery::Persistent);
    }
    t.set_phase(Phase::BeforePlay);
    assert_eq!(entries(&log), vec!["L1", "L2", "L3", "P1", "P2", "P3"]);
}

#[test]
fn one_shot_global_fires_exactly_once() {
    let t = tracker();
    let log = new_log();
    let l = log.clone();
    t.add_listener(move |p| push(&l, p.to_string()), Delivery::OneShot);
    t.set_phase(Phase::NotPlaying);
    t.set_phase(Phase::Playing);
    t.set_phase(Phase::Paused);
    assert_eq!(entries(&log), vec!["NotPlaying"]);
}

#[test]
fn per_phase_listener_is_isolated_to_its_target() {
    let t = tracker();
    let log = new_log();
    let l = log.clone();
    t.add_phase_listener(Phase::Playing, move || push(&l, "playing"), Delivery::Persistent);
    for p in [Phase::Paused, Phase::BeforePlay, Phase::AfterPlay, Phase::NotPlaying] {
        t.set_phase(p);
    }
    assert!(entries(&log).is_empty());
    t.set_phase(Phase::Playing);
    assert_eq!(entries(&log), vec!["playing"]);
}

#[test]
fn removed_listener_is_not_invoked() {
    let t = tracker();
    let log = new_log();
    let (a, b) = (log.clone(), log.clone());
    let keep = t.add_listener(move |_| push(&a, "keep"), Delivery::Persistent);
    let gone = t.add_listener(move |_| push(&b, "gone"), Delivery::Persistent);
    let c = log.clone();
    let arrival = t.add_phase_listener(Phase::Paused, move || push(&c, "arrival"), Delivery::Persistent).unwrap();
    assert!(t.remove_listener(gone));
    assert!(t.remove_phase_listener(Phase::Paused, arrival));
    assert!(!t.remove_listener(gone));
    t.set_phase(Phase::Paused);
    assert_eq!(entries(&log), vec!["keep"]);
    assert!(t.remove_listener(keep));
}

#[test]
fn duplicate_registrations_are_both_invoked() {
    let t = tracker();
    let log = new_log();
    let l = log.clone();
    let cb: Arc<PhaseCallback> = Arc::new(move |_| push(&l, "dup"));
    let first = t.add_listener_arc(cb.clone(), Delivery::Persistent);
    let second = t.add_listener_arc(cb, Delivery::Persistent);
    assert_ne!(first, second);
    t.set_phase(Phase::NotPlaying);
    assert_eq!(entries(&log).len(), 2);
    t.remove_listener(first);
    t.set_phase(Phase::Playing);
    assert_eq!(entries(&log).len(), 3);
}

#[test]
fn end_to_end_lifecycle() {
    let t = tracker();
    let log = new_log();
    let g = log.clone();
    t.add_listener(move |p| push(&g, format!("global:{p}")), Delivery::Persistent);
    let np = log.clone();
    t.add_phase_listener(Phase::NotPlaying, move || push(&np, "not_playing"), Delivery::Persistent);
    let pl = log.clone();
    t.add_phase_listener(Phase::Playing, move || push(&pl, "playing"), Delivery::Persistent);

    assert_eq!(t.phase(), Phase::Uninitialized);
    t.set_phase(Phase::NotPlaying);
    assert_eq!(t.phase(), Phase::NotPlaying);
    assert_eq!(entries(&log), vec!["global:NotPlaying", "not_playing"]);

    log.lock().unwrap().clear();
    t.set_phase(Phase::Playing);
    assert_eq!(entries(&log), vec!["global:Playing", "playing"]);

    log.lock().unwrap().clear();
    assert!(t.set_phase(Phase::Playing).is_none());
    assert!(entries(&log).is_empty());
    assert_eq!(t.phase(), Phase::Playing);

    let journal = t.journal();
    assert_eq!(journal.len(), 2);
    assert_eq!((journal[0].from, journal[0].to), (Phase::Uninitialized, Phase::NotPlaying));
    assert_eq!((journal[1].from, journal[1].to), (Phase::NotPlaying, Phase::Playing));
}

#[test]
fn journal_capacity_bounds_history() {
    let t = tracker();
    t.set_journal_capacity(3);
    for p in [Phase::NotPlaying, Phase::BeforePlay, Phase::Playing, Phase::Paused, Phase::Playing] {
        t.set_phase(p);
    }
    let seqs: Vec<_> = t.journal().iter().map(|r| r.sequence).collect();
    assert_eq!(seqs, vec![3, 4, 5]);
    assert_eq!(t.transitions(), 5);
}
