//! End-to-end loop behavior through a session.

use abloop::engine::{EngineErrorKind, EngineEvent, EngineState, PlaybackEngine, ScriptedEngine};
use abloop::sync::PlayerState;
use abloop::{Bounds, Command, Event};

use crate::helpers::{ready_session, session, tick_at, VIDEO};

// ============================================================================
// Walkthrough
// ============================================================================

#[test]
fn set_points_then_loop_seeks_back_once() {
    let mut s = ready_session(ScriptedEngine::with_duration(212.0));
    assert_eq!(s.video_id().unwrap().as_str(), VIDEO);
    assert_eq!(s.interval().bounds(), Bounds::new(0.0, 212.0));

    s.engine_mut().unwrap().set_time(30.0);
    s.handle(Event::Command(Command::SetA));
    assert_eq!(s.interval().bounds(), Bounds::new(30.0, 212.0));

    s.engine_mut().unwrap().set_time(45.0);
    s.handle(Event::Command(Command::SetB));
    assert_eq!(s.interval().bounds(), Bounds::new(30.0, 45.0));

    s.handle(Event::Command(Command::ToggleLoop));
    s.engine_mut().unwrap().clear_calls();
    tick_at(&mut s, 44.9);
    tick_at(&mut s, 45.0);

    assert_eq!(s.engine().unwrap().seeks(), vec![30.0]);
}

#[test]
fn boundary_ticks_issue_exactly_one_seek() {
    let mut s = ready_session(ScriptedEngine::with_duration(60.0));
    s.set_a(Some(10.0));
    s.set_b(Some(20.0));
    s.set_loop_enabled(true);

    // The engine has not applied the seek yet when the later samples arrive
    tick_at(&mut s, 19.9);
    assert!(s.engine().unwrap().seeks().is_empty());
    tick_at(&mut s, 20.0);
    tick_at(&mut s, 20.1);

    assert_eq!(s.engine().unwrap().seeks(), vec![10.0]);
    assert_eq!(s.sync().loop_seeks(), 1);
}

#[test]
fn loop_disabled_plays_through() {
    let mut s = ready_session(ScriptedEngine::with_duration(60.0));
    s.set_a(Some(10.0));
    s.set_b(Some(20.0));
    for t in [19.0, 20.0, 25.0] {
        tick_at(&mut s, t);
    }
    assert!(s.engine().unwrap().seeks().is_empty());
    assert_eq!(s.projection().current_time, 25.0);
}

#[test]
fn playing_through_repeated_passes_loops_each_time() {
    let mut s = ready_session(ScriptedEngine::with_duration(60.0));
    s.set_a(Some(1.0));
    s.set_b(Some(2.0));
    s.set_loop_enabled(true);
    s.sync_mut().play();
    s.handle(Event::Engine(EngineEvent::StateChanged(EngineState::Playing)));

    // 10 Hz ticks for six seconds of playback
    for _ in 0..60 {
        let engine = s.engine_mut().unwrap();
        engine.advance(0.1);
        s.handle(Event::Tick);
    }
    let seeks = s.engine().unwrap().seeks();
    assert!(seeks.len() >= 4, "seeks: {:?}", seeks);
    assert!(seeks.iter().all(|t| *t == 1.0));
    let now = s.sync().current_time().unwrap();
    assert!((1.0..=2.1).contains(&now), "now: {}", now);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn ended_with_loop_restarts_at_a() {
    let mut s = ready_session(ScriptedEngine::with_duration(30.0));
    s.set_a(Some(25.0));
    s.set_loop_enabled(true);
    s.sync_mut().play();
    s.engine_mut().unwrap().set_time(29.9);
    let ended = s.engine_mut().unwrap().advance(1.0).unwrap();
    s.handle(Event::Engine(ended));

    assert_eq!(s.engine().unwrap().seeks(), vec![25.0]);
    assert_eq!(s.engine().unwrap().state(), Some(EngineState::Playing));
}

#[test]
fn late_duration_resets_interval_on_tick() {
    let mut s = ready_session(ScriptedEngine::new());
    assert_eq!(s.interval().bounds(), Bounds::new(0.0, 0.0));
    assert!(s.sync().is_polling());

    s.engine_mut().unwrap().set_duration(Some(90.0));
    tick_at(&mut s, 0.5);
    assert_eq!(s.interval().bounds(), Bounds::new(0.0, 90.0));
    assert_eq!(s.projection().duration, 90.0);
}

#[test]
fn late_duration_resets_interval_on_playing() {
    let mut s = ready_session(ScriptedEngine::new());
    s.engine_mut().unwrap().set_duration(Some(42.0));
    s.handle(Event::Engine(EngineEvent::StateChanged(EngineState::Playing)));
    assert_eq!(s.interval().bounds(), Bounds::new(0.0, 42.0));
}

#[test]
fn engine_error_is_categorized() {
    let mut s = ready_session(ScriptedEngine::with_duration(60.0));
    s.handle(Event::Engine(EngineEvent::Error(150)));
    assert_eq!(s.last_error(), Some(EngineErrorKind::OwnerRestricted));
    assert_eq!(
        s.player_state(),
        PlayerState::Failed(EngineErrorKind::OwnerRestricted)
    );
}

#[test]
fn no_engine_means_no_polling() {
    let mut s = session();
    s.load_video(VIDEO).unwrap();
    s.handle(Event::Engine(EngineEvent::Ready));
    s.handle(Event::Tick);
    assert!(!s.sync().is_polling());
    assert_eq!(s.pending_load().unwrap().as_str(), VIDEO);
}

#[test]
fn toggle_play_follows_engine_state() {
    let mut s = ready_session(ScriptedEngine::with_duration(60.0));
    s.handle(Event::Command(Command::TogglePlay));
    assert_eq!(s.engine().unwrap().state(), Some(EngineState::Playing));
    s.handle(Event::Command(Command::TogglePlay));
    assert_eq!(s.engine().unwrap().state(), Some(EngineState::Paused));
}
