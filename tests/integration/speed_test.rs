//! Playback rate stepping through a session.

use abloop::engine::{EngineEvent, ScriptedEngine};
use abloop::sync::{RateError, DEFAULT_RATES};
use abloop::{Command, Event};

use crate::helpers::ready_session;

fn short_ladder() -> ScriptedEngine {
    ScriptedEngine::with_duration(60.0).rates(vec![0.25, 0.5, 1.0, 2.0])
}

#[test]
fn step_up_clamps_at_top() {
    let mut s = ready_session(short_ladder());
    s.handle(Event::Command(Command::SpeedStep(1)));
    assert_eq!(s.engine().unwrap().rate(), 2.0);
    s.handle(Event::Command(Command::SpeedStep(1)));
    assert_eq!(s.engine().unwrap().rate(), 2.0);
    assert_eq!(s.sync().current_rate(), 2.0);
}

#[test]
fn step_down_walks_the_ladder() {
    let mut s = ready_session(short_ladder());
    for expected in [0.5, 0.25, 0.25] {
        s.handle(Event::Command(Command::SpeedStep(-1)));
        assert_eq!(s.sync().current_rate(), expected);
    }
}

#[test]
fn rate_missing_from_new_ladder_falls_back_to_neutral() {
    let mut s = ready_session(ScriptedEngine::with_duration(60.0));
    assert_eq!(s.sync().ladder().rates(), &DEFAULT_RATES);
    s.set_speed(1.5).unwrap();

    // Rebind an engine whose ladder has no 1.5x entry
    s.bind_engine(short_ladder());
    s.handle(Event::Engine(EngineEvent::Ready));
    assert_eq!(s.sync().current_rate(), 1.0);
    s.handle(Event::Command(Command::SpeedStep(1)));
    assert_eq!(s.sync().current_rate(), 2.0);
}

#[test]
fn off_ladder_rate_is_rejected() {
    let mut s = ready_session(short_ladder());
    let err = s.set_speed(1.25).unwrap_err();
    assert!(matches!(err, RateError::Unsupported { .. }));
    assert_eq!(
        err.to_string(),
        "Playback rate 1.25x is not supported (available: 0.25x, 0.5x, 1x, 2x)"
    );
    assert_eq!(s.sync().current_rate(), 1.0);
}
