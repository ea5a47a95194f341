//! External playback engine seam.
//!
//! The embedded player is an outside collaborator: it plays, seeks and
//! reports time asynchronously. The core talks to it only through the
//! `PlaybackEngine` trait and learns about it only through `EngineEvent`s.
//!
//! Every capability has a default that does nothing (actions) or reports
//! nothing (queries), so an engine missing a method degrades to a no-op
//! instead of failing.

mod error;
pub mod scripted;

pub use error::EngineErrorKind;
pub use scripted::ScriptedEngine;

use crate::video_id::VideoId;

/// Player states reported through state-change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unstarted,
    Playing,
    Paused,
    Buffering,
    Ended,
    /// Content loaded and waiting to be played
    Cued,
}

/// Lifecycle signal from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine finished initializing and can report duration
    Ready,
    StateChanged(EngineState),
    /// Raw error code as reported by the engine
    Error(i32),
}

/// Operations the core may invoke on the external player.
pub trait PlaybackEngine {
    /// Start loading (and playing) the given content.
    fn load_content(&mut self, _id: &VideoId) {}

    fn play(&mut self) {}

    fn pause(&mut self) {}

    /// Seek to `time` seconds; `allow_seek_ahead` lets the engine fetch unbuffered data.
    fn seek_to(&mut self, _time: f64, _allow_seek_ahead: bool) {}

    fn current_time(&self) -> Option<f64> {
        None
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn state(&self) -> Option<EngineState> {
        None
    }

    fn set_playback_rate(&mut self, _rate: f64) {}

    /// Supported rates in ascending order, if the engine can enumerate them.
    fn available_playback_rates(&self) -> Option<Vec<f64>> {
        None
    }
}
