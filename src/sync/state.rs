//! Playback sync state types.
//!
//! Contains the lifecycle state tracked for the bound engine, the polling
//! flag, and the per-tick projection the UI draws from.

use crate::engine::{EngineErrorKind, EngineState};
use crate::time::format_time;

/// Engine lifecycle as seen by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Unstarted,
    Ready,
    Playing,
    Paused,
    Buffering,
    Ended,
    Cued,
    /// The engine reported an error; nothing is retried
    Failed(EngineErrorKind),
}

impl From<EngineState> for PlayerState {
    fn from(state: EngineState) -> Self {
        match state {
            EngineState::Unstarted => Self::Unstarted,
            EngineState::Playing => Self::Playing,
            EngineState::Paused => Self::Paused,
            EngineState::Buffering => Self::Buffering,
            EngineState::Ended => Self::Ended,
            EngineState::Cued => Self::Cued,
        }
    }
}

/// Whether the poll timer is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
}

/// Snapshot taken on every poll tick. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackProjection {
    /// Engine-reported position in seconds
    pub current_time: f64,
    /// Engine-reported duration in seconds (0 while unknown)
    pub duration: f64,
    pub is_playing: bool,
}

impl PlaybackProjection {
    /// Playhead position in percent of the track, `None` while duration is unknown.
    pub fn playhead_percent(&self) -> Option<f64> {
        if self.duration > 0.0 {
            Some((self.current_time / self.duration) * 100.0)
        } else {
            None
        }
    }

    /// Transport text, e.g. `0:42 / 3:32`.
    pub fn time_display(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.current_time),
            format_time(self.duration)
        )
    }
}
