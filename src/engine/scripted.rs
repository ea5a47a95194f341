//! Scripted in-process engine.
//!
//! Stands in for the embedded player in tests and in the `simulate` command:
//! time only moves when the caller says so, and every call the core makes is
//! recorded for inspection.

use tracing::trace;

use super::{EngineEvent, EngineState, PlaybackEngine};
use crate::video_id::VideoId;

/// A call the core made on the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(VideoId),
    Play,
    Pause,
    Seek { time: f64, allow_seek_ahead: bool },
    SetRate(f64),
}

/// Deterministic engine whose clock is advanced explicitly.
#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    time: f64,
    duration: Option<f64>,
    state: EngineState,
    rate: f64,
    rates: Option<Vec<f64>>,
    loaded: Option<VideoId>,
    calls: Vec<EngineCall>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    /// Engine with unknown duration and no rate list.
    pub fn new() -> Self {
        Self {
            time: 0.0,
            duration: None,
            state: EngineState::Unstarted,
            rate: 1.0,
            rates: None,
            loaded: None,
            calls: Vec::new(),
        }
    }

    /// Engine that reports `duration` seconds.
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::new()
        }
    }

    /// Builder: report `rates` as the supported playback rates.
    pub fn rates(mut self, rates: Vec<f64>) -> Self {
        self.rates = Some(rates);
        self
    }

    /// Jump the reported position without recording a call.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration;
    }

    pub fn loaded(&self) -> Option<&VideoId> {
        self.loaded.as_ref()
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Targets of every seek so far, in order.
    pub fn seeks(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Seek { time, .. } => Some(*time),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Advance the clock by `dt` wall seconds at the current rate.
    ///
    /// Only moves while playing. Reaching the end stops at the duration and
    /// returns the `Ended` transition the real player would emit.
    pub fn advance(&mut self, dt: f64) -> Option<EngineEvent> {
        if self.state != EngineState::Playing {
            return None;
        }
        self.time += dt * self.rate;
        match self.duration {
            Some(duration) if duration > 0.0 && self.time >= duration => {
                self.time = duration;
                self.state = EngineState::Ended;
                Some(EngineEvent::StateChanged(EngineState::Ended))
            }
            _ => None,
        }
    }
}

impl PlaybackEngine for ScriptedEngine {
    fn load_content(&mut self, id: &VideoId) {
        trace!(video_id = %id, "scripted load");
        self.loaded = Some(id.clone());
        self.time = 0.0;
        self.state = EngineState::Unstarted;
        self.calls.push(EngineCall::Load(id.clone()));
    }

    fn play(&mut self) {
        self.state = EngineState::Playing;
        self.calls.push(EngineCall::Play);
    }

    fn pause(&mut self) {
        self.state = EngineState::Paused;
        self.calls.push(EngineCall::Pause);
    }

    fn seek_to(&mut self, time: f64, allow_seek_ahead: bool) {
        let upper = self.duration.filter(|d| *d > 0.0).unwrap_or(f64::MAX);
        self.time = time.clamp(0.0, upper);
        if self.state == EngineState::Ended {
            self.state = EngineState::Paused;
        }
        self.calls.push(EngineCall::Seek {
            time,
            allow_seek_ahead,
        });
    }

    fn current_time(&self) -> Option<f64> {
        Some(self.time)
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn state(&self) -> Option<EngineState> {
        Some(self.state)
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
        self.calls.push(EngineCall::SetRate(rate));
    }

    fn available_playback_rates(&self) -> Option<Vec<f64>> {
        self.rates.clone()
    }
}
