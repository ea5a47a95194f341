//! Playback synchronization.
//!
//! `PlaybackSync` keeps the A-B interval consistent with an external engine
//! that plays, seeks and reports time on its own schedule:
//!
//! - `state`: lifecycle, polling flag and the per-tick projection
//! - `rates`: the playback rate ladder and speed stepping
//! - `ticker`: pluggable poll timers
//!
//! # Transitions
//!
//! | Signal    | Effect                                                        |
//! |-----------|---------------------------------------------------------------|
//! | ready     | capture duration, adopt rates, reset interval, start polling  |
//! | playing   | start polling; re-read duration and reset if still unknown    |
//! | paused    | flag only, polling continues                                  |
//! | ended     | if looping: seek to A and play                                |
//! | error     | map code to a category, no retry                              |
//! | tick      | sample time, detect duration arrival, enforce the loop        |

pub mod rates;
pub mod state;
pub mod ticker;

pub use rates::{RateError, RateLadder, DEFAULT_RATES};
pub use state::{PlaybackProjection, PlayerState, PollState};
pub use ticker::{ManualTicker, ThreadTicker, Ticker};

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::engine::{EngineErrorKind, EngineEvent, EngineState, PlaybackEngine};
use crate::interval::IntervalModel;
use crate::video_id::VideoId;

/// Default poll period.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Ticks to wait for a loop seek to show up in the reported time before
/// issuing another one.
const LOOP_SEEK_GRACE_TICKS: u32 = 5;

/// Sync engine between the interval model and one bound playback engine.
pub struct PlaybackSync<E: PlaybackEngine> {
    engine: Option<E>,
    ticker: Box<dyn Ticker>,
    poll: PollState,
    period: Duration,
    state: PlayerState,
    projection: PlaybackProjection,
    default_ladder: RateLadder,
    ladder: RateLadder,
    current_rate: f64,
    last_error: Option<EngineErrorKind>,
    /// Ticks left before an unconfirmed loop seek may be repeated
    pending_loop_seek: Option<u32>,
    loop_seeks: u64,
}

impl<E: PlaybackEngine> PlaybackSync<E> {
    /// Create an unbound sync engine polling through `ticker` every `period`.
    pub fn new(ticker: Box<dyn Ticker>, period: Duration) -> Self {
        Self {
            engine: None,
            ticker,
            poll: PollState::Idle,
            period,
            state: PlayerState::Unstarted,
            projection: PlaybackProjection::default(),
            default_ladder: RateLadder::default(),
            ladder: RateLadder::default(),
            current_rate: 1.0,
            last_error: None,
            pending_loop_seek: None,
            loop_seeks: 0,
        }
    }

    /// Replace the built-in rate ladder used when the engine reports none.
    pub fn with_default_rates(mut self, ladder: RateLadder) -> Self {
        self.default_ladder = ladder.clone();
        self.ladder = ladder;
        self
    }

    // === Engine binding ===

    /// Bind an engine, returning the previously bound one.
    pub fn bind(&mut self, engine: E) -> Option<E> {
        let previous = self.engine.replace(engine);
        self.state = PlayerState::Unstarted;
        self.projection = PlaybackProjection::default();
        self.pending_loop_seek = None;
        self.last_error = None;
        previous
    }

    /// Detach the engine. Polling stops since there is nothing to sample.
    pub fn unbind(&mut self) -> Option<E> {
        self.stop_polling();
        self.state = PlayerState::Unstarted;
        self.engine.take()
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    pub fn is_bound(&self) -> bool {
        self.engine.is_some()
    }

    /// Ask the engine to load a new video and forget the old duration.
    ///
    /// # Returns
    /// `true` if an engine was bound to receive the load
    pub fn load(&mut self, id: &VideoId) -> bool {
        self.projection = PlaybackProjection::default();
        self.pending_loop_seek = None;
        self.last_error = None;
        match self.engine.as_mut() {
            Some(engine) => {
                engine.load_content(id);
                self.state = PlayerState::Unstarted;
                info!(video_id = %id, "loading video");
                true
            }
            None => false,
        }
    }

    // === Polling ===

    /// Start the poll timer. No-op while already polling or unbound.
    pub fn start_polling(&mut self) {
        if self.poll == PollState::Polling || self.engine.is_none() {
            return;
        }
        self.ticker.start(self.period);
        self.poll = PollState::Polling;
        debug!(period_ms = self.period.as_millis() as u64, "polling started");
    }

    /// Stop the poll timer. No-op while idle.
    pub fn stop_polling(&mut self) {
        if self.poll == PollState::Idle {
            return;
        }
        self.ticker.stop();
        self.poll = PollState::Idle;
        debug!("polling stopped");
    }

    pub fn is_polling(&self) -> bool {
        self.poll == PollState::Polling
    }

    pub fn poll_state(&self) -> PollState {
        self.poll
    }

    // === Lifecycle ===

    /// Dispatch one engine lifecycle signal.
    ///
    /// # Returns
    /// The error category when the signal was an engine error
    pub fn handle_event(
        &mut self,
        event: EngineEvent,
        interval: &mut IntervalModel,
    ) -> Option<EngineErrorKind> {
        match event {
            EngineEvent::Ready => {
                self.on_ready(interval);
                None
            }
            EngineEvent::StateChanged(state) => {
                self.on_state_change(state, interval);
                None
            }
            EngineEvent::Error(code) => Some(self.on_error(code)),
        }
    }

    /// Engine is ready: adopt its duration and rates, reset the loop, start polling.
    pub fn on_ready(&mut self, interval: &mut IntervalModel) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let duration = engine.duration().filter(|d| d.is_finite() && *d > 0.0);
        self.ladder = engine
            .available_playback_rates()
            .and_then(RateLadder::new)
            .unwrap_or_else(|| self.default_ladder.clone());
        if !self.ladder.contains(self.current_rate) {
            self.current_rate = self.ladder.rates()[self.ladder.neutral_index()];
        }
        if self.current_rate != 1.0 {
            if let Some(engine) = self.engine.as_mut() {
                engine.set_playback_rate(self.current_rate);
            }
        }

        self.projection.duration = duration.unwrap_or(0.0);
        interval.reset(self.projection.duration);
        self.state = PlayerState::Ready;
        info!(
            duration = self.projection.duration,
            rates = self.ladder.rates().len(),
            "engine ready"
        );
        self.start_polling();
    }

    /// Apply an engine state change.
    pub fn on_state_change(&mut self, state: EngineState, interval: &mut IntervalModel) {
        debug!(?state, "engine state changed");
        self.state = state.into();
        match state {
            EngineState::Playing => {
                self.projection.is_playing = true;
                self.start_polling();
                if self.projection.duration <= 0.0 {
                    self.refresh_duration(interval);
                }
            }
            EngineState::Paused => {
                self.projection.is_playing = false;
            }
            EngineState::Ended => {
                self.projection.is_playing = false;
                if interval.loop_enabled() {
                    if let Some(engine) = self.engine.as_mut() {
                        engine.seek_to(interval.point_a(), true);
                        engine.play();
                        self.loop_seeks += 1;
                        debug!(to = interval.point_a(), "loop restart after end");
                    }
                }
            }
            EngineState::Unstarted | EngineState::Buffering | EngineState::Cued => {}
        }
    }

    /// Record an engine error.
    pub fn on_error(&mut self, code: i32) -> EngineErrorKind {
        let kind = EngineErrorKind::from_code(code);
        warn!(code, error = %kind, "engine error");
        self.state = PlayerState::Failed(kind);
        self.last_error = Some(kind);
        kind
    }

    /// Re-read the engine duration; reset the interval if it just became known.
    ///
    /// # Returns
    /// `true` if the duration arrived on this call
    fn refresh_duration(&mut self, interval: &mut IntervalModel) -> bool {
        let reported = self
            .engine
            .as_ref()
            .and_then(|e| e.duration())
            .filter(|d| d.is_finite() && *d > 0.0);
        match reported {
            Some(duration) if self.projection.duration <= 0.0 => {
                self.projection.duration = duration;
                interval.reset(duration);
                info!(duration, "duration arrived");
                true
            }
            _ => false,
        }
    }

    /// One poll tick: sample time, detect duration arrival, enforce the loop.
    ///
    /// # Returns
    /// The fresh projection, or `None` when not polling or the engine
    /// cannot report time
    pub fn tick(&mut self, interval: &mut IntervalModel) -> Option<PlaybackProjection> {
        if self.poll != PollState::Polling {
            return None;
        }
        let current_time = self.engine.as_ref()?.current_time()?;
        if self.projection.duration <= 0.0 {
            self.refresh_duration(interval);
        }
        self.projection.current_time = current_time;

        if interval.should_loop(current_time) {
            match self.pending_loop_seek {
                Some(ticks) if ticks > 0 => {
                    // Seek already in flight; the engine has not caught up yet
                    self.pending_loop_seek = Some(ticks - 1);
                }
                _ => {
                    let target = interval.point_a();
                    if let Some(engine) = self.engine.as_mut() {
                        engine.seek_to(target, true);
                    }
                    self.pending_loop_seek = Some(LOOP_SEEK_GRACE_TICKS);
                    self.loop_seeks += 1;
                    debug!(at = current_time, to = target, "loop seek");
                }
            }
        } else {
            self.pending_loop_seek = None;
        }

        Some(self.projection)
    }

    // === Transport ===

    pub fn play(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.pause();
        }
    }

    /// Pause if the engine reports playing, play otherwise.
    pub fn toggle_play_pause(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match engine.state() {
            Some(EngineState::Playing) => engine.pause(),
            Some(_) => engine.play(),
            None => {}
        }
    }

    /// Seek to an absolute position.
    pub fn seek(&mut self, time: f64) {
        if !time.is_finite() {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.seek_to(time.max(0.0), true);
        }
    }

    /// Seek relative to the engine-reported position, clamped to the video.
    pub fn seek_by(&mut self, delta: f64) {
        let Some(current) = self.current_time() else {
            return;
        };
        let mut target = (current + delta).max(0.0);
        if self.projection.duration > 0.0 {
            target = target.min(self.projection.duration);
        }
        self.seek(target);
    }

    /// Set an exact rate, which must be on the ladder.
    ///
    /// With no engine bound the rate is kept and applied on the next `ready`.
    pub fn set_speed(&mut self, rate: f64) -> Result<(), RateError> {
        let rate = self.ladder.validate(rate)?;
        self.current_rate = rate;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_playback_rate(rate);
        }
        debug!(rate, bound = self.engine.is_some(), "playback rate set");
        Ok(())
    }

    /// Move `delta` entries along the ladder, clamped at both ends.
    ///
    /// # Returns
    /// The rate now in effect
    pub fn change_speed_step(&mut self, delta: isize) -> f64 {
        let next = self.ladder.step(self.current_rate, delta);
        // `next` always comes from the ladder
        let _ = self.set_speed(next);
        self.current_rate
    }

    // === Queries ===

    /// Engine-reported position, if the engine can tell.
    pub fn current_time(&self) -> Option<f64> {
        self.engine.as_ref().and_then(|e| e.current_time())
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn projection(&self) -> PlaybackProjection {
        self.projection
    }

    pub fn duration(&self) -> f64 {
        self.projection.duration
    }

    pub fn ladder(&self) -> &RateLadder {
        &self.ladder
    }

    pub fn current_rate(&self) -> f64 {
        self.current_rate
    }

    pub fn last_error(&self) -> Option<EngineErrorKind> {
        self.last_error
    }

    /// Loop seeks issued so far (tick and end-of-video restarts).
    pub fn loop_seeks(&self) -> u64 {
        self.loop_seeks
    }
}
