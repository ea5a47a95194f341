//! One looping session: the interval, the bound engine, the section
//! collection and the track gestures, driven by a single event queue.
//!
//! Lifecycle is explicit: `create` builds an unbound session, `bind_engine`
//! attaches a playback engine (loading any video requested before it
//! existed) and `teardown` stops polling and hands the engine back.

use std::time::Duration;

use tracing::{debug, info};

use crate::drag::{DragController, DragOutcome, PointerEvent, TrackGeometry};
use crate::engine::{EngineErrorKind, EngineEvent, PlaybackEngine};
use crate::error::InputError;
use crate::interval::{Bounds, IntervalModel, MIN_GAP};
use crate::sections::{
    ExportDocument, ImportDocument, ImportError, ImportOutcome, Section, SectionPersistence,
    SectionStore, DEFAULT_MERGE_TOLERANCE,
};
use crate::sync::{
    PlaybackProjection, PlaybackSync, PlayerState, RateError, RateLadder, Ticker, POLL_INTERVAL,
};
use crate::video_id::{extract_video_id, fragment_for, video_id_from_fragment, VideoId};

/// Tunables a session is created with.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub poll_interval: Duration,
    pub min_gap: f64,
    pub default_rates: RateLadder,
    pub seek_step: f64,
    pub fine_seek_step: f64,
    pub merge_tolerance: f64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            min_gap: MIN_GAP,
            default_rates: RateLadder::default(),
            seek_step: 5.0,
            fine_seek_step: 1.0,
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
        }
    }
}

/// Keyboard-style transport commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Set A at the current playback position
    SetA,
    /// Set B at the current playback position
    SetB,
    ResetInterval,
    ToggleLoop,
    TogglePlay,
    SpeedStep(isize),
    SeekForward { fine: bool },
    SeekBackward { fine: bool },
    JumpToA,
    JumpToB,
}

/// Everything the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Engine(EngineEvent),
    Tick,
    Pointer(PointerEvent),
    Command(Command),
}

pub struct Session<E: PlaybackEngine> {
    options: SessionOptions,
    interval: IntervalModel,
    sync: PlaybackSync<E>,
    sections: SectionStore,
    drag: DragController,
    track: TrackGeometry,
    video_id: Option<VideoId>,
    pending_load: Option<VideoId>,
    fragment: Option<String>,
}

impl<E: PlaybackEngine> Session<E> {
    /// Create an unbound session.
    pub fn create(
        persistence: SectionPersistence,
        ticker: Box<dyn Ticker>,
        options: SessionOptions,
    ) -> Self {
        let sync = PlaybackSync::new(ticker, options.poll_interval)
            .with_default_rates(options.default_rates.clone());
        let sections = SectionStore::new(persistence).with_merge_tolerance(options.merge_tolerance);
        Self {
            interval: IntervalModel::with_min_gap(options.min_gap),
            sync,
            sections,
            drag: DragController::new(),
            track: TrackGeometry::new(0.0, 0.0),
            video_id: None,
            pending_load: None,
            fragment: None,
            options,
        }
    }

    /// Attach a playback engine, loading the video requested before one existed.
    ///
    /// # Returns
    /// The previously bound engine, if any
    pub fn bind_engine(&mut self, engine: E) -> Option<E> {
        let previous = self.sync.bind(engine);
        if let Some(id) = self.pending_load.take() {
            debug!(video_id = %id, "loading pending video");
            self.sync.load(&id);
        }
        previous
    }

    /// Stop polling and detach the engine.
    pub fn teardown(&mut self) -> Option<E> {
        self.drag = DragController::new();
        let engine = self.sync.unbind();
        info!(video_id = ?self.video_id.as_ref().map(VideoId::as_str), "session torn down");
        engine
    }

    // === Video loading ===

    /// Load the video named by free-form input (URL or bare id).
    pub fn load_video(&mut self, input: &str) -> Result<VideoId, InputError> {
        let id = extract_video_id(input)
            .ok_or_else(|| InputError::UnrecognizedVideo(input.trim().to_string()))?;
        self.sections.load(&id);
        self.switch_video(id.clone());
        Ok(id)
    }

    /// Load the video named by a location fragment, if it names one.
    pub fn load_from_fragment(&mut self, fragment: &str) -> Option<VideoId> {
        let id = video_id_from_fragment(fragment)?;
        self.load_video(id.as_str()).ok()
    }

    /// Point the session at `id` and ask the engine for it (or hold it).
    fn switch_video(&mut self, id: VideoId) {
        self.interval.reset(0.0);
        self.fragment = Some(fragment_for(&id));
        if !self.sync.load(&id) {
            debug!(video_id = %id, "no engine bound, load deferred");
            self.pending_load = Some(id.clone());
        }
        self.video_id = Some(id);
    }

    // === Events ===

    /// Apply one event.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Engine(e) => {
                self.sync.handle_event(e, &mut self.interval);
            }
            Event::Tick => {
                self.sync.tick(&mut self.interval);
            }
            Event::Pointer(p) => {
                let outcome = self.drag.handle(p, &self.track, &mut self.interval);
                if let DragOutcome::Seek(time) = outcome {
                    self.sync.seek(time);
                }
            }
            Event::Command(c) => self.run(c),
        }
    }

    fn run(&mut self, command: Command) {
        match command {
            Command::SetA => {
                self.set_a(None);
            }
            Command::SetB => {
                self.set_b(None);
            }
            Command::ResetInterval => self.interval.reset(self.sync.duration()),
            Command::ToggleLoop => {
                let enabled = self.interval.toggle_loop();
                debug!(enabled, "loop toggled");
            }
            Command::TogglePlay => self.sync.toggle_play_pause(),
            Command::SpeedStep(delta) => {
                self.sync.change_speed_step(delta);
            }
            Command::SeekForward { fine } => self.sync.seek_by(self.seek_step(fine)),
            Command::SeekBackward { fine } => self.sync.seek_by(-self.seek_step(fine)),
            Command::JumpToA => self.sync.seek(self.interval.point_a()),
            Command::JumpToB => self.sync.seek(self.interval.point_b()),
        }
    }

    fn seek_step(&self, fine: bool) -> f64 {
        if fine {
            self.options.fine_seek_step
        } else {
            self.options.seek_step
        }
    }

    // === Interval ===

    /// Set A at `time`, or at the engine's current position when `None`.
    ///
    /// # Returns
    /// Where A ended up, or `None` if no time was available
    pub fn set_a(&mut self, time: Option<f64>) -> Option<f64> {
        let time = time.or_else(|| self.sync.current_time())?;
        Some(self.interval.set_a(time))
    }

    /// Set B at `time`, or at the engine's current position when `None`.
    pub fn set_b(&mut self, time: Option<f64>) -> Option<f64> {
        let time = time.or_else(|| self.sync.current_time())?;
        Some(self.interval.set_b(time))
    }

    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.interval.set_loop_enabled(enabled);
    }

    pub fn set_speed(&mut self, rate: f64) -> Result<(), RateError> {
        self.sync.set_speed(rate)
    }

    /// Update the on-screen track placement used for pointer events.
    pub fn set_track(&mut self, track: TrackGeometry) {
        self.track = track;
    }

    // === Sections ===

    /// Save the current interval as a section.
    pub fn save_section(&mut self, name: Option<&str>) -> Result<Section, InputError> {
        if self.video_id.is_none() {
            return Err(InputError::NoVideoLoaded);
        }
        let bounds = self.interval.bounds();
        self.sections.add(name, bounds).cloned()
    }

    pub fn rename_section(&mut self, id: &str, name: &str) -> bool {
        self.sections.rename(id, name)
    }

    pub fn delete_section(&mut self, id: &str) -> Option<Section> {
        self.sections.remove(id)
    }

    pub fn move_section(&mut self, from: usize, to: usize) -> bool {
        self.sections.reorder(from, to)
    }

    /// Loop a saved section: apply its bounds, enable looping, seek to A and play.
    pub fn play_section(&mut self, id: &str) -> Result<Bounds, InputError> {
        let bounds = self
            .sections
            .activate(id)
            .ok_or_else(|| InputError::SectionNotFound(id.to_string()))?;
        let applied = self.interval.set_bounds(bounds);
        self.interval.set_loop_enabled(true);
        self.sync.seek(applied.start);
        self.sync.play();
        info!(id, start = applied.start, end = applied.end, "playing section");
        Ok(applied)
    }

    pub fn export_sections(&self) -> Option<ExportDocument> {
        self.sections.export()
    }

    /// Import a sections file.
    ///
    /// A file for another video replaces the collection and also loads that
    /// video, so player and sections never disagree.
    pub fn import_sections(&mut self, json: &str) -> Result<ImportOutcome, ImportError> {
        let doc = ImportDocument::parse(json)?;
        let outcome = self.sections.import(doc);
        if let ImportOutcome::Replaced {
            switched_to: Some(id),
            ..
        } = &outcome
        {
            self.switch_video(id.clone());
        }
        Ok(outcome)
    }

    // === Queries ===

    pub fn interval(&self) -> &IntervalModel {
        &self.interval
    }

    pub fn sync(&self) -> &PlaybackSync<E> {
        &self.sync
    }

    pub fn sync_mut(&mut self) -> &mut PlaybackSync<E> {
        &mut self.sync
    }

    pub fn engine(&self) -> Option<&E> {
        self.sync.engine()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.sync.engine_mut()
    }

    pub fn sections(&self) -> &SectionStore {
        &self.sections
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    pub fn pending_load(&self) -> Option<&VideoId> {
        self.pending_load.as_ref()
    }

    /// Location fragment reflecting the loaded video (`#<id>`).
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn projection(&self) -> PlaybackProjection {
        self.sync.projection()
    }

    pub fn player_state(&self) -> PlayerState {
        self.sync.state()
    }

    pub fn last_error(&self) -> Option<EngineErrorKind> {
        self.sync.last_error()
    }

    pub fn durability_warning(&self) -> Option<&str> {
        self.sections.durability_warning()
    }
}
