//! Pointer handling for the loop track.
//!
//! Pressing a handle starts a drag that moves that loop point live on every
//! pointer move. Pressing the bare track while idle asks for a seek instead.

use tracing::debug;

use crate::interval::IntervalModel;

/// Pixels either side of a handle that still grab it.
pub const HANDLE_SLOP: f64 = 8.0;

/// One of the two loop handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Handle),
}

/// On-screen placement of the track, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    pub left: f64,
    pub width: f64,
}

impl TrackGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Pointer x as a percentage of the track, clamped to 0..=100.
    pub fn percent_at(&self, x: f64) -> f64 {
        if self.width <= 0.0 || !x.is_finite() {
            return 0.0;
        }
        ((x - self.left) / self.width * 100.0).clamp(0.0, 100.0)
    }

    /// Pixel x of a track percentage.
    pub fn x_at(&self, pct: f64) -> f64 {
        self.left + self.width * pct / 100.0
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Handle(Handle),
    Track,
}

/// A pointer or touch gesture event in track coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, target: PointerTarget },
    /// A press whose target is found by `hit_test` with `HANDLE_SLOP`
    Press { x: f64 },
    Move { x: f64 },
    Up { x: f64 },
}

/// What the controller did with an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Ignored,
    Started(Handle),
    /// A loop point moved to `time` (after clamping)
    Moved { handle: Handle, time: f64 },
    Ended(Handle),
    /// Track clicked outside a handle: seek the player here
    Seek(f64),
}

/// Gesture state machine for the two loop handles.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        track: &TrackGeometry,
        interval: &mut IntervalModel,
    ) -> DragOutcome {
        match (self.state, event) {
            (DragState::Idle, PointerEvent::Press { x }) => {
                let target = hit_test(x, track, interval, HANDLE_SLOP);
                self.handle(PointerEvent::Down { x, target }, track, interval)
            }
            (DragState::Idle, PointerEvent::Down { target: PointerTarget::Handle(h), .. }) => {
                self.state = DragState::Dragging(h);
                debug!(handle = ?h, "drag started");
                DragOutcome::Started(h)
            }
            (DragState::Idle, PointerEvent::Down { x, target: PointerTarget::Track }) => {
                if !interval.has_duration() {
                    return DragOutcome::Ignored;
                }
                DragOutcome::Seek(interval.from_percent(track.percent_at(x)))
            }
            (DragState::Dragging(handle), PointerEvent::Move { x }) => {
                let time = interval.from_percent(track.percent_at(x));
                let time = match handle {
                    Handle::A => interval.set_a(time),
                    Handle::B => interval.set_b(time),
                };
                DragOutcome::Moved { handle, time }
            }
            (DragState::Dragging(handle), PointerEvent::Up { .. }) => {
                self.state = DragState::Idle;
                debug!(?handle, a = interval.point_a(), b = interval.point_b(), "drag ended");
                DragOutcome::Ended(handle)
            }
            // A second press while dragging, or moves/releases with no drag
            _ => DragOutcome::Ignored,
        }
    }
}

/// Which handle (if any) lies within `slop` pixels of `x`.
///
/// When both are in range the nearer one wins, with ties going to B.
pub fn hit_test(
    x: f64,
    track: &TrackGeometry,
    interval: &IntervalModel,
    slop: f64,
) -> PointerTarget {
    let Some(region) = interval.region() else {
        return PointerTarget::Track;
    };
    let da = (x - track.x_at(region.handle_a)).abs();
    let db = (x - track.x_at(region.handle_b)).abs();
    match (da <= slop, db <= slop) {
        (true, true) if da < db => PointerTarget::Handle(Handle::A),
        (true, true) => PointerTarget::Handle(Handle::B),
        (true, false) => PointerTarget::Handle(Handle::A),
        (false, true) => PointerTarget::Handle(Handle::B),
        (false, false) => PointerTarget::Track,
    }
}
