//! A-B loop interval state.
//!
//! `IntervalModel` owns the two loop points, the loop flag and the duration
//! they are measured against. Every setter re-clamps, so no sequence of calls
//! can produce an inverted interval or one narrower than the minimum gap.

use serde::{Deserialize, Serialize};

/// Minimum separation between point A and point B, in seconds.
pub const MIN_GAP: f64 = 0.1;

/// A closed time range in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub start: f64,
    pub end: f64,
}

impl Bounds {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// True when the range has no positive width.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Where the loop region sits on the timeline track, in percent of its width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopRegion {
    pub left: f64,
    pub width: f64,
    pub handle_a: f64,
    pub handle_b: f64,
}

/// The live A-B loop for the loaded video.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalModel {
    point_a: f64,
    point_b: f64,
    loop_enabled: bool,
    /// Seconds; 0 means the engine has not reported it yet
    duration: f64,
    min_gap: f64,
}

impl Default for IntervalModel {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalModel {
    /// Create an empty `[0, 0]` interval with unknown duration.
    pub fn new() -> Self {
        Self::with_min_gap(MIN_GAP)
    }

    /// Create an empty interval using a custom minimum gap.
    ///
    /// Non-positive or non-finite gaps fall back to [`MIN_GAP`].
    pub fn with_min_gap(min_gap: f64) -> Self {
        let min_gap = if min_gap.is_finite() && min_gap > 0.0 {
            min_gap
        } else {
            MIN_GAP
        };
        Self {
            point_a: 0.0,
            point_b: 0.0,
            loop_enabled: false,
            duration: 0.0,
            min_gap,
        }
    }

    pub fn point_a(&self) -> f64 {
        self.point_a
    }

    pub fn point_b(&self) -> f64 {
        self.point_b
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    /// Whether the engine has reported a usable duration.
    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }

    /// Current loop points as a range.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.point_a, self.point_b)
    }

    /// Move point A, clamped to `[0, B - gap]`.
    ///
    /// While the duration is unknown only the floor applies. Non-finite
    /// input is ignored.
    ///
    /// # Returns
    /// The value point A ended up at
    pub fn set_a(&mut self, time: f64) -> f64 {
        if !time.is_finite() {
            return self.point_a;
        }
        let mut a = time;
        if self.has_duration() {
            a = a.min(self.point_b - self.min_gap);
        }
        self.point_a = a.max(0.0);
        self.point_a
    }

    /// Move point B, clamped to `[A + gap, duration]`.
    ///
    /// While the duration is unknown only the floor applies. When the
    /// duration is shorter than the gap the ceiling wins.
    ///
    /// # Returns
    /// The value point B ended up at
    pub fn set_b(&mut self, time: f64) -> f64 {
        if !time.is_finite() {
            return self.point_b;
        }
        let mut b = time.max(self.point_a + self.min_gap);
        if self.has_duration() {
            b = b.min(self.duration);
        }
        self.point_b = b;
        self.point_b
    }

    /// Collapse the interval to the whole video and adopt `duration`.
    ///
    /// Unknown (non-positive or non-finite) durations give `[0, 0]`.
    pub fn reset(&mut self, duration: f64) {
        self.duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.point_a = 0.0;
        self.point_b = self.duration;
    }

    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Flip the loop flag, returning the new value.
    pub fn toggle_loop(&mut self) -> bool {
        self.loop_enabled = !self.loop_enabled;
        self.loop_enabled
    }

    /// Replace both points at once (section activation).
    ///
    /// The range is clamped into the video the same way the single-point
    /// setters clamp, so a section saved against a longer upload still
    /// yields a valid interval.
    pub fn set_bounds(&mut self, bounds: Bounds) -> Bounds {
        if !bounds.start.is_finite() || !bounds.end.is_finite() {
            return self.bounds();
        }
        let mut end = bounds.end;
        if self.has_duration() {
            end = end.min(self.duration);
        }
        let start = bounds.start.min(end - self.min_gap).max(0.0);
        let mut end = end.max(start + self.min_gap);
        if self.has_duration() {
            end = end.min(self.duration);
        }
        self.point_a = start;
        self.point_b = end;
        self.bounds()
    }

    /// Whether the loop should fire at `current_time`.
    pub fn should_loop(&self, current_time: f64) -> bool {
        self.loop_enabled && self.point_b > self.point_a && current_time >= self.point_b
    }

    /// Convert a time to a percentage of the duration (0 when unknown).
    pub fn to_percent(&self, time: f64) -> f64 {
        if !self.has_duration() {
            return 0.0;
        }
        (time / self.duration) * 100.0
    }

    /// Convert a track percentage (clamped to 0..=100) to a time.
    pub fn from_percent(&self, pct: f64) -> f64 {
        let pct = if pct.is_finite() {
            pct.clamp(0.0, 100.0)
        } else {
            0.0
        };
        (pct / 100.0) * self.duration
    }

    /// Loop region placement on the track, or `None` while the duration is unknown.
    pub fn region(&self) -> Option<LoopRegion> {
        if !self.has_duration() {
            return None;
        }
        let left = self.to_percent(self.point_a);
        Some(LoopRegion {
            left,
            width: self.to_percent(self.point_b - self.point_a),
            handle_a: left,
            handle_b: self.to_percent(self.point_b),
        })
    }
}
