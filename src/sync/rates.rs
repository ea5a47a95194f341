//! Playback rate ladder.
//!
//! The engine may enumerate the rates it supports; otherwise a built-in
//! ladder is used. Speed changes only ever land on a ladder entry.

/// Rates used until the engine reports its own list.
pub const DEFAULT_RATES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

/// Rate comparison tolerance (rates arrive as floats from the engine).
const RATE_EPSILON: f64 = 1e-9;

/// Errors from speed changes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error("Playback rate {rate}x is not supported (available: {available})")]
    Unsupported { rate: f64, available: String },
}

/// Ordered list of supported playback rates.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLadder {
    rates: Vec<f64>,
}

impl Default for RateLadder {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RATES.to_vec(),
        }
    }
}

impl RateLadder {
    /// Build a ladder from an engine-reported list.
    ///
    /// Non-finite and non-positive entries are dropped.
    ///
    /// # Returns
    /// `None` if nothing usable remains
    pub fn new(rates: Vec<f64>) -> Option<Self> {
        let rates: Vec<f64> = rates
            .into_iter()
            .filter(|r| r.is_finite() && *r > 0.0)
            .collect();
        if rates.is_empty() {
            None
        } else {
            Some(Self { rates })
        }
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn index_of(&self, rate: f64) -> Option<usize> {
        self.rates
            .iter()
            .position(|r| (r - rate).abs() < RATE_EPSILON)
    }

    pub fn contains(&self, rate: f64) -> bool {
        self.index_of(rate).is_some()
    }

    /// Index of the 1x entry, or of the entry closest to 1x if there is none.
    pub fn neutral_index(&self) -> usize {
        self.index_of(1.0).unwrap_or_else(|| {
            self.rates
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    (*a - 1.0)
                        .abs()
                        .partial_cmp(&(*b - 1.0).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i)
                .unwrap_or(0)
        })
    }

    /// Rate `delta` entries away from `current`, clamped at both ends.
    ///
    /// An unrecognized `current` is treated as the neutral entry.
    pub fn step(&self, current: f64, delta: isize) -> f64 {
        let idx = self.index_of(current).unwrap_or_else(|| self.neutral_index());
        let last = self.rates.len() as isize - 1;
        let new_idx = (idx as isize + delta).clamp(0, last) as usize;
        self.rates[new_idx]
    }

    /// Check that `rate` is on the ladder.
    pub fn validate(&self, rate: f64) -> Result<f64, RateError> {
        match self.index_of(rate) {
            Some(idx) => Ok(self.rates[idx]),
            None => Err(RateError::Unsupported {
                rate,
                available: self
                    .rates
                    .iter()
                    .map(|r| crate::time::format_rate(*r))
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}
