//! Decorative spectrum bars on the transport panel.
//!
//! Not derived from audio: each bar gets a random height on a fixed
//! period while playing and freezes otherwise.

use embassy_time::{Duration, Instant};
use rand::{Rng, RngCore};

/// Number of bars.
pub const BAR_COUNT: usize = 14;
/// Tallest bar, in segments.
pub const MAX_HEIGHT: u8 = 4;

/// Bar heights and the time they were last drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spectrum {
    bars: [u8; BAR_COUNT],
    last: Option<Instant>,
}

impl Default for Spectrum {
    fn default() -> Self {
        Self::new()
    }
}

impl Spectrum {
    /// All bars at height 1.
    pub const fn new() -> Self {
        Self {
            bars: [1; BAR_COUNT],
            last: None,
        }
    }

    /// Current heights, each in `1..=MAX_HEIGHT`.
    pub fn bars(&self) -> &[u8; BAR_COUNT] {
        &self.bars
    }

    /// Re-roll the bars if `playing` and `period` has elapsed.
    ///
    /// Returns `true` when the bars changed.
    pub fn tick(
        &mut self,
        now: Instant,
        playing: bool,
        period: Duration,
        rng: &mut impl RngCore,
    ) -> bool {
        if !playing {
            return false;
        }
        let due = self
            .last
            .and_then(|last| now.checked_duration_since(last))
            .map_or(true, |elapsed| elapsed >= period);
        if !due {
            return false;
        }
        self.last = Some(now);
        for bar in &mut self.bars {
            *bar = rng.gen_range(1..=MAX_HEIGHT);
        }
        true
    }
}
