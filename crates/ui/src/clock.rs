//! Elapsed time of the current track.
//!
//! The clock runs only while playing and restarts from zero whenever the
//! decode context starts a different track, whether by a switch or by an
//! auto-advance.

use core::fmt::Write;

use embassy_time::{Duration, Instant};
use heapless::String;

/// `mm:ss`
pub type ClockLabel = String<5>;

/// Identifies one track start: the switch sequence and the auto-advance
/// count from the decode status.
pub type TrackStart = (u32, u32);

/// `99:59`
const MAX_SECS: u64 = 5999;

/// Pause-aware elapsed-time counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackClock {
    start: Option<TrackStart>,
    banked: Duration,
    running_since: Option<Instant>,
    label: ClockLabel,
}

impl Default for TrackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackClock {
    /// Stopped at `00:00`.
    pub fn new() -> Self {
        Self {
            start: None,
            banked: Duration::from_ticks(0),
            running_since: None,
            label: format_elapsed(Duration::from_ticks(0)),
        }
    }

    /// Current `mm:ss` label.
    pub fn label(&self) -> &ClockLabel {
        &self.label
    }

    /// Elapsed play time at `now`.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .running_since
            .and_then(|since| now.checked_duration_since(since))
            .unwrap_or(Duration::from_ticks(0));
        self.banked.checked_add(running).unwrap_or(self.banked)
    }

    /// Follow the decode status at `now`.
    ///
    /// Returns `true` when the label changed.
    pub fn tick(&mut self, now: Instant, start: TrackStart, playing: bool) -> bool {
        if self.start != Some(start) {
            self.start = Some(start);
            self.banked = Duration::from_ticks(0);
            self.running_since = None;
        }
        match (playing, self.running_since) {
            (true, None) => self.running_since = Some(now),
            (false, Some(_)) => {
                self.banked = self.elapsed(now);
                self.running_since = None;
            }
            _ => {}
        }
        let label = format_elapsed(self.elapsed(now));
        if label == self.label {
            return false;
        }
        self.label = label;
        true
    }
}

/// Format as `mm:ss`, holding at `99:59`.
pub fn format_elapsed(elapsed: Duration) -> ClockLabel {
    let secs = elapsed.as_secs().min(MAX_SECS);
    let mut out = String::new();
    let _ = write!(out, "{:02}:{:02}", secs / 60, secs % 60);
    out
}
