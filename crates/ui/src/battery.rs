//! Battery percentage on the status panel.

use embassy_time::{Duration, Instant};
use platform::PowerMonitor;

/// Last battery reading and when it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryGauge {
    percent: Option<u8>,
    last: Option<Instant>,
}

impl BatteryGauge {
    /// No reading yet.
    pub const fn new() -> Self {
        Self {
            percent: None,
            last: None,
        }
    }

    /// Last reading, `None` before the first one or when the monitor
    /// has nothing to report.
    pub fn percent(&self) -> Option<u8> {
        self.percent
    }

    /// Read `monitor` if `period` has elapsed since the last reading.
    ///
    /// Returns `true` when the displayed percentage changed.
    pub fn tick(&mut self, monitor: &impl PowerMonitor, now: Instant, period: Duration) -> bool {
        let due = self
            .last
            .and_then(|last| now.checked_duration_since(last))
            .map_or(true, |elapsed| elapsed >= period);
        if !due {
            return false;
        }
        self.last = Some(now);
        let percent = monitor.battery_percentage();
        if percent == self.percent {
            return false;
        }
        self.percent = percent;
        true
    }
}
