//! Battery monitoring.

/// Cell voltage read as empty, in millivolts.
pub const EMPTY_MV: u16 = 3300;
/// Cell voltage read as full, in millivolts.
pub const FULL_MV: u16 = 4200;

/// Power state monitor
pub trait PowerMonitor {
    /// Get battery voltage (mV), `None` when no reading is available
    fn battery_voltage(&self) -> Option<u16>;

    /// Get battery percentage (0-100)
    ///
    /// The default maps [`battery_voltage`](Self::battery_voltage) linearly
    /// between [`EMPTY_MV`] and [`FULL_MV`].
    fn battery_percentage(&self) -> Option<u8> {
        self.battery_voltage().map(percent_from_millivolts)
    }
}

/// Linear charge estimate, clamped to `0..=100`.
pub fn percent_from_millivolts(mv: u16) -> u8 {
    let above_empty = u32::from(mv.clamp(EMPTY_MV, FULL_MV).saturating_sub(EMPTY_MV));
    let span = u32::from(FULL_MV.saturating_sub(EMPTY_MV));
    let percent = above_empty.saturating_mul(100).checked_div(span).unwrap_or(0);
    u8::try_from(percent).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<u16>);

    impl PowerMonitor for Fixed {
        fn battery_voltage(&self) -> Option<u16> {
            self.0
        }
    }

    #[test]
    fn voltage_maps_linearly_and_clamps() {
        assert_eq!(percent_from_millivolts(3300), 0);
        assert_eq!(percent_from_millivolts(3750), 50);
        assert_eq!(percent_from_millivolts(4200), 100);
        assert_eq!(percent_from_millivolts(2900), 0);
        assert_eq!(percent_from_millivolts(4400), 100);
    }

    #[test]
    fn default_percentage_uses_voltage() {
        assert_eq!(Fixed(Some(3930)).battery_percentage(), Some(70));
        assert_eq!(Fixed(None).battery_percentage(), None);
    }
}
