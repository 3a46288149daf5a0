//! Backlight: brightness level and the screen on/off toggle.

use platform::Brightness;

/// Brightness level plus the saved level while the screen is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backlight {
    level: Brightness,
    saved: Option<Brightness>,
}

impl Backlight {
    /// Screen on at `level`.
    pub fn new(level: Brightness) -> Self {
        Self { level, saved: None }
    }

    /// Returns `true` while the screen is on.
    pub fn is_on(&self) -> bool {
        self.saved.is_none()
    }

    /// Current brightness level (the saved one while off).
    pub fn level(&self) -> Brightness {
        self.saved.unwrap_or(self.level)
    }

    /// PWM duty to drive; 0 while off.
    pub fn duty(&self) -> u8 {
        if self.is_on() {
            self.level.duty()
        } else {
            0
        }
    }

    /// Turn the screen off (saving the level) or back on (restoring it).
    ///
    /// Returns the new duty.
    pub fn toggle_screen(&mut self) -> u8 {
        match self.saved.take() {
            Some(saved) => self.level = saved,
            None => self.saved = Some(self.level),
        }
        self.duty()
    }

    /// Next brightness level. Ignored while the screen is off.
    pub fn cycle(&mut self) -> Option<u8> {
        if !self.is_on() {
            return None;
        }
        self.level = self.level.cycle();
        Some(self.duty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn off_and_on_restores_level() {
        let mut b = Backlight::new(Brightness::new(3));
        assert_eq!(b.toggle_screen(), 0);
        assert!(!b.is_on());
        assert_eq!(b.level(), Brightness::new(3));
        assert_eq!(b.toggle_screen(), 220);
        assert!(b.is_on());
    }

    #[test]
    fn cycle_wraps_and_is_ignored_when_off() {
        let mut b = Backlight::new(Brightness::new(4));
        assert_eq!(b.cycle(), Some(60));
        b.toggle_screen();
        assert_eq!(b.cycle(), None);
        assert_eq!(b.level(), Brightness::new(0));
    }
}
