//! Clamped value newtypes shared by the UI and decode contexts.
//!
//! - `Volume`: clamps 0–21, the decode engine's volume scale
//! - `Brightness`: backlight level index 0–4, mapped to a PWM duty table

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} outside {}..={}", self.value, self.min, self.max)
    }
}

// ── Volume ───────────────────────────────────────────────────────────────────

/// Output volume, clamped to 0–21.
///
/// Construct with [`Volume::new`] (clamping) or [`Volume::try_new`]
/// (fallible, strict). Every mutation clamps, so repeated presses at either
/// end of the range are idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Volume(u8);

impl Volume {
    /// Loudest setting
    pub const MAX: u8 = 21;
    /// Coarse step used by the volume-step key
    pub const COARSE_STEP: u8 = 5;

    /// Create a `Volume`, clamping values above 21 to 21.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Create a `Volume`, returning an error if `value > 21`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 21`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner volume value (0–21).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// One step louder, saturating at 21.
    #[must_use]
    pub fn louder(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One step quieter, saturating at 0.
    #[must_use]
    pub fn quieter(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Coarse step: +5, wrapping back to 5 once the result passes 20.
    #[must_use]
    pub fn coarse_step(self) -> Self {
        let next = self.0.saturating_add(Self::COARSE_STEP);
        if next > 20 {
            Self(Self::COARSE_STEP)
        } else {
            Self(next)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(10)
    }
}

// ── Brightness ───────────────────────────────────────────────────────────────

/// Backlight PWM duty for each brightness level.
pub const BRIGHTNESS_DUTY: [u8; 5] = [60, 120, 180, 220, 255];

/// Backlight level index, 0–4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Brightness(u8);

impl Brightness {
    /// Highest level index
    pub const MAX: u8 = 4;

    /// Create a `Brightness`, clamping values above 4 to 4.
    #[must_use]
    pub const fn new(level: u8) -> Self {
        if level > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(level)
        }
    }

    /// Create a `Brightness`, returning an error if `level > 4`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `level > 4`.
    pub fn try_new(level: u8) -> Result<Self, OutOfRangeError> {
        if level > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(level),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(level))
        }
    }

    /// Return the level index (0–4).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Next level, wrapping from 4 back to 0.
    #[must_use]
    pub fn cycle(self) -> Self {
        if self.0 >= Self::MAX {
            Self(0)
        } else {
            Self(self.0.saturating_add(1))
        }
    }

    /// PWM duty for this level.
    #[must_use]
    pub fn duty(self) -> u8 {
        BRIGHTNESS_DUTY
            .get(usize::from(self.0))
            .copied()
            .unwrap_or(u8::MAX)
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self(2)
    }
}
