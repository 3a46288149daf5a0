//! Application configuration and constants
//!
//! This module defines central configuration values used across the
//! application. Everything is compiled in; there is no runtime config file.
//! Crates receive a [`PlayerConfig`] at construction rather than reading the
//! constants directly, so tests can shrink delays and windows.

use embassy_time::Duration;

use crate::audio_types::{Brightness, Volume};

/// Catalog capacity: at most this many tracks are listed.
pub const MAX_TRACKS: usize = 100;

/// Longest track path the catalog stores, in bytes.
pub const MAX_PATH_LEN: usize = 256;

/// Task pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// UI context period (input poll + render)
    pub ui_period: Duration,
    /// Decode context yield between steps while playing
    pub decode_busy: Duration,
    /// Decode context period while idle or paused
    pub decode_idle: Duration,
    /// Spectrum bars refresh interval
    pub spectrum_period: Duration,
    /// Battery gauge refresh interval
    pub battery_period: Duration,
}

/// Horizontal text scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Time a field must stay focused before it starts moving
    pub delay: Duration,
    /// Pixels moved per scroll tick
    pub step_px: i32,
    /// Scroll on every Nth UI frame
    pub throttle_frames: u8,
}

/// Cover art lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverConfig {
    /// Bytes scanned for an image signature after the reported position
    pub sniff_window: usize,
    /// Bytes a JPEG marker walk may cover before giving up
    pub jpeg_scan_limit: usize,
    /// Read the image into memory once instead of re-reading per render
    pub cache: bool,
    /// Largest image that is cached when `cache` is on
    pub cache_limit: usize,
}

/// Where tracks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Primary scan root
    pub music_dir: &'static str,
    /// Scanned when the primary root yields nothing
    pub fallback_dir: &'static str,
    /// Sub-directory levels descended below a root
    pub max_depth: u8,
}

/// Everything the player reads at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Task pacing
    pub timing: TimingConfig,
    /// Text scrolling
    pub scroll: ScrollConfig,
    /// Cover art lookup
    pub cover: CoverConfig,
    /// Track discovery
    pub library: LibraryConfig,
    /// Screenshots are written here
    pub screenshot_dir: &'static str,
    /// Volume at boot
    pub initial_volume: Volume,
    /// Backlight level at boot
    pub initial_brightness: Brightness,
}

impl PlayerConfig {
    /// Compiled-in defaults
    pub const fn new() -> Self {
        Self {
            timing: TimingConfig {
                ui_period: Duration::from_millis(50),
                decode_busy: Duration::from_millis(1),
                decode_idle: Duration::from_millis(20),
                spectrum_period: Duration::from_millis(200),
                battery_period: Duration::from_secs(30),
            },
            scroll: ScrollConfig {
                delay: Duration::from_millis(1000),
                step_px: 2,
                throttle_frames: 4,
            },
            cover: CoverConfig {
                sniff_window: 4096,
                jpeg_scan_limit: 16384,
                cache: false,
                cache_limit: 65_536,
            },
            library: LibraryConfig {
                music_dir: "/music",
                fallback_dir: "/",
                max_depth: 4,
            },
            screenshot_dir: "/screen",
            initial_volume: Volume::new(10),
            initial_brightness: Brightness::new(2),
        }
    }

    /// Check the values that would stall or break a context.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.ui_period.as_ticks() == 0 || self.timing.decode_idle.as_ticks() == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.scroll.throttle_frames == 0 {
            return Err(ConfigError::ZeroThrottle);
        }
        if self.scroll.step_px <= 0 {
            return Err(ConfigError::NonPositiveScrollStep);
        }
        if self.cover.sniff_window == 0 || self.cover.jpeg_scan_limit < self.cover.sniff_window {
            return Err(ConfigError::CoverWindow);
        }
        if !self.library.music_dir.starts_with('/') || !self.library.fallback_dir.starts_with('/') {
            return Err(ConfigError::RelativePath);
        }
        if !self.screenshot_dir.starts_with('/') {
            return Err(ConfigError::RelativePath);
        }
        Ok(())
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        PlayerConfig::new().timing
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        PlayerConfig::new().scroll
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        PlayerConfig::new().cover
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        PlayerConfig::new().library
    }
}

/// Rejected configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A task period is zero
    ZeroPeriod,
    /// Scroll throttle of zero frames
    ZeroThrottle,
    /// Scroll step must move left
    NonPositiveScrollStep,
    /// Sniff window empty or larger than the JPEG walk bound
    CoverWindow,
    /// Paths must be absolute
    RelativePath,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::ZeroPeriod => "task period must be non-zero",
            Self::ZeroThrottle => "scroll throttle must be at least one frame",
            Self::NonPositiveScrollStep => "scroll step must be positive",
            Self::CoverWindow => "cover sniff window must be non-zero and within the JPEG bound",
            Self::RelativePath => "configured paths must be absolute",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(PlayerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn defaults_match_player_constants() {
        let cfg = PlayerConfig::new();
        assert_eq!(cfg.timing.ui_period.as_millis(), 50);
        assert_eq!(cfg.timing.battery_period.as_secs(), 30);
        assert_eq!(cfg.scroll.delay.as_millis(), 1000);
        assert_eq!(cfg.cover.sniff_window, 4096);
        assert_eq!(cfg.cover.jpeg_scan_limit, 16384);
        assert!(!cfg.cover.cache);
        assert_eq!(cfg.initial_volume.get(), 10);
        assert_eq!(cfg.initial_brightness.get(), 2);
    }

    #[test]
    fn zero_period_rejected() {
        let mut cfg = PlayerConfig::new();
        cfg.timing.ui_period = Duration::from_ticks(0);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPeriod));
    }

    #[test]
    fn relative_music_dir_rejected() {
        let mut cfg = PlayerConfig::new();
        cfg.library.music_dir = "music";
        assert_eq!(cfg.validate(), Err(ConfigError::RelativePath));
    }

    #[test]
    fn window_larger_than_jpeg_bound_rejected() {
        let mut cfg = PlayerConfig::new();
        cfg.cover.sniff_window = 32768;
        assert_eq!(cfg.validate(), Err(ConfigError::CoverWindow));
    }
}
