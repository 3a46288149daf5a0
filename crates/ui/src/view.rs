//! Render snapshot and the display-side collaborators.
//!
//! A [`View`] is built synchronously in the UI context right before a
//! render, so everything in it is consistent with one state of the player.
//! Drawing primitives, fonts and pixel formats belong to the [`Renderer`].

use heapless::{String, Vec};
use library::TrackPath;
use platform::{Brightness, Volume};
use playback::metadata::{ARTIST_LEN, GENRE_LEN, LONG_FIELD_LEN, YEAR_LEN};
use playback::{CoverBuffer, PlayMode, PlaybackState, ResolvedCover};

use crate::clock::ClockLabel;
use crate::list::{ListLine, ScrollBar, VISIBLE_LINES};
use crate::now_playing::NO_COVER;
use crate::screen::Page;
use crate::spectrum::BAR_COUNT;

/// Transport panel contents (both pages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPanel {
    /// Playback state, `Switching` included
    pub state: PlaybackState,
    /// Play mode
    pub mode: PlayMode,
    /// Volume
    pub volume: Volume,
    /// Backlight level
    pub brightness: Brightness,
    /// Stream format label (`44.1/16`)
    pub audio: String<12>,
    /// Spectrum bar heights
    pub spectrum: [u8; BAR_COUNT],
    /// Elapsed time of the current track; `None` unless playing or paused
    pub elapsed: Option<ClockLabel>,
    /// Battery charge in percent; `None` without a reading
    pub battery: Option<u8>,
}

/// Metadata page contents, placeholders already applied.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagPanel {
    /// Title, or the file's display name
    pub title: String<LONG_FIELD_LEN>,
    /// Artist
    pub artist: String<ARTIST_LEN>,
    /// Album
    pub album: String<LONG_FIELD_LEN>,
    /// Album text x offset
    pub album_x: i32,
    /// Year
    pub year: String<YEAR_LEN>,
    /// Genre
    pub genre: String<GENRE_LEN>,
    /// Located cover image, `None` for the placeholder
    pub cover: Option<ResolvedCover>,
    /// Cover bytes when cached; otherwise stream from `source`
    pub cover_bytes: Option<CoverBuffer>,
    /// File the cover is read from
    pub source: Option<TrackPath>,
}

impl TagPanel {
    /// Caption to draw instead of the cover, if any.
    pub fn cover_placeholder(&self) -> Option<&'static str> {
        self.cover.is_none().then_some(NO_COVER)
    }
}

/// Everything one frame shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Page to draw
    pub page: Page,
    /// Visible track list lines
    pub lines: Vec<ListLine, VISIBLE_LINES>,
    /// Scroll bar
    pub scrollbar: ScrollBar,
    /// Name of the track the delete dialog asks about, when open
    pub delete_prompt: Option<String<{ platform::storage::MAX_NAME_LEN }>>,
    /// Transport panel
    pub status: StatusPanel,
    /// Metadata page
    pub tags: TagPanel,
}

/// Draws a [`View`] on the display.
pub trait Renderer {
    /// Error type
    type Error: core::fmt::Debug;

    /// Draw one frame.
    fn render(&mut self, view: &View) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// Captures the current frame to storage.
pub trait ScreenCapture {
    /// Error type
    type Error: core::fmt::Debug;

    /// Write a capture into `dir`.
    fn capture(&mut self, dir: &str) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}
