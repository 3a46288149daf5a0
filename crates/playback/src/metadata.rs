//! Track metadata: tag lines from the decode engine and cover-art state.
//!
//! The engine reports tags as free-text lines in one of two shapes:
//!
//! ```text
//! Title: Blue in Green        human-readable key, ':' or '=' required
//! TIT2=Blue in Green          raw ID3 frame id, separator optional
//! ```
//!
//! Lines that match neither shape are ignored.

use heapless::String;

use crate::cover::{CoverArt, CoverBuffer, CoverLocation};

/// Title / album capacity in bytes.
pub const LONG_FIELD_LEN: usize = 96;
/// Artist capacity in bytes.
pub const ARTIST_LEN: usize = 64;
/// Genre capacity in bytes.
pub const GENRE_LEN: usize = 48;
/// Year capacity in bytes.
pub const YEAR_LEN: usize = 16;

/// Which tag a metadata line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TagField {
    /// Track title
    Title,
    /// Performing artist
    Artist,
    /// Album name
    Album,
    /// Release year or recording date
    Year,
    /// Genre (ID3 "content type")
    Genre,
}

const KEYS: [(&str, TagField); 5] = [
    ("Title", TagField::Title),
    ("Artist", TagField::Artist),
    ("Album", TagField::Album),
    ("Year", TagField::Year),
    ("ContentType", TagField::Genre),
];

const FRAMES: [(&str, TagField); 6] = [
    ("TIT2", TagField::Title),
    ("TALB", TagField::Album),
    ("TPE1", TagField::Artist),
    ("TYER", TagField::Year),
    ("TDRC", TagField::Year),
    ("TCON", TagField::Genre),
];

const BOMS: [&[u8]; 3] = [&[0xEF, 0xBB, 0xBF], &[0xFF, 0xFE], &[0xFE, 0xFF]];

fn strip_bom(raw: &[u8]) -> &[u8] {
    BOMS.iter()
        .find_map(|bom| raw.strip_prefix(*bom))
        .unwrap_or(raw)
}

/// Longest valid UTF-8 prefix.
fn utf8_prefix(raw: &[u8]) -> &str {
    match core::str::from_utf8(raw) {
        Ok(s) => s,
        Err(e) => raw
            .get(..e.valid_up_to())
            .and_then(|b| core::str::from_utf8(b).ok())
            .unwrap_or(""),
    }
}

fn strip_separator(s: &str) -> Option<&str> {
    s.strip_prefix(':').or_else(|| s.strip_prefix('='))
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Parse one engine metadata line.
///
/// Returns the field and its trimmed, non-empty value. Key forms are tried
/// before frame-id forms and the first match wins.
pub fn parse_line(raw: &[u8]) -> Option<(TagField, &str)> {
    let line = utf8_prefix(strip_bom(raw));

    for (key, field) in KEYS {
        if let Some(rest) = line.strip_prefix(key).and_then(strip_separator) {
            if let Some(value) = non_empty(rest) {
                return Some((field, value));
            }
        }
    }
    for (frame, field) in FRAMES {
        if let Some(rest) = line.strip_prefix(frame) {
            let rest = strip_separator(rest).unwrap_or(rest);
            if let Some(value) = non_empty(rest) {
                return Some((field, value));
            }
        }
    }
    None
}

/// Copy `value` into `out`, truncating at a character boundary.
///
/// Returns `true` when `out` changed.
fn assign<const N: usize>(out: &mut String<N>, value: &str) -> bool {
    let mut end = value.len().min(N);
    while !value.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    let value = value.get(..end).unwrap_or("");
    if out.as_str() == value {
        return false;
    }
    out.clear();
    // Fits: truncated to capacity above.
    let _ = out.push_str(value);
    true
}

/// Text tags of the current track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackTags {
    /// Title
    pub title: String<LONG_FIELD_LEN>,
    /// Artist
    pub artist: String<ARTIST_LEN>,
    /// Album
    pub album: String<LONG_FIELD_LEN>,
    /// Year
    pub year: String<YEAR_LEN>,
    /// Genre
    pub genre: String<GENRE_LEN>,
}

impl TrackTags {
    /// Store `value` in `field`; returns `true` when it changed.
    pub fn set(&mut self, field: TagField, value: &str) -> bool {
        match field {
            TagField::Title => assign(&mut self.title, value),
            TagField::Artist => assign(&mut self.artist, value),
            TagField::Album => assign(&mut self.album, value),
            TagField::Year => assign(&mut self.year, value),
            TagField::Genre => assign(&mut self.genre, value),
        }
    }

    /// Returns `true` when no tag has been seen.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.artist.is_empty()
            && self.album.is_empty()
            && self.year.is_empty()
            && self.genre.is_empty()
    }
}

/// Tags and cover art of the track the decode context is streaming.
///
/// Owned by the decode context; the UI only ever sees snapshots.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    tags: TrackTags,
    cover: CoverArt,
}

impl MetadataStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text tags.
    pub fn tags(&self) -> &TrackTags {
        &self.tags
    }

    /// Current cover-art state.
    pub fn cover(&self) -> &CoverArt {
        &self.cover
    }

    /// Feed one metadata line from the engine.
    ///
    /// Returns `true` when a field changed; feeding the same line twice
    /// returns `false` the second time.
    pub fn on_metadata_line(&mut self, raw: &[u8]) -> bool {
        match parse_line(raw) {
            Some((field, value)) => self.tags.set(field, value),
            None => false,
        }
    }

    /// Record the location of an embedded image without reading it.
    ///
    /// Any previously materialized buffer is released.
    pub fn on_image_located(&mut self, position: u64, len: u64) {
        self.cover = CoverArt::Deferred(CoverLocation { position, len });
    }

    /// Attach bytes read for the currently deferred image.
    ///
    /// Ignored when `location` no longer matches (a newer image or a reset
    /// happened in between).
    pub fn set_materialized(&mut self, location: CoverLocation, buffer: CoverBuffer) -> bool {
        if self.cover.location() != Some(location) {
            return false;
        }
        self.cover = CoverArt::Materialized { location, buffer };
        true
    }

    /// Clear tags and release cover art. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.tags = TrackTags::default();
        self.cover = CoverArt::Absent;
    }
}
