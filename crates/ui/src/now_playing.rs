//! Metadata page state: album scrolling and the resolved cover image.

use embassy_time::Instant;
use platform::config::{CoverConfig, ScrollConfig};
use platform::Storage;
use playback::cover::{self, CoverArt, CoverLocation, ResolvedCover};
use playback::TrackTags;
use tracing::warn;

use crate::clock::TrackStart;
use crate::scroll::{text_width, ScrollAnimator, ALBUM_FIELD};

/// Shown when the artist tag is missing.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Shown when the album tag is missing.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
/// Shown instead of cover art that is absent or unreadable.
pub const NO_COVER: &str = "No Cover";

/// Artist, or the placeholder.
pub fn artist_or_placeholder(tags: &TrackTags) -> &str {
    if tags.artist.is_empty() {
        UNKNOWN_ARTIST
    } else {
        &tags.artist
    }
}

/// Album, or the placeholder.
pub fn album_or_placeholder(tags: &TrackTags) -> &str {
    if tags.album.is_empty() {
        UNKNOWN_ALBUM
    } else {
        &tags.album
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CoverKey {
    playing: usize,
    started: TrackStart,
    location: CoverLocation,
    materialized: bool,
}

/// State for the metadata page.
#[derive(Debug, Clone)]
pub struct NowPlayingState {
    album_scroll: ScrollAnimator,
    cover_key: Option<CoverKey>,
    cover: Option<ResolvedCover>,
}

impl NowPlayingState {
    /// Fresh state, focused since `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            album_scroll: ScrollAnimator::new(ALBUM_FIELD, now),
            cover_key: None,
            cover: None,
        }
    }

    /// Entering the page restarts the album marquee.
    pub fn enter(&mut self, now: Instant) {
        self.album_scroll.reset(now);
    }

    /// Album x offset.
    pub fn album_x(&self) -> i32 {
        self.album_scroll.position()
    }

    /// Resolved cover, `None` for the placeholder.
    pub fn cover(&self) -> Option<ResolvedCover> {
        self.cover
    }

    /// Advance the album marquee for the track at `playing`.
    pub fn tick(
        &mut self,
        now: Instant,
        scroll_frame: bool,
        playing: usize,
        tags: &TrackTags,
        config: &ScrollConfig,
    ) -> bool {
        let refocused = self.album_scroll.focus(playing, now);
        let width = text_width(album_or_placeholder(tags));
        self.album_scroll.tick(now, scroll_frame, width, config) || refocused
    }

    /// Resolve the playing track's cover if it changed since last time.
    ///
    /// `started` tells apart two track starts that land on the same index
    /// with the same cover location. Deferred covers are sniffed from `path` on `storage`; nothing beyond
    /// the sniff window and image header is read. Failures fall back to the
    /// placeholder. Returns `true` when the displayed cover changed.
    pub async fn refresh_cover<S: Storage>(
        &mut self,
        storage: &mut S,
        path: Option<&str>,
        playing: usize,
        started: TrackStart,
        art: &CoverArt,
        config: &CoverConfig,
    ) -> bool {
        let key = art.location().map(|location| CoverKey {
            playing,
            started,
            location,
            materialized: matches!(art, CoverArt::Materialized { .. }),
        });
        if key == self.cover_key {
            return false;
        }
        self.cover_key = key;
        let before = self.cover;
        self.cover = match (art, path) {
            (CoverArt::Absent, _) => None,
            (CoverArt::Materialized { location, buffer }, _) => {
                cover::resolve_buffer(*location, buffer, config)
            }
            (CoverArt::Deferred(_), None) => None,
            (CoverArt::Deferred(_), Some(path)) => match storage.open_file(path).await {
                Ok(mut file) => match cover::resolve_for_display(&mut file, art, config).await {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        warn!("cover read failed: {:?}", e);
                        None
                    }
                },
                Err(e) => {
                    warn!("cover: cannot open {}: {:?}", path, e);
                    None
                }
            },
        };
        self.cover != before
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use platform::mocks::MemStorage;
    use playback::{Dimensions, ImageFormat, TagField};

    fn gif_track(card: &MemStorage) {
        let mut data = vec![0u8; 32];
        data.extend_from_slice(b"GIF89a");
        data.extend_from_slice(&[40, 0, 30, 0]);
        data.extend_from_slice(&[0u8; 32]);
        card.add_file("/music/a.mp3", &data);
    }

    #[test]
    fn placeholders_for_missing_tags() {
        let mut tags = TrackTags::default();
        assert_eq!(artist_or_placeholder(&tags), UNKNOWN_ARTIST);
        assert_eq!(album_or_placeholder(&tags), UNKNOWN_ALBUM);
        tags.set(TagField::Album, "Kind of Blue");
        assert_eq!(album_or_placeholder(&tags), "Kind of Blue");
    }

    #[tokio::test]
    async fn deferred_cover_resolves_from_file_once() {
        let mut card = MemStorage::new();
        gif_track(&card);
        let mut np = NowPlayingState::new(Instant::from_millis(0));
        let art = CoverArt::Deferred(CoverLocation { position: 10, len: 0 });
        let cfg = CoverConfig::default();

        assert!(np.refresh_cover(&mut card, Some("/music/a.mp3"), 0, (1, 0), &art, &cfg).await);
        let cover = np.cover().unwrap();
        assert_eq!(cover.format, ImageFormat::Gif);
        assert_eq!(cover.offset, 32);
        assert_eq!(cover.dimensions, Some(Dimensions { width: 40, height: 30 }));

        // Same cover again: no re-read, no change.
        assert!(!np.refresh_cover(&mut card, Some("/music/a.mp3"), 0, (1, 0), &art, &cfg).await);
    }

    #[tokio::test]
    async fn new_track_at_same_index_resolves_again() {
        let mut card = MemStorage::new();
        gif_track(&card);
        let mut np = NowPlayingState::new(Instant::from_millis(0));
        let art = CoverArt::Deferred(CoverLocation { position: 10, len: 0 });
        let cfg = CoverConfig::default();
        np.refresh_cover(&mut card, Some("/music/a.mp3"), 0, (1, 0), &art, &cfg).await;
        assert!(np.cover().is_some());

        // A deletion put another file at index 0 and it was switched to.
        card.add_file("/music/a.mp3", &[0u8; 64]);
        assert!(np.refresh_cover(&mut card, Some("/music/a.mp3"), 0, (2, 0), &art, &cfg).await);
        assert!(np.cover().is_none());
    }

    #[tokio::test]
    async fn unreadable_cover_falls_back_to_placeholder() {
        let mut card = MemStorage::new();
        let mut np = NowPlayingState::new(Instant::from_millis(0));
        let art = CoverArt::Deferred(CoverLocation { position: 0, len: 10 });
        np.refresh_cover(&mut card, Some("/music/gone.mp3"), 0, (1, 0), &art, &CoverConfig::default())
            .await;
        assert!(np.cover().is_none());
    }

    #[test]
    fn short_album_does_not_scroll() {
        let cfg = ScrollConfig::default();
        let mut np = NowPlayingState::new(Instant::from_millis(0));
        let mut tags = TrackTags::default();
        tags.set(TagField::Album, "Blue");
        np.tick(Instant::from_millis(0), true, 0, &tags, &cfg);
        assert!(!np.tick(Instant::from_millis(5000), true, 0, &tags, &cfg));
        assert_eq!(np.album_x(), 0);
    }

    #[test]
    fn long_album_scrolls_and_enter_resets() {
        let cfg = ScrollConfig::default();
        let mut np = NowPlayingState::new(Instant::from_millis(0));
        let mut tags = TrackTags::default();
        tags.set(TagField::Album, "The Complete Columbia Studio Recordings");
        np.tick(Instant::from_millis(0), true, 0, &tags, &cfg);
        assert!(np.tick(Instant::from_millis(1500), true, 0, &tags, &cfg));
        assert!(np.album_x() < 0);
        np.enter(Instant::from_millis(1600));
        assert_eq!(np.album_x(), 0);
    }
}
