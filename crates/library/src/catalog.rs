//! TrackCatalog: fixed-capacity, ordered list of playable track paths.
//!
//! Order is scan order and never changes except by deletion, which shifts
//! later entries down by one. Deleting also renumbers the two cursors that
//! point into the list (the UI selection and the streaming track); the rules
//! live in [`renumber_after_delete`] so the UI and decode contexts apply
//! them identically.

use heapless::{String, Vec};
use platform::config::{LibraryConfig, MAX_PATH_LEN, MAX_TRACKS};
use platform::storage::Storage;
use tracing::info;

use crate::scanner;

/// One track path as stored in the catalog.
pub type TrackPath = String<MAX_PATH_LEN>;

/// Error type for in-memory catalog operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// The catalog has reached its compile-time capacity.
    Full,
    /// The path does not fit in a [`TrackPath`].
    PathTooLong,
    /// The requested position does not exist.
    OutOfBounds,
}

impl core::fmt::Display for IndexError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::Full => "catalog full",
            Self::PathTooLong => "path too long",
            Self::OutOfBounds => "index out of bounds",
        };
        f.write_str(msg)
    }
}

/// Error returned by [`SharedCatalog::delete_at`](crate::SharedCatalog::delete_at).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteError<E> {
    /// The requested position does not exist.
    OutOfBounds,
    /// Storage refused to delete the file; the catalog is unchanged.
    Storage(E),
}

impl<E: core::fmt::Debug> core::fmt::Display for DeleteError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds => f.write_str("index out of bounds"),
            Self::Storage(e) => write!(f, "storage delete failed: {e:?}"),
        }
    }
}

/// The two positions that point into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Highlighted by the UI
    pub selected: usize,
    /// Currently streaming
    pub playing: usize,
}

/// What a successful deletion means for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The streaming track was deleted. `cursor.selected == cursor.playing`
    /// and the caller must switch to that index; `resume` says whether the
    /// player was actively playing before the deletion.
    ActiveTrackDeleted {
        /// Renumbered cursor
        cursor: Cursor,
        /// Player was playing (not paused/idle) before the deletion
        resume: bool,
    },
    /// The streaming track survived; only its index may have shifted.
    Shifted {
        /// Renumbered cursor
        cursor: Cursor,
    },
    /// The last track was deleted; playback must stop.
    Emptied,
}

impl DeleteOutcome {
    /// Cursor after the deletion (all zero once empty)
    pub fn cursor(&self) -> Cursor {
        match *self {
            Self::ActiveTrackDeleted { cursor, .. } | Self::Shifted { cursor } => cursor,
            Self::Emptied => Cursor::default(),
        }
    }
}

/// Renumber `cursor` after the entry at `deleted` was removed, leaving
/// `count_after` entries.
///
/// - playing: decrements when `deleted <= playing`, then clamps into range
/// - selected: decrements when `deleted < selected`; when `deleted ==
///   selected` it stays put, clamped to the new last entry
/// - deleting the playing entry moves the selection onto the new playing
///   index so the caller can switch to it
pub fn renumber_after_delete(
    deleted: usize,
    count_after: usize,
    cursor: Cursor,
    was_active: bool,
) -> DeleteOutcome {
    let Some(last) = count_after.checked_sub(1) else {
        return DeleteOutcome::Emptied;
    };

    let mut playing = cursor.playing;
    if deleted <= playing {
        playing = playing.saturating_sub(1);
    }
    let playing = playing.min(last);

    if deleted == cursor.playing {
        return DeleteOutcome::ActiveTrackDeleted {
            cursor: Cursor {
                selected: playing,
                playing,
            },
            resume: was_active,
        };
    }

    let selected = if deleted < cursor.selected {
        cursor.selected.saturating_sub(1)
    } else {
        cursor.selected.min(last)
    };
    DeleteOutcome::Shifted {
        cursor: Cursor { selected, playing },
    }
}

/// A fixed-capacity, ordered list of track paths.
///
/// `N` is the maximum number of tracks; the player uses [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCatalog<const N: usize> {
    paths: Vec<TrackPath, N>,
}

/// The player's catalog (capacity [`MAX_TRACKS`]).
pub type Catalog = TrackCatalog<MAX_TRACKS>;

impl<const N: usize> TrackCatalog<N> {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        TrackCatalog { paths: Vec::new() }
    }

    /// Append `path`.
    pub fn push(&mut self, path: &str) -> Result<(), IndexError> {
        let mut owned = TrackPath::new();
        owned.push_str(path).map_err(|_| IndexError::PathTooLong)?;
        self.paths.push(owned).map_err(|_| IndexError::Full)
    }

    /// Position of `path`, or `None` when it is not listed.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.paths.iter().position(|p| p.as_str() == path)
    }

    /// Path at zero-based `pos`, or `None`.
    pub fn get(&self, pos: usize) -> Option<&str> {
        self.paths.get(pos).map(TrackPath::as_str)
    }

    /// Number of tracks currently stored.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` when no tracks are listed.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns `true` once capacity `N` is reached.
    pub fn is_full(&self) -> bool {
        self.paths.is_full()
    }

    /// Iterate paths in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(TrackPath::as_str)
    }

    /// Remove all tracks.
    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Recursively scan `root` and append supported files.
    ///
    /// Never fails: an unreadable root is logged and adds nothing.
    /// Returns the number of tracks added.
    pub async fn populate<S: Storage>(&mut self, storage: &mut S, root: &str, max_depth: u8) -> usize {
        scanner::scan(storage, root, max_depth, self).await
    }

    /// Scan the music directory, falling back to the fallback root when it
    /// yields nothing.
    pub async fn populate_from<S: Storage>(&mut self, storage: &mut S, config: &LibraryConfig) -> usize {
        let found = self.populate(storage, config.music_dir, config.max_depth).await;
        if found > 0 {
            info!("{} tracks in {}", found, config.music_dir);
            return found;
        }
        info!("no tracks in {}, scanning {}", config.music_dir, config.fallback_dir);
        let found = self.populate(storage, config.fallback_dir, config.max_depth).await;
        info!("{} tracks in {}", found, config.fallback_dir);
        found
    }

    /// Drop the entry at `index` from memory only and renumber `cursor`.
    pub fn remove_entry(
        &mut self,
        index: usize,
        cursor: Cursor,
        was_active: bool,
    ) -> Result<DeleteOutcome, IndexError> {
        if index >= self.paths.len() {
            return Err(IndexError::OutOfBounds);
        }
        self.paths.remove(index);
        Ok(renumber_after_delete(index, self.paths.len(), cursor, was_active))
    }
}

impl<const N: usize> Default for TrackCatalog<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn abcd() -> TrackCatalog<8> {
        let mut c = TrackCatalog::new();
        for p in ["/music/A.mp3", "/music/B.mp3", "/music/C.mp3", "/music/D.mp3"] {
            c.push(p).unwrap();
        }
        c
    }

    fn names(c: &TrackCatalog<8>) -> std::vec::Vec<&str> {
        c.iter().map(crate::scanner::display_name).collect()
    }

    #[test]
    fn push_respects_capacity() {
        let mut c: TrackCatalog<2> = TrackCatalog::new();
        c.push("/a.mp3").unwrap();
        c.push("/b.mp3").unwrap();
        assert!(c.is_full());
        assert_eq!(c.push("/c.mp3"), Err(IndexError::Full));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn push_rejects_overlong_path() {
        let mut c: TrackCatalog<2> = TrackCatalog::new();
        let long = "a".repeat(MAX_PATH_LEN + 1);
        assert_eq!(c.push(&long), Err(IndexError::PathTooLong));
        assert!(c.is_empty());
    }

    #[test]
    fn deleting_active_selected_track_moves_to_previous() {
        let mut c = abcd();
        let cursor = Cursor { selected: 1, playing: 1 };
        let out = c.remove_entry(1, cursor, true).unwrap();
        assert_eq!(names(&c), ["A", "C", "D"]);
        assert_eq!(
            out,
            DeleteOutcome::ActiveTrackDeleted {
                cursor: Cursor { selected: 0, playing: 0 },
                resume: true,
            }
        );
    }

    #[test]
    fn deleting_earlier_track_shifts_both_cursors() {
        let mut c = abcd();
        let cursor = Cursor { selected: 3, playing: 3 };
        let out = c.remove_entry(0, cursor, true).unwrap();
        assert_eq!(names(&c), ["B", "C", "D"]);
        assert_eq!(out, DeleteOutcome::Shifted { cursor: Cursor { selected: 2, playing: 2 } });
    }

    #[test]
    fn deleting_first_track_while_playing_it_clamps_to_zero() {
        let mut c = abcd();
        let out = c.remove_entry(0, Cursor { selected: 0, playing: 0 }, false).unwrap();
        assert_eq!(
            out,
            DeleteOutcome::ActiveTrackDeleted {
                cursor: Cursor::default(),
                resume: false,
            }
        );
    }

    #[test]
    fn deleting_selected_last_track_clamps_selection_down() {
        let mut c = abcd();
        let out = c.remove_entry(3, Cursor { selected: 3, playing: 0 }, true).unwrap();
        assert_eq!(out, DeleteOutcome::Shifted { cursor: Cursor { selected: 2, playing: 0 } });
    }

    #[test]
    fn deleting_selected_middle_track_keeps_selection_position() {
        let mut c = abcd();
        let out = c.remove_entry(1, Cursor { selected: 1, playing: 3 }, true).unwrap();
        assert_eq!(names(&c), ["A", "C", "D"]);
        assert_eq!(out, DeleteOutcome::Shifted { cursor: Cursor { selected: 1, playing: 2 } });
    }

    #[test]
    fn deleting_later_track_changes_nothing() {
        let mut c = abcd();
        let out = c.remove_entry(3, Cursor { selected: 1, playing: 2 }, true).unwrap();
        assert_eq!(out, DeleteOutcome::Shifted { cursor: Cursor { selected: 1, playing: 2 } });
    }

    #[test]
    fn deleting_only_track_empties() {
        let mut c: TrackCatalog<8> = TrackCatalog::new();
        c.push("/a.mp3").unwrap();
        let out = c.remove_entry(0, Cursor::default(), true).unwrap();
        assert_eq!(out, DeleteOutcome::Emptied);
        assert_eq!(out.cursor(), Cursor::default());
        assert!(c.is_empty());
    }

    #[test]
    fn position_finds_listed_paths_only() {
        let mut c = abcd();
        assert_eq!(c.position("/music/C.mp3"), Some(2));
        c.remove_entry(1, Cursor::default(), false).unwrap();
        assert_eq!(c.position("/music/C.mp3"), Some(1));
        assert_eq!(c.position("/music/B.mp3"), None);
    }

    #[test]
    fn remove_entry_out_of_bounds() {
        let mut c = abcd();
        assert_eq!(c.remove_entry(4, Cursor::default(), false), Err(IndexError::OutOfBounds));
        assert_eq!(c.len(), 4);
    }
}
