//! Scanner: walks an SD card directory tree and collects playable tracks.
//!
//! The walk is depth-first and pre-order, in the order the file system
//! lists entries: a sub-directory's tracks appear where the sub-directory
//! was encountered, before the parent's remaining entries. Nothing is sorted.

use heapless::Vec;
use platform::storage::{Dir, Storage};
use tracing::{debug, warn};

use crate::catalog::{TrackCatalog, TrackPath};

/// Deepest directory nesting the scanner keeps open at once.
///
/// Each open level holds a directory handle plus its path.
pub const MAX_SCAN_DEPTH: usize = 8;

/// Stateless helper for extension filtering and path handling.
pub struct Scanner;

impl Scanner {
    /// Returns `true` when `ext` is a supported audio file extension.
    ///
    /// The comparison is **case-insensitive** and does not allocate.
    ///
    /// Supported extensions: `mp3`, `wav`.
    pub fn is_supported_extension(ext: &str) -> bool {
        ext.eq_ignore_ascii_case("mp3") || ext.eq_ignore_ascii_case("wav")
    }

    /// Returns `true` when the final component of `path` has a supported
    /// extension.
    pub fn is_supported_path(path: &str) -> bool {
        let name = file_name(path);
        name.rsplit_once('.')
            .is_some_and(|(_, ext)| Self::is_supported_extension(ext))
    }

    /// Join a directory path and an entry name with exactly one `/`.
    ///
    /// Returns `None` when the result would not fit in a [`TrackPath`].
    pub fn join(dir: &str, name: &str) -> Option<TrackPath> {
        let mut out = TrackPath::new();
        out.push_str(dir).ok()?;
        if !dir.ends_with('/') {
            out.push('/').ok()?;
        }
        out.push_str(name).ok()?;
        Some(out)
    }
}

/// Final path component.
pub fn file_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Name shown in the track list: final component without its extension.
pub fn display_name(path: &str) -> &str {
    let name = file_name(path);
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

struct Level<D> {
    dir: D,
    path: TrackPath,
    depth: u8,
}

/// Append every supported file under `root` to `catalog`.
///
/// Descends at most `max_depth` directory levels below `root` (and never
/// more than [`MAX_SCAN_DEPTH`]). Stops once the catalog is full. A root
/// that cannot be opened is logged and yields nothing; unreadable
/// sub-directories are logged and skipped.
///
/// Returns the number of tracks added.
pub async fn scan<S: Storage, const N: usize>(
    storage: &mut S,
    root: &str,
    max_depth: u8,
    catalog: &mut TrackCatalog<N>,
) -> usize {
    let Some(root_path) = Scanner::join(root, "") else {
        warn!("scan root too long: {}", root);
        return 0;
    };
    let root_dir = match storage.open_dir(root).await {
        Ok(dir) => dir,
        Err(e) => {
            warn!("cannot open {}: {:?}", root, e);
            return 0;
        }
    };

    let mut stack: Vec<Level<S::Dir>, MAX_SCAN_DEPTH> = Vec::new();
    let _ = stack.push(Level {
        dir: root_dir,
        path: root_path,
        depth: 0,
    });

    let mut added = 0usize;
    while let Some(level) = stack.last_mut() {
        if catalog.is_full() {
            debug!("catalog full after {} tracks", catalog.len());
            break;
        }
        let entry = match level.dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                stack.pop();
                continue;
            }
            Err(e) => {
                warn!("listing {} failed: {:?}", level.path.as_str(), e);
                stack.pop();
                continue;
            }
        };
        let Some(full) = Scanner::join(&level.path, &entry.name) else {
            warn!("path too long, skipped: {}", entry.name.as_str());
            continue;
        };
        let depth = level.depth;

        if entry.is_dir() {
            if depth >= max_depth {
                continue;
            }
            match storage.open_dir(&full).await {
                Ok(dir) => {
                    let child = Level {
                        dir,
                        path: full,
                        depth: depth.saturating_add(1),
                    };
                    if stack.push(child).is_err() {
                        warn!("directory nesting too deep, skipped");
                    }
                }
                Err(e) => warn!("cannot open {}: {:?}", full.as_str(), e),
            }
        } else if Scanner::is_supported_path(&full) {
            if catalog.push(&full).is_ok() {
                added = added.saturating_add(1);
            }
        }
    }
    debug!("scanned {}: {} tracks", root, added);
    added
}
