//! Local filesystem Storage implementation for desktop runs and tooling.
//!
//! `LocalFileStorage` implements `platform::Storage` using `std::fs`.
//! Used when the `std` feature is enabled. Player paths are absolute
//! (`/music/a.mp3`); they are resolved below the `card_root` given at
//! construction, which stands in for the SD card's root directory.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::storage::{Dir, DirEntry, EntryKind, File, Storage};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub struct LocalStorageError(pub std::io::Error);

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "local storage error: {}", self.0)
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// An open file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Read::read(&mut self.inner, buf).map_err(LocalStorageError)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        Seek::seek(&mut self.inner, SeekFrom::Start(pos)).map_err(LocalStorageError)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A directory listing on the local filesystem.
///
/// Entries whose names are not UTF-8 or longer than the entry name limit
/// are skipped.
pub struct LocalDir {
    inner: fs::ReadDir,
}

impl Dir for LocalDir {
    type Error = LocalStorageError;

    async fn next_entry(&mut self) -> Result<Option<DirEntry>, Self::Error> {
        for entry in self.inner.by_ref() {
            let entry = entry.map_err(LocalStorageError)?;
            let file_type = entry.file_type().map_err(LocalStorageError)?;
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let Some(name) = entry.file_name().to_str().and_then(|n| DirEntry::new(n, kind)) else {
                continue;
            };
            return Ok(Some(name));
        }
        Ok(None)
    }
}

/// A `platform::Storage` implementation backed by `std::fs`.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
/// let mut storage = LocalFileStorage::new("/media/sdcard");
/// let file = storage.open_file("/music/a.mp3").await.unwrap();
/// # }
/// ```
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a new storage rooted at `card_root`.
    #[must_use]
    pub fn new(card_root: &str) -> Self {
        Self {
            root: PathBuf::from(card_root),
        }
    }

    /// Create from the `CARD_ROOT` environment variable.
    ///
    /// Returns `None` if `CARD_ROOT` is not set or is not valid UTF-8.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("CARD_ROOT").ok().map(|p| Self::new(&p))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;
    type File = LocalFile;
    type Dir = LocalDir;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let full = self.resolve(path);
        let file = fs::File::open(&full).map_err(LocalStorageError)?;
        let meta = file.metadata().map_err(LocalStorageError)?;
        Ok(LocalFile {
            inner: file,
            size: meta.len(),
        })
    }

    async fn open_dir(&mut self, path: &str) -> Result<Self::Dir, Self::Error> {
        let inner = fs::read_dir(self.resolve(path)).map_err(LocalStorageError)?;
        Ok(LocalDir { inner })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path).exists())
    }

    async fn remove(&mut self, path: &str) -> Result<(), Self::Error> {
        fs::remove_file(self.resolve(path)).map_err(LocalStorageError)
    }

    async fn create_dir(&mut self, path: &str) -> Result<(), Self::Error> {
        fs::create_dir(self.resolve(path)).map_err(LocalStorageError)
    }
}
