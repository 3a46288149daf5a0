//! Storage abstraction for file systems
//!
//! Paths are absolute, `/`-separated strings (`/music/track.mp3`). Directory
//! iteration order is whatever the underlying file system yields; callers
//! must not assume it is sorted, only that it is stable for one listing.

/// Maximum length of a single directory entry name.
pub const MAX_NAME_LEN: usize = 128;

/// Storage trait for file system access
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;
    /// File type
    type File: File<Error = Self::Error>;
    /// Directory listing type
    type Dir: Dir<Error = Self::Error>;

    /// Open file for reading
    fn open_file(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File, Self::Error>>;

    /// Open a directory for enumeration.
    ///
    /// Fails if `path` does not exist or is not a directory.
    fn open_dir(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::Dir, Self::Error>>;

    /// Check if path exists
    fn exists(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<bool, Self::Error>>;

    /// Delete a file
    fn remove(&mut self, path: &str)
        -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Create a directory (parent must exist)
    fn create_dir(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// File trait for reading files
pub trait File {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read from current position
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Seek to position
    fn seek(&mut self, pos: u64) -> impl core::future::Future<Output = Result<u64, Self::Error>>;

    /// Get file size
    fn size(&self) -> u64;

    /// Fill `buf` from the current position, stopping early only at end of file.
    ///
    /// Returns the number of bytes read.
    fn read_full(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>> {
        async move {
            let mut filled = 0usize;
            while let Some(rest) = buf.get_mut(filled..) {
                if rest.is_empty() {
                    break;
                }
                let n = self.read(rest).await?;
                if n == 0 {
                    break;
                }
                filled = filled.saturating_add(n);
            }
            Ok(filled)
        }
    }
}

/// Directory listing, yielding one entry per call.
pub trait Dir {
    /// Error type
    type Error: core::fmt::Debug;

    /// Next entry, or `None` once the listing is exhausted.
    fn next_entry(
        &mut self,
    ) -> impl core::future::Future<Output = Result<Option<DirEntry>, Self::Error>>;
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryKind {
    /// Regular file
    File,
    /// Sub-directory
    Directory,
}

/// One entry of a directory listing (name only, no parent path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name
    pub name: heapless::String<MAX_NAME_LEN>,
    /// File or directory
    pub kind: EntryKind,
}

impl DirEntry {
    /// Build an entry, returning `None` if the name exceeds [`MAX_NAME_LEN`].
    pub fn new(name: &str, kind: EntryKind) -> Option<Self> {
        let mut owned = heapless::String::new();
        owned.push_str(name).ok()?;
        Some(Self { name: owned, kind })
    }

    /// True for sub-directories
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
