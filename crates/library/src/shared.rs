//! Catalog shared between the UI and decode contexts.
//!
//! Only the UI context mutates it (deletion, boot scan); the decode context
//! reads it to resolve the next path on end of track. Every access is a
//! short synchronous section: storage I/O never happens with the lock held.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use platform::storage::Storage;
use tracing::{info, warn};

use crate::catalog::{Cursor, DeleteError, DeleteOutcome, TrackCatalog, TrackPath};

/// A [`TrackCatalog`] behind a blocking mutex.
pub struct SharedCatalog<M: RawMutex, const N: usize> {
    inner: Mutex<M, RefCell<TrackCatalog<N>>>,
}

impl<M: RawMutex, const N: usize> SharedCatalog<M, N> {
    /// Empty catalog; usable in a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(TrackCatalog::new())),
        }
    }

    /// Run `f` with read access.
    pub fn read<R>(&self, f: impl FnOnce(&TrackCatalog<N>) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    /// Swap in a freshly scanned catalog.
    pub fn replace(&self, catalog: TrackCatalog<N>) {
        self.inner.lock(|cell| {
            cell.replace(catalog);
        });
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.read(TrackCatalog::len)
    }

    /// Returns `true` when no tracks are listed.
    pub fn is_empty(&self) -> bool {
        self.read(TrackCatalog::is_empty)
    }

    /// Copy of the path at `index`.
    pub fn path(&self, index: usize) -> Option<TrackPath> {
        self.read(|c| c.get(index).and_then(|p| TrackPath::try_from(p).ok()))
    }

    /// Current index of `path`.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.read(|c| c.position(path))
    }

    /// Delete the file at `index` from storage, then from the list.
    ///
    /// On storage failure nothing changes: the list and the cursor stay
    /// exactly as they were.
    ///
    /// The path is copied out, the storage call runs without the lock, and
    /// the list is only touched once storage has succeeded.
    pub async fn delete_at<S: Storage>(
        &self,
        storage: &mut S,
        index: usize,
        cursor: Cursor,
        was_active: bool,
    ) -> Result<DeleteOutcome, DeleteError<S::Error>> {
        let path = self.path(index).ok_or(DeleteError::OutOfBounds)?;
        if let Err(e) = storage.remove(&path).await {
            warn!("delete {} failed: {:?}", path.as_str(), e);
            return Err(DeleteError::Storage(e));
        }
        info!("deleted {}", path.as_str());
        self.inner
            .lock(|cell| cell.borrow_mut().remove_entry(index, cursor, was_active))
            .map_err(|_| DeleteError::OutOfBounds)
    }
}

impl<M: RawMutex, const N: usize> Default for SharedCatalog<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
