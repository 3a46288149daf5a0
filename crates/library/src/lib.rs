//! Track catalog: SD card scan, ordered path list, deletion with renumbering.
//!
//! # Modules
//!
//! - [`catalog`]: `TrackCatalog<N>` fixed-capacity path list and cursor renumbering
//! - [`scanner`]: recursive directory walk and extension filtering
//! - [`shared`]: `SharedCatalog`, the catalog as seen by both player contexts

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod catalog;
pub mod scanner;
pub mod shared;

// Top-level re-exports for convenience
pub use catalog::{
    renumber_after_delete, Catalog, Cursor, DeleteError, DeleteOutcome, IndexError, TrackCatalog,
    TrackPath,
};
pub use scanner::{display_name, Scanner};
pub use shared::SharedCatalog;
