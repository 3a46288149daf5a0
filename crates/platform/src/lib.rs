//! Hardware Abstraction Layer (HAL) for the card player firmware
//!
//! This crate provides trait-based abstractions for the collaborators the
//! player core talks to, enabling development and testing without physical
//! hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: UI task + audio task)
//!         ↓
//! Feature Layers (playback, ui, library)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! SD card / decode engine / keyboard drivers
//! ```
//!
//! # Abstractions
//!
//! - [`Storage`], [`File`], [`Dir`] - SD card file system access
//! - [`DecodeEngine`] - external MP3/WAV decoder, with [`EngineListener`] callbacks
//! - [`InputDevice`] - keyboard edge events
//! - [`PowerMonitor`] - battery gauge
//!
//! # Features
//!
//! - `std`: `std::fs` backed storage and in-memory mocks (for testing)
//! - `defmt`: Enable `defmt::Format` derives for on-target logging
//!
//! # Example
//!
//! ```no_run
//! use platform::{File, Storage};
//!
//! async fn header<S: Storage>(storage: &mut S) -> Result<[u8; 4], S::Error> {
//!     let mut file = storage.open_file("/music/a.mp3").await?;
//!     let mut buf = [0u8; 4];
//!     file.read(&mut buf).await?;
//!     Ok(buf)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio_types;
pub mod config;
pub mod engine;
pub mod input;
pub mod power;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod storage_local;

pub mod mocks;

// Re-export main high-level traits
pub use audio_types::{Brightness, OutOfRangeError, Volume};
pub use config::PlayerConfig;
pub use engine::{DecodeEngine, EngineListener};
pub use input::{InputDevice, InputEvent, Key};
pub use power::PowerMonitor;
pub use storage::{Dir, DirEntry, EntryKind, File, Storage};
