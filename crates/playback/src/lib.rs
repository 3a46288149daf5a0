//! Playback core: the state machine, both player contexts and cover art.
//!
//! # Modules
//!
//! - [`state`]: `PlaybackState`, `PlayMode`, `Resume`, `Transport`
//! - [`controller`]: UI-side `PlaybackController` and the index math
//! - [`decode`]: `DecodeContext`, the half that owns the decode engine
//! - [`mailbox`]: single-slot mailboxes and the status snapshot
//! - [`bridge`]: engine callbacks into the metadata store
//! - [`metadata`]: tag-line parsing and `MetadataStore`
//! - [`cover`]: deferred/materialized cover art and display resolution
//! - [`image`]: image signature sniffing and header dimensions
//!
//! The only heap allocation is an optional cached cover buffer; targets
//! that enable caching need a global allocator.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

extern crate alloc;

pub mod bridge;
pub mod controller;
pub mod cover;
pub mod decode;
pub mod image;
pub mod mailbox;
pub mod metadata;
pub mod state;

// Top-level re-exports for convenience
pub use bridge::{BridgeReport, DecoderBridge};
pub use controller::{advance, after_track_end, wrap_step, PlaybackController};
pub use cover::{CoverArt, CoverBuffer, CoverLocation, ResolvedCover};
pub use decode::DecodeContext;
pub use image::{Dimensions, ImageFormat};
pub use mailbox::{AudioInfo, CatalogChange, Mailboxes, PlaybackStatus, SwitchRequest};
pub use metadata::{MetadataStore, TagField, TrackTags};
pub use state::{Direction, PlayMode, PlaybackState, Resume, Transport};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    /// Playback state machine tests
    mod state_tests {
        use crate::state::{PlayMode, PlaybackState, Resume, Transport};

        #[test]
        fn test_initial_state_is_idle() {
            assert_eq!(PlaybackState::default(), PlaybackState::Idle);
        }

        #[test]
        fn test_force_switch_always_plays() {
            for s in [PlaybackState::Idle, PlaybackState::Playing, PlaybackState::Paused] {
                assert_eq!(s.after_switch(Resume::Force), PlaybackState::Playing);
            }
        }

        #[test]
        fn test_preserve_switch_keeps_pause() {
            assert_eq!(PlaybackState::Paused.after_switch(Resume::Preserve), PlaybackState::Paused);
            assert_eq!(PlaybackState::Playing.after_switch(Resume::Preserve), PlaybackState::Playing);
            assert_eq!(PlaybackState::Idle.after_switch(Resume::Preserve), PlaybackState::Playing);
        }

        #[test]
        fn test_pause_resume_transitions() {
            assert_eq!(PlaybackState::Playing.apply(Transport::Pause), PlaybackState::Paused);
            assert_eq!(PlaybackState::Paused.apply(Transport::Resume), PlaybackState::Playing);
        }

        #[test]
        fn test_transport_ignored_when_idle() {
            assert_eq!(PlaybackState::Idle.apply(Transport::Resume), PlaybackState::Idle);
            assert_eq!(PlaybackState::Idle.toggle(), None);
            assert_eq!(PlaybackState::Switching.toggle(), None);
        }

        #[test]
        fn test_mode_cycles_through_three() {
            let m = PlayMode::default();
            assert_eq!(m, PlayMode::Sequential);
            assert_eq!(m.next(), PlayMode::Random);
            assert_eq!(m.next().next(), PlayMode::SingleRepeat);
            assert_eq!(m.next().next().next(), PlayMode::Sequential);
        }

        #[test]
        fn test_mode_labels() {
            assert_eq!(PlayMode::Sequential.label(), "SEQ");
            assert_eq!(PlayMode::Random.label(), "RND");
            assert_eq!(PlayMode::SingleRepeat.label(), "ONE");
        }
    }
}
