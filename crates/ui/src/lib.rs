//! Player UI: input routing, pages, animations and the render snapshot.
//!
//! # Modules
//!
//! - [`router`]: `UiSession`, the UI context and its key handling
//! - [`navigation`]: page and delete-dialog state
//! - [`screen`]: `Page`
//! - [`list`]: visible track list window and scroll bar
//! - [`now_playing`]: metadata page, album marquee and cover resolution
//! - [`scroll`]: `ScrollAnimator` marquee math
//! - [`spectrum`]: decorative spectrum bars
//! - [`backlight`]: screen on/off and brightness cycling
//! - [`clock`]: elapsed time of the current track
//! - [`battery`]: battery percentage refresh
//! - [`view`]: `View` snapshot plus the `Renderer` and `ScreenCapture` traits
//!
//! Nothing here draws pixels; a [`view::Renderer`] turns a [`View`] into a frame.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

pub mod backlight;
pub mod battery;
pub mod clock;
pub mod list;
pub mod navigation;
pub mod now_playing;
pub mod router;
pub mod screen;
pub mod scroll;
pub mod spectrum;
pub mod view;

// Top-level re-exports for convenience
pub use backlight::Backlight;
pub use battery::BatteryGauge;
pub use clock::TrackClock;
pub use list::{ListLine, ScrollBar, VISIBLE_LINES};
pub use navigation::Navigator;
pub use now_playing::NowPlayingState;
pub use router::{Effect, KeyOutcome, UiSession};
pub use screen::Page;
pub use scroll::{FrameCounter, ScrollAnimator, ScrollField};
pub use spectrum::Spectrum;
pub use view::{Renderer, ScreenCapture, StatusPanel, TagPanel, View};
