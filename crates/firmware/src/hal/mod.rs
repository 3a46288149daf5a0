//! Display-side collaborator of the UI context.
//!
//! One trait covers the panel, so the board and the desktop host plug in
//! the same way: drawing a [`ui::View`], capturing the frame and driving the
//! backlight.

use ui::{Renderer, ScreenCapture};

/// Player display: renderer, screen capture and backlight PWM.
///
/// Pixel formats, fonts and image decoding live behind this trait.
pub trait PlayerDisplay: Renderer + ScreenCapture {
    /// Drive the backlight at `duty` (0 turns it off).
    fn set_backlight(&mut self, duty: u8);
}
