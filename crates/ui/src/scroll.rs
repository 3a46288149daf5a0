//! Marquee scrolling for text wider than its field.
//!
//! A field starts at its initial offset, waits for the configured delay
//! after gaining focus, then moves left by a fixed step on every scroll
//! frame. Once the text's right edge passes the field's left boundary it
//! re-enters from the right boundary.
//!
//! ```text
//!   left            right
//!    │ Kind of Blue  │        position = initial
//!    │d of Blue      │        after a few scroll frames
//!    │               │Kind    right edge passed left → position = right
//! ```

use embassy_time::{Duration, Instant};
use platform::config::ScrollConfig;

/// Approximate glyph advance used to estimate text width.
pub const CHAR_WIDTH_PX: i32 = 5;

/// Estimated pixel width of `text`.
pub fn text_width(text: &str) -> i32 {
    let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
    chars.saturating_mul(CHAR_WIDTH_PX)
}

/// Geometry of a scrollable field, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollField {
    /// Position after a focus change
    pub initial: i32,
    /// Left clip boundary
    pub left: i32,
    /// Right boundary; wrapped text re-enters here
    pub right: i32,
    /// Only scroll when the text does not fit between `left` and `right`
    pub overflow_only: bool,
}

/// The selected line of the track list.
pub const LIST_FIELD: ScrollField = ScrollField {
    initial: 8,
    left: 8,
    right: 128,
    overflow_only: false,
};

/// The album line under the cover on the metadata page.
pub const ALBUM_FIELD: ScrollField = ScrollField {
    initial: 0,
    left: 0,
    right: 96,
    overflow_only: true,
};

impl ScrollField {
    fn fits(&self, width: i32) -> bool {
        width <= self.right.saturating_sub(self.left)
    }
}

/// Per-field scroll state.
#[derive(Debug, Clone, Copy)]
pub struct ScrollAnimator {
    field: ScrollField,
    position: i32,
    focused_since: Instant,
    focus: Option<usize>,
}

impl ScrollAnimator {
    /// Animator at the initial position, focused since `now`.
    pub fn new(field: ScrollField, now: Instant) -> Self {
        Self {
            field,
            position: field.initial,
            focused_since: now,
            focus: None,
        }
    }

    /// Current x offset.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Field geometry.
    pub fn field(&self) -> ScrollField {
        self.field
    }

    /// Focus item `key`. A different key restarts from the initial offset.
    ///
    /// Returns `true` when the focus changed.
    pub fn focus(&mut self, key: usize, now: Instant) -> bool {
        if self.focus == Some(key) {
            return false;
        }
        self.focus = Some(key);
        self.reset(now);
        true
    }

    /// Back to the initial offset and restart the delay.
    pub fn reset(&mut self, now: Instant) {
        self.position = self.field.initial;
        self.focused_since = now;
    }

    fn focused_for(&self, now: Instant) -> Duration {
        now.checked_duration_since(self.focused_since)
            .unwrap_or(Duration::from_ticks(0))
    }

    /// Advance one UI frame.
    ///
    /// `scroll_frame` is the throttle (true on every Nth frame). Returns
    /// `true` when the position changed.
    pub fn tick(
        &mut self,
        now: Instant,
        scroll_frame: bool,
        text_width: i32,
        config: &ScrollConfig,
    ) -> bool {
        if self.field.overflow_only && self.field.fits(text_width) {
            let moved = self.position != self.field.initial;
            self.position = self.field.initial;
            return moved;
        }
        if !scroll_frame || self.focused_for(now) < config.delay {
            return false;
        }
        self.position = self.position.saturating_sub(config.step_px);
        if self.position.saturating_add(text_width) < self.field.left {
            self.position = self.field.right;
        }
        true
    }
}

/// Counts UI frames and flags every Nth one as a scroll frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCounter {
    every: u8,
    count: u8,
}

impl FrameCounter {
    /// Flag every `every`th frame (at least every frame).
    pub fn new(every: u8) -> Self {
        Self {
            every: every.max(1),
            count: 0,
        }
    }

    /// Count a frame; `true` on every Nth call.
    pub fn tick(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        if self.count >= self.every {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn waits_for_delay_before_moving() {
        let cfg = ScrollConfig::default();
        let mut a = ScrollAnimator::new(LIST_FIELD, at(0));
        a.focus(1, at(0));
        assert!(!a.tick(at(999), true, 400, &cfg));
        assert_eq!(a.position(), 8);
        assert!(a.tick(at(1000), true, 400, &cfg));
        assert_eq!(a.position(), 6);
    }

    #[test]
    fn only_scroll_frames_move() {
        let cfg = ScrollConfig::default();
        let mut a = ScrollAnimator::new(LIST_FIELD, at(0));
        assert!(!a.tick(at(5000), false, 400, &cfg));
        assert_eq!(a.position(), 8);
    }

    #[test]
    fn wraps_to_right_and_never_drifts_further() {
        let cfg = ScrollConfig::default();
        let width = 20;
        let mut a = ScrollAnimator::new(LIST_FIELD, at(0));
        let mut wrapped = false;
        for i in 0..200 {
            a.tick(at(1000 + i), true, width, &cfg);
            assert!(a.position() + width >= LIST_FIELD.left);
            if a.position() == LIST_FIELD.right {
                wrapped = true;
            }
        }
        assert!(wrapped);
    }

    #[test]
    fn focus_change_resets_position_and_delay() {
        let cfg = ScrollConfig::default();
        let mut a = ScrollAnimator::new(LIST_FIELD, at(0));
        a.focus(0, at(0));
        a.tick(at(2000), true, 400, &cfg);
        assert_ne!(a.position(), 8);

        assert!(a.focus(1, at(2000)));
        assert_eq!(a.position(), 8);
        assert!(!a.tick(at(2500), true, 400, &cfg));
        assert!(!a.focus(1, at(2600)));
    }

    #[test]
    fn overflow_only_field_stays_put_when_text_fits() {
        let cfg = ScrollConfig::default();
        let mut a = ScrollAnimator::new(ALBUM_FIELD, at(0));
        assert!(!a.tick(at(5000), true, 90, &cfg));
        assert_eq!(a.position(), 0);
        assert!(a.tick(at(5000), true, 200, &cfg));
        assert_eq!(a.position(), -2);
    }

    #[test]
    fn frame_counter_flags_every_fourth() {
        let mut f = FrameCounter::new(4);
        let flags: Vec<bool> = (0..8).map(|_| f.tick()).collect();
        assert_eq!(flags, [false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn text_width_counts_chars() {
        assert_eq!(text_width("héllo"), 25);
        assert_eq!(text_width(""), 0);
    }
}
