//! Property-based tests for the marquee and the track list window.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use embassy_time::{Duration, Instant};
use library::TrackCatalog;
use platform::config::ScrollConfig;
use proptest::prelude::*;
use ui::list::{visible_lines, VISIBLE_LINES};
use ui::scroll::{ScrollAnimator, ALBUM_FIELD, LIST_FIELD};

fn catalog(count: usize) -> TrackCatalog<32> {
    let mut c = TrackCatalog::new();
    for i in 0..count {
        c.push(&format!("/music/Track {i}.mp3")).unwrap();
    }
    c
}

proptest! {
    /// Scrolled text never leaves the field entirely: either part of it is
    /// still right of the left boundary or it has re-entered at the right.
    #[test]
    fn marquee_stays_in_reach_of_the_field(
        width in 0i32..600,
        step in 1i32..12,
        frames in proptest::collection::vec(any::<bool>(), 1..400),
        album in any::<bool>(),
    ) {
        let field = if album { ALBUM_FIELD } else { LIST_FIELD };
        let config = ScrollConfig {
            delay: Duration::from_millis(0),
            step_px: step,
            throttle_frames: 1,
        };
        let mut scroll = ScrollAnimator::new(field, Instant::from_millis(0));
        for (i, scroll_frame) in frames.into_iter().enumerate() {
            scroll.tick(Instant::from_millis(i as u64 * 50), scroll_frame, width, &config);
            let pos = scroll.position();
            prop_assert!(pos + width >= field.left || pos == field.right);
            prop_assert!(pos <= field.right.max(field.initial));
        }
    }

    /// Text that fits never moves in an overflow-only field.
    #[test]
    fn fitting_album_stays_put(
        width in 0i32..=96,
        frames in 1usize..200,
    ) {
        let config = ScrollConfig {
            delay: Duration::from_millis(0),
            step_px: 3,
            throttle_frames: 1,
        };
        let mut scroll = ScrollAnimator::new(ALBUM_FIELD, Instant::from_millis(0));
        for i in 0..frames {
            prop_assert!(!scroll.tick(Instant::from_millis(i as u64 * 50), true, width, &config));
            prop_assert_eq!(scroll.position(), ALBUM_FIELD.initial);
        }
    }

    /// The visible window always shows the selection, and only it is
    /// highlighted.
    #[test]
    fn window_contains_the_selection(
        count in 1usize..32,
        sel in 0usize..32,
        play in proptest::option::of(0usize..32),
    ) {
        let c = catalog(count);
        let selected = sel % count;
        let playing = play.map(|p| p % count);
        let lines = visible_lines(&c, selected, playing, -4, LIST_FIELD.initial);

        prop_assert!(lines.len() <= VISIBLE_LINES);
        prop_assert_eq!(lines.len(), count.min(VISIBLE_LINES).min(count - lines[0].index));
        let highlighted: Vec<_> = lines.iter().filter(|l| l.selected).collect();
        prop_assert_eq!(highlighted.len(), 1);
        prop_assert_eq!(highlighted[0].index, selected);
        prop_assert_eq!(highlighted[0].x, -4);
        prop_assert!(lines.windows(2).all(|w| w[1].index == w[0].index + 1));
    }
}
