//! Property-based tests for track advance and image signature search.
#![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use playback::image::{find_start, jpeg_dimensions, ImageFormat};
use playback::{advance, after_track_end, Direction, PlayMode};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn mode(i: u8) -> PlayMode {
    match i % 3 {
        0 => PlayMode::Sequential,
        1 => PlayMode::Random,
        _ => PlayMode::SingleRepeat,
    }
}

fn signature(format: u8) -> (&'static [u8], ImageFormat) {
    match format % 5 {
        0 => (&[0xFF, 0xD8], ImageFormat::Jpeg),
        1 => (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], ImageFormat::Png),
        2 => (b"BM", ImageFormat::Bmp),
        3 => (b"GIF89a", ImageFormat::Gif),
        _ => (b"qoif", ImageFormat::Qoi),
    }
}

proptest! {
    /// Any mix of manual and automatic advances keeps both indices in range.
    #[test]
    fn advances_stay_in_range(
        count in 1usize..100,
        seed in any::<u64>(),
        ops in proptest::collection::vec((0u8..4, 0u8..3), 1..50),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let (mut selected, mut playing) = (0usize, 0usize);
        for (op, m) in ops {
            match op {
                0 => selected = advance(Direction::Forward, mode(m), selected, playing, count, &mut rng),
                1 => selected = advance(Direction::Backward, mode(m), selected, playing, count, &mut rng),
                2 => playing = selected,
                _ => {
                    playing = after_track_end(mode(m), playing, count, &mut rng);
                    selected = playing;
                }
            }
            prop_assert!(selected < count);
            prop_assert!(playing < count);
        }
    }

    /// Manual random advance never lands on the playing track.
    #[test]
    fn random_advance_excludes_playing(count in 2usize..100, playing in 0usize..100, seed in any::<u64>()) {
        let playing = playing % count;
        let mut rng = SmallRng::seed_from_u64(seed);
        let next = advance(Direction::Forward, PlayMode::Random, 0, playing, count, &mut rng);
        prop_assert_ne!(next, playing);
        prop_assert!(next < count);
    }

    /// Two planted signatures: the lower offset wins whatever the formats.
    #[test]
    fn lowest_offset_wins(
        a in 0u8..5, b in 0u8..5,
        first in 0usize..200, gap in 8usize..200,
    ) {
        let (sig_a, fmt_a) = signature(a);
        let (sig_b, _) = signature(b);
        let mut window = vec![0u8; first + gap + 16];
        window[first..first + sig_a.len()].copy_from_slice(sig_a);
        window[first + gap..first + gap + sig_b.len()].copy_from_slice(sig_b);
        prop_assert_eq!(find_start(&window), Some((first, fmt_a)));
    }

    /// Arbitrary bytes never panic the JPEG walker.
    #[test]
    fn jpeg_walker_tolerates_garbage(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = jpeg_dimensions(&bytes, 16384);
    }
}
