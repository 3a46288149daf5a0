//! Property-based tests for the clamped value newtypes.
//! Verifies invariants hold for ALL inputs, not just fixed examples.

use platform::audio_types::{Brightness, Volume};

proptest::proptest! {
    /// Volume::new never leaves 0..=21 for any u8 input.
    #[test]
    fn volume_new_stays_in_range(raw in 0u8..=255u8) {
        assert!(Volume::new(raw).get() <= Volume::MAX);
    }

    /// Any sequence of volume key presses keeps the value in range.
    #[test]
    fn volume_presses_stay_in_range(start in 0u8..=21u8, presses in proptest::collection::vec(0u8..3, 0..64)) {
        let mut v = Volume::new(start);
        for p in presses {
            v = match p {
                0 => v.louder(),
                1 => v.quieter(),
                _ => v.coarse_step(),
            };
            assert!(v.get() <= Volume::MAX);
        }
    }

    /// Clamping is idempotent: pressing at the limit changes nothing.
    #[test]
    fn volume_clamp_is_idempotent(raw in 0u8..=255u8) {
        let v = Volume::new(raw);
        assert_eq!(Volume::new(v.get()), v);
    }

    /// Brightness cycle visits every level and returns after five presses.
    #[test]
    fn brightness_cycle_has_period_five(level in 0u8..=4u8) {
        let start = Brightness::new(level);
        let mut b = start;
        for _ in 0..5 {
            b = b.cycle();
            assert!(b.get() <= Brightness::MAX);
        }
        assert_eq!(b, start);
    }
}
