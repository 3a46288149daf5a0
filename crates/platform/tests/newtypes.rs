//! Range enforcement tests for the clamped value newtypes.

// ── Volume ───────────────────────────────────────────────────────────────────

#[test]
fn volume_new_clamps_over_21() {
    use platform::audio_types::Volume;
    let v = Volume::new(150);
    assert_eq!(v.get(), 21, "Volume::new(150) should clamp to 21");
}

#[test]
fn volume_try_new_rejects_over_21() {
    use platform::audio_types::Volume;
    let err = Volume::try_new(22).unwrap_err();
    assert_eq!(err.max, 21);
    assert_eq!(err.value, 22);
    assert!(Volume::try_new(21).is_ok());
}

#[test]
fn volume_defaults_to_10() {
    use platform::audio_types::Volume;
    assert_eq!(Volume::default().get(), 10);
}

#[test]
fn volume_steps_saturate_at_both_ends() {
    use platform::audio_types::Volume;
    assert_eq!(Volume::new(21).louder().get(), 21);
    assert_eq!(Volume::new(0).quieter().get(), 0);
    assert_eq!(Volume::new(7).louder().get(), 8);
    assert_eq!(Volume::new(7).quieter().get(), 6);
}

#[test]
fn volume_coarse_step_wraps_back_to_5() {
    use platform::audio_types::Volume;
    assert_eq!(Volume::new(10).coarse_step().get(), 15);
    assert_eq!(Volume::new(15).coarse_step().get(), 20);
    assert_eq!(Volume::new(20).coarse_step().get(), 5);
    assert_eq!(Volume::new(16).coarse_step().get(), 5);
    assert_eq!(Volume::new(0).coarse_step().get(), 5);
}

#[test]
fn volume_is_one_byte() {
    use platform::audio_types::Volume;
    assert_eq!(core::mem::size_of::<Volume>(), 1);
}

// ── Brightness ───────────────────────────────────────────────────────────────

#[test]
fn brightness_cycles_through_all_levels() {
    use platform::audio_types::Brightness;
    let mut b = Brightness::new(0);
    let mut duties = Vec::new();
    for _ in 0..6 {
        duties.push(b.duty());
        b = b.cycle();
    }
    assert_eq!(duties, vec![60, 120, 180, 220, 255, 60]);
}

#[test]
fn brightness_defaults_to_level_2() {
    use platform::audio_types::Brightness;
    assert_eq!(Brightness::default().get(), 2);
    assert_eq!(Brightness::default().duty(), 180);
}

#[test]
fn brightness_try_new_rejects_over_4() {
    use platform::audio_types::Brightness;
    assert!(Brightness::try_new(5).is_err());
    assert_eq!(Brightness::new(9).get(), 4);
}
