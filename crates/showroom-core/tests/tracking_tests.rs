use showroom_core::{apply_dead_zone, Ewma, HeadSignal, TrackingSample};

#[test]
fn ewma_converges_monotonically_to_constant_target() {
    // From below
    let mut filter = Ewma::new(0.15, 0.0);
    let target = 1.0;
    let mut prev = filter.value();
    for _ in 0..200 {
        let v = filter.update(target);
        assert!(v >= prev, "value regressed: {v} < {prev}");
        assert!(v <= target + 1e-6);
        prev = v;
    }
    assert!((filter.value() - target).abs() < 1e-4);

    // From above
    let mut filter = Ewma::new(0.15, 3.0);
    let mut prev = filter.value();
    for _ in 0..200 {
        let v = filter.update(target);
        assert!(v <= prev);
        assert!(v >= target - 1e-6);
        prev = v;
    }
    assert!((filter.value() - target).abs() < 1e-4);
}

#[test]
fn missing_detection_holds_last_value_exactly() {
    let mut signal = HeadSignal::new(0.15, 0.03);
    signal.observe(Some(TrackingSample {
        x: 0.7,
        y: 0.3,
        z: 0.1,
    }));
    let held = signal.smoothed();

    for _ in 0..50 {
        signal.observe(None);
    }
    // Bit-exact hold; no decay toward zero while the face is lost.
    assert_eq!(signal.smoothed(), held);
}

#[test]
fn dead_zone_maps_small_values_to_exactly_zero() {
    assert_eq!(apply_dead_zone(0.029, 0.03), 0.0);
    assert_eq!(apply_dead_zone(-0.029, 0.03), 0.0);
    assert_eq!(apply_dead_zone(0.0, 0.03), 0.0);
    // At or beyond the threshold the value passes through unchanged.
    assert_eq!(apply_dead_zone(0.03, 0.03), 0.03);
    assert_eq!(apply_dead_zone(-0.5, 0.03), -0.5);
}

#[test]
fn centered_input_inside_dead_zone_never_perturbs_the_signal() {
    let mut signal = HeadSignal::new(0.5, 0.03);
    // x/y within dead zone of the frame center (0.5), any number of frames
    for _ in 0..20 {
        signal.observe(Some(TrackingSample {
            x: 0.52,
            y: 0.48,
            z: 0.0,
        }));
    }
    let (x, y, z) = signal.smoothed();
    assert_eq!(x, 0.0);
    assert_eq!(y, 0.0);
    assert_eq!(z, 0.0);
}

#[test]
fn depth_sign_is_inverted() {
    // Increasing detected depth must drive the smoothed target negative so
    // the camera pulls back rather than forward.
    let mut signal = HeadSignal::new(1.0, 0.03);
    signal.observe(Some(TrackingSample {
        x: 0.5,
        y: 0.5,
        z: 0.2,
    }));
    let (_, _, z) = signal.smoothed();
    assert!((z - (-0.2)).abs() < 1e-6);
}
