// Sanity checks on tuning constants and their relationships.

use showroom_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    // EWMA weight must be a valid first-order filter coefficient
    assert!(SMOOTHING_ALPHA > 0.0 && SMOOTHING_ALPHA <= 1.0);

    // Dead zone is a small positive band around the frame center
    assert!(DEAD_ZONE > 0.0 && DEAD_ZONE < 0.5);

    // The landmark handed to the detector must exist in the 468-point mesh
    assert!(NOSE_LANDMARK_INDEX < 468);

    // Placement targets
    assert!(TARGET_SIZE > 0.0);
    assert!(GROUND_EXTENT > TARGET_SIZE);
    assert!(GROUND_SHADOW_OPACITY > 0.0 && GROUND_SHADOW_OPACITY <= 1.0);

    // Gains, clamps and scales must all be positive
    assert!(X_GAIN > 0.0 && Y_GAIN > 0.0 && DEPTH_GAIN > 0.0);
    assert!(X_OFFSET_CLAMP > 0.0 && Y_OFFSET_CLAMP > 0.0);
    assert!(X_SCALE > 0.0 && Y_SCALE > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn camera_constants_have_logical_relationships() {
    assert!(MIN_CAMERA_DISTANCE < MAX_CAMERA_DISTANCE);
    // The base pose must sit inside the permitted depth range, otherwise the
    // rig would jump on the very first tick.
    assert!(CAMERA_BASE[2] >= MIN_CAMERA_DISTANCE && CAMERA_BASE[2] <= MAX_CAMERA_DISTANCE);

    assert!(CAMERA_NEAR > 0.0);
    assert!(CAMERA_NEAR < CAMERA_FAR);
    assert!(CAMERA_FOV_DEGREES > 0.0 && CAMERA_FOV_DEGREES < 180.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn lighting_constants_are_positive() {
    assert!(MAIN_LIGHT_INTENSITY > 0.0);
    assert!(FILL_LIGHT_INTENSITY > 0.0);
    assert!(AMBIENT_INTENSITY > 0.0);
    // Both key lights sit above the ground plane
    assert!(MAIN_LIGHT_POS[1] > GROUND_Y);
    assert!(FILL_LIGHT_POS[1] > GROUND_Y);
}
