use glam::Vec3;
use showroom_core::{fit_to_ground, Aabb, NormalizeError};

const EPS: f32 = 1e-5;

#[test]
fn reference_box_matches_expected_placement() {
    // size=(6,3,2), center=(1,1.5,0); target 6 on ground -1
    let bounds = Aabb::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::new(4.0, 3.0, 1.0));
    let fitted = fit_to_ground(&bounds, 6.0, -1.0).unwrap();

    assert!((fitted.placement.scale - 1.0).abs() < EPS);
    assert!((fitted.post_scale_size - Vec3::new(6.0, 3.0, 2.0)).length() < EPS);
    assert!((fitted.placement.position - Vec3::new(-1.0, 0.5, 0.0)).length() < EPS);
    // Bottom face rests exactly on the ground elevation.
    assert!((fitted.bottom_y() - (-1.0)).abs() < EPS);
    assert_eq!(fitted.placement.rotation_y, 0.0);
}

#[test]
fn render_transform_centers_reference_box_at_origin() {
    // The full render transform (placement matrix with the normalizer's
    // pivot) must land the box center on the y axis and the bottom face on
    // the ground. Subtracting the full box center as the pivot would apply
    // the x/z centering twice and render the model at -center instead.
    let bounds = Aabb::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::new(4.0, 3.0, 1.0));
    let fitted = fit_to_ground(&bounds, 6.0, -1.0).unwrap();
    let m = fitted.placement.matrix(fitted.pivot);

    let world_center = m.transform_point3(bounds.center());
    assert!(world_center.x.abs() < EPS, "center x drifted: {world_center:?}");
    assert!(world_center.z.abs() < EPS, "center z drifted: {world_center:?}");

    let world_bottom = m.transform_point3(Vec3::new(bounds.center().x, bounds.min.y, 0.0));
    assert!((world_bottom.y - (-1.0)).abs() < EPS);
}

#[test]
fn render_transform_rests_scaled_models_on_the_ground() {
    // Off-origin box that needs scale 1.5; the lowest point must still map
    // exactly onto the ground elevation through the matrix.
    let bounds = Aabb::new(Vec3::new(3.0, 7.0, -2.0), Vec3::new(4.5, 9.0, 2.0));
    let fitted = fit_to_ground(&bounds, 6.0, -1.0).unwrap();
    let m = fitted.placement.matrix(fitted.pivot);

    let world_min_y = m.transform_point3(bounds.min).y;
    assert!((world_min_y - (-1.0)).abs() < 1e-4, "bottom at {world_min_y}");

    // The pivot the normalizer hands to the renderer is vertical-only.
    assert_eq!(fitted.pivot.x, 0.0);
    assert_eq!(fitted.pivot.z, 0.0);
    assert!((fitted.pivot.y - bounds.center().y).abs() < EPS);
}

#[test]
fn largest_dimension_matches_target_for_arbitrary_boxes() {
    let cases = [
        (Vec3::new(-0.01, -0.02, -0.005), Vec3::new(0.01, 0.03, 0.02)), // tiny
        (Vec3::new(-120.0, 0.0, -300.0), Vec3::new(80.0, 55.0, 250.0)), // huge
        (Vec3::new(3.0, 7.0, -2.0), Vec3::new(4.5, 9.0, 2.0)),          // off-origin
    ];
    for (min, max) in cases {
        let bounds = Aabb::new(min, max);
        let fitted = fit_to_ground(&bounds, 6.0, -1.0).unwrap();

        let scaled_max = fitted.placement.scale * bounds.max_dimension();
        assert!(
            (scaled_max - 6.0).abs() < 1e-3,
            "scaled max dimension {scaled_max} for box {min:?}..{max:?}"
        );
        assert!((fitted.bottom_y() - (-1.0)).abs() < 1e-3);
    }
}

#[test]
fn scaling_is_uniform_and_preserves_proportions() {
    let bounds = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 4.0, 2.0));
    let fitted = fit_to_ground(&bounds, 5.0, 0.0).unwrap();

    let size = bounds.size();
    let post = fitted.post_scale_size;
    // All axes scaled by the same factor
    assert!((post.x / size.x - post.y / size.y).abs() < EPS);
    assert!((post.y / size.y - post.z / size.z).abs() < EPS);
}

#[test]
fn degenerate_box_is_a_load_failure_not_nan() {
    let zero = Aabb::new(Vec3::ZERO, Vec3::ZERO);
    assert!(matches!(
        fit_to_ground(&zero, 6.0, -1.0),
        Err(NormalizeError::UngeometricAsset)
    ));

    // An empty accumulator (no points folded in) must also fail cleanly.
    let empty = Aabb::empty();
    assert!(fit_to_ground(&empty, 6.0, -1.0).is_err());

    let non_finite = Aabb::new(Vec3::splat(f32::NAN), Vec3::splat(f32::NAN));
    assert!(fit_to_ground(&non_finite, 6.0, -1.0).is_err());
}

#[test]
fn model_never_clips_below_ground() {
    let bounds = Aabb::new(Vec3::new(-1.0, -8.0, -1.0), Vec3::new(1.0, -2.0, 1.0));
    let fitted = fit_to_ground(&bounds, 6.0, -1.0).unwrap();
    assert!(fitted.bottom_y() >= -1.0 - EPS);
}

#[test]
fn aabb_expand_accumulates_points() {
    let mut b = Aabb::empty();
    assert!(b.is_degenerate());
    b.expand(Vec3::new(1.0, 2.0, 3.0));
    b.expand(Vec3::new(-1.0, 0.0, 5.0));
    assert!(!b.is_degenerate());
    assert_eq!(b.min, Vec3::new(-1.0, 0.0, 3.0));
    assert_eq!(b.max, Vec3::new(1.0, 2.0, 5.0));
    assert_eq!(b.center(), Vec3::new(0.0, 1.0, 4.0));
}
