//! Tests for smoothing output accuracy against expected values

use std::f64::consts::PI;

use approx::assert_relative_eq;
use virtual_tryon::smoothing::{blend_angle, lerp, OverlayMeasurement, OverlaySmoother, OverlayUpdate};

fn show(update: OverlayUpdate) -> OverlayMeasurement {
    match update {
        OverlayUpdate::Show(placement) => placement,
        other => panic!("expected Show, got {other:?}"),
    }
}

fn measurement(center_x: f64, center_y: f64, width: f64, rotation_rad: f64) -> OverlayMeasurement {
    OverlayMeasurement {
        center_x,
        center_y,
        width,
        height: None,
        rotation_rad,
    }
}

/// Each scalar field moves 35% of the way toward the raw measurement
#[test]
fn test_blend_accuracy() {
    let mut smoother = OverlaySmoother::new(0.35, 6);

    let first = show(smoother.observe(Some(&measurement(100.0, 50.0, 200.0, 0.2))));
    assert_eq!(first, measurement(100.0, 50.0, 200.0, 0.2), "First value initializes the state");

    let second = show(smoother.observe(Some(&measurement(200.0, 150.0, 100.0, 0.4))));
    assert_relative_eq!(second.center_x, 135.0, epsilon = 1e-12);
    assert_relative_eq!(second.center_y, 85.0, epsilon = 1e-12);
    assert_relative_eq!(second.width, 165.0, epsilon = 1e-12);
    assert_relative_eq!(second.rotation_rad, 0.27, epsilon = 1e-12);

    let third = show(smoother.observe(Some(&measurement(200.0, 150.0, 100.0, 0.4))));
    assert_relative_eq!(third.center_x, 135.0 + (200.0 - 135.0) * 0.35, epsilon = 1e-12);
}

/// A constant input stream converges onto the input
#[test]
fn test_convergence_accuracy() {
    let mut smoother = OverlaySmoother::new(0.35, 6);
    let target = measurement(512.0, 384.0, 240.0, 0.1);

    let mut last = show(smoother.observe(Some(&measurement(0.0, 0.0, 10.0, -0.5))));
    for _ in 0..100 {
        last = show(smoother.observe(Some(&target)));
    }

    assert_relative_eq!(last.center_x, 512.0, epsilon = 1e-6);
    assert_relative_eq!(last.center_y, 384.0, epsilon = 1e-6);
    assert_relative_eq!(last.width, 240.0, epsilon = 1e-6);
    assert_relative_eq!(last.rotation_rad, 0.1, epsilon = 1e-6);
}

/// Rotation takes the short arc across the +/-PI boundary
#[test]
fn test_rotation_wrap_accuracy() {
    // Direct helper behavior at the boundary.
    let blended = blend_angle(3.0, -3.0, 0.35);
    assert_relative_eq!(blended, 3.0 + (2.0 * PI - 6.0) * 0.35, epsilon = 1e-12);
    assert!(blended > 3.0, "Blend should move toward PI, not back through 0");

    let reverse = blend_angle(-3.0, 3.0, 0.35);
    assert!(reverse < -3.0, "Blend should move toward -PI, not forward through 0");

    // The step never exceeds PI in magnitude.
    for (previous, next) in [(3.1, -3.1), (-3.1, 3.1), (0.5, -0.5), (PI, -PI)] {
        let result = blend_angle(previous, next, 0.35);
        assert!(
            (result - previous).abs() <= PI,
            "Discontinuous jump blending {previous} -> {next}: got {result}"
        );
    }
}

/// Interior angles blend exactly like plain scalars
#[test]
fn test_rotation_interior_accuracy() {
    assert_relative_eq!(blend_angle(0.2, 0.6, 0.35), lerp(0.2, 0.6, 0.35), epsilon = 1e-12);
    assert_relative_eq!(blend_angle(1.0, -1.0, 0.5), 0.0, epsilon = 1e-12);
}

/// Height appears mid-stream without a jump and then blends normally
#[test]
fn test_height_seeding_accuracy() {
    let mut smoother = OverlaySmoother::new(0.35, 6);
    smoother.observe(Some(&measurement(0.0, 0.0, 100.0, 0.0)));

    let mut with_height = measurement(0.0, 0.0, 100.0, 0.0);
    with_height.height = Some(80.0);
    let seeded = show(smoother.observe(Some(&with_height)));
    assert_eq!(seeded.height, Some(80.0), "Seed from the incoming value before blending");

    with_height.height = Some(180.0);
    let blended = show(smoother.observe(Some(&with_height)));
    assert_relative_eq!(blended.height.unwrap(), 80.0 + (180.0 - 80.0) * 0.35, epsilon = 1e-12);
}

/// An aspect-locked stream never grows a height
#[test]
fn test_aspect_locked_stream_stays_heightless() {
    let mut smoother = OverlaySmoother::new(0.35, 6);

    for i in 0..10 {
        let placed = show(smoother.observe(Some(&measurement(f64::from(i), 0.0, 50.0, 0.0))));
        assert!(placed.height.is_none());
    }
}

/// Exactly six consecutive misses hide the overlay; five do not
#[test]
fn test_miss_policy_accuracy() {
    let mut smoother = OverlaySmoother::new(0.35, 6);
    smoother.observe(Some(&measurement(10.0, 10.0, 10.0, 0.0)));

    let mut updates = Vec::new();
    for _ in 0..6 {
        updates.push(smoother.observe(None));
    }

    assert!(updates[..5].iter().all(|update| *update == OverlayUpdate::Keep));
    assert_eq!(updates[5], OverlayUpdate::Hide);
    assert!(smoother.state().is_none(), "Hide deletes the smoothed state");

    // Recovery after a fresh detection adopts the measurement verbatim.
    let fresh = measurement(77.0, 88.0, 99.0, 0.3);
    assert_eq!(show(smoother.observe(Some(&fresh))), fresh);
}
