#![allow(clippy::float_cmp)]

use super::*;

const TOLERANCE: f64 = 1e-9;

// =============================================================
// Helpers
// =============================================================

/// Fitted (scale 1) size of the test image and its layout center.
const BASE_W: f64 = 300.0;
const BASE_H: f64 = 200.0;
const ORIGIN: Point = Point { x: 640.0, y: 360.0 };

/// The container's on-screen box for a given transform, as the browser
/// would report it with `transform-origin: 50% 50%`.
fn visual_rect(state: &TransformState) -> Rect {
    let w = BASE_W * state.scale;
    let h = BASE_H * state.scale;
    Rect::new(
        ORIGIN.x + state.translate_x - w / 2.0,
        ORIGIN.y + state.translate_y - h / 2.0,
        w,
        h,
    )
}

fn step(state: &mut TransformState, cursor: Point, direction: ZoomDirection) {
    let visual = visual_rect(state);
    zoom_at(state, &ZoomLimits::default(), cursor, visual, direction);
}

fn assert_anchored(before: &TransformState, after: &TransformState, cursor: Point) {
    let a = before.image_point_at(ORIGIN, cursor);
    let b = after.image_point_at(ORIGIN, cursor);
    assert!(
        (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE,
        "image point under cursor moved: {a:?} -> {b:?}"
    );
}

// =============================================================
// Direction
// =============================================================

#[test]
fn wheel_up_zooms_in() {
    assert_eq!(ZoomDirection::from_delta_y(-100.0), ZoomDirection::In);
    assert_eq!(ZoomDirection::from_delta_y(-0.5), ZoomDirection::In);
}

#[test]
fn wheel_down_zooms_out() {
    assert_eq!(ZoomDirection::from_delta_y(100.0), ZoomDirection::Out);
}

#[test]
fn zero_delta_zooms_out() {
    assert_eq!(ZoomDirection::from_delta_y(0.0), ZoomDirection::Out);
}

// =============================================================
// Step size
// =============================================================

#[test]
fn step_is_fixed_per_event() {
    let limits = ZoomLimits::default();
    assert_eq!(limits.step(ZoomDirection::In), 1.12);
    assert_eq!(limits.step(ZoomDirection::Out), 0.88);
}

#[test]
fn single_zoom_in_multiplies_scale() {
    let mut t = TransformState::default();
    step(&mut t, ORIGIN, ZoomDirection::In);
    assert!((t.scale - 1.12).abs() < TOLERANCE);
}

// =============================================================
// Anchoring
// =============================================================

#[test]
fn centered_zoom_keeps_translation_zero() {
    let mut t = TransformState::default();
    step(&mut t, ORIGIN, ZoomDirection::In);
    assert!(t.translate_x.abs() < TOLERANCE);
    assert!(t.translate_y.abs() < TOLERANCE);
}

#[test]
fn off_center_zoom_in_moves_image_away_from_cursor() {
    let mut t = TransformState::default();
    let cursor = Point::new(ORIGIN.x + 100.0, ORIGIN.y);
    step(&mut t, cursor, ZoomDirection::In);
    // (0 - 100) * 1.12 + 100 = -12
    assert!((t.translate_x - -12.0).abs() < TOLERANCE);
    assert!(t.translate_y.abs() < TOLERANCE);
}

#[test]
fn anchoring_holds_for_single_step_from_translated_state() {
    let mut t = TransformState { scale: 2.0, translate_x: 80.0, translate_y: -45.0, drag: None };
    let cursor = Point::new(500.0, 420.0);
    let before = t;
    step(&mut t, cursor, ZoomDirection::In);
    assert_anchored(&before, &t, cursor);
}

#[test]
fn anchoring_holds_across_mixed_sequence() {
    let mut t = TransformState::default();
    let cursors = [
        Point::new(700.0, 300.0),
        Point::new(100.0, 50.0),
        Point::new(640.0, 360.0),
        Point::new(1200.0, 700.0),
        Point::new(-40.0, 900.0),
    ];
    let directions = [
        ZoomDirection::In,
        ZoomDirection::In,
        ZoomDirection::Out,
        ZoomDirection::In,
        ZoomDirection::Out,
        ZoomDirection::Out,
        ZoomDirection::In,
    ];
    for (i, direction) in directions.iter().cycle().take(40).enumerate() {
        let cursor = cursors[i % cursors.len()];
        let before = t;
        step(&mut t, cursor, *direction);
        assert_anchored(&before, &t, cursor);
        assert!(t.scale >= MIN_SCALE && t.scale <= MAX_SCALE);
    }
}

#[test]
fn anchoring_holds_while_zooming_out_below_one() {
    let mut t = TransformState::default();
    let cursor = Point::new(520.0, 410.0);
    for _ in 0..5 {
        let before = t;
        step(&mut t, cursor, ZoomDirection::Out);
        assert_anchored(&before, &t, cursor);
    }
    assert!(t.scale < 1.0);
}

// =============================================================
// Clamping
// =============================================================

#[test]
fn repeated_zoom_in_converges_to_max() {
    let mut t = TransformState::default();
    for _ in 0..100 {
        step(&mut t, ORIGIN, ZoomDirection::In);
    }
    assert_eq!(t.scale, 5.0);
}

#[test]
fn repeated_zoom_out_converges_to_min() {
    let mut t = TransformState::default();
    for _ in 0..100 {
        step(&mut t, ORIGIN, ZoomDirection::Out);
    }
    assert_eq!(t.scale, 0.2);
}

#[test]
fn zoom_in_at_max_leaves_scale_and_translation() {
    let mut t = TransformState { scale: 5.0, translate_x: 33.0, translate_y: -7.0, drag: None };
    let cursor = Point::new(900.0, 100.0);
    step(&mut t, cursor, ZoomDirection::In);
    assert_eq!(t.scale, 5.0);
    assert!((t.translate_x - 33.0).abs() < TOLERANCE);
    assert!((t.translate_y - -7.0).abs() < TOLERANCE);
}

#[test]
fn custom_limits_are_respected() {
    let limits = ZoomLimits { min_scale: 0.5, max_scale: 2.0, in_step: 1.5, out_step: 0.5 };
    let mut t = TransformState::default();
    for _ in 0..4 {
        let visual = visual_rect(&t);
        zoom_at(&mut t, &limits, ORIGIN, visual, ZoomDirection::In);
    }
    assert_eq!(t.scale, 2.0);
    for _ in 0..4 {
        let visual = visual_rect(&t);
        zoom_at(&mut t, &limits, ORIGIN, visual, ZoomDirection::Out);
    }
    assert_eq!(t.scale, 0.5);
}

#[test]
fn limits_from_config() {
    let config = ViewerConfig { min_scale: 0.1, max_scale: 8.0, ..ViewerConfig::default() };
    let limits = ZoomLimits::from(&config);
    assert_eq!(limits.min_scale, 0.1);
    assert_eq!(limits.max_scale, 8.0);
    assert_eq!(limits.in_step, 1.12);
}
