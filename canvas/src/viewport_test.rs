#![allow(clippy::float_cmp)]

use super::*;
use crate::gesture::GestureKind;

const EPSILON: f64 = 1e-9;

fn mouse(x: f64, y: f64) -> Pointer {
    Pointer::mouse(Point::new(x, y))
}

fn wheel(dy: f64) -> WheelDelta {
    WheelDelta { dx: 0.0, dy }
}

fn viewport() -> Viewport {
    Viewport::new(800.0, 600.0)
}

// =============================================================
// Pan
// =============================================================

#[test]
fn pan_adds_screen_delta_without_scale_division() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera { pan_x: 10.0, pan_y: 20.0, zoom: 2.0 };
    let change = ctl.begin_pan(&mouse(100.0, 100.0));
    assert_eq!(change.cursor, Some(CursorMode::Panning));
    assert!(ctl.pan_move(&mouse(130.0, 90.0), &mut camera).camera);
    assert!(ctl.pan_move(&mouse(140.0, 95.0), &mut camera).camera);
    assert_eq!(camera.pan_x, 50.0);
    assert_eq!(camera.pan_y, 15.0);
    assert_eq!(camera.zoom, 2.0);
}

#[test]
fn pan_end_resets_cursor_immediately() {
    let mut ctl = CameraController::new(GestureLocks::new());
    ctl.begin_pan(&mouse(0.0, 0.0));
    let change = ctl.end_pan(mouse(0.0, 0.0).id);
    assert_eq!(change.cursor, Some(CursorMode::Default));
    assert!(!ctl.is_panning());
}

#[test]
fn pan_refused_while_note_gesture_active() {
    let locks = GestureLocks::new();
    let mut ctl = CameraController::new(locks.clone());
    let _guard = locks.acquire(GestureKind::Drag);
    assert!(ctl.begin_pan(&mouse(0.0, 0.0)).is_empty());
    assert!(!ctl.is_panning());
}

#[test]
fn pan_frame_skipped_while_note_gesture_active() {
    let locks = GestureLocks::new();
    let mut ctl = CameraController::new(locks.clone());
    let mut camera = Camera::default();
    ctl.begin_pan(&mouse(0.0, 0.0));
    {
        let _guard = locks.acquire(GestureKind::Resize);
        assert!(ctl.pan_move(&mouse(50.0, 50.0), &mut camera).is_empty());
    }
    assert_eq!(camera, Camera::default());
    // The skipped frame is not replayed once the flag clears.
    ctl.pan_move(&mouse(60.0, 55.0), &mut camera);
    assert_eq!((camera.pan_x, camera.pan_y), (10.0, 5.0));
}

#[test]
fn pan_ignores_other_pointer() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera::default();
    ctl.begin_pan(&Pointer::touch(1, true, Point::new(0.0, 0.0)));
    let other = Pointer::touch(9, false, Point::new(100.0, 0.0));
    assert!(ctl.pan_move(&other, &mut camera).is_empty());
    assert!(ctl.end_pan(other.id).is_empty());
    assert!(ctl.is_panning());
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_scales_by_delta() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera::default();
    let change = ctl.wheel(wheel(-100.0), viewport(), &mut camera, 0.0);
    assert!(change.camera);
    assert_eq!(change.cursor, Some(CursorMode::Scaling));
    assert!((camera.zoom - 1.1).abs() < EPSILON);
}

#[test]
fn wheel_zoom_keeps_viewport_center_fixed() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera { pan_x: -130.0, pan_y: 45.0, zoom: 0.8 };
    let center = viewport().center();
    for dy in [-120.0, 53.0, -7.5, 300.0, -999.0] {
        let before = camera.screen_to_world(center);
        ctl.wheel(wheel(dy), viewport(), &mut camera, 0.0);
        let after = camera.world_to_screen(before);
        assert!((after.x - center.x).abs() < EPSILON);
        assert!((after.y - center.y).abs() < EPSILON);
    }
}

#[test]
fn wheel_scale_stays_clamped() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera::default();
    for _ in 0..100 {
        ctl.wheel(wheel(-5000.0), viewport(), &mut camera, 0.0);
        assert!(camera.zoom <= 2.0);
    }
    assert_eq!(camera.zoom, 2.0);
    for _ in 0..100 {
        ctl.wheel(wheel(5000.0), viewport(), &mut camera, 0.0);
        assert!(camera.zoom >= 0.5);
    }
    assert_eq!(camera.zoom, 0.5);
}

#[test]
fn wheel_at_limit_reports_no_camera_change() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera { pan_x: 0.0, pan_y: 0.0, zoom: 2.0 };
    let change = ctl.wheel(wheel(-50.0), viewport(), &mut camera, 0.0);
    assert!(!change.camera);
}

#[test]
fn wheel_ignored_during_note_gesture() {
    let locks = GestureLocks::new();
    let mut ctl = CameraController::new(locks.clone());
    let mut camera = Camera::default();
    let _guard = locks.acquire(GestureKind::Rotate);
    assert!(ctl.wheel(wheel(-100.0), viewport(), &mut camera, 0.0).is_empty());
    assert_eq!(camera.zoom, 1.0);
}

#[test]
fn scaling_cursor_reverts_after_quiet_period() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera::default();
    ctl.wheel(wheel(-10.0), viewport(), &mut camera, 1000.0);
    assert!(ctl.poll(1299.0).is_empty());
    ctl.wheel(wheel(-10.0), viewport(), &mut camera, 1200.0);
    assert!(ctl.poll(1450.0).is_empty());
    assert_eq!(ctl.poll(1500.0).cursor, Some(CursorMode::Default));
    assert_eq!(ctl.cursor_mode(), CursorMode::Default);
    assert!(ctl.poll(5000.0).is_empty());
}

#[test]
fn custom_cursor_reset_delay() {
    let mut ctl = CameraController::with_cursor_reset(GestureLocks::new(), 50.0);
    let mut camera = Camera::default();
    ctl.wheel(wheel(-10.0), viewport(), &mut camera, 0.0);
    assert_eq!(ctl.poll(50.0).cursor, Some(CursorMode::Default));
}

// =============================================================
// Pinch
// =============================================================

fn finger(id: i32, x: f64, y: f64) -> Pointer {
    Pointer::touch(id, id == 1, Point::new(x, y))
}

#[test]
fn second_finger_starts_pinch_and_stops_pan() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let camera = Camera::default();
    ctl.touch_down(&finger(1, 100.0, 100.0), &camera);
    ctl.begin_pan(&finger(1, 100.0, 100.0));
    assert!(ctl.is_panning());
    ctl.touch_down(&finger(2, 300.0, 100.0), &camera);
    assert!(ctl.is_pinching());
    assert!(!ctl.is_panning());
}

#[test]
fn pinch_scales_by_finger_distance_ratio() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera::default();
    ctl.touch_down(&finger(1, 100.0, 100.0), &camera);
    ctl.touch_down(&finger(2, 300.0, 100.0), &camera);
    ctl.touch_move(&finger(2, 400.0, 100.0), &mut camera);
    assert!((camera.zoom - 1.5).abs() < EPSILON);
}

#[test]
fn pinch_anchors_at_pinch_origin() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera { pan_x: 40.0, pan_y: -25.0, zoom: 1.2 };
    let origin = Point::new(200.0, 100.0);
    let before = camera.screen_to_world(origin);
    ctl.touch_down(&finger(1, 150.0, 100.0), &camera);
    ctl.touch_down(&finger(2, 250.0, 100.0), &camera);
    ctl.touch_move(&finger(1, 120.0, 100.0), &mut camera);
    ctl.touch_move(&finger(2, 290.0, 100.0), &mut camera);
    let after = camera.world_to_screen(before);
    assert!((after.x - origin.x).abs() < EPSILON);
    assert!((after.y - origin.y).abs() < EPSILON);
    assert!(camera.zoom > 1.2);
}

#[test]
fn pinch_scale_is_clamped() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let mut camera = Camera::default();
    ctl.touch_down(&finger(1, 0.0, 0.0), &camera);
    ctl.touch_down(&finger(2, 20.0, 0.0), &camera);
    ctl.touch_move(&finger(2, 2000.0, 0.0), &mut camera);
    assert_eq!(camera.zoom, 2.0);
}

#[test]
fn pinch_blocks_pan() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let camera = Camera::default();
    ctl.touch_down(&finger(1, 0.0, 0.0), &camera);
    ctl.touch_down(&finger(2, 100.0, 0.0), &camera);
    assert!(ctl.begin_pan(&finger(1, 0.0, 0.0)).is_empty());
}

#[test]
fn no_pinch_while_note_gesture_active() {
    let locks = GestureLocks::new();
    let mut ctl = CameraController::new(locks.clone());
    let camera = Camera::default();
    let _guard = locks.acquire(GestureKind::Drag);
    ctl.touch_down(&finger(1, 0.0, 0.0), &camera);
    ctl.touch_down(&finger(2, 100.0, 0.0), &camera);
    assert!(!ctl.is_pinching());
}

#[test]
fn fingers_too_close_do_not_pinch() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let camera = Camera::default();
    ctl.touch_down(&finger(1, 0.0, 0.0), &camera);
    ctl.touch_down(&finger(2, 3.0, 0.0), &camera);
    assert!(!ctl.is_pinching());
}

#[test]
fn lifting_a_finger_ends_pinch_and_schedules_cursor_reset() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let camera = Camera::default();
    ctl.touch_down(&finger(1, 0.0, 0.0), &camera);
    ctl.touch_down(&finger(2, 100.0, 0.0), &camera);
    assert_eq!(ctl.cursor_mode(), CursorMode::Scaling);
    ctl.touch_up(PointerId(2), 10.0);
    assert!(!ctl.is_pinching());
    assert_eq!(ctl.poll(310.0).cursor, Some(CursorMode::Default));
}

#[test]
fn cancel_forgets_pan_and_touch() {
    let mut ctl = CameraController::new(GestureLocks::new());
    let camera = Camera::default();
    ctl.touch_down(&finger(1, 0.0, 0.0), &camera);
    ctl.begin_pan(&finger(1, 0.0, 0.0));
    let change = ctl.cancel(PointerId(1), 0.0);
    assert_eq!(change.cursor, Some(CursorMode::Default));
    assert!(!ctl.is_panning());
}
