use uuid::Uuid;

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 100x100 note centered on world (50, 50).
fn note_rotated(rotation: f64) -> Note {
    Note {
        id: Uuid::new_v4(),
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        content: String::new(),
        color: String::new(),
        rotation,
        z_index: 1,
        decor_mode: false,
    }
}

fn mouse(x: f64, y: f64) -> Pointer {
    Pointer::mouse(Point::new(x, y))
}

/// Screen point at `deg` on a circle of radius 80 around (50, 50).
fn on_circle(deg: f64) -> Pointer {
    let rad = deg.to_radians();
    mouse(50.0 + 80.0 * rad.cos(), 50.0 + 80.0 * rad.sin())
}

#[test]
fn begin_raises_rotate_flag() {
    let locks = GestureLocks::new();
    let mut rotate = NoteRotate::new(locks.clone());
    assert!(rotate.begin(&note_rotated(0.0), &Camera::default(), &on_circle(0.0)));
    assert!(locks.rotating_note());
}

#[test]
fn quarter_turn_adds_ninety() {
    let mut rotate = NoteRotate::new(GestureLocks::new());
    rotate.begin(&note_rotated(10.0), &Camera::default(), &on_circle(0.0));
    let r = rotate.update(&on_circle(90.0)).unwrap();
    assert!(approx_eq(r, 100.0));
}

#[test]
fn rotation_is_not_normalized() {
    let mut rotate = NoteRotate::new(GestureLocks::new());
    rotate.begin(&note_rotated(350.0), &Camera::default(), &on_circle(10.0));
    let commit = rotate.end(&on_circle(30.0)).unwrap();
    assert!(approx_eq(commit.fields.rotation.unwrap(), 370.0));
}

#[test]
fn negative_rotation_kept() {
    let mut rotate = NoteRotate::new(GestureLocks::new());
    rotate.begin(&note_rotated(-400.0), &Camera::default(), &on_circle(45.0));
    let r = rotate.update(&on_circle(0.0)).unwrap();
    assert!(approx_eq(r, -445.0));
}

#[test]
fn pivot_accounts_for_camera() {
    // Note center (50, 50) lands on screen (200, 200) at zoom 2 with pan (100, 100).
    let camera = Camera { pan_x: 100.0, pan_y: 100.0, zoom: 2.0 };
    let mut rotate = NoteRotate::new(GestureLocks::new());
    rotate.begin(&note_rotated(0.0), &camera, &mouse(300.0, 200.0));
    let r = rotate.update(&mouse(200.0, 300.0)).unwrap();
    assert!(approx_eq(r, 90.0));
}

#[test]
fn pivot_is_fixed_for_the_gesture() {
    let mut rotate = NoteRotate::new(GestureLocks::new());
    rotate.begin(&note_rotated(0.0), &Camera::default(), &on_circle(0.0));
    rotate.update(&on_circle(60.0));
    rotate.update(&on_circle(120.0));
    let r = rotate.update(&on_circle(0.0)).unwrap();
    assert!(approx_eq(r, 0.0));
}

#[test]
fn end_clears_flag() {
    let locks = GestureLocks::new();
    let mut rotate = NoteRotate::new(locks.clone());
    rotate.begin(&note_rotated(0.0), &Camera::default(), &on_circle(0.0));
    assert!(rotate.end(&on_circle(5.0)).is_some());
    assert!(!locks.rotating_note());
}

#[test]
fn reset_commits_zero_and_releases() {
    let locks = GestureLocks::new();
    let mut rotate = NoteRotate::new(locks.clone());
    let note = note_rotated(725.0);
    rotate.begin(&note, &Camera::default(), &on_circle(0.0));
    let commit = rotate.reset(note.id);
    assert_eq!(commit.id, note.id);
    assert_eq!(commit.fields, PartialNote::rotation(0.0));
    assert!(!locks.rotating_note());
    assert!(!rotate.is_active());
}

#[test]
fn reset_when_idle_still_commits_zero() {
    let mut rotate = NoteRotate::new(GestureLocks::new());
    let id = Uuid::new_v4();
    assert_eq!(rotate.reset(id).fields.rotation, Some(0.0));
}

#[test]
fn cancel_releases_flag() {
    let locks = GestureLocks::new();
    let mut rotate = NoteRotate::new(locks.clone());
    rotate.begin(&note_rotated(0.0), &Camera::default(), &on_circle(0.0));
    assert!(rotate.cancel().is_some());
    assert!(!locks.rotating_note());
    assert!(rotate.preview().is_none());
}
