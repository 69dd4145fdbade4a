use std::f32::consts::PI;

use scene_ngin::{
    camera::{Camera, OrbitControls, Projection},
    cgmath::Deg,
    context::{Viewport, apply_resize},
};
use winit::event::MouseButton;

use crate::common::test_utils::{EPSILON, assert_close};

mod common;

fn molecule_projection(width: u32, height: u32) -> Projection {
    Projection::new(width, height, Deg(45.0), 0.1, 100.0)
}

#[test]
fn resize_updates_aspect_and_recomputes_once() {
    let mut viewport = Viewport::new(800, 600);
    let mut projection = molecule_projection(800, 600);
    assert_close(projection.aspect(), 800.0 / 600.0, EPSILON);
    assert_eq!(projection.revision(), 0);

    assert!(apply_resize(&mut viewport, &mut projection, None, 1024, 768));

    assert_eq!(viewport, Viewport::new(1024, 768));
    assert_close(projection.aspect(), 1024.0 / 768.0, EPSILON);
    assert_eq!(projection.revision(), 1);
    assert!(!projection.needs_update());
}

#[test]
fn every_resize_event_recomputes_exactly_once() {
    let mut viewport = Viewport::new(800, 600);
    let mut projection = molecule_projection(800, 600);
    for (i, (w, h)) in [(640, 480), (1920, 1080), (1920, 1080), (300, 900)]
        .into_iter()
        .enumerate()
    {
        apply_resize(&mut viewport, &mut projection, None, w, h);
        assert_eq!(projection.revision(), i as u64 + 1);
        assert_close(projection.aspect(), w as f32 / h as f32, EPSILON);
    }
}

#[test]
fn recomputed_matrix_uses_the_new_aspect() {
    let mut viewport = Viewport::new(800, 600);
    let mut projection = molecule_projection(800, 600);
    apply_resize(&mut viewport, &mut projection, None, 1024, 768);

    let focal = 1.0 / (22.5f32.to_radians()).tan();
    let matrix = projection.calc_matrix();
    assert_close(matrix[0][0], focal / (1024.0 / 768.0), 1e-4);
    assert_close(matrix[1][1], focal, 1e-4);
}

#[test]
fn projection_is_stale_until_recomputed() {
    let mut projection = molecule_projection(800, 600);
    let before = projection.calc_matrix();

    projection.resize(600, 600);
    assert!(projection.needs_update());
    assert_eq!(projection.calc_matrix(), before);

    projection.update_projection_matrix();
    assert!(!projection.needs_update());
    assert_ne!(projection.calc_matrix(), before);
}

#[test]
fn zero_sized_resize_is_ignored() {
    let mut viewport = Viewport::new(800, 600);
    let mut projection = molecule_projection(800, 600);

    assert!(!apply_resize(&mut viewport, &mut projection, None, 0, 768));
    assert!(!apply_resize(&mut viewport, &mut projection, None, 1024, 0));

    assert_eq!(viewport, Viewport::new(800, 600));
    assert_eq!(projection.revision(), 0);
    assert_close(projection.aspect(), 800.0 / 600.0, EPSILON);
}

fn orbit_controls() -> OrbitControls {
    let mut controls = OrbitControls::new((0.0, 0.0, 0.0));
    controls.set_viewport_height(600);
    controls
}

/// Azimuth delta produced by a 60 pixel horizontal drag.
fn drag_rotation(controls: &mut OrbitControls, projection: &Projection) -> f32 {
    let camera = Camera::new((0.0, 0.0, 5.0), (0.0, 0.0, 0.0));
    controls.pointer_down(MouseButton::Left, (0.0, 0.0));
    controls.pointer_move((60.0, 0.0), &camera, projection);
    controls.pointer_up();
    controls.pending_rotation().0
}

#[test]
fn resize_rescales_orbit_drags_to_the_new_height() {
    let mut viewport = Viewport::new(800, 600);
    let mut projection = molecule_projection(800, 600);
    let mut controls = orbit_controls();

    assert!(apply_resize(
        &mut viewport,
        &mut projection,
        Some(&mut controls),
        400,
        300
    ));
    assert_eq!(projection.revision(), 1);
    assert_close(
        drag_rotation(&mut controls, &projection),
        -2.0 * PI * 60.0 / 300.0,
        EPSILON,
    );
}

#[test]
fn zero_sized_resize_keeps_the_orbit_height() {
    let mut viewport = Viewport::new(800, 600);
    let mut projection = molecule_projection(800, 600);
    let mut controls = orbit_controls();

    assert!(!apply_resize(
        &mut viewport,
        &mut projection,
        Some(&mut controls),
        1024,
        0
    ));
    assert_close(
        drag_rotation(&mut controls, &projection),
        -2.0 * PI * 60.0 / 600.0,
        EPSILON,
    );
}
