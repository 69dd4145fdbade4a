use scene_ngin::{
    cgmath::{InnerSpace, Vector3},
    resources::geometry::{Geometry, Shape},
};

use crate::common::test_utils::{EPSILON, assert_close};

mod common;

fn position(geometry: &Geometry, index: u32) -> Vector3<f32> {
    geometry.vertices[index as usize].position.into()
}

fn normal(geometry: &Geometry, index: u32) -> Vector3<f32> {
    geometry.vertices[index as usize].normal.into()
}

/// Every non-degenerate triangle winds counter-clockwise when seen from the
/// side its vertex normals point to.
fn assert_front_faces_outwards(geometry: &Geometry) {
    for triangle in geometry.indices.chunks(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
        let face = (position(geometry, b) - position(geometry, a))
            .cross(position(geometry, c) - position(geometry, a));
        if face.magnitude() < 1e-9 {
            continue;
        }
        let average = normal(geometry, a) + normal(geometry, b) + normal(geometry, c);
        assert!(
            face.dot(average) > 0.0,
            "triangle {:?} faces inwards",
            triangle
        );
    }
}

fn assert_consistent(geometry: &Geometry) {
    assert_eq!(geometry.indices.len() % 3, 0);
    let count = geometry.vertices.len() as u32;
    assert!(geometry.indices.iter().all(|&i| i < count));
    for vertex in &geometry.vertices {
        assert_close(Vector3::from(vertex.normal).magnitude(), 1.0, 1e-4);
    }
    assert_front_faces_outwards(geometry);
}

#[test]
fn box_has_four_vertices_per_face() {
    let geometry = Shape::cube(2.0).tessellate();
    assert_eq!(geometry.vertices.len(), 24);
    assert_eq!(geometry.indices.len(), 36);
    assert_eq!(geometry.triangle_count(), 12);
    assert_consistent(&geometry);
    for vertex in &geometry.vertices {
        for c in vertex.position {
            assert_close(c.abs(), 1.0, EPSILON);
        }
    }
}

#[test]
fn sphere_skips_pole_triangles() {
    let geometry = Shape::sphere(0.2, 32, 32).tessellate();
    assert_eq!(geometry.vertices.len(), 33 * 33);
    assert_eq!(geometry.triangle_count(), 2 * 32 * 31);
    assert_consistent(&geometry);
    for vertex in &geometry.vertices {
        assert_close(Vector3::from(vertex.position).magnitude(), 0.2, 1e-5);
    }
}

#[test]
fn sphere_segments_have_a_minimum() {
    assert_eq!(
        Shape::sphere(1.0, 1, 1),
        Shape::Sphere {
            radius: 1.0,
            width_segments: 3,
            height_segments: 2,
        }
    );
    assert_consistent(&Shape::sphere(1.0, 1, 1).tessellate());
}

#[test]
fn cylinder_spans_its_height_along_y() {
    let geometry = Shape::cylinder(0.05, 0.994, 16).tessellate();
    // torso rings plus one centre fan and ring per cap
    assert_eq!(geometry.vertices.len(), 2 * 17 + 2 * (16 + 17));
    assert_eq!(geometry.triangle_count(), 16 * 2 + 16 * 2);
    assert_consistent(&geometry);

    let (min, max) = geometry
        .vertices
        .iter()
        .map(|v| v.position[1])
        .fold((f32::MAX, f32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    assert_close(min, -0.497, EPSILON);
    assert_close(max, 0.497, EPSILON);
    for vertex in &geometry.vertices {
        let radial = (vertex.position[0].powi(2) + vertex.position[2].powi(2)).sqrt();
        assert!(radial <= 0.05 + EPSILON);
    }
}

#[test]
fn shapes_know_their_names() {
    assert_eq!(Shape::cube(1.0).name(), "box");
    assert_eq!(Shape::sphere(1.0, 8, 8).name(), "sphere");
    assert_eq!(Shape::cylinder(1.0, 1.0, 8).name(), "cylinder");
}
