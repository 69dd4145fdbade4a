use scene_ngin::{
    cgmath::{InnerSpace, Vector3},
    data_structures::scene_graph::{SceneNode, walk},
};

#[allow(dead_code)]
pub(crate) const EPSILON: f32 = 1e-5;

#[allow(dead_code)]
pub(crate) fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} but got {} (tolerance {})",
        expected,
        actual,
        tolerance
    );
}

#[allow(dead_code)]
pub(crate) fn assert_close_f64(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} but got {} (tolerance {})",
        expected,
        actual,
        tolerance
    );
}

#[allow(dead_code)]
pub(crate) fn assert_vec_close(actual: Vector3<f32>, expected: Vector3<f32>, tolerance: f32) {
    assert!(
        (actual - expected).magnitude() <= tolerance,
        "expected {:?} but got {:?} (tolerance {})",
        expected,
        actual,
        tolerance
    );
}

/// Names of the shapes drawn anywhere in the subtree of `node`, depth-first.
#[allow(dead_code)]
pub(crate) fn shape_names(node: &dyn SceneNode) -> Vec<&'static str> {
    let mut names = Vec::new();
    walk(node, &mut |n: &dyn SceneNode| {
        if let Some((shape, _)) = n.mesh() {
            names.push(shape.name());
        }
    });
    names
}

#[allow(dead_code)]
pub(crate) fn count_shapes(node: &dyn SceneNode, name: &str) -> usize {
    shape_names(node).into_iter().filter(|n| *n == name).count()
}
