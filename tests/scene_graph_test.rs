use scene_ngin::{
    cgmath::{Deg, Quaternion, Rotation3, Vector3},
    data_structures::{
        instance::Instance,
        model::Material,
        scene_graph::{GroupNode, MeshNode, SceneNode, walk},
    },
    resources::geometry::Shape,
};

use crate::common::test_utils::{EPSILON, assert_vec_close};

mod common;

fn ball(name: &str, position: Vector3<f32>) -> MeshNode {
    MeshNode::new(name, Shape::sphere(0.5, 8, 8), Material::phong(0xffffff))
        .with_transform(Instance::from(position))
}

#[test]
fn children_inherit_parent_transform() {
    let mut root = GroupNode::new("root");
    root.get_local_transform_mut().position = Vector3::new(0.0, 1.0, 0.0);
    root.add_child(Box::new(ball("ball", Vector3::new(2.0, 0.0, 0.0))));
    root.update_world_transform_all();

    let child = &root.get_children()[0];
    assert_vec_close(
        child.get_world_transform().position,
        Vector3::new(2.0, 1.0, 0.0),
        EPSILON,
    );

    root.get_local_transform_mut().rotation = Quaternion::from_angle_z(Deg(90.0));
    root.update_world_transform_all();
    let child = &root.get_children()[0];
    assert_vec_close(
        child.get_world_transform().position,
        Vector3::new(0.0, 3.0, 0.0),
        1e-5,
    );
}

#[test]
fn world_transforms_only_change_on_update() {
    let mut root = GroupNode::new("root");
    root.add_child(Box::new(ball("ball", Vector3::new(1.0, 0.0, 0.0))));
    root.update_world_transform_all();

    root.get_local_transform_mut().position = Vector3::new(5.0, 0.0, 0.0);
    let child = &root.get_children()[0];
    assert_vec_close(
        child.get_world_transform().position,
        Vector3::new(1.0, 0.0, 0.0),
        EPSILON,
    );
}

#[test]
fn nested_groups_compose() {
    let mut inner = GroupNode::new("inner");
    inner.set_local_transform(Instance::from(Vector3::new(0.0, 0.0, 1.0)));
    inner.add_child(Box::new(ball("deep", Vector3::new(1.0, 0.0, 0.0))));

    let mut root = GroupNode::new("root");
    root.set_local_transform(Instance::from(Vector3::new(0.0, 2.0, 0.0)));
    root.add_child(Box::new(inner));
    root.update_world_transform_all();

    let deep = &root.get_children()[0].get_children()[0];
    assert_eq!(deep.name(), "deep");
    assert_vec_close(
        deep.get_world_transform().position,
        Vector3::new(1.0, 2.0, 1.0),
        EPSILON,
    );
}

#[test]
fn walk_visits_every_node_depth_first() {
    let mut inner = GroupNode::new("inner");
    inner.add_child(Box::new(ball("b", Vector3::new(0.0, 0.0, 0.0))));
    let mut root = GroupNode::new("root");
    root.add_child(Box::new(ball("a", Vector3::new(0.0, 0.0, 0.0))));
    root.add_child(Box::new(inner));

    let mut names = Vec::new();
    walk(&root, &mut |node: &dyn SceneNode| names.push(node.name().to_string()));
    assert_eq!(names, ["root", "a", "inner", "b"]);
}

#[test]
fn nodes_are_not_drawn_before_upload() {
    let mut root = GroupNode::new("root");
    root.add_child(Box::new(ball("ball", Vector3::new(0.0, 0.0, 0.0))));
    assert!(root.get_render().is_empty());
    assert!(root.mesh().is_none());
    assert!(root.get_children()[0].mesh().is_some());
}
