use scene_ngin::{
    cgmath::{Deg, InnerSpace, Point3, Quaternion, Rotation3, Vector3},
    data_structures::scene_graph::SceneNode,
    scenes::molecule::{
        Atom, BOND_COLOUR, Bond, Molecule, UNKNOWN_ELEMENT_COLOUR, atom_colour, bond_transform,
        build_molecule,
    },
};

use crate::common::test_utils::{EPSILON, assert_close, assert_vec_close, count_shapes};

mod common;

#[test]
fn water_has_three_spheres_and_two_cylinders_under_one_group() {
    let group = build_molecule(&Molecule::water()).unwrap();
    assert_eq!(group.get_children().len(), 5);
    assert!(group.mesh().is_none());
    assert_eq!(count_shapes(&group, "sphere"), 3);
    assert_eq!(count_shapes(&group, "cylinder"), 2);
    for child in group.get_children() {
        assert!(child.get_children().is_empty());
    }
}

#[test]
fn water_bonds_are_about_0_994_long() {
    let group = build_molecule(&Molecule::water()).unwrap();
    let expected = (0.96f32 * 0.96 + 0.26 * 0.26).sqrt();
    assert_close(expected, 0.994, 1e-3);

    let bonds: Vec<_> = group
        .get_children()
        .iter()
        .filter_map(|child| child.mesh())
        .filter(|(shape, _)| shape.name() == "cylinder")
        .collect();
    assert_eq!(bonds.len(), 2);
    for (shape, material) in bonds {
        match shape {
            scene_ngin::resources::geometry::Shape::Cylinder {
                radius_top, height, ..
            } => {
                assert_close(*height, expected, EPSILON);
                assert_close(*radius_top, 0.05, EPSILON);
            }
            other => panic!("expected a cylinder, got {:?}", other),
        }
        assert_eq!(material.colour.hex(), BOND_COLOUR);
    }
}

#[test]
fn atoms_sit_at_their_positions_with_element_colours() {
    let group = build_molecule(&Molecule::water()).unwrap();
    let spheres: Vec<_> = group
        .get_children()
        .iter()
        .filter(|child| matches!(child.mesh(), Some((shape, _)) if shape.name() == "sphere"))
        .collect();
    let expected = [
        (Vector3::new(0.0, 0.0, 0.0), 0xff0000),
        (Vector3::new(0.96, 0.26, 0.0), 0xffffff),
        (Vector3::new(-0.96, 0.26, 0.0), 0xffffff),
    ];
    for (sphere, (position, colour)) in spheres.iter().zip(expected) {
        assert_vec_close(sphere.get_world_transform().position, position, EPSILON);
        let (_, material) = sphere.mesh().unwrap();
        assert_eq!(material.colour.hex(), colour);
    }
}

#[test]
fn palette_covers_common_elements() {
    assert_eq!(atom_colour("H").hex(), 0xffffff);
    assert_eq!(atom_colour("O").hex(), 0xff0000);
    assert_eq!(atom_colour("C").hex(), 0x222222);
    assert_eq!(atom_colour("N").hex(), 0x0000ff);
    assert_eq!(atom_colour("S").hex(), 0xffff00);
}

#[test]
fn unknown_element_is_grey() {
    assert_eq!(atom_colour("X").hex(), UNKNOWN_ELEMENT_COLOUR);
    assert_eq!(UNKNOWN_ELEMENT_COLOUR, 0xaaaaaa);

    let molecule = Molecule::new(vec![Atom::new("X", [1.0, 0.0, 0.0])], vec![]);
    let group = build_molecule(&molecule).unwrap();
    let (_, material) = group.get_children()[0].mesh().unwrap();
    assert_eq!(material.colour.hex(), 0xaaaaaa);
}

#[test]
fn out_of_range_bond_fails() {
    let mut molecule = Molecule::water();
    molecule.bonds.push(Bond(1, 7));
    let err = build_molecule(&molecule).err().expect("bond to atom 7 must fail");
    let message = format!("{:#}", err);
    assert!(message.contains('7'), "{}", message);
    assert!(message.contains("3 atoms"), "{}", message);
}

#[test]
fn self_bond_fails() {
    let mut molecule = Molecule::water();
    molecule.bonds.push(Bond(2, 2));
    assert!(build_molecule(&molecule).is_err());
}

#[test]
fn bond_cylinder_points_from_first_to_second_atom() {
    let start = Point3::new(0.0, 0.0, 0.0);
    let end = Point3::new(0.96, 0.26, 0.0);
    let (length, transform) = bond_transform(start, end).unwrap();
    assert_close(length, (end - start).magnitude(), EPSILON);
    assert_vec_close(transform.position, Vector3::new(0.48, 0.13, 0.0), EPSILON);

    let axis = transform.rotation * Vector3::unit_y();
    assert_vec_close(axis, (end - start).normalize(), 1e-4);
}

#[test]
fn bond_along_negative_y_is_flipped() {
    let (length, transform) =
        bond_transform(Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, -1.0, 0.0)).unwrap();
    assert_close(length, 2.0, EPSILON);
    let axis = transform.rotation * Vector3::unit_y();
    assert_vec_close(axis, -Vector3::unit_y(), 1e-4);
}

#[test]
fn rotating_the_group_moves_the_atoms() {
    let mut group = build_molecule(&Molecule::water()).unwrap();
    group.get_local_transform_mut().rotation = Quaternion::from_angle_y(Deg(90.0));
    group.update_world_transform_all();

    let hydrogen = &group.get_children()[1];
    assert_vec_close(
        hydrogen.get_world_transform().position,
        Vector3::new(0.0, 0.26, -0.96),
        1e-4,
    );
    // the local transform is untouched by the parent
    assert_vec_close(
        hydrogen.get_local_transform().position,
        Vector3::new(0.96, 0.26, 0.0),
        EPSILON,
    );
}
