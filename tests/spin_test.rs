use scene_ngin::{
    cgmath::{Quaternion, Rad, Rotation3, Vector3},
    data_structures::{scene_graph::SceneNode, spin::Spin},
    scenes::{
        cube::{CUBE_STEP, CubeFlow},
        molecule::{MOLECULE_STEP, Molecule, MoleculeFlow},
    },
};

use crate::common::test_utils::assert_close_f64;

mod common;

#[test]
fn fresh_spin_starts_at_zero() {
    let spin = Spin::around_y(0.5);
    assert_eq!(spin.frames(), 0);
    assert_eq!(spin.angles(), Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn cube_rotates_on_x_and_y_every_frame() {
    let mut flow = CubeFlow::new();
    assert_eq!(flow.spin().angles().x, 0.0);

    for n in 1..=600u32 {
        flow.step();
        let expected = CUBE_STEP * n as f64;
        let angles = flow.spin().angles();
        assert_close_f64(angles.x, expected, 1e-12);
        assert_close_f64(angles.y, expected, 1e-12);
        assert_eq!(angles.z, 0.0);
    }
    assert_eq!(flow.spin().frames(), 600);
}

#[test]
fn cube_node_follows_the_spin() {
    let mut flow = CubeFlow::new();
    for _ in 0..10 {
        flow.step();
    }
    let local = flow.cube().get_local_transform();
    assert_eq!(local.rotation, flow.spin().rotation());
    // the cube is its own root, so world equals local
    assert_eq!(flow.cube().get_world_transform(), local);
}

#[test]
fn molecule_rotates_only_around_y() {
    let mut flow = MoleculeFlow::new(&Molecule::water()).unwrap();
    for n in 1..=1000u32 {
        flow.step();
        let angles = flow.spin().angles();
        assert_close_f64(angles.y, MOLECULE_STEP * n as f64, 1e-12);
        assert_eq!(angles.x, 0.0);
        assert_eq!(angles.z, 0.0);
        assert_eq!(
            flow.root().get_local_transform().rotation,
            flow.spin().rotation()
        );
    }
}

#[test]
fn angles_keep_growing_past_a_full_turn() {
    let mut spin = Spin::around_y(1.0);
    for _ in 0..10 {
        spin.advance();
    }
    assert_close_f64(spin.angles().y, 10.0, 1e-12);
}

#[test]
fn angles_stay_exact_over_days_of_frames() {
    // 60 Hz for roughly six days
    let frames = 30_000_000u64;
    let mut molecule = Spin::around_y(MOLECULE_STEP);
    let mut cube = Spin::new(Vector3::new(CUBE_STEP, CUBE_STEP, 0.0));
    for _ in 0..frames {
        molecule.advance();
        cube.advance();
    }
    assert_close_f64(molecule.angles().y, MOLECULE_STEP * frames as f64, 1e-6);
    assert_close_f64(cube.angles().x, CUBE_STEP * frames as f64, 1e-6);

    // one more frame still moves by a whole step
    let before = molecule.angles().y;
    molecule.advance();
    assert_close_f64(molecule.angles().y - before, MOLECULE_STEP, 1e-9);
}

#[test]
fn rotation_stays_accurate_for_large_angles() {
    let mut spin = Spin::around_y(MOLECULE_STEP);
    for _ in 0..5_184_000 {
        spin.advance();
    }
    let expected = Quaternion::from_angle_y(Rad(
        (MOLECULE_STEP * 5_184_000.0).rem_euclid(std::f64::consts::TAU) as f32,
    ));
    let actual = spin.rotation();
    let dot = actual.s * expected.s
        + actual.v.x * expected.v.x
        + actual.v.y * expected.v.y
        + actual.v.z * expected.v.z;
    assert!(dot.abs() > 1.0 - 1e-6, "rotation drifted: {:?} vs {:?}", actual, expected);
}
