//! Constant per-frame rotation.

use std::f64::consts::TAU;

use cgmath::{Quaternion, Rad, Rotation3, Vector3};

/// Euler angles (XYZ order) that grow by a fixed step every frame.
///
/// The angle after `n` frames is `step * n`, held in `f64` and never wrapped.
/// Only [`Spin::rotation`] reduces it to one turn before narrowing to `f32`.
#[derive(Clone, Debug, PartialEq)]
pub struct Spin {
    step: Vector3<f64>,
    frames: u64,
}

impl Spin {
    pub fn new(step: Vector3<f64>) -> Self {
        Self {
            step,
            frames: 0,
        }
    }

    pub fn around_y(step: f64) -> Self {
        Self::new(Vector3::new(0.0, step, 0.0))
    }

    /// Advance by one frame and return the new angles.
    pub fn advance(&mut self) -> Vector3<f64> {
        self.frames += 1;
        self.angles()
    }

    pub fn angles(&self) -> Vector3<f64> {
        self.step * self.frames as f64
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current orientation, applying X first, then Y, then Z in the local frame.
    pub fn rotation(&self) -> Quaternion<f32> {
        let angles = self.angles();
        let turn = |angle: f64| Rad(angle.rem_euclid(TAU) as f32);
        Quaternion::from_angle_x(turn(angles.x))
            * Quaternion::from_angle_y(turn(angles.y))
            * Quaternion::from_angle_z(turn(angles.z))
    }
}
