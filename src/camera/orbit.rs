//! Orbit controls: rotate around, dolly towards and pan a target point.
//!
//! Input only accumulates deltas. [`OrbitControls::update`] applies them to a
//! [`Camera`] once per frame. With damping enabled every update applies a
//! fraction of the pending delta and keeps the rest, so the camera keeps
//! gliding for a while after the pointer stops.

use std::f32::consts::PI;

use cgmath::{InnerSpace, MetricSpace, Point3, Vector3, Zero};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::camera::{Camera, Projection};

const EPS: f32 = 0.000001;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Gesture {
    None,
    Rotate,
    Dolly,
    Pan,
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vector3<f32>,
    scale: f32,
    gesture: Gesture,
    last_pointer: Option<(f32, f32)>,
    viewport_height: f32,
}

impl OrbitControls {
    pub fn new<T: Into<Point3<f32>>>(target: T) -> Self {
        Self {
            target: target.into(),
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vector3::zero(),
            scale: 1.0,
            gesture: Gesture::None,
            last_pointer: None,
            viewport_height: 1.0,
        }
    }

    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = damping_factor;
        self
    }

    /// Pointer deltas are measured relative to the height of the surface.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Pending azimuth and polar deltas that the next updates will apply.
    pub fn pending_rotation(&self) -> (f32, f32) {
        (self.theta_delta, self.phi_delta)
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.theta_delta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.phi_delta -= angle;
    }

    pub fn dolly_in(&mut self, dolly_scale: f32) {
        self.scale *= dolly_scale;
    }

    pub fn dolly_out(&mut self, dolly_scale: f32) {
        self.scale /= dolly_scale;
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    pub fn pointer_down(&mut self, button: MouseButton, position: (f32, f32)) {
        self.gesture = match button {
            MouseButton::Left => Gesture::Rotate,
            MouseButton::Middle => Gesture::Dolly,
            MouseButton::Right => Gesture::Pan,
            _ => Gesture::None,
        };
        self.last_pointer = Some(position);
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::None;
    }

    pub fn pointer_move(&mut self, position: (f32, f32), camera: &Camera, projection: &Projection) {
        let last = self.last_pointer.replace(position);
        let Some((last_x, last_y)) = last else {
            return;
        };
        let (dx, dy) = (position.0 - last_x, position.1 - last_y);
        match self.gesture {
            Gesture::Rotate => {
                let (dx, dy) = (dx * self.rotate_speed, dy * self.rotate_speed);
                self.rotate_left(2.0 * PI * dx / self.viewport_height);
                self.rotate_up(2.0 * PI * dy / self.viewport_height);
            }
            Gesture::Dolly => {
                if dy > 0.0 {
                    self.dolly_out(self.zoom_scale());
                } else if dy < 0.0 {
                    self.dolly_in(self.zoom_scale());
                }
            }
            Gesture::Pan => self.pan(dx * self.pan_speed, dy * self.pan_speed, camera, projection),
            Gesture::None => (),
        }
    }

    /// Browser convention: negative `delta_y` scrolls up and moves closer.
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.dolly_in(self.zoom_scale());
        } else if delta_y > 0.0 {
            self.dolly_out(self.zoom_scale());
        }
    }

    fn pan(&mut self, dx: f32, dy: f32, camera: &Camera, projection: &Projection) {
        let offset = camera.position - self.target;
        // half of the visible height at the target's depth
        let target_distance = offset.magnitude() * (projection.fovy().0 / 2.0).tan();
        let left = 2.0 * dx * target_distance / self.viewport_height;
        let up = 2.0 * dy * target_distance / self.viewport_height;
        self.pan_offset += camera.right() * -left;
        self.pan_offset += camera.screen_up() * up;
    }

    /// Feeds a winit window event into the controls. Returns true if consumed.
    pub fn handle_window_event(
        &mut self,
        event: &WindowEvent,
        camera: &Camera,
        projection: &Projection,
    ) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                match state {
                    ElementState::Pressed => {
                        let position = self.last_pointer.unwrap_or((0.0, 0.0));
                        self.pointer_down(*button, position);
                    }
                    ElementState::Released => self.pointer_up(),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = (position.x as f32, position.y as f32);
                if self.gesture == Gesture::None {
                    self.last_pointer = Some(position);
                } else {
                    self.pointer_move(position, camera, projection);
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                self.wheel(delta_y);
                true
            }
            _ => false,
        }
    }

    /// Applies pending deltas to `camera`. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.magnitude();
        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, 0.0)
        };

        let damping = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.theta_delta * damping;
        phi += self.phi_delta * damping;
        phi = phi.clamp(EPS, PI - EPS);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * damping;

        let sin_phi_radius = phi.sin() * radius;
        let offset = Vector3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        );
        let old_position = camera.position;
        camera.position = self.target + offset;
        camera.target = self.target;

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;

        old_position.distance2(camera.position) > EPS
    }
}
