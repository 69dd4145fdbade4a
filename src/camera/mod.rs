//! Perspective camera, projection and the uniform that feeds them to shaders.
//!
//! The projection matrix is cached. Changing the aspect ratio only marks it
//! dirty; [`Projection::update_projection_matrix`] has to be called before the
//! new aspect is visible, the same contract the resize handling relies on.

pub mod orbit;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};

pub use orbit::OrbitControls;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A camera at `position` looking at `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Screen-space right in world coordinates.
    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(self.up).normalize()
    }

    /// Screen-space up in world coordinates.
    pub fn screen_up(&self) -> Vector3<f32> {
        self.right().cross(self.forward())
    }
}

#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
    matrix: Matrix4<f32>,
    needs_update: bool,
    revision: u64,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            aspect: aspect_of(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
            matrix: Matrix4::from_scale(1.0),
            needs_update: true,
            revision: 0,
        };
        projection.recompute();
        projection
    }

    /// Sets the aspect ratio to `width / height` and marks the matrix dirty.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_of(width, height);
        self.needs_update = true;
    }

    /// Recomputes the cached projection matrix from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        self.recompute();
        self.revision += 1;
    }

    fn recompute(&mut self) {
        self.matrix = OPENGL_TO_WGPU_MATRIX
            * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar);
        self.needs_update = false;
    }

    /// The cached matrix. Stale until [`Self::update_projection_matrix`] ran
    /// after a parameter change.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fovy(&self) -> Rad<f32> {
        self.fovy
    }

    pub fn znear(&self) -> f32 {
        self.znear
    }

    pub fn zfar(&self) -> f32 {
        self.zfar
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Number of explicit recomputations since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the engine keeps per camera: the camera itself, optional orbit
/// controls and the GPU side uniform.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controls: Option<OrbitControls>,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
