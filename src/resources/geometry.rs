//! Procedural tessellation of boxes, spheres and cylinders.
//!
//! All shapes are centred on the origin and use counter-clockwise front faces.
//! Cylinders are aligned with the Y axis, which is what bond placement relies on.

use std::f32::consts::PI;

use cgmath::InnerSpace;

use crate::data_structures::model::ModelVertex;

/// Parametric description of a mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

impl Shape {
    pub fn cube(side: f32) -> Self {
        Shape::Box {
            width: side,
            height: side,
            depth: side,
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Shape::Sphere {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    pub fn cylinder(radius: f32, height: f32, radial_segments: u32) -> Self {
        Shape::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height,
            radial_segments: radial_segments.max(3),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Box { .. } => "box",
            Shape::Sphere { .. } => "sphere",
            Shape::Cylinder { .. } => "cylinder",
        }
    }

    pub fn tessellate(&self) -> Geometry {
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => tessellate_box(width, height, depth),
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => tessellate_sphere(radius, width_segments, height_segments),
            Shape::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => tessellate_cylinder(radius_top, radius_bottom, height, radial_segments),
        }
    }
}

/// CPU side triangle list of a [`Shape`].
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        self.vertices.push(ModelVertex { position, normal });
        self.vertices.len() as u32 - 1
    }
}

fn tessellate_box(width: f32, height: f32, depth: f32) -> Geometry {
    let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
    // normal, then the face's u and v axes, so that u x v == normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let half = cgmath::Vector3::new(hx, hy, hz);
    let mut geometry = Geometry::default();
    for (normal, u, v) in faces {
        let n: cgmath::Vector3<f32> = normal.into();
        let u: cgmath::Vector3<f32> = u.into();
        let v: cgmath::Vector3<f32> = v.into();
        let corner = |su: f32, sv: f32| {
            let p = n + u * su + v * sv;
            [p.x * half.x, p.y * half.y, p.z * half.z]
        };
        let a = geometry.push(corner(-1.0, -1.0), normal);
        let b = geometry.push(corner(1.0, -1.0), normal);
        let c = geometry.push(corner(1.0, 1.0), normal);
        let d = geometry.push(corner(-1.0, 1.0), normal);
        geometry.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
    geometry
}

fn tessellate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let mut geometry = Geometry::default();
    let mut grid = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;
            let direction = cgmath::Vector3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            let position = direction * radius;
            row.push(geometry.push(position.into(), direction.normalize().into()));
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // the first and last rings collapse into the poles
            if iy != 0 {
                geometry.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                geometry.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    geometry
}

fn tessellate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> Geometry {
    let mut geometry = Geometry::default();
    let half_height = height / 2.0;
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    // torso: top ring first, then bottom ring
    let mut rings = Vec::with_capacity(2);
    for (v, radius) in [(0.0_f32, radius_top), (1.0, radius_bottom)] {
        let mut ring = Vec::with_capacity(radial_segments as usize + 1);
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            let position = [radius * sin, -v * height + half_height, radius * cos];
            let normal = cgmath::Vector3::new(sin, slope, cos).normalize();
            ring.push(geometry.push(position, normal.into()));
        }
        rings.push(ring);
    }
    for x in 0..radial_segments as usize {
        let a = rings[0][x];
        let b = rings[1][x];
        let c = rings[1][x + 1];
        let d = rings[0][x + 1];
        geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for top in [true, false] {
        let (radius, sign) = if top {
            (radius_top, 1.0)
        } else {
            (radius_bottom, -1.0)
        };
        if radius <= 0.0 {
            continue;
        }
        let normal = [0.0, sign, 0.0];
        let y = half_height * sign;
        let centre_start = geometry.vertices.len() as u32;
        for _ in 0..radial_segments {
            geometry.push([0.0, y, 0.0], normal);
        }
        let ring_start = geometry.vertices.len() as u32;
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            geometry.push([radius * sin, y, radius * cos], normal);
        }
        for x in 0..radial_segments {
            let c = centre_start + x;
            let i = ring_start + x;
            if top {
                geometry.indices.extend_from_slice(&[i, i + 1, c]);
            } else {
                geometry.indices.extend_from_slice(&[i + 1, i, c]);
            }
        }
    }
    geometry
}
