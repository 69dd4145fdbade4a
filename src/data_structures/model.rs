//! Meshes, vertices and Phong materials.
//!
//! [`ModelVertex`] is the per-vertex layout produced by the tessellators in
//! [`crate::resources::geometry`]. [`Material`] describes the surface the way a
//! Phong shader needs it and [`GpuMesh`] holds the uploaded buffers.

use std::ops::Range;

/// Every type that ends up in a vertex buffer describes its own layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// A colour given as 24 bit sRGB hex value, e.g. `0x00ff00`.
///
/// The render surface uses an sRGB format, so everything that reaches a shader
/// is converted to linear RGB first. Otherwise all colours end up washed out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Colour(u32);

impl Colour {
    pub const BLACK: Colour = Colour(0x000000);
    pub const WHITE: Colour = Colour(0xffffff);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    pub fn hex(&self) -> u32 {
        self.0
    }

    /// Channels in sRGB space, each in `0.0..=1.0`.
    pub fn to_srgb(&self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b]
    }

    pub fn to_linear(&self) -> [f32; 3] {
        self.to_srgb().map(srgb_to_linear)
    }

    /// Linear colour with every channel multiplied by `intensity`.
    pub fn scaled(&self, intensity: f32) -> [f32; 3] {
        self.to_linear().map(|c| c * intensity)
    }

    pub fn to_wgpu(&self) -> wgpu::Color {
        let [r, g, b] = self.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl From<u32> for Colour {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Phong surface description: diffuse colour, specular highlight colour and
/// shininess exponent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub colour: Colour,
    pub specular: Colour,
    pub shininess: f32,
}

impl Material {
    pub const DEFAULT_SPECULAR: Colour = Colour::from_hex(0x111111);
    pub const DEFAULT_SHININESS: f32 = 30.0;

    pub fn phong(colour: impl Into<Colour>) -> Self {
        Self {
            colour: colour.into(),
            specular: Self::DEFAULT_SPECULAR,
            shininess: Self::DEFAULT_SHININESS,
        }
    }

    pub fn with_specular(mut self, specular: impl Into<Colour>) -> Self {
        self.specular = specular.into();
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        let [r, g, b] = self.colour.to_linear();
        let [sr, sg, sb] = self.specular.to_linear();
        MaterialUniform {
            colour: [r, g, b, 1.0],
            // shininess rides along in the w component
            specular: [sr, sg, sb, self.shininess],
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::phong(Colour::WHITE)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    colour: [f32; 4],
    specular: [f32; 4],
}

/// Vertex and index buffers of one tessellated shape.
#[derive(Debug)]
pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

pub trait DrawModel<'a> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'a GpuMesh,
        material: &'a wgpu::BindGroup,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'b GpuMesh,
        material: &'b wgpu::BindGroup,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, material, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }
}
