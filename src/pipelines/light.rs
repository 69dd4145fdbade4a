use wgpu::util::DeviceExt;

use crate::data_structures::model::Colour;

/// Maximum number of point and directional lights a scene can hold.
pub const MAX_LIGHTS: usize = 4;

/// A light source. Ambient lights add up; all other lights are shaded per fragment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    Ambient {
        colour: Colour,
        intensity: f32,
    },
    Point {
        colour: Colour,
        intensity: f32,
        position: [f32; 3],
    },
    /// Shines from `position` towards the origin.
    Directional {
        colour: Colour,
        intensity: f32,
        position: [f32; 3],
    },
}

impl Light {
    pub fn ambient(colour: impl Into<Colour>, intensity: f32) -> Self {
        Light::Ambient {
            colour: colour.into(),
            intensity,
        }
    }

    pub fn point(colour: impl Into<Colour>, intensity: f32, position: [f32; 3]) -> Self {
        Light::Point {
            colour: colour.into(),
            intensity,
            position,
        }
    }

    pub fn directional(colour: impl Into<Colour>, intensity: f32, position: [f32; 3]) -> Self {
        Light::Directional {
            colour: colour.into(),
            intensity,
            position,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    // w is 1.0 for point lights and 0.0 for directional ones
    pub position: [f32; 4],
    pub colour: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    pub lights: [LightRaw; MAX_LIGHTS],
    pub count: u32,
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: [u32; 3],
}

impl LightUniform {
    pub fn from_lights(sources: &[Light]) -> Self {
        let mut uniform = Self {
            ambient: [0.0; 4],
            lights: [LightRaw::default(); MAX_LIGHTS],
            count: 0,
            _padding: [0; 3],
        };
        for light in sources {
            let (position, colour, intensity) = match *light {
                Light::Ambient { colour, intensity } => {
                    let [r, g, b] = colour.scaled(intensity);
                    uniform.ambient[0] += r;
                    uniform.ambient[1] += g;
                    uniform.ambient[2] += b;
                    continue;
                }
                Light::Point {
                    colour,
                    intensity,
                    position: [x, y, z],
                } => ([x, y, z, 1.0], colour, intensity),
                Light::Directional {
                    colour,
                    intensity,
                    position: [x, y, z],
                } => ([x, y, z, 0.0], colour, intensity),
            };
            let idx = uniform.count as usize;
            if idx >= MAX_LIGHTS {
                log::warn!(
                    "Only {} lights are supported, {:?} is ignored.",
                    MAX_LIGHTS,
                    light
                );
                continue;
            }
            let [r, g, b] = colour.scaled(intensity);
            uniform.lights[idx] = LightRaw {
                position,
                colour: [r, g, b, 1.0],
            };
            uniform.count += 1;
        }
        uniform
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(uniform: LightUniform, device: &wgpu::Device) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
