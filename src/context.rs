//! Central GPU and window context.
//!
//! [`Context`] owns everything a frame needs: surface, device and queue, the
//! camera and projection, the lights, the Phong pipeline and the render
//! attachments. It is built once from [`Settings`] when the window exists.

use std::sync::Arc;

use anyhow::Context as _;
use cgmath::{Deg, Point3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, CameraUniform, OrbitControls, Projection},
    data_structures::{model::Colour, texture::Texture},
    pipelines::{
        basic::mk_basic_pipeline,
        light::{Light, LightResources, LightUniform},
    },
    resources::material_layout,
};

/// Sample count used when antialiasing is requested and supported.
pub const MSAA_SAMPLES: u32 = 4;

/// Startup configuration of a viewer.
#[derive(Clone, Debug)]
pub struct Settings {
    pub title: String,
    pub camera_position: Point3<f32>,
    pub camera_target: Point3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub clear_colour: Colour,
    pub antialias: bool,
    pub lights: Vec<Light>,
    pub controls: Option<OrbitControls>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "scene-ngin".to_string(),
            camera_position: Point3::new(0.0, 0.0, 5.0),
            camera_target: Point3::new(0.0, 0.0, 0.0),
            fovy: Deg(50.0),
            znear: 0.1,
            zfar: 2000.0,
            clear_colour: Colour::BLACK,
            antialias: false,
            lights: Vec::new(),
            controls: None,
        }
    }
}

impl Settings {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_camera<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(
        mut self,
        position: P,
        target: T,
    ) -> Self {
        self.camera_position = position.into();
        self.camera_target = target.into();
        self
    }

    pub fn with_perspective(mut self, fovy: Deg<f32>, znear: f32, zfar: f32) -> Self {
        self.fovy = fovy;
        self.znear = znear;
        self.zfar = zfar;
        self
    }

    pub fn with_clear_colour(mut self, colour: impl Into<Colour>) -> Self {
        self.clear_colour = colour.into();
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_controls(mut self, controls: OrbitControls) -> Self {
        self.controls = Some(controls);
        self
    }
}

/// Pixel size of the render surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_array(&self) -> [u32; 2] {
        [self.width, self.height]
    }
}

/// Applies a new surface size to the viewport and the projection.
///
/// Sets the aspect ratio, recomputes the projection matrix exactly once and
/// hands the new height to the orbit controls. Returns false and leaves
/// everything untouched for zero-sized surfaces, which happens while a window
/// is minimised.
pub fn apply_resize(
    viewport: &mut Viewport,
    projection: &mut Projection,
    controls: Option<&mut OrbitControls>,
    width: u32,
    height: u32,
) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    viewport.width = width;
    viewport.height = height;
    projection.resize(width, height);
    projection.update_projection_matrix();
    if let Some(controls) = controls {
        controls.set_viewport_height(height);
    }
    true
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub(crate) msaa_texture: Option<Texture>,
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub viewport: Viewport,
    pub sample_count: u32,
    pub clear_colour: wgpu::Color,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub material_layout: wgpu::BindGroupLayout,
}

impl Context {
    pub async fn new(window: Arc<Window>, settings: &Settings) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let viewport = Viewport::new(size.width.max(1), size.height.max(1));

        // The instance is a handle to our GPU
        // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter is compatible with the surface")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("Cannot open a device on the graphics adapter")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are converted to linear space before they reach the GPU, so
        // an Srgb surface is needed to show them as given.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface reports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width,
            height: viewport.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let sample_count = if settings.antialias
            && adapter
                .get_texture_format_features(surface_format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            if settings.antialias {
                log::warn!(
                    "{}x MSAA is not supported for {:?}, rendering without antialiasing",
                    MSAA_SAMPLES,
                    surface_format
                );
            }
            1
        };

        let camera = Camera::new(settings.camera_position, settings.camera_target);
        let projection = Projection::new(
            viewport.width,
            viewport.height,
            settings.fovy,
            settings.znear,
            settings.zfar,
        );
        let controls = settings.controls.clone().map(|mut controls| {
            controls.set_viewport_height(viewport.height);
            controls
        });

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
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
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let camera = CameraResources {
            camera,
            controls,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let light = LightResources::new(LightUniform::from_lights(&settings.lights), &device);
        let material_layout = material_layout(&device);
        let pipeline = mk_basic_pipeline(
            &device,
            &config,
            sample_count,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        let depth_texture = Texture::create_depth_texture(
            &device,
            viewport.as_array(),
            sample_count,
            "depth_texture",
        );
        let msaa_texture = (sample_count > 1).then(|| {
            Texture::create_msaa_texture(&device, viewport.as_array(), sample_count, config.format)
        });

        Ok(Self {
            window,
            depth_texture,
            msaa_texture,
            pipeline,
            surface,
            device,
            queue,
            config,
            viewport,
            sample_count,
            clear_colour: settings.clear_colour.to_wgpu(),
            camera,
            projection,
            light,
            material_layout,
        })
    }

    /// Recreates the depth and multisample attachments for the current viewport.
    pub(crate) fn recreate_attachments(&mut self) {
        self.depth_texture = Texture::create_depth_texture(
            &self.device,
            self.viewport.as_array(),
            self.sample_count,
            "depth_texture",
        );
        if self.sample_count > 1 {
            self.msaa_texture = Some(Texture::create_msaa_texture(
                &self.device,
                self.viewport.as_array(),
                self.sample_count,
                self.config.format,
            ));
        }
    }

    /// Advances the orbit controls and uploads the camera uniform.
    pub(crate) fn update_camera(&mut self) {
        if let Some(controls) = self.camera.controls.as_mut() {
            controls.update(&mut self.camera.camera);
        }
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
    }
}

/// The part of the [`Context`] a flow constructor gets to see before the
/// first frame. `Device` and `Queue` are internally reference counted, so
/// this is cheap to create.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub viewport: Viewport,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            viewport: ctx.viewport,
        }
    }
}
