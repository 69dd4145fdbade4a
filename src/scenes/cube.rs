//! A green box spinning around its X and Y axes.

use cgmath::{Deg, Vector3};
use instant::Duration;

use crate::{
    context::{Context, InitContext, Settings},
    data_structures::{
        model::Material,
        scene_graph::{MeshNode, SceneNode},
        spin::Spin,
    },
    flow::{FlowConstructor, GraphicsFlow, Out},
    pipelines::light::Light,
    render::Render,
    resources::geometry::Shape,
};

pub const CUBE_COLOUR: u32 = 0x00ff00;
pub const CUBE_SIDE: f32 = 2.0;
/// Radians added to the X and Y angles every frame.
pub const CUBE_STEP: f64 = 0.01;

pub fn settings() -> Settings {
    Settings::default()
        .with_title("Rotating cube")
        .with_camera((0.0, 0.0, 5.0), (0.0, 0.0, 0.0))
        .with_perspective(Deg(75.0), 0.1, 1000.0)
        .with_clear_colour(0x121212)
        .with_antialias(true)
        .with_light(Light::directional(0xffffff, 1.0, [1.0, 1.0, 1.0]))
        .with_light(Light::ambient(0x404040, 1.0))
}

pub fn build_cube() -> MeshNode {
    MeshNode::new(
        "cube",
        Shape::cube(CUBE_SIDE),
        Material::phong(CUBE_COLOUR)
            .with_specular(0x111111)
            .with_shininess(100.0),
    )
}

pub struct CubeFlow {
    cube: MeshNode,
    spin: Spin,
}

impl CubeFlow {
    pub fn new() -> Self {
        Self {
            cube: build_cube(),
            spin: Spin::new(Vector3::new(CUBE_STEP, CUBE_STEP, 0.0)),
        }
    }

    pub fn cube(&self) -> &MeshNode {
        &self.cube
    }

    pub fn spin(&self) -> &Spin {
        &self.spin
    }

    /// Advances the rotation by one frame and refreshes the world transform.
    pub fn step(&mut self) {
        self.spin.advance();
        self.cube.get_local_transform_mut().rotation = self.spin.rotation();
        self.cube.update_world_transform_all();
    }

    pub fn constructor<S: 'static>() -> FlowConstructor<S> {
        let constructor: FlowConstructor<S> = Box::new(|_: InitContext| {
            Box::pin(async move {
                log::info!("Building cube scene");
                Ok(Box::new(CubeFlow::new()) as Box<dyn GraphicsFlow<S>>)
            })
        });
        constructor
    }
}

impl Default for CubeFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> GraphicsFlow<S> for CubeFlow {
    fn on_init(&mut self, ctx: &mut Context, _state: &mut S) -> Out {
        self.cube.update_world_transform_all();
        self.cube.write_to_buffers(ctx);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _state: &mut S, _dt: Duration) -> Out {
        self.step();
        self.cube.write_to_buffers(ctx);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        (&self.cube as &dyn SceneNode).into()
    }
}
