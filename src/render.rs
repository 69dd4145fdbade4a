//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which flows return every frame to
//! describe what should be drawn. The engine flattens the renders of all
//! flows into one batch for the Phong pipeline so it is bound only once.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the primary enum describing render operations
//! - [`Instanced<'a>`] contains data for instanced rendering (mesh, material and instance buffer)
//!

use crate::data_structures::model::GpuMesh;

/// Data for instanced object rendering: a mesh, its material and the
/// instance buffer holding the world transforms.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a GpuMesh,
    pub material: &'a wgpu::BindGroup,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of instanced objects
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
///
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}
impl<'a> Render<'a> {
    pub(crate) fn flatten_into(self, basics: &mut Vec<Instanced<'a>>) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.flatten_into(basics)),
            Render::None => (),
        }
    }
}
