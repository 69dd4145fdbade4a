//! Scene graph and hierarchical scene organization.
//!
//! A scene graph is a tree of [`SceneNode`]s. Every node has a local transform
//! relative to its parent and a world transform that is derived from it via
//! [`SceneNode::update_world_transforms`]. Parents own their children, so
//! dropping the root drops the whole tree.
//!
//! Nodes are plain CPU data until [`SceneNode::write_to_buffers`] is called for
//! the first time. That call creates the GPU resources lazily and afterwards
//! only refreshes the per-instance data.

use log::warn;
use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::{
        instance::{Instance, InstanceRaw},
        model::{self, Material},
    },
    render::{Instanced, Render},
    resources::{
        self,
        geometry::{Geometry, Shape},
    },
};

pub trait SceneNode {
    fn name(&self) -> &str;

    fn get_local_transform(&self) -> &Instance;

    fn get_local_transform_mut(&mut self) -> &mut Instance;

    fn set_local_transform(&mut self, instance: Instance) {
        *self.get_local_transform_mut() = instance;
    }

    fn get_world_transform(&self) -> &Instance;

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.get_children_mut().push(child);
    }

    /// Shape and material if this node draws anything itself.
    fn mesh(&self) -> Option<(&Shape, &Material)> {
        None
    }

    /// Recomputes the world transform of `self` and all descendants.
    fn update_world_transforms(&mut self, parents_world_transform: &Instance);

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }

    /// Creates or refreshes the GPU resources of the subtree.
    fn write_to_buffers(&mut self, ctx: &Context);

    fn get_render(&self) -> Vec<Instanced<'_>>;
}

impl<'a> From<&'a dyn SceneNode> for Render<'a> {
    fn from(sn: &'a dyn SceneNode) -> Self {
        Render::Defaults(sn.get_render())
    }
}

/// Visits `node` and all of its descendants depth-first.
pub fn walk<'a>(node: &'a dyn SceneNode, visit: &mut dyn FnMut(&'a dyn SceneNode)) {
    visit(node);
    for child in node.get_children() {
        walk(child.as_ref(), visit);
    }
}

/// A node without geometry. Used to move, rotate or scale its children as one.
pub struct GroupNode {
    name: String,
    children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
}

impl GroupNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            local: Instance::default(),
            world: Instance::default(),
        }
    }
}

impl SceneNode for GroupNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    fn get_local_transform_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    fn get_world_transform(&self) -> &Instance {
        &self.world
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn update_world_transforms(&mut self, parents_world_transform: &Instance) {
        self.world = parents_world_transform * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn write_to_buffers(&mut self, ctx: &Context) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(ctx));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

struct MeshBuffers {
    mesh: model::GpuMesh,
    instance_buffer: wgpu::Buffer,
    #[allow(unused)]
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
}

/// A renderable node: one tessellated [`Shape`] with a [`Material`].
pub struct MeshNode {
    name: String,
    shape: Shape,
    geometry: Geometry,
    material: Material,
    children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
    buffers: Option<MeshBuffers>,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, shape: Shape, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry: shape.tessellate(),
            shape,
            material,
            children: Vec::new(),
            local: Instance::default(),
            world: Instance::default(),
            buffers: None,
        }
    }

    pub fn with_transform(mut self, instance: Instance) -> Self {
        self.local = instance;
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

impl SceneNode for MeshNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    fn get_local_transform_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    fn get_world_transform(&self) -> &Instance {
        &self.world
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn mesh(&self) -> Option<(&Shape, &Material)> {
        Some((&self.shape, &self.material))
    }

    fn update_world_transforms(&mut self, parents_world_transform: &Instance) {
        self.world = parents_world_transform * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn write_to_buffers(&mut self, ctx: &Context) {
        let raw_instances: [InstanceRaw; 1] = [self.world.to_raw()];
        match &self.buffers {
            Some(buffers) => {
                ctx.queue.write_buffer(
                    &buffers.instance_buffer,
                    0,
                    bytemuck::cast_slice(&raw_instances),
                );
            }
            None => {
                let mesh = resources::upload_geometry(&ctx.device, &self.name, &self.geometry);
                let instance_buffer =
                    ctx.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Instance Buffer"),
                            contents: bytemuck::cast_slice(&raw_instances),
                            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        });
                let (material_buffer, material_bind_group) = resources::upload_material(
                    &ctx.device,
                    &ctx.material_layout,
                    &self.material,
                );
                self.buffers = Some(MeshBuffers {
                    mesh,
                    instance_buffer,
                    material_buffer,
                    material_bind_group,
                });
            }
        }
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(ctx));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        let own = match &self.buffers {
            Some(buffers) => Some(Instanced {
                instance: &buffers.instance_buffer,
                mesh: &buffers.mesh,
                material: &buffers.material_bind_group,
                amount: 1,
            }),
            None => {
                warn!(
                    "Mesh node {} has not been written to the GPU yet and is skipped.",
                    self.name
                );
                None
            }
        };
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .chain(own)
            .collect()
    }
}
